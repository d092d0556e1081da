use serde::{Deserialize, Serialize};

pub const SYNC1: u8 = 0x75;
pub const SYNC2: u8 = 0x65;

/// Header bytes: sync1, sync2, descriptor set, payload size.
pub const HEADER_SIZE: usize = 4;
/// Trailing checksum bytes (msb, lsb).
pub const CHECKSUM_SIZE: usize = 2;

/// Scalar encodings used by the sensor. All multi-byte types are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    F32,
    F64,
}

impl FieldType {
    pub const fn width(self) -> usize {
        match self {
            FieldType::U8 => 1,
            FieldType::U16 => 2,
            FieldType::F32 => 4,
            FieldType::F64 => 8,
        }
    }
}

/// Accumulator a decoded field is routed to. Fields without a slot are read
/// for layout correctness and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Tow,
    WeekNumber,
    Roll,
    Pitch,
    Yaw,
    GyroX,
    GyroY,
    GyroZ,
    AccelX,
    AccelY,
    AccelZ,
    MagX,
    MagY,
    MagZ,
    Pres,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub slot: Option<Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRecord {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl SubRecord {
    pub fn size(&self) -> usize {
        self.fields.iter().map(|field| field.ty.width()).sum()
    }
}

const fn field(name: &'static str, ty: FieldType, slot: Slot) -> Field {
    Field {
        name,
        ty,
        slot: Some(slot),
    }
}

const fn skip(name: &'static str, ty: FieldType) -> Field {
    Field {
        name,
        ty,
        slot: None,
    }
}

pub const HEADER: SubRecord = SubRecord {
    name: "header",
    fields: &[
        skip("sync1", FieldType::U8),
        skip("sync2", FieldType::U8),
        skip("descriptor_set", FieldType::U8),
        skip("payload_size", FieldType::U8),
    ],
};

pub const GPS_TIME: SubRecord = SubRecord {
    name: "gps_time",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        field("tow", FieldType::F64, Slot::Tow),
        field("week_number", FieldType::U16, Slot::WeekNumber),
        skip("flags", FieldType::U16),
    ],
};

/// Second copy of the GPS time record present on the Humboldt install.
/// Same wire shape as [`GPS_TIME`]; nothing is accumulated from it.
pub const GPS_TIME_DUPLICATE: SubRecord = SubRecord {
    name: "gps_time_duplicate",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        skip("tow", FieldType::F64),
        skip("week_number", FieldType::U16),
        skip("flags", FieldType::U16),
    ],
};

pub const RPY: SubRecord = SubRecord {
    name: "rpy",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        field("roll", FieldType::F32, Slot::Roll),
        field("pitch", FieldType::F32, Slot::Pitch),
        field("yaw", FieldType::F32, Slot::Yaw),
    ],
};

pub const GYRO: SubRecord = SubRecord {
    name: "gyro",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        field("x", FieldType::F32, Slot::GyroX),
        field("y", FieldType::F32, Slot::GyroY),
        field("z", FieldType::F32, Slot::GyroZ),
    ],
};

pub const ACCEL: SubRecord = SubRecord {
    name: "accel",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        field("x", FieldType::F32, Slot::AccelX),
        field("y", FieldType::F32, Slot::AccelY),
        field("z", FieldType::F32, Slot::AccelZ),
    ],
};

pub const MAG: SubRecord = SubRecord {
    name: "mag",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        field("x", FieldType::F32, Slot::MagX),
        field("y", FieldType::F32, Slot::MagY),
        field("z", FieldType::F32, Slot::MagZ),
    ],
};

pub const PRESSURE: SubRecord = SubRecord {
    name: "pressure",
    fields: &[
        skip("field_len", FieldType::U8),
        skip("descriptor", FieldType::U8),
        field("pres", FieldType::F32, Slot::Pres),
    ],
};

/// Checksum is decoded to keep the layout aligned; it is never verified.
pub const CHECKSUM: SubRecord = SubRecord {
    name: "checksum",
    fields: &[skip("msb", FieldType::U8), skip("lsb", FieldType::U8)],
};

pub const MORRO_RECORDS: &[SubRecord] =
    &[HEADER, GPS_TIME, RPY, GYRO, ACCEL, MAG, PRESSURE, CHECKSUM];

pub const HUMBOLDT_RECORDS: &[SubRecord] = &[
    HEADER,
    GPS_TIME,
    RPY,
    GYRO,
    ACCEL,
    MAG,
    PRESSURE,
    GPS_TIME_DUPLICATE,
    CHECKSUM,
];

/// Frame layouts emitted by the known buoy installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameLayout {
    /// Morro Bay install.
    Morro,
    /// Humboldt install: the GPS time record was configured twice, so a copy
    /// sits between the pressure and checksum records.
    Humboldt,
}

impl FrameLayout {
    /// Order in which layouts are tried when the install is not known.
    pub const CANDIDATES: [FrameLayout; 2] = [FrameLayout::Morro, FrameLayout::Humboldt];

    pub fn name(self) -> &'static str {
        match self {
            FrameLayout::Morro => "morro",
            FrameLayout::Humboldt => "humboldt",
        }
    }

    pub fn records(self) -> &'static [SubRecord] {
        match self {
            FrameLayout::Morro => MORRO_RECORDS,
            FrameLayout::Humboldt => HUMBOLDT_RECORDS,
        }
    }

    pub fn frame_size(self) -> usize {
        self.records().iter().map(SubRecord::size).sum()
    }

    /// Value the header's payload size byte must carry for this layout.
    pub fn payload_size(self) -> usize {
        self.frame_size() - HEADER_SIZE - CHECKSUM_SIZE
    }

    /// Candidate whose payload size equals `size`, if any.
    pub fn from_payload_size(size: usize) -> Option<FrameLayout> {
        Self::CANDIDATES
            .into_iter()
            .find(|layout| layout.payload_size() == size)
    }
}

impl std::fmt::Display for FrameLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
