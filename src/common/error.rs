use std::fmt::{Debug, Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Invalid arguments
    InvalidVersion,
    InvalidVersionRange,
    InvalidMaskingPattern,
    InvalidBorder,
    InvalidEci,
    InvalidChar,
    InvalidCodewordCount,

    // Capacity
    DataTooLong { required: usize, available: usize },
    SegmentTooLong,

    // Broken invariant inside the encoder, never caused by user input
    Internal(&'static str),
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match *self {
            Self::InvalidVersion => f.write_str("Invalid version"),
            Self::InvalidVersionRange => f.write_str("Invalid version range"),
            Self::InvalidMaskingPattern => f.write_str("Invalid masking pattern"),
            Self::InvalidBorder => f.write_str("Invalid border"),
            Self::InvalidEci => f.write_str("ECI assignment value out of range"),
            Self::InvalidChar => f.write_str("Invalid character"),
            Self::InvalidCodewordCount => f.write_str("Invalid number of data codewords"),
            Self::DataTooLong { required, available } => {
                write!(f, "Data too long: {required} bits required, {available} bits available")
            }
            Self::SegmentTooLong => f.write_str("Segment too long"),
            Self::Internal(msg) => write!(f, "Internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
