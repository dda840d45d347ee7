use thiserror::Error;

/// A single record could not be decoded or encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record does not start with ':'")]
    MissingStartCode,

    #[error("odd number of hex digits")]
    OddDigitCount,

    #[error("invalid hex digit: {0:?}")]
    InvalidHexDigit(char),

    #[error("record too short: {len} bytes, need at least 5")]
    TooShort { len: usize },

    #[error("byte count mismatch: header says {declared}, got {actual}")]
    LengthMismatch { declared: u8, actual: usize },

    #[error("unsupported record type: {0:02X}")]
    UnsupportedRecordType(u8),

    #[error("address record type {record_type:02X} must have 2 data bytes, got {len}")]
    InvalidAddressRecord { record_type: u8, len: usize },

    #[error("record data too long: {len} bytes, at most 255 fit in one record")]
    DataTooLong { len: usize },
}

/// A Data record landed somewhere it cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("data record after start segment address record")]
    BasePoisoned,

    #[error(transparent)]
    Malformed(#[from] RecordError),

    #[error("data at {base:#X} + {offset:#06X} ({len} bytes) overflows 32-bit address space")]
    Overflow { base: u32, offset: u16, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("bad address at line {line}: {source}")]
    Address {
        line: usize,
        #[source]
        source: AddressError,
    },

    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

impl ParseError {
    /// 1-based line the error was found on, if it belongs to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Record { line, .. } | Self::Address { line, .. } => Some(*line),
            Self::InvalidUtf8 { .. } => None,
        }
    }
}
