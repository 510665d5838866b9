//! Postgres wire level definitions.
use std::fmt;

mod pg_type;

pub use pg_type::{Oid, PgType, INVALID_OID, oid};

/// Length prefix of a `NULL` field.
pub const NULL_BUFFER_SIZE: i32 = -1;

/// Size of the field length prefix.
pub const LENGTH_PREFIX_SIZE: usize = size_of::<i32>();

/// Wire data does not follow postgres protocol.
pub enum ProtocolError {
    /// Field length prefix is negative and not [`NULL_BUFFER_SIZE`].
    NegativeBufferSize(i32),
    /// Encoded payload does not fit the field length prefix.
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl std::error::Error for ProtocolError { }

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("protocol error, ")?;
        match self {
            Self::NegativeBufferSize(len) => write!(f, "negative buffer size value: {len}"),
            Self::PayloadTooLarge { size, max } => {
                write!(f, "payload size {size} exceeds maximum of {max}")
            }
        }
    }
}

impl fmt::Debug for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
