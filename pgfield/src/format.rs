//! The binary formatter capability.
//!
//! - [`BinaryRead`]
//! - [`BinaryWrite`]
//!
//! - [`DecodeError`]
//! - [`EncodeError`]
use std::{borrow::Cow, fmt, str::Utf8Error};

use crate::{
    Nullable, Result,
    buffer::{DataFormat, FieldBuffer},
    category::TypeBufferCategory,
    output::WriteBuffer,
    postgres::Oid,
    types::UserTypes,
};

/// A type that can be decoded from binary payload.
///
/// The buffer given is the payload only, length prefix is already stripped.
#[diagnostic::on_unimplemented(
    message = "type `{Self}` doesn't have a binary parser",
    label = "implement `BinaryRead` for `{Self}`"
)]
pub trait BinaryRead: Nullable {
    /// Decode payload into self.
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()>;

    /// Decode payload into self, with categories to resolve element types
    /// only known at runtime.
    fn read_binary_with_categories(
        &mut self,
        buffer: FieldBuffer<'_>,
        categories: &TypeBufferCategory,
    ) -> Result<()> {
        let _ = categories;
        self.read_binary(buffer)
    }
}

/// A type that can be encoded as binary payload.
///
/// Implementation only write the payload, length prefix is written by
/// [`write_raw_binary`][crate::write_raw_binary].
#[diagnostic::on_unimplemented(
    message = "type `{Self}` doesn't have a binary formatter",
    label = "implement `BinaryWrite` for `{Self}`"
)]
pub trait BinaryWrite: Nullable {
    /// Whether [`BinaryWrite::write_binary_with_oid`] make use of the
    /// replacement oid.
    ///
    /// This is resolved per type at compile time.
    const ACCEPTS_REPLACEMENT_OID: bool = false;

    /// Write payload into `buffer`.
    fn write_binary<B: WriteBuffer>(&self, types: &UserTypes, buffer: &mut B) -> Result<()>;

    /// Write payload into `buffer`, stamping `replace_oid` instead of the
    /// type default oid.
    ///
    /// [`INVALID_OID`][crate::postgres::INVALID_OID] means no replacement.
    fn write_binary_with_oid<B: WriteBuffer>(
        &self,
        types: &UserTypes,
        buffer: &mut B,
        replace_oid: Oid,
    ) -> Result<()> {
        let _ = replace_oid;
        self.write_binary(types, buffer)
    }
}

impl<T: BinaryRead> BinaryRead for Option<T> {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        self.read_binary_with_categories(buffer, TypeBufferCategory::builtin_ref())
    }

    /// `None` stays `None` when decoding fails.
    fn read_binary_with_categories(
        &mut self,
        buffer: FieldBuffer<'_>,
        categories: &TypeBufferCategory,
    ) -> Result<()> {
        if let Some(value) = self {
            return value.read_binary_with_categories(buffer, categories);
        }
        let mut value = T::default_value();
        value.read_binary_with_categories(buffer, categories)?;
        *self = Some(value);
        Ok(())
    }
}

impl<T: BinaryWrite> BinaryWrite for Option<T> {
    const ACCEPTS_REPLACEMENT_OID: bool = T::ACCEPTS_REPLACEMENT_OID;

    /// `None` is written as `NULL` by the caller, it writes nothing here.
    fn write_binary<B: WriteBuffer>(&self, types: &UserTypes, buffer: &mut B) -> Result<()> {
        match self {
            Some(value) => value.write_binary(types, buffer),
            None => Ok(()),
        }
    }

    fn write_binary_with_oid<B: WriteBuffer>(
        &self,
        types: &UserTypes,
        buffer: &mut B,
        replace_oid: Oid,
    ) -> Result<()> {
        match self {
            Some(value) => value.write_binary_with_oid(types, buffer, replace_oid),
            None => Ok(()),
        }
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for DecodeError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

/// An error when decoding field payload.
pub enum DecodeError {
    /// Field is `NULL` but type cannot represent it.
    UnexpectedNull,
    /// Payload length does not match the type.
    InvalidLength {
        expected: usize,
        actual: usize,
    },
    /// Payload is not in binary format.
    UnsupportedFormat(DataFormat),
    /// No category registered for the oid.
    UnknownCategory(Oid),
    /// Composite field count missmatch.
    FieldCount {
        expected: usize,
        actual: i32,
    },
    /// Array dimension count is invalid.
    Dimensions(i32),
    /// Bytes left after decoding the payload.
    TrailingBytes(usize),
    /// Value is out of range for the type.
    OutOfRange(Cow<'static, str>),
    /// Postgres return non utf8 string.
    Utf8(Utf8Error),
    /// Failed to deserialize using `serde_json`.
    #[cfg(feature = "json")]
    Json(serde_json::error::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode value, ")?;
        match self {
            Self::UnexpectedNull => write!(f, "unexpected NULL value"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "expected {expected} bytes, found {actual}")
            }
            Self::UnsupportedFormat(format) => write!(f, "unsupported data format: {format:?}"),
            Self::UnknownCategory(oid) => write!(f, "no buffer category for oid {oid}"),
            Self::FieldCount { expected, actual } => {
                write!(f, "expected {expected} composite fields, found {actual}")
            }
            Self::Dimensions(ndim) => write!(f, "invalid array dimensions: {ndim}"),
            Self::TrailingBytes(n) => write!(f, "{n} trailing bytes after value"),
            Self::OutOfRange(msg) => write!(f, "value out of range: {msg}"),
            Self::Utf8(e) => write!(f, "{e}"),
            #[cfg(feature = "json")]
            Self::Json(e) => write!(f, "{e}"),
        }
    }
}

from!(<Utf8Error>e => Self::Utf8(e));
#[cfg(feature = "json")]
from!(<serde_json::error::Error>e => Self::Json(e));

impl std::error::Error for DecodeError { }

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// An error when encoding value.
pub enum EncodeError {
    /// Oid of a user defined type is not registered.
    UnknownOid(&'static str),
    /// Value is out of range for the postgres type.
    OutOfRange(Cow<'static, str>),
    /// Failed to serialize using `serde_json`.
    #[cfg(feature = "json")]
    Json(serde_json::error::Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to encode value, ")?;
        match self {
            Self::UnknownOid(name) => write!(f, "oid of `{name}` is not registered"),
            Self::OutOfRange(msg) => write!(f, "value out of range: {msg}"),
            #[cfg(feature = "json")]
            Self::Json(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EncodeError { }

impl fmt::Debug for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
