//! Postgres field buffer.
//!
//! - [`FieldBuffer`]
//! - [`DataFormat`]
//!
//! - [`InvalidBufferSize`]
use std::fmt;

use crate::{
    Result,
    category::{BufferCategory, TypeBufferCategory},
    common::{log_warn, span, verbose},
    ext::FmtExt,
    format::{BinaryRead, DecodeError},
    postgres::{LENGTH_PREFIX_SIZE, NULL_BUFFER_SIZE, ProtocolError},
};

/// Postgres data format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Text,
    Binary,
}

impl DataFormat {
    /// Format code as sent in `RowDescription` and `Bind`.
    pub const fn code(self) -> i16 {
        match self {
            DataFormat::Text => 0,
            DataFormat::Binary => 1,
        }
    }

    /// Returns `None` for unknown format code.
    pub const fn from_code(code: i16) -> Option<DataFormat> {
        match code {
            0 => Some(DataFormat::Text),
            1 => Some(DataFormat::Binary),
            _ => None,
        }
    }
}

/// A non-owning window over a field bytes.
///
/// The bytes belong to the protocol message, the lifetime `'a` makes sure
/// a buffer never outlive it. Consuming bytes only re-points the window,
/// the underlying bytes is never written.
#[derive(Clone, Copy)]
pub struct FieldBuffer<'a> {
    is_null: bool,
    format: DataFormat,
    category: BufferCategory,
    data: &'a [u8],
}

impl<'a> FieldBuffer<'a> {
    /// Create buffer of non `NULL` field.
    pub const fn new(data: &'a [u8], format: DataFormat, category: BufferCategory) -> Self {
        Self { is_null: false, format, category, data }
    }

    /// Create buffer of `NULL` field, it contains no bytes.
    pub const fn null(format: DataFormat, category: BufferCategory) -> Self {
        Self { is_null: true, format, category, data: &[] }
    }

    /// Create binary, plain buffer.
    pub const fn binary(data: &'a [u8]) -> Self {
        Self::new(data, DataFormat::Binary, BufferCategory::PlainBuffer)
    }

    /// Return `true` if field is `NULL`.
    pub const fn is_null(&self) -> bool {
        self.is_null
    }

    pub const fn format(&self) -> DataFormat {
        self.format
    }

    pub const fn category(&self) -> BufferCategory {
        self.category
    }

    /// Remaining bytes length.
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remaining bytes, without any check.
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Create a window of `len` bytes starting at `offset`.
    ///
    /// `None` length means until the end of this buffer. Category
    /// [`BufferCategory::KeepCategory`] inherit the category of this buffer.
    ///
    /// Requested size is never clamped, it returns [`InvalidBufferSize`]
    /// instead.
    pub fn sub_buffer(
        &self,
        offset: usize,
        len: Option<usize>,
        category: BufferCategory,
    ) -> Result<FieldBuffer<'a>> {
        let available = self.data.len();
        if offset > available {
            return Err(InvalidBufferSize { requested: offset, available }.into());
        }

        let remaining = available - offset;
        let len = len.unwrap_or(remaining);
        if len > remaining {
            return Err(InvalidBufferSize { requested: len, available: remaining }.into());
        }

        let category = match category {
            BufferCategory::KeepCategory => self.category,
            category => category,
        };

        Ok(FieldBuffer {
            is_null: self.is_null,
            format: self.format,
            category,
            data: &self.data[offset..offset + len],
        })
    }

    /// Decode exactly `len` bytes into `value`, then consume them.
    ///
    /// Returns the number of bytes consumed.
    pub fn read<T: BinaryRead>(
        &mut self,
        value: &mut T,
        category: BufferCategory,
        len: usize,
    ) -> Result<usize> {
        value.read_binary(self.sub_buffer(0, Some(len), category)?)?;
        self.consume(len);
        Ok(len)
    }

    /// Same as [`FieldBuffer::read`], with categories to resolve nested types.
    pub fn read_with_categories<T: BinaryRead>(
        &mut self,
        value: &mut T,
        categories: &TypeBufferCategory,
        len: usize,
        category: BufferCategory,
    ) -> Result<usize> {
        value.read_binary_with_categories(self.sub_buffer(0, Some(len), category)?, categories)?;
        self.consume(len);
        Ok(len)
    }

    /// Decode a length prefixed field into `value`.
    ///
    /// - `-1` prefix set `value` to `NULL`
    /// - `0` prefix set `value` to its type default
    /// - other negative prefix is [`ProtocolError::NegativeBufferSize`]
    ///
    /// Returns the number of bytes consumed, including the prefix. Nothing is
    /// consumed when an error is returned.
    pub fn read_raw<T: BinaryRead>(
        &mut self,
        value: &mut T,
        categories: &TypeBufferCategory,
        category: BufferCategory,
    ) -> Result<usize> {
        span!("read_raw", remaining = self.len());
        let mut cursor = *self;

        let mut field_length = 0i32;
        let consumed = cursor.read(&mut field_length, BufferCategory::PlainBuffer, LENGTH_PREFIX_SIZE)?;
        verbose!(field_length, "field length");

        let consumed = match field_length {
            NULL_BUFFER_SIZE => {
                value.set_null()?;
                consumed
            }
            len if len < 0 => {
                log_warn!("negative buffer size value: {len}");
                return Err(ProtocolError::NegativeBufferSize(len).into());
            }
            0 => {
                value.set_default()?;
                consumed
            }
            len => consumed + cursor.read_with_categories(value, categories, len as usize, category)?,
        };

        *self = cursor;
        Ok(consumed)
    }

    /// Decode a length prefixed field as a new value.
    ///
    /// A buffer flagged as `NULL` decode as `NULL` without reading any bytes.
    pub fn decode_raw<T: BinaryRead>(self, categories: &TypeBufferCategory) -> Result<T> {
        let mut value = T::default_value();
        if self.is_null {
            value.set_null()?;
        } else {
            let mut me = self;
            me.read_raw(&mut value, categories, BufferCategory::KeepCategory)?;
        }
        Ok(value)
    }

    /// Decode the whole buffer as a new value, the buffer is the payload
    /// without length prefix.
    pub fn decode<T: BinaryRead>(self, categories: &TypeBufferCategory) -> Result<T> {
        let mut value = T::default_value();
        match (self.is_null, self.data.len()) {
            (true, _) => value.set_null()?,
            (false, 0) => value.set_default()?,
            (false, _) => value.read_binary_with_categories(self, categories)?,
        }
        Ok(value)
    }

    /// Returns the remaining bytes of non `NULL` binary buffer.
    pub fn binary_bytes(&self) -> Result<&'a [u8]> {
        if self.is_null {
            return Err(DecodeError::UnexpectedNull.into());
        }
        if self.format != DataFormat::Binary {
            return Err(DecodeError::UnsupportedFormat(self.format).into());
        }
        Ok(self.data)
    }

    /// Returns the remaining bytes of non `NULL` binary buffer, which must
    /// be exactly `N` bytes.
    pub fn binary_array<const N: usize>(&self) -> Result<[u8; N]> {
        let bytes = self.binary_bytes()?;
        bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidLength { expected: N, actual: bytes.len() }.into())
    }

    /// Read a fixed size plain value from the front of the buffer.
    pub(crate) fn read_scalar<T: BinaryRead>(&mut self) -> Result<T> {
        let mut value = T::default_value();
        self.read(&mut value, BufferCategory::PlainBuffer, size_of::<T>())?;
        Ok(value)
    }

    fn consume(&mut self, len: usize) {
        self.data = &self.data[len..];
    }
}

impl fmt::Debug for FieldBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("FieldBuffer");
        dbg.field("format", &self.format).field("category", &self.category);
        match self.is_null {
            true => dbg.field("data", &format_args!("NULL")),
            false => dbg.field("data", &self.data.lossy()),
        };
        dbg.finish()
    }
}

/// Requested offset or length exceeds bytes available in the buffer.
pub struct InvalidBufferSize {
    /// Requested offset or length.
    pub requested: usize,
    /// Bytes available.
    pub available: usize,
}

impl std::error::Error for InvalidBufferSize { }

impl fmt::Display for InvalidBufferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid buffer size {}, buffer remaining size is {}",
            self.requested, self.available
        )
    }
}

impl fmt::Debug for InvalidBufferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;

    const BYTES: &[u8] = b"0123456789";

    fn invalid(result: Result<FieldBuffer<'_>>) -> (usize, usize) {
        match result.unwrap_err().kind() {
            ErrorKind::InvalidBufferSize(e) => (e.requested, e.available),
            kind => panic!("unexpected error: {kind}"),
        }
    }

    #[test]
    fn sub_buffer_bounds() {
        let buf = FieldBuffer::binary(BYTES);

        let sub = buf.sub_buffer(2, Some(3), BufferCategory::KeepCategory).unwrap();
        assert_eq!(sub.as_bytes(), b"234");

        let sub = buf.sub_buffer(4, None, BufferCategory::KeepCategory).unwrap();
        assert_eq!(sub.as_bytes(), b"456789");

        let sub = buf.sub_buffer(0, Some(10), BufferCategory::KeepCategory).unwrap();
        assert_eq!(sub.as_bytes(), BYTES);

        assert_eq!(invalid(buf.sub_buffer(8, Some(3), BufferCategory::KeepCategory)), (3, 2));
        assert_eq!(invalid(buf.sub_buffer(0, Some(11), BufferCategory::KeepCategory)), (11, 10));
    }

    #[test]
    fn sub_buffer_at_end() {
        let buf = FieldBuffer::binary(BYTES);

        let sub = buf.sub_buffer(10, None, BufferCategory::KeepCategory).unwrap();
        assert!(sub.is_empty());

        assert_eq!(invalid(buf.sub_buffer(11, None, BufferCategory::KeepCategory)), (11, 10));
    }

    #[test]
    fn sub_buffer_category() {
        let buf = FieldBuffer::new(BYTES, DataFormat::Binary, BufferCategory::ArrayBuffer);

        let sub = buf.sub_buffer(1, None, BufferCategory::KeepCategory).unwrap();
        assert_eq!(sub.category(), BufferCategory::ArrayBuffer);
        assert_eq!(sub.format(), DataFormat::Binary);
        assert!(!sub.is_null());

        let sub = buf.sub_buffer(1, None, BufferCategory::RangeBuffer).unwrap();
        assert_eq!(sub.category(), BufferCategory::RangeBuffer);
        assert_eq!(buf.category(), BufferCategory::ArrayBuffer);
    }

    #[test]
    fn read_consume() {
        let mut buf = FieldBuffer::binary(&[0, 0, 0, 7, 0, 1, 0xff]);

        let mut int = 0i32;
        assert_eq!(buf.read(&mut int, BufferCategory::PlainBuffer, 4).unwrap(), 4);
        assert_eq!(int, 7);
        assert_eq!(buf.len(), 3);

        let mut short = 0i16;
        assert_eq!(buf.read(&mut short, BufferCategory::PlainBuffer, 2).unwrap(), 2);
        assert_eq!(short, 1);
        assert_eq!(buf.as_bytes(), &[0xff]);

        // not enough bytes, nothing consumed
        assert!(buf.read(&mut int, BufferCategory::PlainBuffer, 4).is_err());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn read_raw_null_default_and_value() {
        let categories = TypeBufferCategory::builtin();
        let bytes = [
            0xff, 0xff, 0xff, 0xff, // NULL
            0, 0, 0, 0, // default
            0, 0, 0, 4, 0, 0, 0, 5, // 5
        ];
        let mut buf = FieldBuffer::binary(&bytes);

        let mut value = Some(1i32);
        assert_eq!(buf.read_raw(&mut value, &categories, BufferCategory::KeepCategory).unwrap(), 4);
        assert_eq!(value, None);

        assert_eq!(buf.read_raw(&mut value, &categories, BufferCategory::KeepCategory).unwrap(), 4);
        assert_eq!(value, Some(0));

        assert_eq!(buf.read_raw(&mut value, &categories, BufferCategory::KeepCategory).unwrap(), 8);
        assert_eq!(value, Some(5));
        assert!(buf.is_empty());
    }

    #[test]
    fn read_raw_negative_size() {
        let categories = TypeBufferCategory::builtin();
        let bytes = (-2i32).to_be_bytes();
        let mut buf = FieldBuffer::binary(&bytes);

        let mut value = 0i32;
        let err = buf.read_raw(&mut value, &categories, BufferCategory::KeepCategory).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Protocol(ProtocolError::NegativeBufferSize(-2))));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn read_raw_null_into_non_nullable() {
        let categories = TypeBufferCategory::builtin();
        let mut buf = FieldBuffer::binary(&[0xff; 4]);

        let mut value = 0i32;
        let err = buf.read_raw(&mut value, &categories, BufferCategory::KeepCategory).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::UnexpectedNull)));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn read_raw_truncated_payload() {
        let categories = TypeBufferCategory::builtin();
        let mut buf = FieldBuffer::binary(&[0, 0, 0, 8, 0, 0, 0, 5]);

        let mut value = 0i64;
        let err = buf.read_raw(&mut value, &categories, BufferCategory::KeepCategory).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidBufferSize(e) => assert_eq!((e.requested, e.available), (8, 4)),
            kind => panic!("unexpected error: {kind}"),
        }
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn text_format_rejected() {
        let buf = FieldBuffer::new(b"12", DataFormat::Text, BufferCategory::PlainBuffer);
        let err = buf.binary_bytes().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::UnsupportedFormat(DataFormat::Text))));
    }

    #[test]
    fn decode_null_buffer() {
        let categories = TypeBufferCategory::builtin();
        let buf = FieldBuffer::null(DataFormat::Binary, BufferCategory::PlainBuffer);
        assert_eq!(buf.decode::<Option<String>>(&categories).unwrap(), None);
        assert_eq!(buf.decode_raw::<Option<String>>(&categories).unwrap(), None);
        assert!(buf.decode::<String>(&categories).is_err());
    }
}
