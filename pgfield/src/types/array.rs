//! Postgres array.
//!
//! Binary layout:
//!
//! - `i32` number of dimensions, zero for empty array
//! - `i32` has null flag
//! - `u32` element oid
//! - for each dimension, `i32` length and `i32` lower bound
//! - each element, length prefixed

use crate::{
    BinaryRead, BinaryWrite, Nullable, Result,
    buffer::FieldBuffer,
    category::{BufferCategory, TypeBufferCategory},
    format::{DecodeError, EncodeError},
    output::WriteBuffer,
    postgres::{INVALID_OID, Oid, PgType},
    raw::write_raw_binary,
    types::UserTypes,
};

/// Postgres `MAXDIM`.
const MAX_DIMENSIONS: i32 = 6;

/// Array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    pub len: usize,
    pub lower_bound: i32,
}

impl Dimension {
    /// Dimension with the postgres default lower bound of `1`.
    pub const fn new(len: usize) -> Self {
        Self { len, lower_bound: 1 }
    }
}

/// Multi dimension postgres array.
///
/// Elements are stored flat, in row major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    dimensions: Vec<Dimension>,
    elements: Vec<T>,
}

impl<T> Array<T> {
    /// Create one dimension array.
    pub fn new(elements: Vec<T>) -> Self {
        let dimensions = match elements.is_empty() {
            true => vec![],
            false => vec![Dimension::new(elements.len())],
        };
        Self { dimensions, elements }
    }

    /// Create array with given dimensions.
    ///
    /// Returns `None` if the dimensions does not describe all elements, or
    /// there are more than postgres `MAXDIM` dimensions.
    pub fn with_dimensions(dimensions: Vec<Dimension>, elements: Vec<T>) -> Option<Self> {
        if dimensions.len() > MAX_DIMENSIONS as usize {
            return None;
        }
        let count = dimensions
            .iter()
            .try_fold(1usize, |acc, dim| acc.checked_mul(dim.len))?;
        let count = if dimensions.is_empty() { 0 } else { count };
        (count == elements.len()).then_some(Self { dimensions, elements })
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<T> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

struct ArrayHeader {
    dimensions: Vec<Dimension>,
    elem_oid: Oid,
}

impl ArrayHeader {
    fn read(buffer: &mut FieldBuffer<'_>) -> Result<Self> {
        buffer.binary_bytes()?;

        let ndim = buffer.read_scalar::<i32>()?;
        if !(0..=MAX_DIMENSIONS).contains(&ndim) {
            return Err(DecodeError::Dimensions(ndim).into());
        }

        // has null flag is informational, elements carry their own NULL
        let _has_null = buffer.read_scalar::<i32>()?;
        let elem_oid = buffer.read_scalar::<u32>()?;

        let mut dimensions = Vec::with_capacity(ndim as usize);
        for _ in 0..ndim {
            let len = buffer.read_scalar::<i32>()?;
            let lower_bound = buffer.read_scalar::<i32>()?;
            let Ok(len) = usize::try_from(len) else {
                return Err(DecodeError::OutOfRange(format!("array dimension length {len}").into()).into());
            };
            dimensions.push(Dimension { len, lower_bound });
        }

        Ok(Self { dimensions, elem_oid })
    }

    fn count(&self) -> Result<usize> {
        if self.dimensions.is_empty() {
            return Ok(0);
        }
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, dim| acc.checked_mul(dim.len))
            .ok_or_else(|| DecodeError::OutOfRange("array element count".into()).into())
    }

    fn read_elements<T: BinaryRead>(
        &self,
        buffer: &mut FieldBuffer<'_>,
        categories: &TypeBufferCategory,
    ) -> Result<Vec<T>> {
        let count = self.count()?;
        let category = categories
            .get(self.elem_oid)
            .unwrap_or(BufferCategory::KeepCategory);

        // each element is at least its length prefix
        let mut elements = Vec::with_capacity(count.min(buffer.len() / 4));

        for _ in 0..count {
            let mut element = T::default_value();
            buffer.read_raw(&mut element, categories, category)?;
            elements.push(element);
        }

        match buffer.len() {
            0 => Ok(elements),
            n => Err(DecodeError::TrailingBytes(n).into()),
        }
    }
}

fn write_array<T, B>(
    types: &UserTypes,
    buffer: &mut B,
    dimensions: &[Dimension],
    elements: &[T],
    replace_oid: Oid,
) -> Result<()>
where
    T: BinaryWrite + PgType,
    B: WriteBuffer,
{
    let elem_oid = match replace_oid {
        INVALID_OID => T::oid(types),
        replace => replace,
    };
    if elem_oid == INVALID_OID {
        return Err(EncodeError::UnknownOid(std::any::type_name::<T>()).into());
    }

    let dimensions = match elements.is_empty() {
        true => &[][..],
        false => dimensions,
    };

    buffer.put_i32(dimensions.len() as i32);
    buffer.put_i32(elements.iter().any(Nullable::is_null) as i32);
    buffer.put_u32(elem_oid);

    for dim in dimensions {
        let Ok(len) = i32::try_from(dim.len) else {
            return Err(EncodeError::OutOfRange(format!("array dimension length {}", dim.len).into()).into());
        };
        buffer.put_i32(len);
        buffer.put_i32(dim.lower_bound);
    }

    for element in elements {
        write_raw_binary(types, buffer, element)?;
    }

    Ok(())
}

// ===== Vec =====

impl<T: PgType> PgType for Vec<T> {
    const OID: Oid = T::ARRAY_OID;

    fn oid(types: &UserTypes) -> Oid {
        T::array_oid(types)
    }
}

impl<T: Nullable> Nullable for Vec<T> {
    fn default_value() -> Self {
        Vec::new()
    }
}

impl<T: BinaryRead> BinaryRead for Vec<T> {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        self.read_binary_with_categories(buffer, TypeBufferCategory::builtin_ref())
    }

    fn read_binary_with_categories(
        &mut self,
        mut buffer: FieldBuffer<'_>,
        categories: &TypeBufferCategory,
    ) -> Result<()> {
        let header = ArrayHeader::read(&mut buffer)?;
        if header.dimensions.len() > 1 {
            return Err(DecodeError::Dimensions(header.dimensions.len() as i32).into());
        }
        *self = header.read_elements(&mut buffer, categories)?;
        Ok(())
    }
}

impl<T: BinaryWrite + PgType> BinaryWrite for Vec<T> {
    /// Replacement oid replace the element oid.
    const ACCEPTS_REPLACEMENT_OID: bool = true;

    fn write_binary<B: WriteBuffer>(&self, types: &UserTypes, buffer: &mut B) -> Result<()> {
        self.write_binary_with_oid(types, buffer, INVALID_OID)
    }

    fn write_binary_with_oid<B: WriteBuffer>(
        &self,
        types: &UserTypes,
        buffer: &mut B,
        replace_oid: Oid,
    ) -> Result<()> {
        write_array(types, buffer, &[Dimension::new(self.len())], self, replace_oid)
    }
}

// ===== Array =====

impl<T: PgType> PgType for Array<T> {
    const OID: Oid = T::ARRAY_OID;

    fn oid(types: &UserTypes) -> Oid {
        T::array_oid(types)
    }
}

impl<T: Nullable> Nullable for Array<T> {
    fn default_value() -> Self {
        Array::new(Vec::new())
    }
}

impl<T: BinaryRead> BinaryRead for Array<T> {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        self.read_binary_with_categories(buffer, TypeBufferCategory::builtin_ref())
    }

    fn read_binary_with_categories(
        &mut self,
        mut buffer: FieldBuffer<'_>,
        categories: &TypeBufferCategory,
    ) -> Result<()> {
        let header = ArrayHeader::read(&mut buffer)?;
        self.elements = header.read_elements(&mut buffer, categories)?;
        self.dimensions = header.dimensions;
        Ok(())
    }
}

impl<T: BinaryWrite + PgType> BinaryWrite for Array<T> {
    /// Replacement oid replace the element oid.
    const ACCEPTS_REPLACEMENT_OID: bool = true;

    fn write_binary<B: WriteBuffer>(&self, types: &UserTypes, buffer: &mut B) -> Result<()> {
        self.write_binary_with_oid(types, buffer, INVALID_OID)
    }

    fn write_binary_with_oid<B: WriteBuffer>(
        &self,
        types: &UserTypes,
        buffer: &mut B,
        replace_oid: Oid,
    ) -> Result<()> {
        write_array(types, buffer, &self.dimensions, &self.elements, replace_oid)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ErrorKind, postgres::oid, raw::write_raw_binary_with_oid};

    #[test]
    fn int_array_layout() {
        let types = UserTypes::new();
        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &vec![1i32, 2]).unwrap();

        let mut expected = vec![];
        expected.extend_from_slice(&36i32.to_be_bytes());
        expected.extend_from_slice(&1i32.to_be_bytes());
        expected.extend_from_slice(&0i32.to_be_bytes());
        expected.extend_from_slice(&oid::INT4.to_be_bytes());
        expected.extend_from_slice(&2i32.to_be_bytes());
        expected.extend_from_slice(&1i32.to_be_bytes());
        expected.extend_from_slice(&[0, 0, 0, 4, 0, 0, 0, 1]);
        expected.extend_from_slice(&[0, 0, 0, 4, 0, 0, 0, 2]);
        assert_eq!(buf, expected);

        let value = FieldBuffer::binary(&buf).decode_raw::<Vec<i32>>(types.categories()).unwrap();
        assert_eq!(value, [1, 2]);
    }

    #[test]
    fn nullable_elements() {
        let types = UserTypes::new();
        let mut buf = Vec::new();
        let array = vec![Some(String::from("a")), None, Some(String::new())];
        write_raw_binary(&types, &mut buf, &array).unwrap();

        // has null flag
        assert_eq!(buf[8..12], [0, 0, 0, 1]);

        let value = FieldBuffer::binary(&buf)
            .decode_raw::<Vec<Option<String>>>(types.categories())
            .unwrap();
        assert_eq!(value, array);
    }

    #[test]
    fn empty_array() {
        let types = UserTypes::new();
        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &Vec::<i64>::new()).unwrap();
        assert_eq!(buf.len(), 4 + 12);
        assert_eq!(buf[4..8], [0, 0, 0, 0]);

        let value = FieldBuffer::binary(&buf).decode_raw::<Vec<i64>>(types.categories()).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn replacement_oid() {
        let types = UserTypes::new();
        let mut buf = Vec::new();
        write_raw_binary_with_oid(&types, &mut buf, &vec![7i32], 16400).unwrap();
        assert_eq!(buf[12..16], 16400u32.to_be_bytes());

        // non array type ignore replacement oid
        let mut buf = Vec::new();
        write_raw_binary_with_oid(&types, &mut buf, &7i32, 16400).unwrap();
        assert_eq!(buf, [0, 0, 0, 4, 0, 0, 0, 7]);
    }

    #[test]
    fn multi_dimension() {
        let types = UserTypes::new();
        let dims = vec![Dimension::new(2), Dimension { len: 3, lower_bound: 0 }];
        let array = Array::with_dimensions(dims, vec![1i16, 2, 3, 4, 5, 6]).unwrap();
        assert!(Array::with_dimensions(vec![Dimension::new(4)], vec![1i16]).is_none());

        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &array).unwrap();

        let value = FieldBuffer::binary(&buf).decode_raw::<Array<i16>>(types.categories()).unwrap();
        assert_eq!(value, array);

        let err = FieldBuffer::binary(&buf).decode_raw::<Vec<i16>>(types.categories()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::Dimensions(2))));
    }

    #[test]
    fn trailing_bytes() {
        let types = UserTypes::new();
        let mut payload = Vec::new();
        vec![1i32].write_binary(&types, &mut payload).unwrap();
        payload.push(0);

        let err = FieldBuffer::binary(&payload).decode::<Vec<i32>>(types.categories()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::TrailingBytes(1))));
    }

    #[test]
    fn failed_read_keeps_value() {
        let types = UserTypes::new();
        let mut payload = Vec::new();
        vec![5i32, 6].write_binary(&types, &mut payload).unwrap();
        payload.truncate(payload.len() - 2);

        let mut value = vec![1i32, 2, 3];
        let err = value
            .read_binary_with_categories(FieldBuffer::binary(&payload), types.categories())
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidBufferSize(_)));
        assert_eq!(value, [1, 2, 3]);

        let mut array = Array::new(vec![1i32, 2, 3]);
        array
            .read_binary_with_categories(FieldBuffer::binary(&payload), types.categories())
            .unwrap_err();
        assert_eq!(array.elements(), [1, 2, 3]);
        assert_eq!(array.dimensions(), [Dimension::new(3)]);
    }

    #[test]
    fn too_many_dimensions() {
        let dims = vec![Dimension::new(1); 6];
        assert!(Array::with_dimensions(dims, vec![1i32]).is_some());

        let dims = vec![Dimension::new(1); 7];
        assert!(Array::with_dimensions(dims, vec![1i32]).is_none());
    }
}
