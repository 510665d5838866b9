//! Postgres range.
//!
//! Binary layout is a flags byte, followed by each finite bound, length
//! prefixed.
use std::ops::{Bound, RangeBounds};

use crate::{
    BinaryRead, BinaryWrite, Nullable, Result,
    buffer::FieldBuffer,
    category::{BufferCategory, TypeBufferCategory},
    output::WriteBuffer,
    postgres::{Oid, PgType, oid},
    raw::write_raw_binary,
    types::{UserTypes, record::finish},
};

const EMPTY: u8 = 0x01;
const LB_INC: u8 = 0x02;
const UB_INC: u8 = 0x04;
const LB_INF: u8 = 0x08;
const UB_INF: u8 = 0x10;

/// A type that have a postgres range type.
pub trait RangeElement: PgType {
    const RANGE_OID: Oid;
    const RANGE_ARRAY_OID: Oid;
}

macro_rules! range_element {
    ($ty:ty, $oid:ident, $array:ident) => {
        impl RangeElement for $ty {
            const RANGE_OID: Oid = oid::$oid;
            const RANGE_ARRAY_OID: Oid = oid::$array;
        }
    };
}

range_element!(i32, INT4RANGE, INT4RANGE_ARRAY);
range_element!(i64, INT8RANGE, INT8RANGE_ARRAY);
#[cfg(feature = "time")]
range_element!(time::PrimitiveDateTime, TSRANGE, TSRANGE_ARRAY);
#[cfg(feature = "time")]
range_element!(time::Date, DATERANGE, DATERANGE_ARRAY);

/// Postgres range.
///
/// Empty range have no bounds, [`Range::empty`] is the type default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<T> {
    lower: Bound<T>,
    upper: Bound<T>,
    empty: bool,
}

impl<T> Range<T> {
    pub const fn new(lower: Bound<T>, upper: Bound<T>) -> Self {
        Self { lower, upper, empty: false }
    }

    pub const fn empty() -> Self {
        Self { lower: Bound::Unbounded, upper: Bound::Unbounded, empty: true }
    }

    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    pub const fn lower(&self) -> &Bound<T> {
        &self.lower
    }

    pub const fn upper(&self) -> &Bound<T> {
        &self.upper
    }

    fn flags(&self) -> u8 {
        if self.empty {
            return EMPTY;
        }
        let lower = match self.lower {
            Bound::Included(_) => LB_INC,
            Bound::Excluded(_) => 0,
            Bound::Unbounded => LB_INF,
        };
        let upper = match self.upper {
            Bound::Included(_) => UB_INC,
            Bound::Excluded(_) => 0,
            Bound::Unbounded => UB_INF,
        };
        lower | upper
    }
}

impl<T> RangeBounds<T> for Range<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.lower.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.upper.as_ref()
    }
}

impl<T> From<std::ops::Range<T>> for Range<T> {
    fn from(value: std::ops::Range<T>) -> Self {
        Self::new(Bound::Included(value.start), Bound::Excluded(value.end))
    }
}

impl<T> From<std::ops::RangeInclusive<T>> for Range<T> {
    fn from(value: std::ops::RangeInclusive<T>) -> Self {
        let (start, end) = value.into_inner();
        Self::new(Bound::Included(start), Bound::Included(end))
    }
}

impl<T: RangeElement> PgType for Range<T> {
    const OID: Oid = T::RANGE_OID;
    const ARRAY_OID: Oid = T::RANGE_ARRAY_OID;
}

impl<T> Nullable for Range<T> {
    fn default_value() -> Self {
        Range::empty()
    }
}

fn read_bound<T: BinaryRead>(
    buffer: &mut FieldBuffer<'_>,
    categories: &TypeBufferCategory,
    flags: u8,
    infinite: u8,
    inclusive: u8,
) -> Result<Bound<T>> {
    if flags & infinite != 0 {
        return Ok(Bound::Unbounded);
    }
    let mut value = T::default_value();
    buffer.read_raw(&mut value, categories, BufferCategory::PlainBuffer)?;
    match flags & inclusive != 0 {
        true => Ok(Bound::Included(value)),
        false => Ok(Bound::Excluded(value)),
    }
}

impl<T: BinaryRead> BinaryRead for Range<T> {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        self.read_binary_with_categories(buffer, TypeBufferCategory::builtin_ref())
    }

    fn read_binary_with_categories(
        &mut self,
        mut buffer: FieldBuffer<'_>,
        categories: &TypeBufferCategory,
    ) -> Result<()> {
        buffer.binary_bytes()?;

        let flags = buffer.read_scalar::<i8>()? as u8;
        if flags & EMPTY != 0 {
            finish(&buffer)?;
            *self = Range::empty();
            return Ok(());
        }

        let lower = read_bound(&mut buffer, categories, flags, LB_INF, LB_INC)?;
        let upper = read_bound(&mut buffer, categories, flags, UB_INF, UB_INC)?;
        finish(&buffer)?;
        *self = Range::new(lower, upper);
        Ok(())
    }
}

impl<T: BinaryWrite> BinaryWrite for Range<T> {
    fn write_binary<B: WriteBuffer>(&self, types: &UserTypes, buffer: &mut B) -> Result<()> {
        buffer.put_u8(self.flags());
        if self.empty {
            return Ok(());
        }
        if let Bound::Included(value) | Bound::Excluded(value) = &self.lower {
            write_raw_binary(types, buffer, value)?;
        }
        if let Bound::Included(value) | Bound::Excluded(value) = &self.upper {
            write_raw_binary(types, buffer, value)?;
        }
        Ok(())
    }
}
