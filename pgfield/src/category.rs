//! Structural category of postgres types.
use std::{collections::HashMap, sync::LazyLock};

use crate::{
    Result,
    format::DecodeError,
    postgres::{Oid, oid},
};

/// Wire shape of a type, required to decode nested elements.
///
/// Category is driver metadata, it is never sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferCategory {
    /// Inherit the category of the parent buffer.
    KeepCategory,
    /// Type without binary parser.
    NoParser,
    /// Result of `void` function.
    VoidResult,
    /// Scalar value.
    PlainBuffer,
    ArrayBuffer,
    CompositeBuffer,
    RangeBuffer,
}

/// Mapping from type oid to its [`BufferCategory`].
///
/// Populated once by the type registry, read only while decoding.
#[derive(Debug, Clone)]
pub struct TypeBufferCategory {
    map: HashMap<Oid, BufferCategory>,
    strict: bool,
}

static BUILTIN: LazyLock<TypeBufferCategory> = LazyLock::new(TypeBufferCategory::builtin);

impl TypeBufferCategory {
    /// Create empty, strict, categories.
    pub fn new() -> Self {
        Self { map: HashMap::new(), strict: true }
    }

    /// Create categories of builtin types.
    pub fn builtin() -> Self {
        use BufferCategory::*;

        let mut me = Self::new();
        for oid in [
            oid::BOOL, oid::BYTEA, oid::CHAR, oid::NAME, oid::INT8, oid::INT2, oid::INT4,
            oid::TEXT, oid::OID, oid::JSON, oid::FLOAT4, oid::FLOAT8, oid::VARCHAR, oid::DATE,
            oid::TIMESTAMP, oid::TIMESTAMPTZ, oid::JSONB,
        ] {
            me.insert(oid, PlainBuffer);
        }
        for oid in [
            oid::JSON_ARRAY, oid::BOOL_ARRAY, oid::BYTEA_ARRAY, oid::CHAR_ARRAY,
            oid::NAME_ARRAY, oid::INT2_ARRAY, oid::INT4_ARRAY, oid::TEXT_ARRAY,
            oid::VARCHAR_ARRAY, oid::INT8_ARRAY, oid::FLOAT4_ARRAY, oid::FLOAT8_ARRAY,
            oid::OID_ARRAY, oid::TIMESTAMP_ARRAY, oid::DATE_ARRAY, oid::TIMESTAMPTZ_ARRAY,
            oid::RECORD_ARRAY, oid::JSONB_ARRAY, oid::INT4RANGE_ARRAY, oid::TSRANGE_ARRAY,
            oid::DATERANGE_ARRAY, oid::INT8RANGE_ARRAY,
        ] {
            me.insert(oid, ArrayBuffer);
        }
        for oid in [oid::INT4RANGE, oid::TSRANGE, oid::DATERANGE, oid::INT8RANGE] {
            me.insert(oid, RangeBuffer);
        }
        me.insert(oid::RECORD, CompositeBuffer);
        me.insert(oid::VOID, VoidResult);
        me
    }

    /// Shared builtin categories, used by readers that are not given any.
    pub fn builtin_ref() -> &'static TypeBufferCategory {
        &BUILTIN
    }

    /// When not strict, unknown oid is treated as [`BufferCategory::PlainBuffer`].
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Register category of a type, returns the previous category.
    pub fn insert(&mut self, oid: Oid, category: BufferCategory) -> Option<BufferCategory> {
        self.map.insert(oid, category)
    }

    pub fn get(&self, oid: Oid) -> Option<BufferCategory> {
        self.map.get(&oid).copied()
    }

    /// Category of a type, unknown oid is an error in strict categories.
    pub fn category(&self, oid: Oid) -> Result<BufferCategory> {
        match (self.map.get(&oid), self.strict) {
            (Some(category), _) => Ok(*category),
            (None, true) => Err(DecodeError::UnknownCategory(oid).into()),
            (None, false) => Ok(BufferCategory::PlainBuffer),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for TypeBufferCategory {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<(Oid, BufferCategory)> for TypeBufferCategory {
    fn extend<I: IntoIterator<Item = (Oid, BufferCategory)>>(&mut self, iter: I) {
        self.map.extend(iter);
    }
}
