//! Type registry and builtin formatters.
//!
//! Implementation of [`Nullable`][n], [`BinaryRead`][r], [`BinaryWrite`][w] and
//! [`PgType`][p] for:
//!
//! - `bool`, `i8` as `"char"`, `i16`, `i32`, `i64`, `u32` as `oid`, `f32`, `f64`
//! - `String`, `&str`, `Vec<u8>`, `&[u8]`, [`Bytes`][bytes::Bytes]
//! - one dimension array as [`Vec`], multi dimension array as [`Array`]
//! - [`Range`]
//! - anonymous record as tuples
//! - [`time`][::time]'s [`PrimitiveDateTime`][tp], [`Date`][td], requires `time` feature
//! - [`serde`]'s [`Deserialize`][sd] and [`Serialize`][ss] via [`Json`], requires `json` feature
//!
//! [n]: crate::Nullable
//! [r]: crate::BinaryRead
//! [w]: crate::BinaryWrite
//! [p]: crate::postgres::PgType
//! [sd]: serde::Deserialize
//! [ss]: serde::Serialize
//! [tp]: ::time::PrimitiveDateTime
//! [td]: ::time::Date
use std::collections::HashMap;

use crate::{
    CodecConfig,
    category::{BufferCategory, TypeBufferCategory},
    postgres::{INVALID_OID, Oid},
};

mod scalar;
mod text;
mod array;
mod range;
pub mod record;

pub use array::{Array, Dimension};
pub use range::{Range, RangeElement};

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::Json;

#[cfg(feature = "time")]
mod time;

/// A user defined type registered in [`UserTypes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserType {
    pub oid: Oid,
    /// [`INVALID_OID`] if the type have no array type.
    pub array_oid: Oid,
    pub category: BufferCategory,
}

/// Registry of user defined types.
///
/// Oid of user defined types is assigned by the database, it is
/// resolved by name when encoding.
#[derive(Debug, Clone)]
pub struct UserTypes {
    names: HashMap<String, UserType>,
    categories: TypeBufferCategory,
    config: CodecConfig,
}

impl UserTypes {
    /// Create registry with builtin categories and default config.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create registry with builtin categories.
    pub fn with_config(config: CodecConfig) -> Self {
        let mut categories = TypeBufferCategory::builtin();
        categories.set_strict(config.is_strict_categories());
        Self { names: HashMap::new(), categories, config }
    }

    /// Register a user defined type.
    ///
    /// The type category is registered, along with its array type as
    /// [`BufferCategory::ArrayBuffer`].
    pub fn register(
        &mut self,
        name: impl Into<String>,
        oid: Oid,
        array_oid: Oid,
        category: BufferCategory,
    ) {
        self.categories.insert(oid, category);
        if array_oid != INVALID_OID {
            self.categories.insert(array_oid, BufferCategory::ArrayBuffer);
        }
        self.names.insert(name.into(), UserType { oid, array_oid, category });
    }

    pub fn find(&self, name: &str) -> Option<&UserType> {
        self.names.get(name)
    }

    pub fn find_oid(&self, name: &str) -> Option<Oid> {
        self.find(name).map(|ty| ty.oid)
    }

    pub fn find_array_oid(&self, name: &str) -> Option<Oid> {
        self.find(name)
            .map(|ty| ty.array_oid)
            .filter(|oid| *oid != INVALID_OID)
    }

    pub fn categories(&self) -> &TypeBufferCategory {
        &self.categories
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl Default for UserTypes {
    fn default() -> Self {
        Self::new()
    }
}
