//! Postgres Binary Field Codec
//!
//! Encode and decode postgres field values in binary format, including
//! arrays, ranges and composites whose element types are only known at
//! runtime.
//!
//! # Examples
//!
//! Length prefixed field:
//!
//! ```
//! use pgfield::{FieldBuffer, UserTypes};
//!
//! # fn app() -> pgfield::Result<()> {
//! let types = UserTypes::new();
//! let mut buf = Vec::new();
//!
//! pgfield::write_raw_binary(&types, &mut buf, &(420i32, Some("Foo")))?;
//! pgfield::write_raw_binary(&types, &mut buf, &None::<i64>)?;
//!
//! let mut field = FieldBuffer::binary(&buf);
//! let mut record = (0i32, None::<String>);
//! let mut int = Some(0i64);
//! field.read_raw(&mut record, types.categories(), pgfield::BufferCategory::KeepCategory)?;
//! field.read_raw(&mut int, types.categories(), pgfield::BufferCategory::KeepCategory)?;
//!
//! assert_eq!(record, (420, Some("Foo".to_owned())));
//! assert_eq!(int, None);
//! # Ok(())
//! # }
//! # app().unwrap();
//! ```
//!
//! User defined composite:
//!
//! ```
//! # #[cfg(feature = "macros")]
//! # fn app() -> pgfield::Result<()> {
//! use pgfield::{BufferCategory, Composite, FieldBuffer, UserTypes};
//!
//! #[derive(Debug, PartialEq, Composite)]
//! #[pg(name = "inventory_item")]
//! struct Item {
//!     name: String,
//!     price: Option<f64>,
//! }
//!
//! let mut types = UserTypes::new();
//! types.register("inventory_item", 16401, 16400, BufferCategory::CompositeBuffer);
//!
//! let items = vec![Item { name: "fuzzy dice".into(), price: Some(1.99) }];
//! let mut buf = Vec::new();
//! pgfield::write_raw_binary(&types, &mut buf, &items)?;
//!
//! let out = FieldBuffer::binary(&buf).decode_raw::<Vec<Item>>(types.categories())?;
//! assert_eq!(out, items);
//! # Ok(())
//! # }
//! # #[cfg(feature = "macros")]
//! # app().unwrap();
//! ```

mod common;
mod ext;

// Protocol
pub mod postgres;
pub mod config;

// Decoding
pub mod buffer;
pub mod category;

// Encoding
pub mod output;
mod raw;

// Capability
mod nullable;
pub mod format;
pub mod types;

mod error;

pub use buffer::{DataFormat, FieldBuffer};
pub use category::{BufferCategory, TypeBufferCategory};
pub use config::CodecConfig;
pub use nullable::Nullable;
pub use format::{BinaryRead, BinaryWrite};
pub use output::WriteBuffer;
pub use raw::{read_raw_binary, write_raw_binary, write_raw_binary_with_oid};
pub use types::UserTypes;
pub use error::{Error, ErrorKind, Result};

#[cfg(feature = "macros")]
pub use pgfield_macros::Composite;
