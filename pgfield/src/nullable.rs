//! The [`Nullable`] capability.
use crate::{Result, format::DecodeError};

/// Null representation of a type.
///
/// Types without natural null representation keep the default
/// [`Nullable::set_null`], which returns [`DecodeError::UnexpectedNull`].
pub trait Nullable: Sized {
    /// The type default, which is what a zero length payload decode into.
    ///
    /// Also used to create the destination before decoding.
    fn default_value() -> Self;

    /// Returns `true` if value will be encoded as `NULL`.
    fn is_null(&self) -> bool {
        false
    }

    /// Set value to `NULL`.
    fn set_null(&mut self) -> Result<()> {
        Err(DecodeError::UnexpectedNull.into())
    }

    /// Set value to its type default.
    fn set_default(&mut self) -> Result<()> {
        *self = Self::default_value();
        Ok(())
    }
}

impl<T: Nullable> Nullable for Option<T> {
    /// `None`, zero length payload is [`Some`] of the inner default.
    fn default_value() -> Self {
        None
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn set_null(&mut self) -> Result<()> {
        *self = None;
        Ok(())
    }

    fn set_default(&mut self) -> Result<()> {
        *self = Some(T::default_value());
        Ok(())
    }
}

/// Implement [`Nullable`] using [`Default`].
macro_rules! nullable_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Nullable for $ty {
                fn default_value() -> Self {
                    <$ty as Default>::default()
                }
            }
        )*
    };
}

pub(crate) use nullable_default;
