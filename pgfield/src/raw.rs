//! Length prefixed field encoding.

use crate::{
    Result,
    buffer::FieldBuffer,
    category::{BufferCategory, TypeBufferCategory},
    common::{log_warn, span, verbose},
    format::{BinaryRead, BinaryWrite},
    output::WriteBuffer,
    postgres::{INVALID_OID, LENGTH_PREFIX_SIZE, NULL_BUFFER_SIZE, Oid, ProtocolError},
    types::UserTypes,
};

/// Decode a length prefixed field from the start of `buffer`.
///
/// Returns the number of bytes consumed.
pub fn read_raw_binary<T: BinaryRead>(
    mut buffer: FieldBuffer<'_>,
    value: &mut T,
    categories: &TypeBufferCategory,
) -> Result<usize> {
    buffer.read_raw(value, categories, BufferCategory::KeepCategory)
}

/// Encode `value` with its length prefix.
///
/// `NULL` is written as `-1` prefix only.
pub fn write_raw_binary<T, B>(types: &UserTypes, buffer: &mut B, value: &T) -> Result<()>
where
    T: BinaryWrite,
    B: WriteBuffer,
{
    write_raw_binary_with_oid(types, buffer, value, INVALID_OID)
}

/// Encode `value` with its length prefix, passing `replace_oid` to types
/// that accept replacement oid.
///
/// Length prefix is reserved before the payload is written, then patched
/// with the actual payload length. On error, the buffer is restored to its
/// length before the call.
pub fn write_raw_binary_with_oid<T, B>(
    types: &UserTypes,
    buffer: &mut B,
    value: &T,
    replace_oid: Oid,
) -> Result<()>
where
    T: BinaryWrite,
    B: WriteBuffer,
{
    if value.is_null() {
        buffer.put_i32(NULL_BUFFER_SIZE);
        return Ok(());
    }

    span!("write_raw", ty = std::any::type_name::<T>());

    let len_start = buffer.grow(LENGTH_PREFIX_SIZE);
    let size_before = buffer.len();

    let written = if T::ACCEPTS_REPLACEMENT_OID {
        value.write_binary_with_oid(types, buffer, replace_oid)
    } else {
        value.write_binary(types, buffer)
    };

    if let Err(err) = written {
        buffer.truncate(len_start);
        return Err(err);
    }

    let size = buffer.len() - size_before;
    let max = types.config().max_payload();
    let Some(bytes) = i32::try_from(size).ok().filter(|_| size <= max) else {
        log_warn!("payload size {size} exceeds maximum of {max}");
        buffer.truncate(len_start);
        return Err(ProtocolError::PayloadTooLarge { size, max }.into());
    };

    verbose!(bytes, "field written");
    buffer.patch(len_start, &bytes.to_be_bytes());
    Ok(())
}
