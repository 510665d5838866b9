use bytes::Bytes;

use crate::{
    BinaryRead, BinaryWrite, Nullable, Result, buffer::FieldBuffer,
    nullable::nullable_default, output::WriteBuffer, types::UserTypes,
};

nullable_default!(String, Vec<u8>, Bytes);

impl Nullable for &str {
    fn default_value() -> Self {
        ""
    }
}

impl Nullable for &[u8] {
    fn default_value() -> Self {
        &[]
    }
}

impl BinaryRead for String {
    /// Existing allocation is reused.
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        let value = std::str::from_utf8(buffer.binary_bytes()?)?;
        self.clear();
        self.push_str(value);
        Ok(())
    }
}

impl BinaryRead for Vec<u8> {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        let value = buffer.binary_bytes()?;
        self.clear();
        self.extend_from_slice(value);
        Ok(())
    }
}

impl BinaryRead for Bytes {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        *self = Bytes::copy_from_slice(buffer.binary_bytes()?);
        Ok(())
    }
}

macro_rules! write_bytes {
    ($($ty:ty => |$me:ident| $bytes:expr),*) => {
        $(
            impl BinaryWrite for $ty {
                fn write_binary<B: WriteBuffer>(&self, _: &UserTypes, buffer: &mut B) -> Result<()> {
                    let $me = self;
                    buffer.put_slice($bytes);
                    Ok(())
                }
            }
        )*
    };
}

write_bytes! {
    String => |me| me.as_bytes(),
    &str => |me| me.as_bytes(),
    Vec<u8> => |me| me.as_slice(),
    &[u8] => |me| me,
    Bytes => |me| &me[..]
}

#[cfg(test)]
mod test {
    use bytes::Bytes;

    use crate::{ErrorKind, FieldBuffer, UserTypes, format::DecodeError, write_raw_binary};

    #[test]
    fn text() {
        let types = UserTypes::new();
        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &"héllo").unwrap();
        write_raw_binary(&types, &mut buf, &String::from("world")).unwrap();

        let mut field = FieldBuffer::binary(&buf);
        let mut value = String::from("previous");
        field.read_raw(&mut value, types.categories(), crate::BufferCategory::KeepCategory).unwrap();
        assert_eq!(value, "héllo");
        field.read_raw(&mut value, types.categories(), crate::BufferCategory::KeepCategory).unwrap();
        assert_eq!(value, "world");
        assert!(field.is_empty());
    }

    #[test]
    fn invalid_utf8() {
        let types = UserTypes::new();
        let err = FieldBuffer::binary(&[0xc3, 0x28])
            .decode::<String>(types.categories())
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::Utf8(_))));
    }

    #[test]
    fn bytea() {
        let types = UserTypes::new();
        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &&[1u8, 2, 3][..]).unwrap();
        assert_eq!(buf, [0, 0, 0, 3, 1, 2, 3]);

        let value = FieldBuffer::binary(&buf).decode_raw::<Vec<u8>>(types.categories()).unwrap();
        assert_eq!(value, [1, 2, 3]);

        let value = FieldBuffer::binary(&buf).decode_raw::<Bytes>(types.categories()).unwrap();
        assert_eq!(&value[..], [1, 2, 3]);

        let value = FieldBuffer::binary(&[0; 4]).decode_raw::<Vec<u8>>(types.categories()).unwrap();
        assert!(value.is_empty());
    }
}
