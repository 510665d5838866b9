use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    BinaryRead, BinaryWrite, Nullable, Result,
    buffer::FieldBuffer,
    format::{DecodeError, EncodeError},
    output::WriteBuffer,
    postgres::{Oid, PgType, oid},
    types::UserTypes,
};

const JSONB_VERSION: u8 = 1;

/// Decode and encode postgres `jsonb` value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> PgType for Json<T> {
    /// `jsonb` Binary JSON
    const OID: Oid = oid::JSONB;
    const ARRAY_OID: Oid = oid::JSONB_ARRAY;
}

impl<T: Default> Nullable for Json<T> {
    fn default_value() -> Self {
        Json(T::default())
    }
}

impl<T: DeserializeOwned + Default> BinaryRead for Json<T> {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        let Some((&version, json)) = buffer.binary_bytes()?.split_first() else {
            return Err(DecodeError::InvalidLength { expected: 1, actual: 0 }.into());
        };
        if version != JSONB_VERSION {
            return Err(DecodeError::OutOfRange(format!("jsonb version {version}").into()).into());
        }
        self.0 = serde_json::from_slice(json).map_err(DecodeError::Json)?;
        Ok(())
    }
}

impl<T: Serialize + Default> BinaryWrite for Json<T> {
    fn write_binary<B: WriteBuffer>(&self, _: &UserTypes, buffer: &mut B) -> Result<()> {
        buffer.put_u8(JSONB_VERSION);
        serde_json::to_writer(buffer.writer(), &self.0).map_err(EncodeError::Json)?;
        Ok(())
    }
}

impl<T: Serialize> Serialize for Json<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Json<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self(T::deserialize(deserializer)?))
    }
}
