use crate::types::UserTypes;

/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// Oid that refers to no type, used as "no replacement".
pub const INVALID_OID: Oid = 0;

/// A type that have corresponding postgres oid.
///
/// Builtin types have their oid statically known, user defined types
/// override [`PgType::oid`] to resolve it from [`UserTypes`].
pub trait PgType {
    const OID: Oid;

    /// Oid of the array type which has this type as an element.
    const ARRAY_OID: Oid = INVALID_OID;

    /// Resolve the oid, for user defined types this requires lookup.
    fn oid(types: &UserTypes) -> Oid {
        let _ = types;
        Self::OID
    }

    /// Resolve the array oid, for user defined types this requires lookup.
    fn array_oid(types: &UserTypes) -> Oid {
        let _ = types;
        Self::ARRAY_OID
    }
}

/// Builtin type oids.
///
/// Generated from `pg_type.dat`, only the types supported by this crate.
pub mod oid {
    use super::Oid;

    pub const BOOL: Oid = 16;
    pub const BYTEA: Oid = 17;
    pub const CHAR: Oid = 18;
    pub const NAME: Oid = 19;
    pub const INT8: Oid = 20;
    pub const INT2: Oid = 21;
    pub const INT4: Oid = 23;
    pub const TEXT: Oid = 25;
    pub const OID: Oid = 26;
    pub const JSON: Oid = 114;
    pub const FLOAT4: Oid = 700;
    pub const FLOAT8: Oid = 701;
    pub const VARCHAR: Oid = 1043;
    pub const DATE: Oid = 1082;
    pub const TIMESTAMP: Oid = 1114;
    pub const TIMESTAMPTZ: Oid = 1184;
    pub const RECORD: Oid = 2249;
    pub const VOID: Oid = 2278;
    pub const JSONB: Oid = 3802;
    pub const INT4RANGE: Oid = 3904;
    pub const TSRANGE: Oid = 3908;
    pub const DATERANGE: Oid = 3912;
    pub const INT8RANGE: Oid = 3926;

    pub const JSON_ARRAY: Oid = 199;
    pub const BOOL_ARRAY: Oid = 1000;
    pub const BYTEA_ARRAY: Oid = 1001;
    pub const CHAR_ARRAY: Oid = 1002;
    pub const NAME_ARRAY: Oid = 1003;
    pub const INT2_ARRAY: Oid = 1005;
    pub const INT4_ARRAY: Oid = 1007;
    pub const TEXT_ARRAY: Oid = 1009;
    pub const VARCHAR_ARRAY: Oid = 1015;
    pub const INT8_ARRAY: Oid = 1016;
    pub const FLOAT4_ARRAY: Oid = 1021;
    pub const FLOAT8_ARRAY: Oid = 1022;
    pub const OID_ARRAY: Oid = 1028;
    pub const TIMESTAMP_ARRAY: Oid = 1115;
    pub const DATE_ARRAY: Oid = 1182;
    pub const TIMESTAMPTZ_ARRAY: Oid = 1185;
    pub const RECORD_ARRAY: Oid = 2287;
    pub const JSONB_ARRAY: Oid = 3807;
    pub const INT4RANGE_ARRAY: Oid = 3905;
    pub const TSRANGE_ARRAY: Oid = 3909;
    pub const DATERANGE_ARRAY: Oid = 3913;
    pub const INT8RANGE_ARRAY: Oid = 3927;
}

macro_rules! oid {
    ($ty:ty, $oid:ident, $array:ident $(, $doc:literal)? ) => {
        impl PgType for $ty {
            $(#[doc = $doc])?
            const OID: Oid = oid::$oid;
            const ARRAY_OID: Oid = oid::$array;
        }
    };
}

oid!(bool, BOOL, BOOL_ARRAY);
oid!(i8, CHAR, CHAR_ARRAY, "`\"char\"` single-byte internal type");
oid!(i64, INT8, INT8_ARRAY, "`int8` ~18 digit integer, 8-byte storage");
oid!(i16, INT2, INT2_ARRAY, "`int2` -32 thousand to 32 thousand, 2-byte storage");
oid!(i32, INT4, INT4_ARRAY, "`int4` -2 billion to 2 billion integer, 4-byte storage");
oid!(u32, OID, OID_ARRAY, "`oid` object identifier(oid), maximum 4 billion");
oid!(&str, TEXT, TEXT_ARRAY, "`text` variable-length string, no limit specified");
oid!(String, TEXT, TEXT_ARRAY, "`text` variable-length string, no limit specified");
oid!(&[u8], BYTEA, BYTEA_ARRAY, "`bytea` variable-length string, binary values escaped");
oid!(Vec<u8>, BYTEA, BYTEA_ARRAY, "`bytea` variable-length string, binary values escaped");
oid!(bytes::Bytes, BYTEA, BYTEA_ARRAY, "`bytea` variable-length string, binary values escaped");
oid!(f32, FLOAT4, FLOAT4_ARRAY, "`float4` single-precision floating point number, 4-byte storage");
oid!(f64, FLOAT8, FLOAT8_ARRAY, "`float8` double-precision floating point number, 8-byte storage");

impl<T: PgType> PgType for Option<T> {
    const OID: Oid = T::OID;
    const ARRAY_OID: Oid = T::ARRAY_OID;

    fn oid(types: &UserTypes) -> Oid {
        T::oid(types)
    }

    fn array_oid(types: &UserTypes) -> Oid {
        T::array_oid(types)
    }
}
