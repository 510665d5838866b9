use time::{Date, Duration, Month, PrimitiveDateTime, Time};

use crate::{
    BinaryRead, BinaryWrite, Nullable, Result,
    buffer::FieldBuffer,
    format::{DecodeError, EncodeError},
    output::WriteBuffer,
    postgres::{Oid, PgType, oid},
    types::UserTypes,
};

impl PgType for PrimitiveDateTime {
    /// `timestamp` date and time
    const OID: Oid = oid::TIMESTAMP;
    const ARRAY_OID: Oid = oid::TIMESTAMP_ARRAY;
}

impl PgType for Date {
    /// `date` calendar date (year, month, day)
    const OID: Oid = oid::DATE;
    const ARRAY_OID: Oid = oid::DATE_ARRAY;
}

const PG_EPOCH_DATE: Date = match Date::from_calendar_date(2000, Month::January, 1) {
    Ok(ok) => ok,
    Err(_) => panic!("2000-01-01 is a valid date"),
};

const PG_EPOCH: PrimitiveDateTime = PrimitiveDateTime::new(PG_EPOCH_DATE, Time::MIDNIGHT);

impl Nullable for PrimitiveDateTime {
    /// Postgres epoch, `2000-01-01 00:00:00`.
    fn default_value() -> Self {
        PG_EPOCH
    }
}

impl Nullable for Date {
    /// Postgres epoch, `2000-01-01`.
    fn default_value() -> Self {
        PG_EPOCH_DATE
    }
}

impl BinaryRead for PrimitiveDateTime {
    /// Microseconds since postgres epoch.
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        let micros = i64::from_be_bytes(buffer.binary_array()?);
        *self = PG_EPOCH
            .checked_add(Duration::microseconds(micros))
            .ok_or(DecodeError::OutOfRange("timestamp".into()))?;
        Ok(())
    }
}

impl BinaryWrite for PrimitiveDateTime {
    fn write_binary<B: WriteBuffer>(&self, _: &UserTypes, buffer: &mut B) -> Result<()> {
        let micros = (*self - PG_EPOCH).whole_microseconds();
        let micros = i64::try_from(micros).map_err(|_| EncodeError::OutOfRange("timestamp".into()))?;
        buffer.put_i64(micros);
        Ok(())
    }
}

impl BinaryRead for Date {
    /// Days since postgres epoch.
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        let days = i32::from_be_bytes(buffer.binary_array()?);
        *self = PG_EPOCH_DATE
            .checked_add(Duration::days(days.into()))
            .ok_or(DecodeError::OutOfRange("date".into()))?;
        Ok(())
    }
}

impl BinaryWrite for Date {
    fn write_binary<B: WriteBuffer>(&self, _: &UserTypes, buffer: &mut B) -> Result<()> {
        let days = (*self - PG_EPOCH_DATE).whole_days();
        let days = i32::try_from(days).map_err(|_| EncodeError::OutOfRange("date".into()))?;
        buffer.put_i32(days);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::ops::Bound;

    use super::*;
    use crate::{ErrorKind, types::Range, write_raw_binary};

    fn datetime(date: Date, hour: u8, micro: u32) -> PrimitiveDateTime {
        PrimitiveDateTime::new(date, Time::from_hms_micro(hour, 0, 0, micro).unwrap())
    }

    #[test]
    fn timestamp() {
        let types = UserTypes::new();
        let value = datetime(PG_EPOCH_DATE, 1, 5);

        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &value).unwrap();
        assert_eq!(&buf[4..], 3_600_000_005i64.to_be_bytes());

        let out = FieldBuffer::binary(&buf).decode_raw::<PrimitiveDateTime>(types.categories()).unwrap();
        assert_eq!(out, value);

        let before = datetime(Date::from_calendar_date(1999, Month::December, 31).unwrap(), 23, 0);
        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &before).unwrap();
        assert_eq!(&buf[4..], (-3_600_000_000i64).to_be_bytes());
    }

    #[test]
    fn date() {
        let types = UserTypes::new();
        let value = Date::from_calendar_date(2000, Month::February, 1).unwrap();

        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &value).unwrap();
        assert_eq!(buf, [0, 0, 0, 4, 0, 0, 0, 31]);

        let out = FieldBuffer::binary(&buf).decode_raw::<Date>(types.categories()).unwrap();
        assert_eq!(out, value);

        let out = FieldBuffer::binary(&[0; 4]).decode_raw::<Date>(types.categories()).unwrap();
        assert_eq!(out, PG_EPOCH_DATE);
    }

    #[test]
    fn out_of_range() {
        let types = UserTypes::new();
        let err = FieldBuffer::binary(&i64::MAX.to_be_bytes())
            .decode::<PrimitiveDateTime>(types.categories())
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::OutOfRange(_))));
    }

    #[test]
    fn date_range() {
        let types = UserTypes::new();
        let lower = PG_EPOCH_DATE;
        let range = Range::new(Bound::Included(lower), Bound::Unbounded);

        let mut buf = Vec::new();
        write_raw_binary(&types, &mut buf, &range).unwrap();
        let out = FieldBuffer::binary(&buf).decode_raw::<Range<Date>>(types.categories()).unwrap();
        assert_eq!(out, range);
        assert_eq!(<Range<Date> as PgType>::OID, oid::DATERANGE);
    }
}
