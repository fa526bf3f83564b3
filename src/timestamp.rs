use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use time::OffsetDateTime;

/// Current time in the representation stored by the entities.
pub(crate) fn now() -> DateTimeWithTimeZone {
    to_db_datetime(OffsetDateTime::now_utc())
}

/// Converts a `time::OffsetDateTime` to Sea-ORM's chrono-based column type.
///
/// Sub-microsecond digits are dropped so that a value written to PostgreSQL
/// reads back unchanged.
pub(crate) fn to_db_datetime(time: OffsetDateTime) -> DateTimeWithTimeZone {
    let micros = time.nanosecond() / 1_000 * 1_000;
    DateTime::from_timestamp(time.unix_timestamp(), micros)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn conversion_keeps_the_instant_to_the_microsecond() {
        let converted = to_db_datetime(datetime!(2024-03-01 12:30:45.123456789 UTC));

        assert_eq!(converted.timestamp(), 1_709_296_245);
        assert_eq!(converted.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(converted.offset().local_minus_utc(), 0);
    }

    #[test]
    fn conversion_normalizes_offsets_to_utc() {
        let converted = to_db_datetime(datetime!(2024-03-01 14:30:45 +02:00));

        assert_eq!(converted.timestamp(), 1_709_296_245);
        assert_eq!(converted.offset().local_minus_utc(), 0);
    }
}
