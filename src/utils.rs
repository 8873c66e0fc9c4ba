use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-05-17T13:45:09.000Z`.
pub fn format_wire_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_local_time(at: &DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    #[test]
    fn wire_timestamp_is_utc_millis() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);
        assert_eq!(format_wire_timestamp(&at), "2024-01-02T03:04:05.678Z");
    }

    #[test]
    fn local_time_uses_zone() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 9).unwrap();
        assert_eq!(format_local_time(&at, Sao_Paulo), "17/05/2024 10:45:09");
    }
}
