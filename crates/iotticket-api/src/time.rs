use chrono::NaiveDateTime;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a `yyyy-MM-dd HH:mm:ss` date (UTC) to milliseconds since the
/// Unix epoch, for use as a read-query bound or a datanode timestamp.
///
/// Returns `None` if the string does not match the format or the date is
/// before the epoch.
pub fn date_to_timestamp(date: &str) -> Option<u64> {
    let parsed = NaiveDateTime::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    u64::try_from(parsed.and_utc().timestamp_millis()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_dates() {
        assert_eq!(date_to_timestamp("2016-02-21 00:00:00"), Some(1_456_012_800_000));
        assert_eq!(date_to_timestamp("2018-04-11 00:00:00"), Some(1_523_404_800_000));
        assert_eq!(date_to_timestamp("1970-01-01 00:00:01"), Some(1000));
    }

    #[test]
    fn rejects_other_formats() {
        assert_eq!(date_to_timestamp("2016-02-21"), None);
        assert_eq!(date_to_timestamp("21.02.2016 00:00:00"), None);
        assert_eq!(date_to_timestamp(""), None);
    }

    #[test]
    fn rejects_pre_epoch() {
        assert_eq!(date_to_timestamp("1969-12-31 23:59:59"), None);
    }
}
