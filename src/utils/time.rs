use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Human-readable instant used in notification texts.
pub fn display_instant(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_utc_minutes() {
        let dt = DateTime::parse_from_rfc3339("2024-07-01T12:30:45+02:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(display_instant(dt), "2024-07-01 10:30 UTC");
    }
}
