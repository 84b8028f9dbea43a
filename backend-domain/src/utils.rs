use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a match date as written in batch files.
///
/// `M/D/YYYY` is read as local midnight. ISO forms are accepted as a
/// fallback. `None` means the caller should substitute the current time.
pub fn parse_played_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts = raw.split('/').collect::<Vec<_>>();
    if parts.len() == 3 {
        if let (Ok(month), Ok(day), Ok(year)) = (
            parts[0].trim().parse::<u32>(),
            parts[1].trim().parse::<u32>(),
            parts[2].trim().parse::<i32>(),
        ) {
            if parts[2].trim().len() == 4 {
                return NaiveDate::from_ymd_opt(year, month, day)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .and_then(local_to_utc);
            }
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_to_utc(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
        return date.and_hms_opt(0, 0, 0).and_then(local_to_utc);
    }
    None
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .single()
        .or_else(|| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}

/// Trimmed text, `None` when nothing is left.
pub fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn slash_dates_are_local_midnight() {
        let parsed = parse_played_at("2/3/2026").expect("parse date");
        let local = parsed.with_timezone(&Local);
        assert_eq!((local.year(), local.month(), local.day()), (2026, 2, 3));
        assert_eq!(local.format("%H:%M").to_string(), "00:00");
    }

    #[test]
    fn iso_dates_are_accepted() {
        let parsed = parse_played_at("2026-02-03T10:00:00Z").expect("parse rfc3339");
        assert_eq!(parsed.to_rfc3339(), "2026-02-03T10:00:00+00:00");
        assert!(parse_played_at("2026-02-03").is_some());
    }

    #[test]
    fn garbage_and_impossible_dates_yield_none() {
        assert!(parse_played_at("").is_none());
        assert!(parse_played_at("yesterday").is_none());
        assert!(parse_played_at("13/45/2026").is_none());
    }
}
