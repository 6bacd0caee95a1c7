use attex_core::constants::TIMESTAMP_MS_CUTOFF;
use attex_core::error::AttexError;
use attex_core::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// `parseTimestamp`: normalize an accepted date representation to the UTC
/// millisecond epoch, returned as a decimal string.
///
/// Accepted surface forms, tried in order:
/// 1. a number or numeric string; above 10 000 000 000 it is already in
///    milliseconds, otherwise seconds scaled by 1000;
/// 2. ISO 8601 with an offset or trailing `Z`;
/// 3. ISO 8601 without a timezone (optional fractional seconds), read as UTC;
/// 4. `YYYY-MM-DD HH:MM:SS`, where the first space becomes `T`, then as (3);
/// 5. `YYYY-MM-DD`, read as midnight UTC;
/// 6. `MM/DD/YYYY` (US order), read as midnight UTC.
///
/// `format`, when present, is a regex the raw input must match before any
/// parsing is attempted.
pub fn parse_timestamp(value: &Value, format: Option<&str>) -> Result<Value, AttexError> {
    let raw = value.safe_to_string();
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AttexError::op("parseTimestamp", "empty input"));
    }

    if let Some(fmt) = format {
        let re = Regex::new(fmt).map_err(|e| {
            AttexError::op("parseTimestamp", format!("invalid format regex '{fmt}': {e}"))
        })?;
        if !re.is_match(raw) {
            return Err(AttexError::op(
                "parseTimestamp",
                format!("input '{raw}' does not match format '{fmt}'"),
            ));
        }
    }

    let ms = parse_epoch_ms(raw).ok_or_else(|| {
        AttexError::op(
            "parseTimestamp",
            format!("unrecognised timestamp '{raw}'"),
        )
    })?;
    Ok(Value::Str(ms.to_string()))
}

fn parse_epoch_ms(raw: &str) -> Option<i64> {
    // 1. numeric epoch
    if let Ok(n) = raw.parse::<f64>() {
        if !n.is_finite() {
            return None;
        }
        let ms = if n > TIMESTAMP_MS_CUTOFF { n } else { n * 1000.0 };
        return Some(ms as i64);
    }

    // 2. ISO 8601 with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }

    // 3. ISO 8601 without timezone (fractional seconds optional), read as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
    }

    // 4. "YYYY-MM-DD HH:MM:SS": promote the first space to 'T'
    if let Some(idx) = raw.find(' ') {
        let mut promoted = raw.to_string();
        promoted.replace_range(idx..idx + 1, "T");
        if let Ok(naive) = NaiveDateTime::parse_from_str(&promoted, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }

    // 5. bare date, midnight UTC
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
    }

    // 6. US-ordered date, midnight UTC
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
    }

    None
}
