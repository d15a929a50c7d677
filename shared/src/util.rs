/// Current UTC time as an RFC 3339 string with millisecond precision (`...Z`)
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Current UTC calendar date as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Hyphenated UUID check (8-4-4-4-12 hex digits)
///
/// Stricter than `Uuid::try_parse`, which also accepts the simple, braced
/// and URN forms.
pub fn is_uuid(s: &str) -> bool {
    s.len() == 36 && s.as_bytes()[8] == b'-' && uuid::Uuid::try_parse(s).is_ok()
}

/// `YYYY-MM-DD` shape check: four ASCII digits, hyphen, two digits, hyphen, two digits.
///
/// Purely syntactic; `2024-13-40` passes.
pub fn is_date_pattern(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}
