//! Money strings <-> integer minor units. Integer math only, never floats.

/// Parse a money string into minor units (cents).
///
/// Accepts an optional leading `-`, `$` and thousands separators, and at most
/// two decimal places: `"1,250.5"` → `125050`, `"-3"` → `-300`.
pub fn parse_money(s: &str) -> Result<i64, String> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$' && !c.is_whitespace())
        .collect();
    let (negative, s) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    if s.is_empty() {
        return Err("empty amount".into());
    }
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("bad amount: {s}"));
    }
    let (dollars, cents) = if let Some(dot) = s.find('.') {
        let whole = &s[..dot];
        let d: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|e| format!("bad dollars: {e}"))?
        };
        let frac = &s[dot + 1..];
        let c: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|e| format!("bad cents: {e}"))? * 10,
            2 => frac.parse().map_err(|e| format!("bad cents: {e}"))?,
            _ => return Err(format!("too many decimal places: {s}")),
        };
        (d, c)
    } else {
        (s.parse().map_err(|e| format!("bad amount: {e}"))?, 0)
    };
    let minor = dollars
        .checked_mul(100)
        .and_then(|d| d.checked_add(cents))
        .ok_or_else(|| format!("amount out of range: {s}"))?;
    Ok(if negative { -minor } else { minor })
}

/// Render minor units as a plain decimal string: `125050` → `"1250.50"`.
pub fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
