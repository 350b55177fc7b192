/// Largest amount a single entry may carry: one trillion dollars.
pub const MAX_CENTS: i64 = 100_000_000_000_000;

/// Dollars as entered by a user, converted to integer cents. Non-finite
/// values and anything beyond [`MAX_CENTS`] are rejected rather than clamped.
pub fn to_cents(dollars: f64) -> Result<i64, String> {
    let cents = (dollars * 100.0).round();
    if !cents.is_finite() || cents.abs() > MAX_CENTS as f64 {
        return Err(format!(
            "Amount must be a number no larger than ${}",
            format_dollars(MAX_CENTS)
        ));
    }
    Ok(cents as i64)
}

/// Renders cents as a dollar figure with thousands separators and no
/// trailing fractional zeros: `123450` -> `1,234.5`, `5000` -> `50`.
pub fn format_dollars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let frac = abs % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        0 => format!("{}{}", sign, grouped),
        f if f % 10 == 0 => format!("{}{}.{}", sign, grouped, f / 10),
        f => format!("{}{}.{:02}", sign, grouped, f),
    }
}
