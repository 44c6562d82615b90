//! Small helpers.

use rust_decimal::Decimal;

pub fn sanitize_symbol(sym: &str) -> String {
    sym.trim().to_uppercase()
}

/// `$` + thousands-separated amount with two decimals, e.g. `$1,234.50`, `$-12.00`.
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = rounded.abs().to_string();
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("${}{}.{}", sign, group_thousands(int_part), frac)
}

/// Signed percentage with two decimals. Exactly zero renders as `+0.00%`.
pub fn format_gain(pct: Decimal) -> String {
    let sign = if pct < Decimal::ZERO { '-' } else { '+' };
    let mut magnitude = pct.abs().round_dp(2);
    magnitude.rescale(2);
    format!("{}{}%", sign, magnitude)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Print first two chars, then mask the rest (for logs only).
pub fn mask_secret(s: &str) -> String {
    let mut cs = s.chars();
    let a = cs.next().unwrap_or('*');
    let b = cs.next().unwrap_or('*');
    format!("{}{}****", a, b)
}

/// Cut `s` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
