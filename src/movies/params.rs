use crate::tmdb::MovieCategory;

/// Upstream list endpoints stop serving pages past this one.
pub const MAX_PAGE: u32 = 500;

/// Resolved query of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub category: MovieCategory,
    pub page: u32,
}

impl ListQuery {
    pub fn from_params(category: Option<&str>, page: Option<&str>) -> Self {
        Self {
            category: MovieCategory::from_param(category),
            page: resolve_page(page),
        }
    }
}

/// Turn the raw `page` parameter into a page number in `1..=MAX_PAGE`.
/// Missing, unparseable and non-positive values resolve to page 1.
pub fn resolve_page(raw: Option<&str>) -> u32 {
    match raw.and_then(parse_leading_int) {
        Some(n) if n > 0 => n.min(MAX_PAGE as i64) as u32,
        _ => 1,
    }
}

/// Lenient integer parse: skips leading whitespace, accepts a sign, then
/// reads digits until the first non-digit ("12abc" is 12). Saturates
/// instead of overflowing.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(|b| b.is_ascii_digit()) {
        seen = true;
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}
