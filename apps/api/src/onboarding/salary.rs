//! Free-text target salary → numeric range.
//!
//! Accepts the forms people actually type: "80000", "80k", "$80,000",
//! "80k-100k", "$80,000 - $100,000". `$` and `,` are stripped and the text is
//! split on `-`; the first part is the minimum, the second the maximum. Each
//! part is lowercased and trimmed, its first `k` becomes `000`, and the
//! leading run of digits is taken as the value, so "80000.00" and "80000/yr"
//! both read as 80000.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

pub fn parse_salary(text: &str) -> SalaryRange {
    let sanitized: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    if sanitized.trim().is_empty() {
        return SalaryRange::default();
    }

    // Anything after a second `-` is ignored.
    let mut parts = sanitized.split('-');
    let min = parts.next().and_then(parse_part);
    let max = parts.next().and_then(parse_part);

    SalaryRange { min, max }
}

/// A part with no leading digits after `k` expansion is treated as unset, as
/// is one too large for the `INTEGER` column.
fn parse_part(part: &str) -> Option<i32> {
    let expanded = part.trim().to_lowercase().replacen('k', "000", 1);
    let unsigned = expanded.strip_prefix('+').unwrap_or(&expanded);
    let digits: &str = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .map_or(unsigned, |end| &unsigned[..end]);

    if digits.is_empty() {
        if !expanded.is_empty() {
            warn!(part = %expanded, "Ignoring unparseable salary value");
        }
        return None;
    }

    match digits.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(part = %expanded, "Ignoring out-of-range salary value");
            None
        }
    }
}
