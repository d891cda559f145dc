//! Relative date tokens (`@now`, `@today`, `@yesterday`, `@7d`, ...).
//!
//! Tokens resolve to a symbolic [`RelativeDate`]; the data source evaluates
//! the resulting expression, so no timestamp is ever computed client-side.

/// Time unit of an `@{n}{unit}` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DateUnit {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            'h' => Some(DateUnit::Hour),
            'd' => Some(DateUnit::Day),
            'w' => Some(DateUnit::Week),
            'm' => Some(DateUnit::Month),
            'y' => Some(DateUnit::Year),
            _ => None,
        }
    }

    /// Singular English name.
    pub fn name(self) -> &'static str {
        match self {
            DateUnit::Hour => "hour",
            DateUnit::Day => "day",
            DateUnit::Week => "week",
            DateUnit::Month => "month",
            DateUnit::Year => "year",
        }
    }
}

/// A resolved relative date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeDate {
    /// The current instant.
    Now,
    /// The current date.
    Today,
    /// The current date minus one day.
    Yesterday,
    /// The current instant minus `amount` units.
    Ago { amount: u32, unit: DateUnit },
}

impl RelativeDate {
    /// Human-readable form for previews.
    pub fn describe(&self) -> String {
        match self {
            RelativeDate::Now => "now".to_string(),
            RelativeDate::Today => "today".to_string(),
            RelativeDate::Yesterday => "yesterday".to_string(),
            RelativeDate::Ago { amount, unit } => {
                let plural = if *amount == 1 { "" } else { "s" };
                format!("{} {}{} ago", amount, unit.name(), plural)
            }
        }
    }
}

/// Resolve a raw value as a relative date token.
///
/// Returns `None` for anything that is not exactly one of the recognized
/// forms; such values are then treated as ordinary literals.
pub fn resolve(raw: &str) -> Option<RelativeDate> {
    let body = raw.strip_prefix('@')?.to_ascii_lowercase();

    match body.as_str() {
        "now" => return Some(RelativeDate::Now),
        "today" => return Some(RelativeDate::Today),
        "yesterday" => return Some(RelativeDate::Yesterday),
        _ => {}
    }

    let unit_char = body.chars().last()?;
    let unit = DateUnit::from_suffix(unit_char)?;
    let digits = &body[..body.len() - unit_char.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount = digits.parse::<u32>().ok()?;

    Some(RelativeDate::Ago { amount, unit })
}
