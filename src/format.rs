//! Display formatters for `#[format(using = ...)]` and the numeric/date defaults.
use std::borrow::Cow;
use std::fmt::{Display, Write};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::value::Date;

/// Turns a field value into display text.
///
/// Any `Fn(&T) -> String` is a formatter, so `#[format(using = |v: &u32| format!("{v} views"))]`
/// works without a dedicated type.
pub trait Format<T: ?Sized> {
    fn format(&self, value: &T) -> String;
}

impl<T: ?Sized, F> Format<T> for F
where
    F: Fn(&T) -> String,
{
    fn format(&self, value: &T) -> String {
        self(value)
    }
}

/// Numeric kinds accepted by [`NumberFormat`].
pub trait Numeric: Display {}

macro_rules! numeric {
    ($($ty:ty),*) => { $(impl Numeric for $ty {})* };
}

numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Decimal);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberFormat {
    fraction_digits: Option<usize>,
    grouping: bool,
}

impl NumberFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed number of fraction digits; integers are unaffected.
    pub fn fraction_digits(mut self, digits: usize) -> Self {
        self.fraction_digits = Some(digits);
        self
    }

    /// Thousands separator on the integer part.
    pub fn grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }
}

impl<T: Numeric> Format<T> for NumberFormat {
    fn format(&self, value: &T) -> String {
        let raw = match self.fraction_digits {
            Some(digits) => format!("{value:.digits$}"),
            None => value.to_string(),
        };
        if self.grouping {
            group_thousands(&raw)
        } else {
            raw
        }
    }
}

fn group_thousands(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (int_part, rest) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };
    let mut grouped = String::with_capacity(raw.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(rest);
    grouped
}

/// Date kinds accepted by [`DateFormat`].
pub trait Temporal {
    fn naive(&self) -> NaiveDateTime;
}

impl Temporal for Date {
    fn naive(&self) -> NaiveDateTime {
        self.naive_utc()
    }
}

impl Temporal for NaiveDateTime {
    fn naive(&self) -> NaiveDateTime {
        *self
    }
}

impl Temporal for NaiveDate {
    fn naive(&self) -> NaiveDateTime {
        self.and_hms_opt(0, 0, 0).unwrap_or_default()
    }
}

/// `strftime`-style date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: Cow<'static, str>,
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::new("%Y-%m-%d %H:%M")
    }
}

impl DateFormat {
    pub const fn new(pattern: &'static str) -> Self {
        DateFormat {
            pattern: Cow::Borrowed(pattern),
        }
    }

    pub fn custom(pattern: impl Into<String>) -> Self {
        DateFormat {
            pattern: Cow::Owned(pattern.into()),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl<T: Temporal> Format<T> for DateFormat {
    fn format(&self, value: &T) -> String {
        let naive = value.naive();
        let mut out = String::new();
        // 非法模式不 panic，回落到默认表示
        if write!(out, "{}", naive.format(&self.pattern)).is_err() {
            tracing::warn!(pattern = %self.pattern, "invalid date pattern; using default rendering");
            out = naive.to_string();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_formatters() {
        let views = |v: &u32| format!("{v} views");
        assert_eq!(Format::format(&views, &12), "12 views");
    }

    #[test]
    fn number_format_digits_and_grouping() {
        let plain = NumberFormat::default();
        assert_eq!(plain.format(&1234567u32), "1234567");
        let money = NumberFormat::new().fraction_digits(2).grouping(true);
        assert_eq!(money.format(&1234567.5f64), "1,234,567.50");
        assert_eq!(money.format(&-1234i64), "-1,234");
        assert_eq!(money.format(&Decimal::new(12345, 1)), "1,234.50");
    }

    #[test]
    fn date_patterns() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(DateFormat::new("%d/%m/%Y").format(&day), "17/05/2024");
        assert_eq!(DateFormat::default().format(&day), "2024-05-17 00:00");
    }

    #[test]
    fn bad_pattern_falls_back() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let out = DateFormat::custom("%Q").format(&day);
        assert_eq!(out, "2024-05-17 00:00:00");
    }
}
