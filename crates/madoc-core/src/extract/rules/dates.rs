//! Date extraction for Moroccan financial documents.

use chrono::NaiveDate;

use super::patterns::DATE;
use super::{scan, FieldExtractor, FieldMatch};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = (FieldMatch, NaiveDate);

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        scan(&DATE, 0, text)
            .into_iter()
            .filter_map(|m| parse_date(&m.value).map(|d| (m, d)))
            .collect()
    }
}

/// Find the document date: the first date-pattern match in the text.
///
/// Only the first match is considered, and no proximity-to-invoice-keyword
/// weighting is applied. A documented limitation, not an oversight: a later
/// parseable date never rescues an unparseable first match.
pub fn find_document_date(text: &str) -> Option<NaiveDate> {
    let first = scan(&DATE, 0, text).into_iter().next()?;
    parse_date(&first.value)
}

/// Parse a matched date string: numeric day-first, or `<day> <month> <year>`
/// with French/English month names.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Some((a, b, c)) = split_numeric_date(s) {
        let year = expand_year(c);
        // Moroccan convention is day-first; fall back to month-first for
        // dates that only make sense the other way around (e.g. 05/25/2024).
        return NaiveDate::from_ymd_opt(year, b, a)
            .or_else(|| NaiveDate::from_ymd_opt(year, a, b));
    }

    let mut parts = s.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_number(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;

    NaiveDate::from_ymd_opt(expand_year(year), month, day)
}

fn split_numeric_date(s: &str) -> Option<(u32, u32, i32)> {
    let mut parts = s.split(['/', '-']);
    let a: u32 = parts.next()?.parse().ok()?;
    let b: u32 = parts.next()?.parse().ok()?;
    let c: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

/// Two-digit years: 00-50 land in the 2000s, 51-99 in the 1900s.
fn expand_year(year: i32) -> i32 {
    if year < 100 {
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_number(month: &str) -> Option<u32> {
    let m = month.to_lowercase();
    let n = match m.as_str() {
        "janvier" | "jan" | "january" => 1,
        "février" | "fév" | "february" => 2,
        "mars" | "mar" | "march" => 3,
        "avril" | "avr" | "april" => 4,
        "mai" | "may" => 5,
        "juin" | "jun" | "june" => 6,
        "juillet" | "jul" | "july" => 7,
        "août" | "aoû" | "august" => 8,
        "septembre" | "sep" | "september" => 9,
        "octobre" | "oct" | "october" => 10,
        "novembre" | "nov" | "november" => 11,
        "décembre" | "déc" | "december" => 12,
        _ => return None,
    };
    Some(n)
}
