//! Date list codec for the `DT` property.
//!
//! A `DT` value is a comma-separated list of `YYYY`, `YYYY-MM`, or
//! `YYYY-MM-DD` entries. Later entries may be shortened by leaving out the
//! leading parts they share with the entry before them:
//!
//! ```text
//! 1996-05-06,07,08      → 1996-05-06, 1996-05-07, 1996-05-08
//! 1996-05,06-01         → 1996-05, 1996-06-01
//! 1996-12-27,28,1997-01 → 1996-12-27, 1996-12-28, 1997-01
//! ```
//!
//! Entries are plain part lists; [`to_naive_date`] and [`from_naive_date`]
//! convert complete ones to and from [`chrono::NaiveDate`].

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};

fn is_year(part: &str) -> bool {
    part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit())
}

fn parse_parts(entry: &str) -> Option<Vec<u32>> {
    entry
        .split('-')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        })
        .collect()
}

/// Number of leading context parts a shorthand of `len` parts keeps.
fn kept_parts(context_len: usize, len: usize) -> usize {
    context_len.saturating_sub(len).max(1)
}

/// Parses a `DT` value into date entries, expanding shorthand entries.
///
/// # Examples
///
/// ```rust
/// use sgf_format::parse_dates;
///
/// assert_eq!(
///     parse_dates("1996-12-27,28,1997-01-03,04"),
///     vec![vec![1996, 12, 27], vec![1996, 12, 28], vec![1997, 1, 3], vec![1997, 1, 4]]
/// );
/// assert_eq!(parse_dates("1996-05,06-01"), vec![vec![1996, 5], vec![1996, 6, 1]]);
/// assert!(parse_dates("").is_empty());
/// ```
#[must_use]
pub fn parse_dates(text: &str) -> Vec<Vec<u32>> {
    let mut dates: Vec<Vec<u32>> = Vec::new();

    for entry in text.split(',').map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        let Some(parts) = parse_parts(entry) else {
            continue;
        };

        let full = entry.split('-').next().is_some_and(|first| is_year(first.trim()));
        let date = match dates.last() {
            Some(context) if !full => {
                let keep = kept_parts(context.len(), parts.len());
                let mut date = context[..keep.min(context.len())].to_vec();
                date.extend(parts);
                date
            }
            _ => parts,
        };
        dates.push(date);
    }

    dates
}

fn push_parts(out: &mut String, parts: &[u32], leading_year: bool) {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        if i == 0 && leading_year {
            out.push_str(&format!("{part:04}"));
        } else {
            out.push_str(&format!("{part:02}"));
        }
    }
}

/// Number of trailing parts of `date` to write after `context`, if a
/// shorthand expands back to `date`.
fn shorthand_len(context: &[u32], date: &[u32]) -> Option<usize> {
    (1..date.len()).find(|&len| {
        let keep = date.len() - len;
        kept_parts(context.len(), len) == keep
            && context.len() >= keep
            && context[..keep] == date[..keep]
            && date[keep] < 1000
    })
}

/// Writes date entries as a `DT` value, shortening entries where possible.
///
/// Years are zero-padded to four digits. An unpadded year below 1000 would
/// read back as a shorthand month or day, so `[[1996], [123]]` is written
/// `1996,0123` rather than `1996,123`.
///
/// # Examples
///
/// ```rust
/// use sgf_format::stringify_dates;
///
/// let dates = vec![vec![1996, 5, 6], vec![1996, 5, 7], vec![1996, 5, 8]];
/// assert_eq!(stringify_dates(&dates), "1996-05-06,07,08");
///
/// let dates = vec![vec![1996, 5], vec![1996, 6, 1]];
/// assert_eq!(stringify_dates(&dates), "1996-05,06-01");
/// ```
#[must_use]
pub fn stringify_dates(dates: &[Vec<u32>]) -> String {
    let mut out = String::new();
    let mut context: Option<&[u32]> = None;

    for date in dates.iter().filter(|d| !d.is_empty()) {
        if context.is_some() {
            out.push(',');
        }
        match context.and_then(|c| shorthand_len(c, date)) {
            Some(len) => push_parts(&mut out, &date[date.len() - len..], false),
            None => push_parts(&mut out, date, true),
        }
        context = Some(date);
    }

    out
}

/// Converts a complete `[year, month, day]` entry into a calendar date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the entry is not complete or names no
/// existing day.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sgf_format::to_naive_date;
///
/// assert_eq!(to_naive_date(&[1996, 12, 27]).unwrap(), NaiveDate::from_ymd_opt(1996, 12, 27).unwrap());
/// assert!(to_naive_date(&[1996, 2, 30]).is_err());
/// assert!(to_naive_date(&[1996, 12]).is_err());
/// ```
pub fn to_naive_date(parts: &[u32]) -> Result<NaiveDate> {
    let &[year, month, day] = parts else {
        return Err(Error::invalid_date(parts, "expected year, month and day"));
    };
    let year = i32::try_from(year).map_err(|_| Error::invalid_date(parts, "year out of range"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::invalid_date(parts, "no such day"))
}

/// Converts a calendar date into a `[year, month, day]` entry.
///
/// Years before the common era are clamped to 0.
#[must_use]
pub fn from_naive_date(date: NaiveDate) -> Vec<u32> {
    vec![
        u32::try_from(date.year()).unwrap_or_default(),
        date.month(),
        date.day(),
    ]
}
