//! Date extraction from backup file names.
//!
//! A file name is run through a fixed cascade and the first rule that yields
//! a calendar date wins:
//! 1. a weekday token directly followed by 8 digits (`Thu01082026`),
//! 2. user supplied regular expressions, in order,
//! 3. built-in patterns (`yyyy_MM_dd`, `yyyy-MM-dd`, weekday again, bounded
//!    `ddMMyyyy`, bounded `yyyyMMdd`, then any 8 digits).
//!
//! Ambiguous 8-digit strings are always tried as `ddMMyyyy`, then
//! `yyyyMMdd`, then `MMddyyyy`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, warn};

lazy_static! {
    static ref WEEKDAY_PREFIXED: Regex =
        Regex::new(r"(?i)(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)(\d{8})").unwrap();
    static ref UNDERSCORE_DATE: Regex = Regex::new(r"(\d{4}_\d{2}_\d{2})").unwrap();
    static ref DASH_DATE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap();
    static ref DAY_FIRST_CENTURY: Regex =
        Regex::new(r"(0[1-9]|[12][0-9]|3[01])(0[1-9]|1[0-2])(20\d{2})").unwrap();
    static ref DAY_FIRST: Regex =
        Regex::new(r"(0[1-9]|[12][0-9]|3[01])(0[1-9]|1[0-2])(\d{4})").unwrap();
    static ref YEAR_FIRST_CENTURY: Regex =
        Regex::new(r"(20\d{2})(0[1-9]|1[0-2])(0[1-9]|[12][0-9]|3[01])").unwrap();
    static ref EIGHT_DIGITS: Regex = Regex::new(r"(\d{8})").unwrap();
}

/// Exact layouts understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `yyyy_MM_dd`
    UnderscoreYmd,
    /// `yyyy-MM-dd`
    DashYmd,
    /// `ddMMyyyy`
    Dmy,
    /// `yyyyMMdd`
    Ymd,
    /// `MMddyyyy`
    Mdy,
}

/// Tie-break order for 8 digit strings.
const EIGHT_DIGIT_LAYOUTS: [DateLayout; 3] = [DateLayout::Dmy, DateLayout::Ymd, DateLayout::Mdy];

impl DateLayout {
    pub fn parse(self, s: &str) -> Option<NaiveDate> {
        if !s.is_ascii() {
            return None;
        }
        match self {
            DateLayout::UnderscoreYmd => parse_separated(s, b'_'),
            DateLayout::DashYmd => parse_separated(s, b'-'),
            DateLayout::Dmy => {
                compact(s)?;
                to_date(number(&s[4..8])?, number(&s[2..4])?, number(&s[0..2])?)
            }
            DateLayout::Ymd => {
                compact(s)?;
                to_date(number(&s[0..4])?, number(&s[4..6])?, number(&s[6..8])?)
            }
            DateLayout::Mdy => {
                compact(s)?;
                to_date(number(&s[4..8])?, number(&s[0..2])?, number(&s[2..4])?)
            }
        }
    }
}

fn parse_separated(s: &str, separator: u8) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != separator || bytes[7] != separator {
        return None;
    }
    to_date(number(&s[0..4])?, number(&s[5..7])?, number(&s[8..10])?)
}

fn compact(s: &str) -> Option<()> {
    is_eight_digits(s).then_some(())
}

fn is_eight_digits(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())
}

fn number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// Four digit years only; year 0 is not a calendar year here.
fn to_date(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    if year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Culture-neutral parse of common written date forms. Time of day, if
/// present, is dropped.
fn parse_generic(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            GENERIC_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a date string: `yyyy_MM_dd`, `yyyy-MM-dd`, 8 digits in tie-break
/// order, then a generic parse.
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    if let Some(date) = DateLayout::UnderscoreYmd.parse(s) {
        return Some(date);
    }
    if let Some(date) = DateLayout::DashYmd.parse(s) {
        return Some(date);
    }
    if is_eight_digits(s) {
        if let Some(date) = EIGHT_DIGIT_LAYOUTS.iter().find_map(|layout| layout.parse(s)) {
            return Some(date);
        }
    }

    parse_generic(s)
}

fn weekday_from_token(token: &str) -> Option<Weekday> {
    match token {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// `Thu01082026`: the digits are read as `MMddyyyy`, then `ddMMyyyy`, and
/// accepted only when the calendar weekday agrees with the prefix.
pub fn weekday_prefixed(file_name: &str) -> Option<NaiveDate> {
    let caps = WEEKDAY_PREFIXED.captures(file_name)?;
    let digits = caps.get(1)?.as_str();
    if !is_eight_digits(digits) {
        return None;
    }

    let token: String = caps[0].chars().take(3).collect::<String>().to_lowercase();
    let expected = weekday_from_token(&token)?;

    [DateLayout::Mdy, DateLayout::Dmy]
        .iter()
        .filter_map(|layout| layout.parse(digits))
        .find(|date| date.weekday() == expected)
}

fn first_capture(re: &Regex, file_name: &str) -> Option<NaiveDate> {
    let caps = re.captures(file_name)?;
    parse_date_string(caps.get(1)?.as_str())
}

fn joined_captures(re: &Regex, file_name: &str) -> Option<NaiveDate> {
    let caps = re.captures(file_name)?;
    parse_date_string(&join_groups(&caps))
}

fn join_groups(caps: &Captures) -> String {
    caps.iter()
        .skip(1)
        .map(|group| group.map_or("", |m| m.as_str()))
        .collect()
}

fn underscore_date(file_name: &str) -> Option<NaiveDate> {
    first_capture(&UNDERSCORE_DATE, file_name)
}

fn dash_date(file_name: &str) -> Option<NaiveDate> {
    first_capture(&DASH_DATE, file_name)
}

fn day_first_century(file_name: &str) -> Option<NaiveDate> {
    joined_captures(&DAY_FIRST_CENTURY, file_name)
}

fn day_first(file_name: &str) -> Option<NaiveDate> {
    joined_captures(&DAY_FIRST, file_name)
}

fn year_first_century(file_name: &str) -> Option<NaiveDate> {
    joined_captures(&YEAR_FIRST_CENTURY, file_name)
}

fn any_eight_digits(file_name: &str) -> Option<NaiveDate> {
    let caps = EIGHT_DIGITS.captures(file_name)?;
    let digits = caps.get(1)?.as_str();
    EIGHT_DIGIT_LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(digits))
}

type Strategy = fn(&str) -> Option<NaiveDate>;

const BUILT_IN_STRATEGIES: [(&str, Strategy); 7] = [
    ("yyyy_MM_dd", underscore_date),
    ("yyyy-MM-dd", dash_date),
    ("weekday", weekday_prefixed),
    ("ddMMyyyy/20xx", day_first_century),
    ("ddMMyyyy", day_first),
    ("yyyyMMdd/20xx", year_first_century),
    ("8 digits", any_eight_digits),
];

pub fn extract_with_built_in_patterns(file_name: &str) -> Option<NaiveDate> {
    BUILT_IN_STRATEGIES.iter().find_map(|(name, strategy)| {
        let date = strategy(file_name)?;
        debug!("{}: built-in pattern {} -> {}", file_name, name, date);
        Some(date)
    })
}

/// Date extractor with the user patterns of one service compiled up front.
/// Patterns that fail to compile are skipped.
#[derive(Debug, Clone, Default)]
pub struct DateExtractor {
    user_patterns: Vec<Regex>,
}

impl DateExtractor {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let user_patterns = patterns
            .iter()
            .map(|pattern| pattern.as_ref())
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Invalid date pattern '{}': {}", pattern, e);
                    None
                }
            })
            .collect();

        Self { user_patterns }
    }

    pub fn extract(&self, file_name: &str) -> Option<NaiveDate> {
        weekday_prefixed(file_name)
            .or_else(|| self.extract_with_user_patterns(file_name))
            .or_else(|| extract_with_built_in_patterns(file_name))
    }

    fn extract_with_user_patterns(&self, file_name: &str) -> Option<NaiveDate> {
        self.user_patterns.iter().find_map(|re| {
            let caps = re.captures(file_name)?;
            let candidate = candidate_string(re, &caps);
            if candidate.is_empty() {
                return None;
            }
            let date = parse_date_string(&candidate)?;
            debug!("{}: pattern {} -> {}", file_name, re.as_str(), date);
            Some(date)
        })
    }
}

/// Three or more groups are concatenated, a single group is used as is,
/// anything else falls back to the whole match.
fn candidate_string(re: &Regex, caps: &Captures) -> String {
    let group_count = re.captures_len() - 1;
    if group_count >= 3 {
        join_groups(caps)
    } else if group_count == 1 {
        caps.get(1).map_or(String::new(), |m| m.as_str().to_string())
    } else {
        caps[0].to_string()
    }
}

/// One-shot extraction; prefer [`DateExtractor`] when classifying many files.
pub fn extract_date<S: AsRef<str>>(file_name: &str, patterns: &[S]) -> Option<NaiveDate> {
    DateExtractor::new(patterns).extract(file_name)
}
