// Expiry classification at calendar-day granularity
mod bucket;
mod summary;

pub use bucket::{Bucket, UnclassifiablePolicy};
pub use summary::{filter_by_bucket, result_label, summarize, ExpiryCounts};

use crate::error::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Dashboard windows, in days
pub const EXPIRING_SOON_DAYS: i64 = 10;
pub const EXPIRING_THREE_DAYS: i64 = 3;
pub const EXPIRING_ONE_DAY: i64 = 1;

/// Offset-bearing date-time layouts that RFC 3339 rejects: no seconds, or `+hhmm` offsets
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

/// Date-time layouts without an offset, read as wall-clock time in the reference zone
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Anything that carries a raw expiry timestamp
pub trait Expiring {
    fn expiry_date_raw(&self) -> &str;
}

impl Expiring for str {
    fn expiry_date_raw(&self) -> &str {
        self
    }
}

impl Expiring for String {
    fn expiry_date_raw(&self) -> &str {
        self
    }
}

impl<T: Expiring + ?Sized> Expiring for &T {
    fn expiry_date_raw(&self) -> &str {
        (**self).expiry_date_raw()
    }
}

/// How relative labels are phrased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// "Expires in 4 days", used in lists and badges
    #[default]
    Full,
    /// "4 days left", used by the add/edit preview
    Compact,
}

impl std::str::FromStr for LabelStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(LabelStyle::Full),
            "compact" => Ok(LabelStyle::Compact),
            other => Err(Error::Config(format!(
                "Unknown label style '{}' (expected 'full' or 'compact')",
                other
            ))),
        }
    }
}

/// Single badge shown next to a list row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Expired,
    Expiring,
    Active,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Expired => "EXPIRED",
            Badge::Expiring => "EXPIRING",
            Badge::Active => "ACTIVE",
        }
    }
}

/// A parsed expiry date relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDay {
    pub expiry_date: NaiveDate,
    /// Whole calendar days from today to the expiry date; negative when past
    pub diff_days: i64,
}

impl ExpiryDay {
    pub fn is_expired(&self) -> bool {
        self.diff_days < 0
    }

    pub fn is_active(&self) -> bool {
        self.diff_days >= 0
    }

    pub fn expiring_within(&self, days: i64) -> bool {
        (0..=days).contains(&self.diff_days)
    }

    pub fn label(&self, style: LabelStyle) -> String {
        let days = self.diff_days;
        match (days, style) {
            (d, _) if d < -1 => format!("Expired {} days ago", d.unsigned_abs()),
            (-1, _) => "Expired 1 day ago".to_string(),
            (0, LabelStyle::Full) => "Expires today".to_string(),
            (0, LabelStyle::Compact) => "Today".to_string(),
            (1, LabelStyle::Full) => "Expires tomorrow".to_string(),
            (1, LabelStyle::Compact) => "Tomorrow".to_string(),
            (d, LabelStyle::Full) => format!("Expires in {} days", d),
            (d, LabelStyle::Compact) => format!("{} days left", d),
        }
    }

    pub fn badge(&self) -> Badge {
        if self.is_expired() {
            Badge::Expired
        } else if self.expiring_within(EXPIRING_SOON_DAYS) {
            Badge::Expiring
        } else {
            Badge::Active
        }
    }

    /// Every time bucket this day falls into
    pub fn buckets(&self) -> Vec<Bucket> {
        Bucket::TIME_BUCKETS
            .into_iter()
            .filter(|bucket| bucket.contains(self))
            .collect()
    }
}

/// Outcome of classifying one raw expiry value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Dated(ExpiryDay),
    /// The raw value did not parse; it belongs to no time bucket
    Unclassifiable,
}

impl Classification {
    pub fn day(&self) -> Option<&ExpiryDay> {
        match self {
            Classification::Dated(day) => Some(day),
            Classification::Unclassifiable => None,
        }
    }

    pub fn is_classifiable(&self) -> bool {
        matches!(self, Classification::Dated(_))
    }

    pub fn badge(&self) -> Option<Badge> {
        self.day().map(ExpiryDay::badge)
    }

    /// Relative label, or the raw value untouched when it cannot be classified
    pub fn display_label(&self, raw: &str, style: LabelStyle) -> String {
        match self {
            Classification::Dated(day) => day.label(style),
            Classification::Unclassifiable => raw.to_string(),
        }
    }
}

/// Classify a raw expiry timestamp against `now`, in `now`'s calendar.
///
/// Never fails: a value that does not parse as a calendar date yields
/// [`Classification::Unclassifiable`].
pub fn classify<Tz: TimeZone>(expiry_date_raw: &str, now: &DateTime<Tz>) -> Classification {
    let Some(expiry_date) = expiry_day(expiry_date_raw, &now.timezone()) else {
        tracing::trace!("Unclassifiable expiry value: {:?}", expiry_date_raw);
        return Classification::Unclassifiable;
    };

    let today = now.date_naive();
    Classification::Dated(ExpiryDay {
        expiry_date,
        diff_days: expiry_date.signed_duration_since(today).num_days(),
    })
}

/// Parse a raw expiry value into its calendar date in `zone`
pub fn expiry_day<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(zone).date_naive());
    }

    let with_offset = match raw.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(stem) => format!("{}+00:00", stem),
        None => raw.to_string(),
    };
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(&with_offset, format) {
            return Some(instant.with_timezone(zone).date_naive());
        }
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(local.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Display form of an expiry date: MM/YY/DD
pub fn format_expiry_date(date: &NaiveDate) -> String {
    date.format("%m/%y/%d").to_string()
}
