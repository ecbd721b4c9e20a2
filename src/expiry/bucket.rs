use super::{ExpiryDay, EXPIRING_ONE_DAY, EXPIRING_SOON_DAYS, EXPIRING_THREE_DAYS};
use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Drill-down bucket. Time buckets overlap; `All` is not a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Bucket {
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "expiring1")]
    ExpiringOneDay,
    #[serde(rename = "expiring3")]
    ExpiringThreeDays,
    #[serde(rename = "expiring10")]
    ExpiringSoon,
    #[default]
    #[serde(rename = "all")]
    All,
}

/// Whether the `all` bucket lists records whose expiry cannot be classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnclassifiablePolicy {
    #[default]
    Include,
    Exclude,
}

impl UnclassifiablePolicy {
    pub fn from_include(include: bool) -> Self {
        if include {
            Self::Include
        } else {
            Self::Exclude
        }
    }
}

impl Bucket {
    pub const TIME_BUCKETS: [Bucket; 5] = [
        Bucket::Expired,
        Bucket::Active,
        Bucket::ExpiringOneDay,
        Bucket::ExpiringThreeDays,
        Bucket::ExpiringSoon,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Expired => "expired",
            Bucket::Active => "active",
            Bucket::ExpiringOneDay => "expiring1",
            Bucket::ExpiringThreeDays => "expiring3",
            Bucket::ExpiringSoon => "expiring10",
            Bucket::All => "all",
        }
    }

    /// Window size for the expiring buckets
    pub fn window_days(&self) -> Option<i64> {
        match self {
            Bucket::ExpiringOneDay => Some(EXPIRING_ONE_DAY),
            Bucket::ExpiringThreeDays => Some(EXPIRING_THREE_DAYS),
            Bucket::ExpiringSoon => Some(EXPIRING_SOON_DAYS),
            _ => None,
        }
    }

    /// Whether a classified day falls into this bucket
    pub fn contains(&self, day: &ExpiryDay) -> bool {
        match self {
            Bucket::Expired => day.is_expired(),
            Bucket::Active => day.is_active(),
            Bucket::All => true,
            windowed => windowed
                .window_days()
                .is_some_and(|days| day.expiring_within(days)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Expired => "Expired users",
            Bucket::Active => "Active users",
            Bucket::ExpiringOneDay => "Expiring in 1 day",
            Bucket::ExpiringThreeDays => "Expiring in 3 days",
            Bucket::ExpiringSoon => "Expiring in 10 days",
            Bucket::All => "Users",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Bucket::Expired => "No expired users right now.",
            Bucket::Active => "No active users right now.",
            Bucket::ExpiringOneDay => "No users expiring in the next 1 day.",
            Bucket::ExpiringThreeDays => "No users expiring in the next 3 days.",
            Bucket::ExpiringSoon => "No users expiring in the next 10 days.",
            Bucket::All => "No users found.",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Bucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        [Bucket::All]
            .into_iter()
            .chain(Bucket::TIME_BUCKETS)
            .find(|bucket| bucket.key() == key)
            .ok_or_else(|| Error::UnknownBucket(s.to_string()))
    }
}
