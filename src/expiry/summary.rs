// Aggregate counts and bucket filtering over a snapshot of records
use super::{
    classify, Bucket, Classification, Expiring, UnclassifiablePolicy, EXPIRING_ONE_DAY,
    EXPIRING_SOON_DAYS, EXPIRING_THREE_DAYS,
};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Dashboard counters for one snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryCounts {
    pub expired: usize,
    /// True count of records with `diff_days >= 0`
    pub active: usize,
    /// Within 10 days
    pub expiring_soon: usize,
    pub expiring_three_days: usize,
    pub expiring_one_day: usize,
    pub unclassifiable: usize,
    pub total: usize,
}

impl ExpiryCounts {
    /// `total - expired`, floored at zero.
    ///
    /// Counts unclassifiable records as active, so it exceeds `active` by
    /// exactly `unclassifiable`.
    pub fn active_by_subtraction(&self) -> usize {
        self.total.saturating_sub(self.expired)
    }

    fn record(&mut self, classification: &Classification) {
        self.total += 1;
        let Some(day) = classification.day() else {
            self.unclassifiable += 1;
            return;
        };

        if day.is_expired() {
            self.expired += 1;
        } else {
            self.active += 1;
        }
        if day.expiring_within(EXPIRING_SOON_DAYS) {
            self.expiring_soon += 1;
        }
        if day.expiring_within(EXPIRING_THREE_DAYS) {
            self.expiring_three_days += 1;
        }
        if day.expiring_within(EXPIRING_ONE_DAY) {
            self.expiring_one_day += 1;
        }
    }
}

pub fn summarize<R, Tz>(records: &[R], now: &DateTime<Tz>) -> ExpiryCounts
where
    R: Expiring,
    Tz: TimeZone,
{
    let mut counts = ExpiryCounts::default();
    for record in records {
        counts.record(&classify(record.expiry_date_raw(), now));
    }
    tracing::debug!(?counts, "Summarized {} records", counts.total);
    counts
}

/// Records in `bucket`, in their original order
pub fn filter_by_bucket<'a, R, Tz>(
    records: &'a [R],
    bucket: Bucket,
    now: &DateTime<Tz>,
    policy: UnclassifiablePolicy,
) -> Vec<&'a R>
where
    R: Expiring,
    Tz: TimeZone,
{
    records
        .iter()
        .filter(|record| match classify(record.expiry_date_raw(), now) {
            Classification::Dated(day) => bucket.contains(&day),
            Classification::Unclassifiable => {
                bucket == Bucket::All && policy == UnclassifiablePolicy::Include
            }
        })
        .collect()
}

/// "1 user" / "N users"
pub fn result_label(count: usize) -> String {
    if count == 1 {
        "1 user".to_string()
    } else {
        format!("{} users", count)
    }
}
