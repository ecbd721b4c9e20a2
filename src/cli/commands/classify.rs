use crate::cli::Context;
use crate::error::Result;
use crate::expiry::{self, Bucket, Classification, LabelStyle};
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyReport<'a> {
    raw: &'a str,
    classifiable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_date: Option<NaiveDate>,
    label: String,
    buckets: Vec<Bucket>,
}

impl<'a> ClassifyReport<'a> {
    fn new(raw: &'a str, classification: &Classification, style: LabelStyle) -> Self {
        let day = classification.day();
        Self {
            raw,
            classifiable: classification.is_classifiable(),
            diff_days: day.map(|day| day.diff_days),
            expiry_date: day.map(|day| day.expiry_date),
            label: classification.display_label(raw, style),
            buckets: day.map(|day| day.buckets()).unwrap_or_default(),
        }
    }
}

pub fn execute<Tz>(ctx: &Context<Tz>, value: &str, compact: bool, json: bool) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let classification = expiry::classify(value, &ctx.now);
    let report = ClassifyReport::new(value, &classification, ctx.label_style(compact));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match classification.day() {
        Some(day) => {
            let buckets: Vec<&str> = report.buckets.iter().map(Bucket::key).collect();
            println!("{}", report.label);
            println!("  Expiry date: {}", expiry::format_expiry_date(&day.expiry_date));
            println!("  Reference: {}", ctx.now.format("%Y-%m-%d %H:%M %Z"));
            println!("  Days: {}", day.diff_days);
            println!("  Buckets: {}", buckets.join(", "));
        }
        None => {
            tracing::warn!("Could not parse expiry value {:?}", value);
            println!("{}", report.label);
        }
    }

    Ok(())
}
