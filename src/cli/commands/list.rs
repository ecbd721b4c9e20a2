use crate::cli::{Context, OutputFormat};
use crate::error::Result;
use crate::expiry::{self, Bucket, LabelStyle};
use crate::models::ManagedRecord;
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// One list row, as printed or serialized
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordRow<'a> {
    #[serde(flatten)]
    record: &'a ManagedRecord,
    classifiable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<&'static str>,
    status: String,
}

fn row<'a, Tz: TimeZone>(
    record: &'a ManagedRecord,
    now: &DateTime<Tz>,
    style: LabelStyle,
) -> RecordRow<'a> {
    let classification = expiry::classify(&record.expiry_date_raw, now);
    RecordRow {
        record,
        classifiable: classification.is_classifiable(),
        diff_days: classification.day().map(|day| day.diff_days),
        badge: classification.badge().map(|badge| badge.as_str()),
        status: classification.display_label(&record.expiry_date_raw, style),
    }
}

/// Records in `bucket` whose text matches `search`
pub fn select<'a, Tz: TimeZone>(
    ctx: &Context<Tz>,
    records: &'a [ManagedRecord],
    bucket: Bucket,
    search: Option<&str>,
) -> Vec<&'a ManagedRecord> {
    let query = search.unwrap_or_default();
    expiry::filter_by_bucket(records, bucket, &ctx.now, ctx.config.classifier.policy())
        .into_iter()
        .filter(|record| record.matches_query(query))
        .collect()
}

pub fn execute<Tz>(
    ctx: &Context<Tz>,
    bucket: Bucket,
    search: Option<String>,
    format: OutputFormat,
    compact: bool,
) -> Result<()>
where
    Tz: TimeZone,
{
    let records = ctx.load_records()?;
    let search = search.as_deref().map(str::trim).filter(|query| !query.is_empty());
    let selected = select(ctx, &records, bucket, search);
    tracing::debug!(
        "{} of {} records in bucket '{}'",
        selected.len(),
        records.len(),
        bucket
    );

    let style = ctx.label_style(compact);
    let rows: Vec<RecordRow> = selected
        .into_iter()
        .map(|record| row(record, &ctx.now, style))
        .collect();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} ({})", bucket.title(), expiry::result_label(rows.len()));
    println!();

    if rows.is_empty() {
        let message = if search.is_some() {
            "No matching users found."
        } else {
            bucket.empty_message()
        };
        println!("  {}", message);
        return Ok(());
    }

    for row in rows {
        println!("  {}", row.record.name);
        println!("    House: {}", row.record.house_number);
        println!("    Phone: {}", row.record.phone_number);
        println!("    Expiry: {}", row.record.expiry_date_label);
        match row.badge {
            Some(badge) => println!("    Status: {} [{}]", row.status, badge),
            None => println!("    Status: {}", row.status),
        }
        println!();
    }

    Ok(())
}
