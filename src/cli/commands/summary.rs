use crate::cli::Context;
use crate::error::Result;
use crate::expiry::{self, ExpiryCounts};
use chrono::TimeZone;
use std::fmt;

pub fn execute<Tz>(ctx: &Context<Tz>, json: bool) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let records = ctx.load_records()?;
    let counts = expiry::summarize(&records, &ctx.now);

    if counts.unclassifiable > 0 {
        tracing::warn!(
            "{} records have an unparseable expiry date and are not counted in any bucket",
            counts.unclassifiable
        );
    }

    if json {
        let mut value = serde_json::to_value(counts)?;
        value["activeBySubtraction"] = counts.active_by_subtraction().into();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Expiry overview (as of {}):\n", ctx.now.format("%Y-%m-%d"));
        for line in overview_lines(&counts) {
            println!("  {}", line);
        }
    }

    Ok(())
}

fn overview_lines(counts: &ExpiryCounts) -> Vec<String> {
    let mut lines = vec![
        format!("{:<16}{}", "Total", counts.total),
        format!("{:<16}{}", "Active", counts.active),
        format!("{:<16}{}", "Expired", counts.expired),
        format!("{:<16}{}", "Expiring 10d", counts.expiring_soon),
        format!("{:<16}{}", "Expiring 3d", counts.expiring_three_days),
        format!("{:<16}{}", "Expiring 1d", counts.expiring_one_day),
    ];
    if counts.unclassifiable > 0 {
        lines.push(format!("{:<16}{}", "Unclassifiable", counts.unclassifiable));
    }
    lines
}
