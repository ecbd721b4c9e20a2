use crate::cli::Context;
use crate::error::Result;
use crate::expiry;
use crate::models::ManagedRecord;
use chrono::{DateTime, TimeZone};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct Finding {
    id: String,
    name: String,
    problem: String,
}

fn audit<Tz: TimeZone>(records: &[ManagedRecord], now: &DateTime<Tz>) -> Vec<Finding> {
    let mut findings = Vec::new();

    for record in records {
        let mut report = |problem: String| {
            findings.push(Finding {
                id: record.id.clone(),
                name: record.name.clone(),
                problem,
            })
        };

        if let Err(e) = record.to_draft().validate() {
            report(e.to_string());
        }

        if !record.expiry_date_raw.trim().is_empty()
            && !expiry::classify(&record.expiry_date_raw, now).is_classifiable()
        {
            report(format!(
                "Unparseable expiry date: {:?}",
                record.expiry_date_raw
            ));
        }
    }

    findings
}

pub fn execute<Tz>(ctx: &Context<Tz>, json: bool) -> Result<()>
where
    Tz: TimeZone,
{
    let records = ctx.load_records()?;
    let findings = audit(&records, &ctx.now);

    if json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
    } else if findings.is_empty() {
        println!("✓ All {} records are valid", records.len());
    } else {
        println!("Found {} problems in {} records:\n", findings.len(), records.len());
        for finding in &findings {
            println!("  {} ({}): {}", finding.name, finding.id, finding.problem);
        }
    }

    if !findings.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-10T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn record(id: &str, name: &str, phone: &str, expiry: &str) -> ManagedRecord {
        ManagedRecord {
            id: id.to_string(),
            name: name.to_string(),
            house_number: "A-1".to_string(),
            phone_number: phone.to_string(),
            expiry_date_raw: expiry.to_string(),
            expiry_date_label: expiry.to_string(),
        }
    }

    #[test]
    fn test_audit() {
        let now = now();
        let records = vec![
            record("1", "Asha", "111", "2024-06-20T00:00:00Z"),
            record("2", "Ravi", "  ", "2024-06-20T00:00:00Z"),
            record("3", "Lena", "333", "soon"),
            record("4", "Tom", "444", ""),
        ];

        let findings = audit(&records, &now);

        assert_eq!(
            findings,
            vec![
                Finding {
                    id: "2".to_string(),
                    name: "Ravi".to_string(),
                    problem: "Invalid record: phone number is required".to_string(),
                },
                Finding {
                    id: "3".to_string(),
                    name: "Lena".to_string(),
                    problem: "Unparseable expiry date: \"soon\"".to_string(),
                },
                Finding {
                    id: "4".to_string(),
                    name: "Tom".to_string(),
                    problem: "Invalid record: expiry date is required".to_string(),
                },
            ]
        );
    }
}
