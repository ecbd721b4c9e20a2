use crate::error::{Error, Result};
use crate::expiry::{self, Expiring};
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// Record as returned by the backend's `/users` endpoint. Only read, never
/// written back; bookkeeping fields such as `ownerId` and `createdAt` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedRecordResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    pub name: String,

    #[serde(rename = "houseNumber", alias = "house_number")]
    pub house_number: String,

    #[serde(rename = "phoneNumber", alias = "phone_number")]
    pub phone_number: String,

    /// ISO-8601 timestamp, kept verbatim
    #[serde(rename = "expiryDate", alias = "expiry_date")]
    pub expiry_date: String,
}

/// Tenant/resident record as the rest of the tool sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedRecord {
    pub id: String,
    pub name: String,
    pub house_number: String,
    pub phone_number: String,
    /// Authoritative value for all expiry math
    pub expiry_date_raw: String,
    /// MM/YY/DD, or the raw value when it does not parse
    pub expiry_date_label: String,
}

impl ManagedRecord {
    /// Normalize a backend record, deriving the display label in `zone`'s calendar
    pub fn normalize<Tz: TimeZone>(response: ManagedRecordResponse, zone: &Tz) -> Self {
        let expiry_date_label = match expiry::expiry_day(&response.expiry_date, zone) {
            Some(date) => expiry::format_expiry_date(&date),
            None => response.expiry_date.clone(),
        };

        Self {
            id: response.id,
            name: response.name,
            house_number: response.house_number,
            phone_number: response.phone_number,
            expiry_date_raw: response.expiry_date,
            expiry_date_label,
        }
    }

    /// Case-insensitive substring search over name, house, phone and expiry label.
    /// A blank query matches every record.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let haystack = [
            self.name.as_str(),
            self.house_number.as_str(),
            self.phone_number.as_str(),
            self.expiry_date_label.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        haystack.contains(&query)
    }

    /// The editable fields, as the add/edit form would hold them
    pub fn to_draft(&self) -> RecordDraft {
        RecordDraft {
            name: self.name.clone(),
            house_number: self.house_number.clone(),
            phone_number: self.phone_number.clone(),
            expiry_date: self.expiry_date_raw.clone(),
        }
    }
}

impl Expiring for ManagedRecord {
    fn expiry_date_raw(&self) -> &str {
        &self.expiry_date_raw
    }
}

/// Fields submitted when creating or editing a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub house_number: String,
    pub phone_number: String,
    pub expiry_date: String,
}

impl RecordDraft {
    /// Trim every field and reject the draft if any of them is empty
    pub fn validate(&self) -> Result<RecordDraft> {
        let field = |value: &str, name: &'static str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(Error::InvalidDraft(name))
            } else {
                Ok(trimmed.to_string())
            }
        };

        Ok(RecordDraft {
            name: field(&self.name, "name")?,
            house_number: field(&self.house_number, "house number")?,
            phone_number: field(&self.phone_number, "phone number")?,
            expiry_date: field(&self.expiry_date, "expiry date")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn response(expiry_date: &str) -> ManagedRecordResponse {
        ManagedRecordResponse {
            id: "665f1c2e9b1d4a0012ab34cd".to_string(),
            name: "Asha Raman".to_string(),
            house_number: "B-204".to_string(),
            phone_number: "+91 98450 12345".to_string(),
            expiry_date: expiry_date.to_string(),
        }
    }

    #[test]
    fn test_response_deserializes_backend_shape() {
        let json = r#"{
            "_id": "665f1c2e9b1d4a0012ab34cd",
            "ownerId": "owner-1",
            "name": "Asha Raman",
            "houseNumber": "B-204",
            "phoneNumber": "+91 98450 12345",
            "expiryDate": "2024-06-20T00:00:00.000Z",
            "createdAt": "2024-01-02T03:04:05.000Z",
            "__v": 0
        }"#;
        let parsed: ManagedRecordResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.id, "665f1c2e9b1d4a0012ab34cd");
        assert_eq!(parsed.house_number, "B-204");
        assert_eq!(parsed.expiry_date, "2024-06-20T00:00:00.000Z");
        assert_eq!(parsed.phone_number, "+91 98450 12345");
    }

    #[test]
    fn test_normalize_derives_label() {
        let record = ManagedRecord::normalize(response("2025-03-07T10:00:00Z"), &Utc);
        assert_eq!(record.expiry_date_label, "03/25/07");
        assert_eq!(record.expiry_date_raw, "2025-03-07T10:00:00Z");
        assert_eq!(record.id, "665f1c2e9b1d4a0012ab34cd");
    }

    #[test]
    fn test_normalize_keeps_unparseable_value() {
        let record = ManagedRecord::normalize(response("someday"), &Utc);
        assert_eq!(record.expiry_date_label, "someday");
    }

    #[test]
    fn test_matches_query() {
        let record = ManagedRecord::normalize(response("2025-03-07T10:00:00Z"), &Utc);

        assert!(record.matches_query(""));
        assert!(record.matches_query("   "));
        assert!(record.matches_query("asha"));
        assert!(record.matches_query(" b-204 "));
        assert!(record.matches_query("98450"));
        assert!(record.matches_query("03/25"));
        assert!(record.matches_query("raman b-204"));
        assert!(!record.matches_query("2025-03-07"));
        assert!(!record.matches_query("c-101"));
    }

    #[test]
    fn test_draft_validation() {
        let record = ManagedRecord::normalize(response("2025-03-07T10:00:00Z"), &Utc);
        let draft = RecordDraft {
            name: "  Asha Raman ".to_string(),
            ..record.to_draft()
        };
        assert_eq!(draft.validate().unwrap().name, "Asha Raman");

        let missing_phone = RecordDraft {
            phone_number: "  ".to_string(),
            ..record.to_draft()
        };
        let err = missing_phone.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidDraft("phone number")));
        assert_eq!(err.to_string(), "Invalid record: phone number is required");

        assert!(matches!(
            RecordDraft::default().validate(),
            Err(Error::InvalidDraft("name"))
        ));
    }
}
