//! Domain DTOs for the CRE API.
//!
//! # Design
//! An offering record is a sum type over the three record kinds the upstream
//! accepts. The single-character discriminant (`A`, `B`, `C`) is the serde
//! tag, so records read from JSON land in the right variant. Any other tag
//! deserializes to `Unrecognized`, which the serializer skips without error.

use serde::{Deserialize, Serialize};

/// The identifiers shared by every line of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingKey {
    pub organization_id: String,
    pub batch_id: String,
    pub class_id: String,
}

impl OfferingKey {
    pub fn new(
        organization_id: impl Into<String>,
        batch_id: impl Into<String>,
        class_id: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            batch_id: batch_id.into(),
            class_id: class_id.into(),
        }
    }
}

/// An ordered set of records submitted together as one request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBatch {
    #[serde(flatten)]
    pub key: OfferingKey,
    pub records: Vec<OfferingRecord>,
}

/// One line of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OfferingRecord {
    #[serde(rename = "A", alias = "organization")]
    Organization(Organization),
    #[serde(rename = "B", alias = "instructor")]
    Instructor(Instructor),
    #[serde(rename = "C", alias = "student")]
    Student(Student),
    /// Any discriminant other than the three above.
    #[serde(other)]
    Unrecognized,
}

impl OfferingRecord {
    /// Wire discriminant, `None` for unrecognized records.
    pub fn code(&self) -> Option<char> {
        match self {
            OfferingRecord::Organization(_) => Some('A'),
            OfferingRecord::Instructor(_) => Some('B'),
            OfferingRecord::Student(_) => Some('C'),
            OfferingRecord::Unrecognized => None,
        }
    }
}

/// The offering itself: product, schedule and venue.
///
/// Venue fields are blank for online offerings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Written in place of the organization id when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    pub po_account_name: String,
    #[serde(rename = "productSKU")]
    pub product_sku: String,
    pub start_date: String,
    pub end_date: String,
    pub number_of_students: u32,
    #[serde(default)]
    pub facility_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    #[serde(rename = "instructorID")]
    pub instructor_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub mastery: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tag_selects_variant() {
        let record: OfferingRecord = serde_json::from_str(
            r#"{"type":"B","instructorID":"I-7","firstName":"Ada","lastName":"Byron","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(record.code(), Some('B'));
        match record {
            OfferingRecord::Instructor(i) => assert_eq!(i.instructor_id, "I-7"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn long_tag_names_are_accepted() {
        let record: OfferingRecord = serde_json::from_str(
            r#"{"type":"student","firstName":"Sam","lastName":"Lee","email":"sam@example.com"}"#,
        )
        .unwrap();
        assert_eq!(record.code(), Some('C'));
    }

    #[test]
    fn unknown_tag_is_unrecognized() {
        let record: OfferingRecord =
            serde_json::from_str(r#"{"type":"Z","whatever":1}"#).unwrap();
        assert_eq!(record, OfferingRecord::Unrecognized);
        assert_eq!(record.code(), None);
    }

    #[test]
    fn student_optional_fields_default() {
        let record: OfferingRecord = serde_json::from_str(
            r#"{"type":"C","firstName":"Sam","lastName":"Lee","email":"sam@example.com"}"#,
        )
        .unwrap();
        let OfferingRecord::Student(student) = record else {
            panic!("expected a student");
        };
        assert!(student.phone_number.is_none());
        assert!(student.notes.is_none());
        assert_eq!(student.mastery, "");
    }

    #[test]
    fn batch_flattens_key() {
        let batch: RecordBatch = serde_json::from_str(
            r#"{"organizationId":"ORG1","batchId":"B1","classId":"C1","records":[]}"#,
        )
        .unwrap();
        assert_eq!(batch.key, OfferingKey::new("ORG1", "B1", "C1"));
        assert!(batch.records.is_empty());
    }

    #[test]
    fn organization_requires_product() {
        let result: Result<OfferingRecord, _> =
            serde_json::from_str(r#"{"type":"A","poAccountName":"PO"}"#);
        assert!(result.is_err());
    }
}
