//! Delimited text encoding of offering records.
//!
//! Every line starts with `organizationId|batchId|classId|code` followed by
//! the variant's columns in a fixed order. Column order is the upstream's
//! contract. Values are written verbatim; absent optional values become
//! empty columns.
//!
//! | Code | Columns after the shared prefix |
//! |------|---------------------------------|
//! | `A`  | organizationName (or orgId), sourceSystem, poAccountName, productSKU, startDate, endDate, numberOfStudents, facilityName, address, city, state, zipCode |
//! | `B`  | instructorID, firstName, lastName, email |
//! | `C`  | firstName, lastName, email, phoneNumber, mastery, notes |

use crate::types::{OfferingKey, OfferingRecord, RecordBatch};

pub const DELIMITER: &str = "|";
pub const LINE_BREAK: &str = "\r\n";

/// Column count of an organization line.
pub const ORGANIZATION_COLUMNS: usize = 16;
/// Column count of an instructor line.
pub const INSTRUCTOR_COLUMNS: usize = 8;
/// Column count of a student line.
pub const STUDENT_COLUMNS: usize = 10;

/// Encode one record as a line without a trailing line break.
///
/// Returns `None` for `Unrecognized` records.
pub fn serialize_record(
    key: &OfferingKey,
    source_system: &str,
    record: &OfferingRecord,
) -> Option<String> {
    let code = record.code()?.to_string();
    let students;
    let mut columns: Vec<&str> = vec![
        key.organization_id.as_str(),
        key.batch_id.as_str(),
        key.class_id.as_str(),
        code.as_str(),
    ];

    match record {
        OfferingRecord::Organization(org) => {
            students = org.number_of_students.to_string();
            columns.extend([
                org.organization_name
                    .as_deref()
                    .unwrap_or(key.organization_id.as_str()),
                source_system,
                org.po_account_name.as_str(),
                org.product_sku.as_str(),
                org.start_date.as_str(),
                org.end_date.as_str(),
                students.as_str(),
                org.facility_name.as_str(),
                org.address.as_str(),
                org.city.as_str(),
                org.state.as_str(),
                org.zip_code.as_str(),
            ]);
        }
        OfferingRecord::Instructor(instructor) => {
            columns.extend([
                instructor.instructor_id.as_str(),
                instructor.first_name.as_str(),
                instructor.last_name.as_str(),
                instructor.email.as_str(),
            ]);
        }
        OfferingRecord::Student(student) => {
            columns.extend([
                student.first_name.as_str(),
                student.last_name.as_str(),
                student.email.as_str(),
                student.phone_number.as_deref().unwrap_or(""),
                student.mastery.as_str(),
                student.notes.as_deref().unwrap_or(""),
            ]);
        }
        OfferingRecord::Unrecognized => return None,
    }

    Some(columns.join(DELIMITER))
}

/// Encode a sequence of records sharing `key` into a request body.
///
/// Unrecognized records are skipped silently.
pub fn serialize_records(key: &OfferingKey, source_system: &str, records: &[OfferingRecord]) -> String {
    let lines: Vec<String> = records
        .iter()
        .filter_map(|record| {
            let line = serialize_record(key, source_system, record);
            if line.is_none() {
                tracing::debug!(
                    class_id = %key.class_id,
                    "skipping record with unrecognized type"
                );
            }
            line
        })
        .collect();
    lines.join(LINE_BREAK)
}

impl RecordBatch {
    pub fn to_body(&self, source_system: &str) -> String {
        serialize_records(&self.key, source_system, &self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Instructor, Organization, Student};

    fn key() -> OfferingKey {
        OfferingKey::new("ORG1", "BATCH9", "CLASS42")
    }

    fn organization() -> OfferingRecord {
        OfferingRecord::Organization(Organization {
            organization_name: Some("Acme Training".to_string()),
            po_account_name: "PO-1001".to_string(),
            product_sku: "SKU-CPR".to_string(),
            start_date: "2026-01-05".to_string(),
            end_date: "2026-01-06".to_string(),
            number_of_students: 12,
            facility_name: "Main Hall".to_string(),
            address: "1 Main St".to_string(),
            city: "Dallas".to_string(),
            state: "TX".to_string(),
            zip_code: "75201".to_string(),
        })
    }

    fn instructor() -> OfferingRecord {
        OfferingRecord::Instructor(Instructor {
            instructor_id: "INS-7".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: "ada@example.com".to_string(),
        })
    }

    fn student() -> OfferingRecord {
        OfferingRecord::Student(Student {
            first_name: "Sam".to_string(),
            last_name: "Lee".to_string(),
            email: "sam@example.com".to_string(),
            phone_number: Some("555-0100".to_string()),
            mastery: "true".to_string(),
            notes: None,
        })
    }

    #[test]
    fn organization_line_layout() {
        let line = serialize_record(&key(), "LMS", &organization()).unwrap();
        assert_eq!(
            line,
            "ORG1|BATCH9|CLASS42|A|Acme Training|LMS|PO-1001|SKU-CPR|2026-01-05|2026-01-06|12|Main Hall|1 Main St|Dallas|TX|75201"
        );
        assert_eq!(line.split('|').count(), ORGANIZATION_COLUMNS);
    }

    #[test]
    fn organization_name_falls_back_to_org_id() {
        let mut record = organization();
        if let OfferingRecord::Organization(org) = &mut record {
            org.organization_name = None;
        }
        let line = serialize_record(&key(), "LMS", &record).unwrap();
        assert!(line.starts_with("ORG1|BATCH9|CLASS42|A|ORG1|LMS|"));
    }

    #[test]
    fn instructor_line_layout() {
        let line = serialize_record(&key(), "LMS", &instructor()).unwrap();
        assert_eq!(line, "ORG1|BATCH9|CLASS42|B|INS-7|Ada|Byron|ada@example.com");
        assert_eq!(line.split('|').count(), INSTRUCTOR_COLUMNS);
    }

    #[test]
    fn student_line_layout_with_empty_optionals() {
        let line = serialize_record(&key(), "LMS", &student()).unwrap();
        assert_eq!(
            line,
            "ORG1|BATCH9|CLASS42|C|Sam|Lee|sam@example.com|555-0100|true|"
        );
        assert_eq!(line.split('|').count(), STUDENT_COLUMNS);
    }

    #[test]
    fn unrecognized_record_has_no_line() {
        assert!(serialize_record(&key(), "LMS", &OfferingRecord::Unrecognized).is_none());
    }

    #[test]
    fn batch_body_matches_fixture() {
        let body = serialize_records(&key(), "LMS", &[organization(), instructor(), student()]);
        let expected = "ORG1|BATCH9|CLASS42|A|Acme Training|LMS|PO-1001|SKU-CPR|2026-01-05|2026-01-06|12|Main Hall|1 Main St|Dallas|TX|75201\r\n\
ORG1|BATCH9|CLASS42|B|INS-7|Ada|Byron|ada@example.com\r\n\
ORG1|BATCH9|CLASS42|C|Sam|Lee|sam@example.com|555-0100|true|";
        assert_eq!(body, expected);
    }

    #[test]
    fn unrecognized_records_are_skipped_in_batch() {
        let body = serialize_records(
            &key(),
            "LMS",
            &[instructor(), OfferingRecord::Unrecognized, student()],
        );
        assert_eq!(body.lines().count(), 2);
        assert!(!body.contains("\r\n\r\n"));
    }

    #[test]
    fn empty_batch_is_empty_body() {
        assert_eq!(serialize_records(&key(), "LMS", &[]), "");
    }

    #[test]
    fn record_batch_to_body_uses_its_key() {
        let batch = RecordBatch {
            key: OfferingKey::new("O", "B", "C"),
            records: vec![instructor()],
        };
        assert_eq!(batch.to_body("LMS"), "O|B|C|B|INS-7|Ada|Byron|ada@example.com");
    }
}
