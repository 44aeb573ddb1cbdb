use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_BASE: &str = "/course/recordentry/eapi/v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRow {
    pub organization_name: String,
    pub source_system: String,
    pub po_account_name: String,
    #[serde(rename = "productSKU")]
    pub product_sku: String,
    pub start_date: String,
    pub end_date: String,
    pub number_of_students: u32,
    pub facility_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorRow {
    #[serde(rename = "instructorID")]
    pub instructor_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub mastery: String,
    pub notes: String,
}

/// Everything submitted for one offering, keyed by class id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub offering_id: String,
    pub organization_id: String,
    pub batch_id: String,
    pub organization: Option<OrganizationRow>,
    pub instructors: Vec<InstructorRow>,
    pub students: Vec<StudentRow>,
}

impl Roster {
    fn new(organization_id: &str, batch_id: &str, class_id: &str) -> Self {
        Self {
            offering_id: class_id.to_string(),
            organization_id: organization_id.to_string(),
            batch_id: batch_id.to_string(),
            organization: None,
            instructors: Vec::new(),
            students: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub submission_id: Uuid,
    pub offering_id: String,
    pub records: usize,
}

/// Why a submission was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("missing client_id or client_secret header")]
    MissingCredentials,

    #[error("submission contains no records")]
    Empty,

    #[error("line {line}: expected at least 4 columns")]
    Truncated { line: usize },

    #[error("line {line}: unknown record type {code:?}")]
    UnknownRecordType { line: usize, code: String },

    #[error("line {line}: record type {code} expects {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        code: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: organization, batch and class ids differ from the first line")]
    MixedOffering { line: usize },

    #[error("line {line}: numberOfStudents is not a number")]
    InvalidNumber { line: usize },
}

impl IntoResponse for RejectReason {
    fn into_response(self) -> Response {
        let status = match self {
            RejectReason::MissingCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Db = Arc<RwLock<HashMap<String, Roster>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let api = Router::new()
        .route("/ping", get(ping))
        .route("/cre", post(submit))
        .route("/cre/{offering_id}", get(get_roster));
    Router::new().nest(API_BASE, api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn submit(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<SubmitReceipt>, RejectReason> {
    let authenticated = ["client_id", "client_secret"].iter().all(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| !v.is_empty())
    });
    if !authenticated {
        return Err(RejectReason::MissingCredentials);
    }

    let (roster, records) = parse_submission(&body)?;
    let receipt = SubmitReceipt {
        submission_id: Uuid::new_v4(),
        offering_id: roster.offering_id.clone(),
        records,
    };
    tracing::info!(
        offering_id = %receipt.offering_id,
        records,
        submission_id = %receipt.submission_id,
        "accepted submission"
    );
    db.write().await.insert(roster.offering_id.clone(), roster);
    Ok(Json(receipt))
}

async fn get_roster(
    State(db): State<Db>,
    Path(offering_id): Path<String>,
) -> Result<Json<Roster>, StatusCode> {
    let rosters = db.read().await;
    rosters
        .get(&offering_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Parse a `|`-delimited submission into a roster and its record count.
///
/// Accepts `\r\n` or `\n` line breaks; blank lines are ignored.
pub fn parse_submission(body: &str) -> Result<(Roster, usize), RejectReason> {
    let mut parsed: Option<Roster> = None;
    let mut records = 0;

    for (index, text) in body.lines().enumerate() {
        if text.is_empty() {
            continue;
        }
        let line = index + 1;
        let cols: Vec<&str> = text.split('|').collect();
        if cols.len() < 4 {
            return Err(RejectReason::Truncated { line });
        }
        let (org, batch, class, code) = (cols[0], cols[1], cols[2], cols[3]);

        let roster = parsed.get_or_insert_with(|| Roster::new(org, batch, class));
        if roster.organization_id != org || roster.batch_id != batch || roster.offering_id != class {
            return Err(RejectReason::MixedOffering { line });
        }

        let expected = match code {
            "A" => 16,
            "B" => 8,
            "C" => 10,
            other => {
                return Err(RejectReason::UnknownRecordType {
                    line,
                    code: other.to_string(),
                })
            }
        };
        if cols.len() != expected {
            return Err(RejectReason::ColumnCount {
                line,
                code: code.to_string(),
                expected,
                found: cols.len(),
            });
        }

        let f: Vec<String> = cols[4..].iter().map(|c| c.to_string()).collect();
        match code {
            "A" => {
                let number_of_students = f[6]
                    .parse()
                    .map_err(|_| RejectReason::InvalidNumber { line })?;
                roster.organization = Some(OrganizationRow {
                    organization_name: f[0].clone(),
                    source_system: f[1].clone(),
                    po_account_name: f[2].clone(),
                    product_sku: f[3].clone(),
                    start_date: f[4].clone(),
                    end_date: f[5].clone(),
                    number_of_students,
                    facility_name: f[7].clone(),
                    address: f[8].clone(),
                    city: f[9].clone(),
                    state: f[10].clone(),
                    zip_code: f[11].clone(),
                });
            }
            "B" => roster.instructors.push(InstructorRow {
                instructor_id: f[0].clone(),
                first_name: f[1].clone(),
                last_name: f[2].clone(),
                email: f[3].clone(),
            }),
            _ => roster.students.push(StudentRow {
                first_name: f[0].clone(),
                last_name: f[1].clone(),
                email: f[2].clone(),
                phone_number: f[3].clone(),
                mastery: f[4].clone(),
                notes: f[5].clone(),
            }),
        }
        records += 1;
    }

    parsed.map(|roster| (roster, records)).ok_or(RejectReason::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORG_LINE: &str =
        "ORG1|B1|C1|A|Acme|LMS|PO-1|SKU-1|2026-01-05|2026-01-06|12|Hall|1 Main St|Dallas|TX|75201";

    #[test]
    fn parses_all_three_record_types() {
        let body = format!(
            "{ORG_LINE}\r\nORG1|B1|C1|B|I-1|Ada|Byron|ada@example.com\r\nORG1|B1|C1|C|Sam|Lee|sam@example.com|555|true|"
        );
        let (roster, records) = parse_submission(&body).unwrap();
        assert_eq!(records, 3);
        assert_eq!(roster.offering_id, "C1");
        let org = roster.organization.unwrap();
        assert_eq!(org.source_system, "LMS");
        assert_eq!(org.number_of_students, 12);
        assert_eq!(roster.instructors[0].instructor_id, "I-1");
        assert_eq!(roster.students[0].notes, "");
    }

    #[test]
    fn accepts_plain_newlines() {
        let body = "O|B|C|C|A|B|e|||\nO|B|C|C|D|E|f|||\n";
        let (roster, records) = parse_submission(body).unwrap();
        assert_eq!(records, 2);
        assert_eq!(roster.students.len(), 2);
    }

    #[test]
    fn rejects_empty_body() {
        assert_eq!(parse_submission("").unwrap_err(), RejectReason::Empty);
    }

    #[test]
    fn rejects_unknown_code() {
        let err = parse_submission("O|B|C|Z|x").unwrap_err();
        assert_eq!(
            err,
            RejectReason::UnknownRecordType {
                line: 1,
                code: "Z".to_string()
            }
        );
    }

    #[test]
    fn rejects_organization_without_source_system_column() {
        let err =
            parse_submission("O|B|C|A|Acme|PO|SKU|2026-01-05|2026-01-06|12|Hall|1 Main|Dallas|TX|75201")
                .unwrap_err();
        assert!(matches!(
            err,
            RejectReason::ColumnCount {
                expected: 16,
                found: 15,
                ..
            }
        ));
    }

    #[test]
    fn rejects_mixed_offering() {
        let err = parse_submission("O|B|C|C|a|b|c|||\nO|B|OTHER|C|a|b|c|||").unwrap_err();
        assert_eq!(err, RejectReason::MixedOffering { line: 2 });
    }

    #[test]
    fn rejects_non_numeric_student_count() {
        let body = ORG_LINE.replace("|12|", "|twelve|");
        assert_eq!(
            parse_submission(&body).unwrap_err(),
            RejectReason::InvalidNumber { line: 1 }
        );
    }

    #[test]
    fn roster_serializes_camel_case() {
        let roster = Roster::new("O", "B", "C");
        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json["offeringId"], "C");
        assert_eq!(json["organizationId"], "O");
        assert!(json["organization"].is_null());
    }
}
