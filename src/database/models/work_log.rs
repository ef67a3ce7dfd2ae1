use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::worker::WorkerIdentity;

string_enum! {
    /// Raw `work_logs.status` column.
    pub enum WorkLogStatus {
        Pending => "PENDING",
        Settled => "SETTLED",
    }
}

/// Settlement state of a work log. A settled entry always knows its payout,
/// a pending one never has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkLogState {
    Pending,
    Settled {
        #[serde(rename = "payoutId")]
        payout_id: Uuid,
    },
}

impl WorkLogState {
    pub fn from_columns(status: WorkLogStatus, payout_id: Option<Uuid>) -> Result<Self, String> {
        match (status, payout_id) {
            (WorkLogStatus::Pending, None) => Ok(WorkLogState::Pending),
            (WorkLogStatus::Settled, Some(payout_id)) => Ok(WorkLogState::Settled { payout_id }),
            (WorkLogStatus::Pending, Some(payout_id)) => Err(format!(
                "pending work log references payout {}",
                payout_id
            )),
            (WorkLogStatus::Settled, None) => {
                Err("settled work log has no payout".to_string())
            }
        }
    }

    pub fn payout_id(&self) -> Option<Uuid> {
        match self {
            WorkLogState::Pending => None,
            WorkLogState::Settled { payout_id } => Some(*payout_id),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, WorkLogState::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogEntry {
    pub id: Uuid,
    pub company_id: Uuid,
    pub worker_id: Uuid,
    pub project_id: Uuid,
    pub date: NaiveDate,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub regular_hours: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub overtime_hours: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub hourly_rate_at_time: BigDecimal,
    pub currency: String,
    #[serde(flatten)]
    pub state: WorkLogState,
    pub created_at: DateTime<Utc>,
}

impl WorkLogEntry {
    pub fn total_hours(&self) -> BigDecimal {
        &self.regular_hours + &self.overtime_hours
    }

    /// Hours priced at the rate frozen on the entry, unrounded.
    pub fn cost(&self) -> BigDecimal {
        self.total_hours() * &self.hourly_rate_at_time
    }
}

/// Row shape of `work_logs`; converted into [`WorkLogEntry`] so the status
/// columns can never disagree once loaded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkLogRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub worker_id: Uuid,
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub regular_hours: BigDecimal,
    pub overtime_hours: BigDecimal,
    pub status: WorkLogStatus,
    pub payout_id: Option<Uuid>,
    pub hourly_rate_at_time: BigDecimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WorkLogRow> for WorkLogEntry {
    type Error = sqlx::Error;

    fn try_from(row: WorkLogRow) -> Result<Self, Self::Error> {
        let state = WorkLogState::from_columns(row.status, row.payout_id)
            .map_err(|e| sqlx::Error::Decode(format!("work log {}: {}", row.id, e).into()))?;

        Ok(Self {
            id: row.id,
            company_id: row.company_id,
            worker_id: row.worker_id,
            project_id: row.project_id,
            date: row.date,
            regular_hours: row.regular_hours,
            overtime_hours: row.overtime_hours,
            hourly_rate_at_time: row.hourly_rate_at_time,
            currency: row.currency,
            state,
            created_at: row.created_at,
        })
    }
}

/// A work log joined with the display names of its worker and project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogDetails {
    #[serde(flatten)]
    pub entry: WorkLogEntry,
    pub worker: WorkerIdentity,
    pub project_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkLogDetailsRow {
    #[sqlx(flatten)]
    pub log: WorkLogRow,
    pub worker_first_name: String,
    pub worker_last_name: String,
    pub worker_position: String,
    pub project_name: String,
}

impl TryFrom<WorkLogDetailsRow> for WorkLogDetails {
    type Error = sqlx::Error;

    fn try_from(row: WorkLogDetailsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            entry: row.log.try_into()?,
            worker: WorkerIdentity {
                first_name: row.worker_first_name,
                last_name: row.worker_last_name,
                position: row.worker_position,
            },
            project_name: row.project_name,
        })
    }
}

/// One worker's hours within a daily submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BulkEntryInput {
    pub worker_id: Uuid,
    pub regular_hours: BigDecimal,
    #[serde(default = "zero_hours")]
    pub overtime_hours: BigDecimal,
}

/// A daily submission: one project, one date, many workers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BulkWorkLogInput {
    pub project_id: Uuid,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub entries: Vec<BulkEntryInput>,
}

/// Correction of an entry's hours, date or project. Status, payout and rate
/// fields are not accepted here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWorkLogInput {
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    pub date: Option<NaiveDate>,
    pub project_id: Option<Uuid>,
    pub regular_hours: Option<BigDecimal>,
    pub overtime_hours: Option<BigDecimal>,
}

impl UpdateWorkLogInput {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.project_id.is_none()
            && self.regular_hours.is_none()
            && self.overtime_hours.is_none()
    }
}

/// A validated row ready to be inserted, rate already snapshotted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkLog {
    pub company_id: Uuid,
    pub worker_id: Uuid,
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub regular_hours: BigDecimal,
    pub overtime_hours: BigDecimal,
    pub hourly_rate_at_time: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn zero_hours() -> BigDecimal {
    BigDecimal::from(0)
}

/// Accepts either `2024-01-10` or a full RFC 3339 timestamp, keeping only the
/// UTC calendar day.
fn parse_calendar_date(raw: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("invalid date: {}", raw))
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_calendar_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_calendar_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn row(status: WorkLogStatus, payout_id: Option<Uuid>) -> WorkLogRow {
        WorkLogRow {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            regular_hours: BigDecimal::from(6),
            overtime_hours: BigDecimal::from(2),
            status,
            payout_id,
            hourly_rate_at_time: BigDecimal::from_str("20.00").unwrap(),
            currency: "EUR".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn consistent_rows_decode_into_states() {
        let pending = WorkLogEntry::try_from(row(WorkLogStatus::Pending, None)).unwrap();
        assert_eq!(pending.state, WorkLogState::Pending);

        let payout_id = Uuid::new_v4();
        let settled =
            WorkLogEntry::try_from(row(WorkLogStatus::Settled, Some(payout_id))).unwrap();
        assert_eq!(settled.state, WorkLogState::Settled { payout_id });
        assert_eq!(settled.state.payout_id(), Some(payout_id));
    }

    #[test]
    fn inconsistent_rows_are_rejected() {
        assert!(WorkLogEntry::try_from(row(WorkLogStatus::Settled, None)).is_err());
        assert!(WorkLogEntry::try_from(row(WorkLogStatus::Pending, Some(Uuid::new_v4()))).is_err());
    }

    #[test]
    fn cost_uses_the_snapshot_rate() {
        let entry = WorkLogEntry::try_from(row(WorkLogStatus::Pending, None)).unwrap();
        assert_eq!(entry.total_hours(), BigDecimal::from(8));
        assert_eq!(entry.cost(), BigDecimal::from(160));
    }

    #[test]
    fn serializes_state_as_status_and_payout_id() {
        let payout_id = Uuid::new_v4();
        let entry = WorkLogEntry::try_from(row(WorkLogStatus::Settled, Some(payout_id))).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "SETTLED");
        assert_eq!(json["payoutId"], payout_id.to_string());

        let entry = WorkLogEntry::try_from(row(WorkLogStatus::Pending, None)).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("payoutId").is_none());
    }

    #[test]
    fn decimals_serialize_with_two_places() {
        let entry = WorkLogEntry::try_from(row(WorkLogStatus::Pending, None)).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["regularHours"], "6.00");
        assert_eq!(json["overtimeHours"], "2.00");
        assert_eq!(json["hourlyRateAtTime"], "20.00");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("settled".parse::<WorkLogStatus>(), Ok(WorkLogStatus::Settled));
        assert_eq!(WorkLogStatus::Pending.to_string(), "PENDING");
        assert!("VOID".parse::<WorkLogStatus>().is_err());
    }

    #[test]
    fn bulk_input_accepts_plain_and_timestamp_dates() {
        let input: BulkWorkLogInput = serde_json::from_value(serde_json::json!({
            "projectId": Uuid::new_v4(),
            "date": "2024-01-10T00:00:00.000Z",
            "entries": [{ "workerId": Uuid::new_v4(), "regularHours": 8 }]
        }))
        .unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(input.entries[0].overtime_hours, BigDecimal::from(0));

        let input: BulkWorkLogInput = serde_json::from_value(serde_json::json!({
            "projectId": Uuid::new_v4(),
            "date": "2024-01-12",
            "entries": []
        }))
        .unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
    }

    #[test]
    fn update_input_rejects_settlement_fields() {
        let result = serde_json::from_value::<UpdateWorkLogInput>(serde_json::json!({
            "regularHours": 7,
            "status": "SETTLED"
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<UpdateWorkLogInput>(serde_json::json!({
            "hourlyRateAtTime": "99.00"
        }));
        assert!(result.is_err());

        let input: UpdateWorkLogInput =
            serde_json::from_value(serde_json::json!({ "overtimeHours": 1.5 })).unwrap();
        assert_eq!(input.overtime_hours, Some(BigDecimal::from_str("1.5").unwrap()));
        assert!(!input.is_empty());
    }
}
