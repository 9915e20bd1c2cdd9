use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One revision of a staff member's pay and working-hours configuration.
/// Edits append a new revision; the effective record for a date is the
/// latest `effective_from` at or before it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkSchedule {
    pub id: Uuid,
    pub staff_id: Uuid,
    /// Base monthly pay in whole so'm.
    pub base_salary: i64,
    pub work_start_time: NaiveTime,
    pub work_end_time: NaiveTime,
    pub work_days_per_week: i64,
    /// Configured independently of start/end/days; may be inconsistent
    /// with them. Zero means the hourly rate is undefined.
    pub work_hours_per_month: i64,
    pub calculation_type: CalculationType,
    pub effective_from: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct WorkScheduleInput {
    pub staff_id: Uuid,
    pub base_salary: i64,
    pub work_start_time: NaiveTime,
    pub work_end_time: NaiveTime,
    pub work_days_per_week: i64,
    pub work_hours_per_month: i64,
    pub calculation_type: CalculationType,
    pub effective_from: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    #[default]
    Fixed,
    Commission,
}

impl std::fmt::Display for CalculationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculationType::Fixed => write!(f, "fixed"),
            CalculationType::Commission => write!(f, "commission"),
        }
    }
}

impl std::str::FromStr for CalculationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(CalculationType::Fixed),
            "commission" => Ok(CalculationType::Commission),
            _ => Err(format!("Invalid calculation type: {}", s)),
        }
    }
}
