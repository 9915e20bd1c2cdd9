use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A proposed penalty or bonus awaiting administrative approval. Only
/// approved proposals affect the salary total.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentProposal {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub kind: AdjustmentKind,
    /// Always non-negative; direction is carried by `kind`.
    pub amount: i64,
    pub reason: String,
    pub category: AdjustmentCategory,
    pub month: i64,
    pub year: i64,
    pub status: AdjustmentStatus,
    /// Calendar day the deviation occurred on.
    pub source_date: NaiveDate,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Administrative manual entry. Engine-generated proposals are built
/// internally and never come in over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreateAdjustmentInput {
    pub staff_id: Uuid,
    pub kind: AdjustmentKind,
    pub amount: i64,
    pub reason: String,
    pub source_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Penalty,
    Bonus,
}

impl std::fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentKind::Penalty => write!(f, "penalty"),
            AdjustmentKind::Bonus => write!(f, "bonus"),
        }
    }
}

impl std::str::FromStr for AdjustmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "penalty" => Ok(AdjustmentKind::Penalty),
            "bonus" => Ok(AdjustmentKind::Bonus),
            _ => Err(format!("Invalid adjustment kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentCategory {
    LateArrival,
    EarlyLeave,
    Other,
}

impl std::fmt::Display for AdjustmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentCategory::LateArrival => write!(f, "late_arrival"),
            AdjustmentCategory::EarlyLeave => write!(f, "early_leave"),
            AdjustmentCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for AdjustmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "late_arrival" => Ok(AdjustmentCategory::LateArrival),
            "early_leave" => Ok(AdjustmentCategory::EarlyLeave),
            "other" => Ok(AdjustmentCategory::Other),
            _ => Err(format!("Invalid adjustment category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for AdjustmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentStatus::Pending => write!(f, "pending"),
            AdjustmentStatus::Approved => write!(f, "approved"),
            AdjustmentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for AdjustmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AdjustmentStatus::Pending),
            "approved" => Ok(AdjustmentStatus::Approved),
            "rejected" => Ok(AdjustmentStatus::Rejected),
            _ => Err(format!("Invalid adjustment status: {}", s)),
        }
    }
}
