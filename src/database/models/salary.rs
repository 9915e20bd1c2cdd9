use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Period salary figure computed on read. Pending amounts are surfaced
/// so staff can see what is awaiting review; they never enter `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySummary {
    pub staff_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub base_salary: i64,
    pub approved_bonuses: i64,
    pub approved_penalties: i64,
    pub pending_bonuses: i64,
    pub pending_penalties: i64,
    pub total: i64,
}
