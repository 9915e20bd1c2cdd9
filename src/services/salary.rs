use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{
    AdjustmentKind, AdjustmentProposal, AdjustmentStatus, SalarySummary,
};
use crate::database::repositories::{AdjustmentRepository, ScheduleRepository};
use crate::error::AppError;

/// Computes the period salary figure on read; nothing is cached or
/// persisted, so an unchanged proposal set always yields the same
/// output.
#[derive(Clone)]
pub struct SalaryService {
    schedules: ScheduleRepository,
    adjustments: AdjustmentRepository,
}

/// Fold a period's proposals into (approved bonuses, approved
/// penalties, pending bonuses, pending penalties). Rejected proposals
/// are retained for audit but contribute nothing.
pub fn fold_proposals(proposals: &[AdjustmentProposal]) -> (i64, i64, i64, i64) {
    let mut approved_bonuses = 0;
    let mut approved_penalties = 0;
    let mut pending_bonuses = 0;
    let mut pending_penalties = 0;

    for proposal in proposals {
        match (proposal.status, proposal.kind) {
            (AdjustmentStatus::Approved, AdjustmentKind::Bonus) => {
                approved_bonuses += proposal.amount
            }
            (AdjustmentStatus::Approved, AdjustmentKind::Penalty) => {
                approved_penalties += proposal.amount
            }
            (AdjustmentStatus::Pending, AdjustmentKind::Bonus) => {
                pending_bonuses += proposal.amount
            }
            (AdjustmentStatus::Pending, AdjustmentKind::Penalty) => {
                pending_penalties += proposal.amount
            }
            (AdjustmentStatus::Rejected, _) => {}
        }
    }

    (
        approved_bonuses,
        approved_penalties,
        pending_bonuses,
        pending_penalties,
    )
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

impl SalaryService {
    pub fn new(schedules: ScheduleRepository, adjustments: AdjustmentRepository) -> Self {
        Self {
            schedules,
            adjustments,
        }
    }

    pub async fn summarize(
        &self,
        staff_id: Uuid,
        month: u32,
        year: i32,
    ) -> Result<SalarySummary, AppError> {
        let as_of = last_day_of_month(year, month)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid period {}/{}", month, year)))?;

        let schedule = self
            .schedules
            .find_effective(staff_id, as_of)
            .await?
            .ok_or(AppError::NotConfigured(staff_id))?;

        let proposals = self.adjustments.get_for_period(staff_id, month, year).await?;

        let (approved_bonuses, approved_penalties, pending_bonuses, pending_penalties) =
            fold_proposals(&proposals);

        Ok(SalarySummary {
            staff_id,
            month,
            year,
            base_salary: schedule.base_salary,
            approved_bonuses,
            approved_penalties,
            pending_bonuses,
            pending_penalties,
            total: schedule.base_salary + approved_bonuses - approved_penalties,
        })
    }
}
