use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{AdjustmentCategory, AdjustmentKind, AdjustmentProposal, WorkSchedule};
use crate::database::repositories::{AdjustmentRepository, ScheduleRepository};
use crate::error::AppError;

/// Result of running deviation detection against one attendance
/// timestamp. Everything but `Proposed` means no proposal was written;
/// `NotConfigured` and `RateUndefined` are expected conditions the
/// caller surfaces to the user, not faults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "proposal", rename_all = "camelCase")]
pub enum DetectionOutcome {
    Proposed(AdjustmentProposal),
    OnTime,
    NotConfigured,
    RateUndefined,
    AlreadyProposed,
}

/// Derives an hourly rate from the schedule and turns late-arrival /
/// early-leave deviations into pending penalty proposals.
#[derive(Clone)]
pub struct AdjustmentEngine {
    schedules: ScheduleRepository,
    adjustments: AdjustmentRepository,
}

/// `base_salary / work_hours_per_month`, kept at full precision so
/// rounding happens once, on the final amount. None when the divisor
/// is zero or negative.
pub fn hourly_rate(schedule: &WorkSchedule) -> Option<f64> {
    if schedule.work_hours_per_month <= 0 {
        return None;
    }
    Some(schedule.base_salary as f64 / schedule.work_hours_per_month as f64)
}

/// Minutes of presence lost to the deviation, zero when the timestamp
/// is on the right side of the expected time. Same calendar day only.
pub fn deviation_minutes(category: AdjustmentCategory, expected: NaiveTime, actual: NaiveTime) -> i64 {
    let minutes = match category {
        AdjustmentCategory::LateArrival => (actual - expected).num_minutes(),
        AdjustmentCategory::EarlyLeave => (expected - actual).num_minutes(),
        AdjustmentCategory::Other => 0,
    };
    minutes.max(0)
}

/// Monetize a deviation: rate per hour times the fraction of an hour
/// lost, rounded to the nearest whole so'm.
pub fn monetize(rate: f64, minutes: i64) -> i64 {
    (rate * minutes as f64 / 60.0).round() as i64
}

fn reason_text(category: AdjustmentCategory, minutes: i64, expected: NaiveTime, actual: NaiveTime) -> String {
    match category {
        AdjustmentCategory::LateArrival => format!(
            "{} minutes late: work starts at {}, checked in at {}",
            minutes,
            expected.format("%H:%M"),
            actual.format("%H:%M"),
        ),
        AdjustmentCategory::EarlyLeave => format!(
            "{} minutes early: work ends at {}, checked out at {}",
            minutes,
            expected.format("%H:%M"),
            actual.format("%H:%M"),
        ),
        AdjustmentCategory::Other => String::new(),
    }
}

impl AdjustmentEngine {
    pub fn new(schedules: ScheduleRepository, adjustments: AdjustmentRepository) -> Self {
        Self {
            schedules,
            adjustments,
        }
    }

    /// Late-arrival detection for a check-in timestamp.
    pub async fn evaluate_check_in(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        check_in: NaiveDateTime,
    ) -> Result<DetectionOutcome, AppError> {
        self.evaluate(staff_id, date, check_in.time(), AdjustmentCategory::LateArrival)
            .await
    }

    /// Early-leave detection for a check-out timestamp.
    pub async fn evaluate_check_out(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        check_out: NaiveDateTime,
    ) -> Result<DetectionOutcome, AppError> {
        self.evaluate(staff_id, date, check_out.time(), AdjustmentCategory::EarlyLeave)
            .await
    }

    async fn evaluate(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        actual: NaiveTime,
        category: AdjustmentCategory,
    ) -> Result<DetectionOutcome, AppError> {
        let Some(schedule) = self.schedules.find_effective(staff_id, date).await? else {
            // A staff member with no schedule simply cannot accrue
            // penalties; the caller shows "schedule not set".
            return Ok(DetectionOutcome::NotConfigured);
        };

        let expected = match category {
            AdjustmentCategory::LateArrival => schedule.work_start_time,
            AdjustmentCategory::EarlyLeave => schedule.work_end_time,
            AdjustmentCategory::Other => return Ok(DetectionOutcome::OnTime),
        };

        let minutes = deviation_minutes(category, expected, actual);
        if minutes == 0 {
            return Ok(DetectionOutcome::OnTime);
        }

        // Undefined rate blocks proposal creation; a zero-amount
        // penalty is worse than an explicit "fix the schedule".
        let Some(rate) = hourly_rate(&schedule) else {
            log::warn!(
                "Skipping {} proposal for staff {}: work_hours_per_month is {}",
                category,
                staff_id,
                schedule.work_hours_per_month
            );
            return Ok(DetectionOutcome::RateUndefined);
        };

        if self.adjustments.exists_for(staff_id, date, category).await? {
            return Ok(DetectionOutcome::AlreadyProposed);
        }

        let amount = monetize(rate, minutes);
        let reason = reason_text(category, minutes, expected, actual);

        let proposal = self
            .adjustments
            .create(
                staff_id,
                AdjustmentKind::Penalty,
                amount,
                &reason,
                category,
                date,
            )
            .await?;

        log::info!(
            "Created {} proposal for staff {} on {}: {} so'm ({} minutes)",
            category,
            staff_id,
            date,
            amount,
            minutes
        );

        Ok(DetectionOutcome::Proposed(proposal))
    }
}
