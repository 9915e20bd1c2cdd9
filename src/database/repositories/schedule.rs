use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{WorkSchedule, WorkScheduleInput};

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a new schedule revision. Edits never overwrite prior
    /// revisions, so past proposals stay explainable against the
    /// schedule that was active when they were created.
    pub async fn create_revision(&self, input: WorkScheduleInput) -> Result<WorkSchedule> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4();

        let schedule = sqlx::query_as::<_, WorkSchedule>(
            r#"
            INSERT INTO
                work_schedules (
                    id,
                    staff_id,
                    base_salary,
                    work_start_time,
                    work_end_time,
                    work_days_per_week,
                    work_hours_per_month,
                    calculation_type,
                    effective_from,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                staff_id,
                base_salary,
                work_start_time,
                work_end_time,
                work_days_per_week,
                work_hours_per_month,
                calculation_type,
                effective_from,
                created_at
            "#,
        )
        .bind(id)
        .bind(input.staff_id)
        .bind(input.base_salary)
        .bind(input.work_start_time)
        .bind(input.work_end_time)
        .bind(input.work_days_per_week)
        .bind(input.work_hours_per_month)
        .bind(input.calculation_type)
        .bind(input.effective_from)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Resolve the schedule effective on `as_of`: latest
    /// `effective_from` at or before that date. `None` means the staff
    /// member is not configured, which is an expected result and not a
    /// fault.
    pub async fn find_effective(
        &self,
        staff_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<WorkSchedule>> {
        let schedule = sqlx::query_as::<_, WorkSchedule>(
            r#"
            SELECT
                id,
                staff_id,
                base_salary,
                work_start_time,
                work_end_time,
                work_days_per_week,
                work_hours_per_month,
                calculation_type,
                effective_from,
                created_at
            FROM
                work_schedules
            WHERE
                staff_id = ?
                AND effective_from <= ?
            ORDER BY
                effective_from DESC,
                created_at DESC
            LIMIT 1
            "#,
        )
        .bind(staff_id)
        .bind(as_of)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// All revisions for a staff member, newest first.
    pub async fn get_history(&self, staff_id: Uuid) -> Result<Vec<WorkSchedule>> {
        let schedules = sqlx::query_as::<_, WorkSchedule>(
            r#"
            SELECT
                id,
                staff_id,
                base_salary,
                work_start_time,
                work_end_time,
                work_days_per_week,
                work_hours_per_month,
                calculation_type,
                effective_from,
                created_at
            FROM
                work_schedules
            WHERE
                staff_id = ?
            ORDER BY
                effective_from DESC,
                created_at DESC
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }
}
