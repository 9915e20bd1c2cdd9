use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{AttendanceEvent, AttendanceStatus};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a check-in, creating the day's event. At most one per
    /// (staff_id, date); `None` means the day already has one, whether
    /// it was there before the call or written by a concurrent one.
    pub async fn create_check_in(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        check_in: NaiveDateTime,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceEvent>> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4();

        let event = sqlx::query_as::<_, AttendanceEvent>(
            r#"
            INSERT INTO
                attendance_events (
                    id,
                    staff_id,
                    date,
                    check_in,
                    check_out,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, NULL, ?, ?, ?)
            ON CONFLICT (staff_id, date) DO NOTHING
            RETURNING
                id,
                staff_id,
                date,
                check_in,
                check_out,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(id)
        .bind(staff_id)
        .bind(date)
        .bind(check_in)
        .bind(status)
        .bind(now)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Set the check-out timestamp. Conditional on check-out being
    /// unset so a repeated check-out cannot overwrite the first one;
    /// returns None when the update did not apply.
    pub async fn record_check_out(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        check_out: NaiveDateTime,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceEvent>> {
        let now = Utc::now().naive_utc();

        let event = sqlx::query_as::<_, AttendanceEvent>(
            r#"
            UPDATE attendance_events
            SET
                check_out = ?,
                status = ?,
                updated_at = ?
            WHERE
                staff_id = ?
                AND date = ?
                AND check_out IS NULL
                AND check_in <= ?
            RETURNING
                id,
                staff_id,
                date,
                check_in,
                check_out,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(check_out)
        .bind(status)
        .bind(now)
        .bind(staff_id)
        .bind(date)
        .bind(check_out)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn find_by_day(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceEvent>> {
        let event = sqlx::query_as::<_, AttendanceEvent>(
            r#"
            SELECT
                id,
                staff_id,
                date,
                check_in,
                check_out,
                status,
                created_at,
                updated_at
            FROM
                attendance_events
            WHERE
                staff_id = ?
                AND date = ?
            "#,
        )
        .bind(staff_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List events with optional staff and date-range filters.
    pub async fn get_events(
        &self,
        staff_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceEvent>> {
        let mut query = r#"
            SELECT
                id,
                staff_id,
                date,
                check_in,
                check_out,
                status,
                created_at,
                updated_at
            FROM
                attendance_events
            "#
        .to_string();

        let mut conditions = vec![];

        if staff_id.is_some() {
            conditions.push("staff_id = ?");
        }

        if from.is_some() {
            conditions.push("date >= ?");
        }

        if to.is_some() {
            conditions.push("date <= ?");
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY date DESC");

        // Binds must line up with the conditions pushed above
        let mut prepared = sqlx::query_as::<_, AttendanceEvent>(&query);
        if let Some(sid) = staff_id {
            prepared = prepared.bind(sid);
        }
        if let Some(f) = from {
            prepared = prepared.bind(f);
        }
        if let Some(t) = to {
            prepared = prepared.bind(t);
        }

        let events = prepared.fetch_all(&self.pool).await?;

        Ok(events)
    }

    /// Administrative escape hatch; never called by normal operation.
    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM attendance_events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
