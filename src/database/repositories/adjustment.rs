use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{
    AdjustmentCategory, AdjustmentKind, AdjustmentProposal, AdjustmentStatus,
};

#[derive(Clone)]
pub struct AdjustmentRepository {
    pool: SqlitePool,
}

impl AdjustmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a proposal in `pending` state. A single atomic insert;
    /// month/year are derived from the source date.
    pub async fn create(
        &self,
        staff_id: Uuid,
        kind: AdjustmentKind,
        amount: i64,
        reason: &str,
        category: AdjustmentCategory,
        source_date: NaiveDate,
    ) -> Result<AdjustmentProposal> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4();

        let proposal = sqlx::query_as::<_, AdjustmentProposal>(
            r#"
            INSERT INTO
                adjustment_proposals (
                    id,
                    staff_id,
                    kind,
                    amount,
                    reason,
                    category,
                    month,
                    year,
                    status,
                    source_date,
                    resolved_by,
                    resolved_at,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, ?)
            RETURNING
                id,
                staff_id,
                kind,
                amount,
                reason,
                category,
                month,
                year,
                status,
                source_date,
                resolved_by,
                resolved_at,
                created_at
            "#,
        )
        .bind(id)
        .bind(staff_id)
        .bind(kind)
        .bind(amount)
        .bind(reason)
        .bind(category)
        .bind(source_date.month() as i64)
        .bind(source_date.year() as i64)
        .bind(AdjustmentStatus::Pending)
        .bind(source_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// Whether a proposal already exists for the deduplication key.
    /// The engine checks this before creating; the partial unique
    /// index backstops it.
    pub async fn exists_for(
        &self,
        staff_id: Uuid,
        source_date: NaiveDate,
        category: AdjustmentCategory,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COUNT(*)
            FROM
                adjustment_proposals
            WHERE
                staff_id = ?
                AND source_date = ?
                AND category = ?
            "#,
        )
        .bind(staff_id)
        .bind(source_date)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<AdjustmentProposal>> {
        let proposal = sqlx::query_as::<_, AdjustmentProposal>(
            r#"
            SELECT
                id,
                staff_id,
                kind,
                amount,
                reason,
                category,
                month,
                year,
                status,
                source_date,
                resolved_by,
                resolved_at,
                created_at
            FROM
                adjustment_proposals
            WHERE
                id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// List proposals with optional staff/status/period filters.
    pub async fn get_proposals(
        &self,
        staff_id: Option<Uuid>,
        status: Option<AdjustmentStatus>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<AdjustmentProposal>> {
        let mut query = r#"
            SELECT
                id,
                staff_id,
                kind,
                amount,
                reason,
                category,
                month,
                year,
                status,
                source_date,
                resolved_by,
                resolved_at,
                created_at
            FROM
                adjustment_proposals
            "#
        .to_string();

        let mut conditions = vec![];

        if staff_id.is_some() {
            conditions.push("staff_id = ?");
        }

        if status.is_some() {
            conditions.push("status = ?");
        }

        if month.is_some() {
            conditions.push("month = ?");
        }

        if year.is_some() {
            conditions.push("year = ?");
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        // Binds must line up with the conditions pushed above
        let mut prepared = sqlx::query_as::<_, AdjustmentProposal>(&query);
        if let Some(sid) = staff_id {
            prepared = prepared.bind(sid);
        }
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }
        if let Some(m) = month {
            prepared = prepared.bind(m as i64);
        }
        if let Some(y) = year {
            prepared = prepared.bind(y as i64);
        }

        let proposals = prepared.fetch_all(&self.pool).await?;

        Ok(proposals)
    }

    /// All proposals for one staff member in one period, for the
    /// salary aggregator.
    pub async fn get_for_period(
        &self,
        staff_id: Uuid,
        month: u32,
        year: i32,
    ) -> Result<Vec<AdjustmentProposal>> {
        let proposals = sqlx::query_as::<_, AdjustmentProposal>(
            r#"
            SELECT
                id,
                staff_id,
                kind,
                amount,
                reason,
                category,
                month,
                year,
                status,
                source_date,
                resolved_by,
                resolved_at,
                created_at
            FROM
                adjustment_proposals
            WHERE
                staff_id = ?
                AND month = ?
                AND year = ?
            ORDER BY
                source_date ASC
            "#,
        )
        .bind(staff_id)
        .bind(month as i64)
        .bind(year as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(proposals)
    }

    /// Transition a pending proposal to a terminal status. Conditional
    /// on the current status so two concurrent reviewers cannot both
    /// succeed; returns None when the proposal is not pending.
    pub async fn resolve(
        &self,
        id: Uuid,
        status: AdjustmentStatus,
        resolved_by: Uuid,
    ) -> Result<Option<AdjustmentProposal>> {
        let now = Utc::now().naive_utc();

        let proposal = sqlx::query_as::<_, AdjustmentProposal>(
            r#"
            UPDATE adjustment_proposals
            SET
                status = ?,
                resolved_by = ?,
                resolved_at = ?
            WHERE
                id = ?
                AND status = 'pending'
            RETURNING
                id,
                staff_id,
                kind,
                amount,
                reason,
                category,
                month,
                year,
                status,
                source_date,
                resolved_by,
                resolved_at,
                created_at
            "#,
        )
        .bind(status)
        .bind(resolved_by)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }
}
