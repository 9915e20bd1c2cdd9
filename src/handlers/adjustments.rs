use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{AdjustmentCategory, AdjustmentStatus, CreateAdjustmentInput};
use crate::database::repositories::AdjustmentRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

#[derive(Debug, Deserialize)]
pub struct AdjustmentQuery {
    pub staff_id: Option<Uuid>,
    pub status: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Manual penalty/bonus entry (admin only). This is where bonuses come
/// from; the engine itself only ever proposes penalties.
pub async fn create_adjustment(
    claims: Claims,
    repo: web::Data<AdjustmentRepository>,
    input: web::Json<CreateAdjustmentInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can create adjustments".to_string(),
        ));
    }

    let input = input.into_inner();

    if input.amount < 0 {
        return Err(AppError::BadRequest(
            "Amount must be non-negative; direction is carried by kind".to_string(),
        ));
    }

    if input.reason.trim().is_empty() {
        return Err(AppError::BadRequest(
            "A reason is required for manual adjustments".to_string(),
        ));
    }

    let proposal = repo
        .create(
            input.staff_id,
            input.kind,
            input.amount,
            &input.reason,
            AdjustmentCategory::Other,
            input.source_date,
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(proposal)))
}

/// Administrative listing with staff/status/period filters; this is
/// what the payroll review screen paginates over.
pub async fn get_adjustments(
    claims: Claims,
    repo: web::Data<AdjustmentRepository>,
    query: web::Query<AdjustmentQuery>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can list adjustments".to_string(),
        ));
    }

    let status_filter = match &query.status {
        Some(status_str) => Some(
            status_str
                .parse::<AdjustmentStatus>()
                .map_err(AppError::BadRequest)?,
        ),
        None => None,
    };

    let proposals = repo
        .get_proposals(query.staff_id, status_filter, query.month, query.year)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(proposals)))
}

/// Staff member's own proposals, every status, so they can see what is
/// awaiting review.
pub async fn get_my_adjustments(
    claims: Claims,
    repo: web::Data<AdjustmentRepository>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let proposals = repo
        .get_proposals(Some(claims.staff_id()), None, query.month, query.year)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(proposals)))
}

/// pending -> approved (admin only). The amount starts counting toward
/// the salary total from here on.
pub async fn approve_adjustment(
    claims: Claims,
    repo: web::Data<AdjustmentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    resolve_adjustment(claims, repo, path.into_inner(), AdjustmentStatus::Approved).await
}

/// pending -> rejected (admin only). Retained for audit, permanently
/// excluded from salary totals.
pub async fn reject_adjustment(
    claims: Claims,
    repo: web::Data<AdjustmentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    resolve_adjustment(claims, repo, path.into_inner(), AdjustmentStatus::Rejected).await
}

async fn resolve_adjustment(
    claims: Claims,
    repo: web::Data<AdjustmentRepository>,
    id: Uuid,
    status: AdjustmentStatus,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can resolve adjustments".to_string(),
        ));
    }

    if repo.get_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Adjustment {} not found", id)));
    }

    // Conditional update: loses cleanly if another reviewer got there
    // first. There is no way back out of a terminal status; correcting
    // a mistake means creating a new proposal.
    let proposal = repo
        .resolve(id, status, claims.staff_id())
        .await?
        .ok_or(AppError::AlreadyResolved(id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(proposal)))
}
