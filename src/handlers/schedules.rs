use actix_web::{HttpResponse, web};
use chrono::Local;
use uuid::Uuid;

use crate::database::models::WorkScheduleInput;
use crate::database::repositories::ScheduleRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

/// Append a new schedule revision for a staff member (admin only).
/// Existing revisions are never overwritten.
pub async fn create_schedule(
    claims: Claims,
    repo: web::Data<ScheduleRepository>,
    input: web::Json<WorkScheduleInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can manage work schedules".to_string(),
        ));
    }

    let input = input.into_inner();

    if input.work_days_per_week < 1 || input.work_days_per_week > 7 {
        return Err(AppError::BadRequest(
            "work_days_per_week must be between 1 and 7".to_string(),
        ));
    }

    if input.work_hours_per_month == 0 {
        // Accepted, but penalties cannot be monetized until fixed.
        log::warn!(
            "Schedule for staff {} has work_hours_per_month = 0; adjustment amounts will be undefined",
            input.staff_id
        );
    }

    let schedule = repo.create_revision(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(schedule)))
}

/// Effective schedule for a staff member as of today. Staff may read
/// their own; admins anyone's.
pub async fn get_schedule(
    claims: Claims,
    repo: web::Data<ScheduleRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let staff_id = path.into_inner();

    if !claims.is_admin() && claims.staff_id() != staff_id {
        return Err(AppError::Forbidden(
            "Cannot view other staff members' schedules".to_string(),
        ));
    }

    let today = Local::now().date_naive();
    let schedule = repo
        .find_effective(staff_id, today)
        .await?
        .ok_or(AppError::NotConfigured(staff_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(schedule)))
}

/// All schedule revisions for a staff member, newest first (admin only).
pub async fn get_schedule_history(
    claims: Claims,
    repo: web::Data<ScheduleRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can view schedule history".to_string(),
        ));
    }

    let schedules = repo.get_history(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(schedules)))
}
