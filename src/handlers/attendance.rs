use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{AttendanceEvent, AttendanceStatus, WorkSchedule};
use crate::database::repositories::{AttendanceRepository, ScheduleRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AdjustmentEngine, Claims, DetectionOutcome};

/// Attendance event together with whatever the adjustment engine made
/// of it, so the UI can show "45 minutes late, penalty pending" right
/// after the button press.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub event: AttendanceEvent,
    pub adjustment: DetectionOutcome,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub staff_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Display tag for a fresh check-in, read off the schedule alone. A
/// late arrival is tagged late even when no penalty can be priced.
fn check_in_status(
    schedule: Option<&WorkSchedule>,
    arrived: chrono::NaiveTime,
) -> AttendanceStatus {
    match schedule {
        Some(s) if arrived > s.work_start_time => AttendanceStatus::Late,
        _ => AttendanceStatus::Present,
    }
}

/// Display tag after a check-out. Leaving before the scheduled end
/// tags the day `left_early` even when the morning was already late.
fn check_out_status(
    current: AttendanceStatus,
    schedule: Option<&WorkSchedule>,
    left: chrono::NaiveTime,
) -> AttendanceStatus {
    match schedule {
        Some(s) if left < s.work_end_time => AttendanceStatus::LeftEarly,
        _ => current,
    }
}

/// Staff self-service "I arrived". The timestamp is server-assigned;
/// client-submitted timestamps are not trusted.
pub async fn check_in(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    schedules: web::Data<ScheduleRepository>,
    engine: web::Data<AdjustmentEngine>,
) -> Result<HttpResponse, AppError> {
    let staff_id = claims.staff_id();
    let now = Local::now().naive_local();
    let date = now.date();

    let schedule = schedules.find_effective(staff_id, date).await?;
    let status = check_in_status(schedule.as_ref(), now.time());

    // Proposals are only ever attached to a stored event, so the event
    // insert goes first; None means a duplicate, racing or not.
    let event = repo
        .create_check_in(staff_id, date, now, status)
        .await?
        .ok_or(AppError::DuplicateAttendance { date })?;

    let adjustment = engine.evaluate_check_in(staff_id, date, now).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(AttendanceResponse {
        event,
        adjustment,
    })))
}

/// Staff self-service "I left". Rejected when there is no check-in for
/// today, when a check-out was already recorded, or when the server
/// clock somehow sits before the stored check-in.
pub async fn check_out(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    schedules: web::Data<ScheduleRepository>,
    engine: web::Data<AdjustmentEngine>,
) -> Result<HttpResponse, AppError> {
    let staff_id = claims.staff_id();
    let now = Local::now().naive_local();
    let date = now.date();

    let event = repo
        .find_by_day(staff_id, date)
        .await?
        .ok_or_else(|| AppError::NotFound("No check-in recorded for today".to_string()))?;

    if event.check_out.is_some() {
        return Err(AppError::BadRequest(
            "Check-out already recorded for today".to_string(),
        ));
    }

    if now < event.check_in {
        return Err(AppError::InvalidCheckOutOrder {
            check_in: event.check_in,
            check_out: now,
        });
    }

    let schedule = schedules.find_effective(staff_id, date).await?;
    let status = check_out_status(event.status, schedule.as_ref(), now.time());

    // Conditional update first; None means a concurrent check-out won
    // and no penalty belongs to this request.
    let event = repo
        .record_check_out(staff_id, date, now, status)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Check-out already recorded for today".to_string())
        })?;

    let adjustment = engine.evaluate_check_out(staff_id, date, now).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AttendanceResponse {
        event,
        adjustment,
    })))
}

/// Staff member's own attendance records.
pub async fn get_my_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let events = repo
        .get_events(Some(claims.staff_id()), query.from, query.to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(events)))
}

/// Administrative listing with staff/date filters.
pub async fn get_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can list attendance".to_string(),
        ));
    }

    let events = repo
        .get_events(query.staff_id, query.from, query.to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(events)))
}

/// Administrative escape hatch; attendance is never deleted by normal
/// operation.
pub async fn delete_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can delete attendance".to_string(),
        ));
    }

    let id = path.into_inner();

    if !repo.delete_event(id).await? {
        return Err(AppError::NotFound(format!(
            "Attendance event {} not found",
            id
        )));
    }

    Ok(HttpResponse::NoContent().finish())
}
