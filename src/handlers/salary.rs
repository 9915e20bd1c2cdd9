use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Claims, SalaryService};

#[derive(Debug, Deserialize)]
pub struct SalaryQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

fn resolve_period(query: &SalaryQuery) -> Result<(u32, i32), AppError> {
    let today = Local::now().date_naive();
    let month = query.month.unwrap_or_else(|| today.month());
    let year = query.year.unwrap_or_else(|| today.year());

    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(format!(
            "Invalid month: {} (expected 1-12)",
            month
        )));
    }

    Ok((month, year))
}

/// Staff self-service salary view; defaults to the current period.
pub async fn get_my_salary(
    claims: Claims,
    service: web::Data<SalaryService>,
    query: web::Query<SalaryQuery>,
) -> Result<HttpResponse, AppError> {
    let (month, year) = resolve_period(&query)?;

    let summary = service.summarize(claims.staff_id(), month, year).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// Administrative salary view for any staff member.
pub async fn get_staff_salary(
    claims: Claims,
    service: web::Data<SalaryService>,
    path: web::Path<Uuid>,
    query: web::Query<SalaryQuery>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can view other staff members' salaries".to_string(),
        ));
    }

    let (month, year) = resolve_period(&query)?;

    let summary = service.summarize(path.into_inner(), month, year).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}
