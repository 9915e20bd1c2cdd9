use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use serial_test::serial;
use uuid::Uuid;

use klinika_payroll::AdjustmentEngine;
use klinika_payroll::database::models::{
    AdjustmentCategory, AdjustmentKind, AdjustmentStatus, CalculationType, WorkScheduleInput,
};
use klinika_payroll::database::repositories::{AdjustmentRepository, ScheduleRepository};
use klinika_payroll::services::DetectionOutcome;

mod common;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(date: NaiveDate, h: u32, min: u32) -> chrono::NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
}

async fn engine_with_repos(ctx: &common::TestContext) -> (AdjustmentEngine, ScheduleRepository, AdjustmentRepository) {
    let schedules = ScheduleRepository::new(ctx.pool());
    let adjustments = AdjustmentRepository::new(ctx.pool());
    let engine = AdjustmentEngine::new(schedules.clone(), adjustments.clone());
    (engine, schedules, adjustments)
}

#[actix_web::test]
#[serial]
async fn late_check_in_creates_pending_penalty() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, _) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    schedules
        .create_revision(common::standard_schedule(staff_id, day(2025, 1, 1)))
        .await
        .unwrap();

    let date = day(2025, 3, 10);
    let outcome = engine
        .evaluate_check_in(staff_id, date, at(date, 9, 45))
        .await
        .unwrap();

    let DetectionOutcome::Proposed(proposal) = outcome else {
        panic!("expected a proposal, got {:?}", outcome);
    };

    // 2,500,000 / 208 per hour, 45 minutes
    assert!((proposal.amount - 9_014).abs() <= 1, "amount was {}", proposal.amount);
    assert_eq!(proposal.kind, AdjustmentKind::Penalty);
    assert_eq!(proposal.category, AdjustmentCategory::LateArrival);
    assert_eq!(proposal.status, AdjustmentStatus::Pending);
    assert_eq!(proposal.staff_id, staff_id);
    assert_eq!(proposal.source_date, date);
    assert_eq!(proposal.month, 3);
    assert_eq!(proposal.year, 2025);
    assert!(proposal.reason.contains("45 minutes"));
    assert!(proposal.reason.contains("09:00"));
    assert!(proposal.reason.contains("09:45"));
}

#[actix_web::test]
#[serial]
async fn early_check_out_penalty_matches_late_arrival() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, _) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    schedules
        .create_revision(common::standard_schedule(staff_id, day(2025, 1, 1)))
        .await
        .unwrap();

    let date = day(2025, 3, 10);
    let outcome = engine
        .evaluate_check_out(staff_id, date, at(date, 17, 15))
        .await
        .unwrap();

    let DetectionOutcome::Proposed(proposal) = outcome else {
        panic!("expected a proposal, got {:?}", outcome);
    };

    // 45 minutes early costs the same as 45 minutes late
    assert!((proposal.amount - 9_014).abs() <= 1, "amount was {}", proposal.amount);
    assert_eq!(proposal.category, AdjustmentCategory::EarlyLeave);
    assert!(proposal.reason.contains("18:00"));
    assert!(proposal.reason.contains("17:15"));
}

#[actix_web::test]
#[serial]
async fn detection_is_idempotent_per_day_and_category() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, adjustments) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    schedules
        .create_revision(common::standard_schedule(staff_id, day(2025, 1, 1)))
        .await
        .unwrap();

    let date = day(2025, 3, 10);
    let first = engine
        .evaluate_check_in(staff_id, date, at(date, 9, 30))
        .await
        .unwrap();
    assert!(matches!(first, DetectionOutcome::Proposed(_)));

    let second = engine
        .evaluate_check_in(staff_id, date, at(date, 9, 30))
        .await
        .unwrap();
    assert!(matches!(second, DetectionOutcome::AlreadyProposed));

    let proposals = adjustments
        .get_proposals(Some(staff_id), None, None, None)
        .await
        .unwrap();
    assert_eq!(proposals.len(), 1);

    // An early leave on the same day is an independent proposal
    let leave = engine
        .evaluate_check_out(staff_id, date, at(date, 16, 0))
        .await
        .unwrap();
    assert!(matches!(leave, DetectionOutcome::Proposed(_)));

    let proposals = adjustments
        .get_proposals(Some(staff_id), None, None, None)
        .await
        .unwrap();
    assert_eq!(proposals.len(), 2);
}

#[actix_web::test]
#[serial]
async fn on_time_attendance_creates_nothing() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, adjustments) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    schedules
        .create_revision(common::standard_schedule(staff_id, day(2025, 1, 1)))
        .await
        .unwrap();

    let date = day(2025, 3, 10);

    // early arrival
    let arrival = engine
        .evaluate_check_in(staff_id, date, at(date, 8, 50))
        .await
        .unwrap();
    assert!(matches!(arrival, DetectionOutcome::OnTime));

    // late departure (overtime is not rewarded here)
    let departure = engine
        .evaluate_check_out(staff_id, date, at(date, 19, 30))
        .await
        .unwrap();
    assert!(matches!(departure, DetectionOutcome::OnTime));

    let proposals = adjustments
        .get_proposals(Some(staff_id), None, None, None)
        .await
        .unwrap();
    assert!(proposals.is_empty());
}

#[actix_web::test]
#[serial]
async fn missing_schedule_reports_not_configured() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, _, adjustments) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    let date = day(2025, 3, 10);

    let outcome = engine
        .evaluate_check_in(staff_id, date, at(date, 11, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, DetectionOutcome::NotConfigured));

    let proposals = adjustments
        .get_proposals(Some(staff_id), None, None, None)
        .await
        .unwrap();
    assert!(proposals.is_empty());
}

#[actix_web::test]
#[serial]
async fn zero_monthly_hours_blocks_proposal_creation() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, adjustments) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    let mut input = common::standard_schedule(staff_id, day(2025, 1, 1));
    input.work_hours_per_month = 0;
    schedules.create_revision(input).await.unwrap();

    let date = day(2025, 3, 10);
    let outcome = engine
        .evaluate_check_in(staff_id, date, at(date, 10, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, DetectionOutcome::RateUndefined));

    // no zero-amount proposal, no division error
    let proposals = adjustments
        .get_proposals(Some(staff_id), None, None, None)
        .await
        .unwrap();
    assert!(proposals.is_empty());
}

#[actix_web::test]
#[serial]
async fn latest_effective_revision_wins() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, _) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();

    let mut old = common::standard_schedule(staff_id, day(2025, 1, 1));
    old.base_salary = 2_080_000; // 10,000 per hour at 208 hours
    schedules.create_revision(old).await.unwrap();

    let revised = common::standard_schedule(staff_id, day(2025, 3, 1));
    schedules.create_revision(revised).await.unwrap();

    // February deviation is priced with the old revision
    let feb = day(2025, 2, 10);
    let outcome = engine
        .evaluate_check_in(staff_id, feb, at(feb, 10, 0))
        .await
        .unwrap();
    let DetectionOutcome::Proposed(proposal) = outcome else {
        panic!("expected a proposal, got {:?}", outcome);
    };
    assert_eq!(proposal.amount, 10_000);

    // March deviation is priced with the new one
    let mar = day(2025, 3, 10);
    let outcome = engine
        .evaluate_check_in(staff_id, mar, at(mar, 10, 0))
        .await
        .unwrap();
    let DetectionOutcome::Proposed(proposal) = outcome else {
        panic!("expected a proposal, got {:?}", outcome);
    };
    assert!((proposal.amount - 12_019).abs() <= 1, "amount was {}", proposal.amount);
}

#[actix_web::test]
#[serial]
async fn commission_schedules_are_priced_the_same_way() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, _) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    let mut input = common::standard_schedule(staff_id, day(2025, 1, 1));
    input.calculation_type = CalculationType::Commission;
    schedules.create_revision(input).await.unwrap();

    let date = day(2025, 3, 10);
    let outcome = engine
        .evaluate_check_in(staff_id, date, at(date, 9, 45))
        .await
        .unwrap();
    assert!(matches!(outcome, DetectionOutcome::Proposed(_)));
}

#[actix_web::test]
#[serial]
async fn schedule_before_effective_date_is_not_configured() {
    let ctx = common::TestContext::new().await.unwrap();
    let (engine, schedules, _) = engine_with_repos(&ctx).await;

    let staff_id = Uuid::new_v4();
    schedules
        .create_revision(common::standard_schedule(staff_id, day(2025, 6, 1)))
        .await
        .unwrap();

    let date = day(2025, 3, 10);
    let outcome = engine
        .evaluate_check_in(staff_id, date, at(date, 10, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, DetectionOutcome::NotConfigured));
}

#[actix_web::test]
#[serial]
async fn schedule_input_rejects_unknown_fields() {
    // The crooked records that used to accumulate came in through
    // loosely-shaped payloads; the input type refuses them outright.
    let json = serde_json::json!({
        "staffId": Uuid::new_v4(),
        "baseSalary": 2_500_000,
        "workStartTime": "09:00:00",
        "workEndTime": "18:00:00",
        "workDaysPerWeek": 6,
        "workHoursPerMonth": 208,
        "calculationType": "fixed",
        "effectiveFrom": "2025-01-01",
        "staff": "legacy-key"
    });

    let parsed = serde_json::from_value::<WorkScheduleInput>(json);
    assert!(parsed.is_err());
}
