use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use klinika_payroll::database::{
    init_database,
    repositories::{AdjustmentRepository, AttendanceRepository, ScheduleRepository},
};
use klinika_payroll::handlers::{adjustments, attendance, salary, schedules};
use klinika_payroll::middleware::RequestId;
use klinika_payroll::{AdjustmentEngine, Config, SalaryService};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Klinika Payroll API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Klinika Payroll API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let schedule_repository = ScheduleRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let adjustment_repository = AdjustmentRepository::new(pool.clone());
    let adjustment_engine = AdjustmentEngine::new(
        schedule_repository.clone(),
        adjustment_repository.clone(),
    );
    let salary_service = SalaryService::new(
        schedule_repository.clone(),
        adjustment_repository.clone(),
    );

    let schedule_repo_data = web::Data::new(schedule_repository);
    let attendance_repo_data = web::Data::new(attendance_repository);
    let adjustment_repo_data = web::Data::new(adjustment_repository);
    let adjustment_engine_data = web::Data::new(adjustment_engine);
    let salary_service_data = web::Data::new(salary_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(schedule_repo_data.clone())
            .app_data(attendance_repo_data.clone())
            .app_data(adjustment_repo_data.clone())
            .app_data(adjustment_engine_data.clone())
            .app_data(salary_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/attendance")
                            .route("/check-in", web::post().to(attendance::check_in))
                            .route("/check-out", web::post().to(attendance::check_out))
                            .route("/my", web::get().to(attendance::get_my_attendance))
                            .route("", web::get().to(attendance::get_attendance))
                            .route("/{id}", web::delete().to(attendance::delete_attendance)),
                    )
                    .service(
                        web::scope("/schedules")
                            .route("", web::post().to(schedules::create_schedule))
                            .route("/{staff_id}", web::get().to(schedules::get_schedule))
                            .route(
                                "/{staff_id}/history",
                                web::get().to(schedules::get_schedule_history),
                            ),
                    )
                    .service(
                        web::scope("/adjustments")
                            .route("", web::post().to(adjustments::create_adjustment))
                            .route("", web::get().to(adjustments::get_adjustments))
                            .route("/my", web::get().to(adjustments::get_my_adjustments))
                            .route(
                                "/{id}/approve",
                                web::post().to(adjustments::approve_adjustment),
                            )
                            .route(
                                "/{id}/reject",
                                web::post().to(adjustments::reject_adjustment),
                            ),
                    )
                    .service(
                        web::scope("/salary")
                            .route("/my", web::get().to(salary::get_my_salary))
                            .route("/{staff_id}", web::get().to(salary::get_staff_salary)),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
