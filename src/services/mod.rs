pub mod adjustment_engine;
pub mod auth;
pub mod salary;

pub use adjustment_engine::{AdjustmentEngine, DetectionOutcome};
pub use auth::{AuthService, Claims, Role};
pub use salary::SalaryService;
