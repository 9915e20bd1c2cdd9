pub mod adjustments;
pub mod attendance;
pub mod salary;
pub mod schedules;
pub mod shared;

pub use shared::ApiResponse;
