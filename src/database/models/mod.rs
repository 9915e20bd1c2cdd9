pub mod adjustment;
pub mod attendance;
pub mod salary;
pub mod schedule;

// Re-export all models for easy importing
pub use adjustment::*;
pub use attendance::*;
pub use salary::*;
pub use schedule::*;
