pub mod adjustment;
pub mod attendance;
pub mod schedule;

// Re-export all repositories for easy importing
pub use adjustment::AdjustmentRepository;
pub use attendance::AttendanceRepository;
pub use schedule::ScheduleRepository;
