pub mod available_shift;
pub mod notification;
pub mod shift_request;
pub mod staff;
pub mod staff_shift;
pub mod stats;
pub mod timesheet;
pub mod user;

pub use available_shift::AvailableShiftRepository;
pub use notification::NotificationRepository;
pub use shift_request::{ApprovalOutcome, ReviewOutcome, ShiftRequestRepository};
pub use staff::StaffRepository;
pub use staff_shift::StaffShiftRepository;
pub use stats::{DashboardStats, StatsRepository};
pub use timesheet::TimesheetRepository;
pub use user::UserRepository;
