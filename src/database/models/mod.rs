pub(crate) mod macros;

pub mod notification;
pub mod shift;
pub mod staff;
pub mod timesheet;
pub mod user;

pub use notification::{NewNotification, Notification, NotificationKind, NotificationListResponse};
pub use shift::{
    AvailableShift, AvailableShiftInput, AvailableShiftRow, NewAvailableShift, OpenShift,
    PendingShiftRequest, RequestStatus, ShiftRequest, ShiftRequestInput, StaffShift,
    StaffShiftStatus,
};
pub use staff::{
    AvailabilityMatrix, DayAvailability, Staff, StaffInput, StaffRole, StaffRow, StaffUpdateInput,
};
pub use timesheet::{
    NewTimesheetEntry, TimesheetEntry, TimesheetEntryInput, TimesheetListResponse, TimesheetStatus,
    TimesheetSummary,
};
pub use user::{AccountRole, AuthResponse, LoginRequest, RegisterRequest, User, UserInfo, UserType};
