use crate::database::models::{
    AvailableShift, NewNotification, NotificationKind, Staff, TimesheetEntry,
};
use crate::database::repositories::NotificationRepository;

/// Best-effort notification dispatch. Every method runs after the primary
/// transaction has committed and swallows its own failures: a lost
/// notification must never fail or roll back the operation that caused it.
#[derive(Clone)]
pub struct Notifier {
    notifications: NotificationRepository,
}

impl Notifier {
    pub fn new(notifications: NotificationRepository) -> Self {
        Self { notifications }
    }

    /// Fan out a "new shift available" notification to every eligible
    /// recipient, one row each.
    pub async fn shift_posted(&self, shift: &AvailableShift, recipients: &[Staff]) {
        let batch: Vec<NewNotification> = recipients
            .iter()
            .map(|staff| NewNotification {
                user_id: staff.user_id.clone(),
                kind: NotificationKind::Shift,
                title: "New shift available".to_string(),
                message: format!(
                    "A {} shift on {} ({}-{}) at {} is open for requests",
                    shift.service_type,
                    shift.shift_date,
                    shift.start_time,
                    shift.end_time,
                    shift.location
                ),
                link: Some("/staff/available-shifts".to_string()),
            })
            .collect();

        if let Err(e) = self.notifications.create_batch(batch).await {
            log::warn!("Failed to fan out shift-posted notifications: {}", e);
        }
    }

    pub async fn shift_request_approved(&self, user_id: &str, shift: &AvailableShift) {
        let notification = NewNotification {
            user_id: user_id.to_string(),
            kind: NotificationKind::Shift,
            title: "Shift request approved".to_string(),
            message: format!(
                "You have been assigned the {} shift on {} ({}-{})",
                shift.service_type, shift.shift_date, shift.start_time, shift.end_time
            ),
            link: Some("/staff/schedule".to_string()),
        };

        if let Err(e) = self.notifications.create(notification).await {
            log::warn!("Failed to create approval notification: {}", e);
        }
    }

    pub async fn shift_request_rejected(&self, user_id: &str, notes: Option<&str>) {
        let message = match notes {
            Some(notes) if !notes.is_empty() => {
                format!("Your shift request was not approved: {}", notes)
            }
            _ => "Your shift request was not approved".to_string(),
        };

        let notification = NewNotification {
            user_id: user_id.to_string(),
            kind: NotificationKind::Shift,
            title: "Shift request declined".to_string(),
            message,
            link: Some("/staff/available-shifts".to_string()),
        };

        if let Err(e) = self.notifications.create(notification).await {
            log::warn!("Failed to create rejection notification: {}", e);
        }
    }

    pub async fn timesheet_reviewed(&self, user_id: &str, entry: &TimesheetEntry, approved: bool) {
        let (title, message) = if approved {
            (
                "Timesheet approved".to_string(),
                format!(
                    "Your timesheet entry for {} ({:.2} hours) was approved",
                    entry.work_date, entry.total_hours
                ),
            )
        } else {
            let notes = entry
                .rejection_notes
                .as_deref()
                .filter(|n| !n.is_empty())
                .map(|n| format!(": {}", n))
                .unwrap_or_default();
            (
                "Timesheet rejected".to_string(),
                format!(
                    "Your timesheet entry for {} was rejected{}",
                    entry.work_date, notes
                ),
            )
        };

        let notification = NewNotification {
            user_id: user_id.to_string(),
            kind: NotificationKind::Timesheet,
            title,
            message,
            link: Some("/staff/timesheets".to_string()),
        };

        if let Err(e) = self.notifications.create(notification).await {
            log::warn!("Failed to create timesheet notification: {}", e);
        }
    }
}
