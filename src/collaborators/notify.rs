use crate::decimal::Money;
use crate::types::{MemberId, ReservationId};

/// fire-and-forget lifecycle notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub reservation_id: ReservationId,
    pub member_id: MemberId,
    pub reference_code: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    BookingCreated { total: Money },
    BookingConfirmed,
    BookingCancelled { refund: Option<Money> },
    RentalCompleted { final_total: Money },
}

/// delivery boundary. errors are the implementer's problem; the engine
/// never fails an operation over a notification.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// drops every notification
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _notification: Notification) {}
}

/// keeps notifications for assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.sent.push(notification);
    }
}
