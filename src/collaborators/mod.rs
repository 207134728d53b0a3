mod notify;
mod payment;
mod store;

pub use notify::{Notification, NotificationKind, Notifier, NullNotifier, RecordingNotifier};
pub use payment::{PaymentGateway, RefundRecord, TestGateway};
pub use store::{MemoryStore, ReservationStore};
