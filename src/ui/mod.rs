//! UI-facing output of the engine
//!
//! The engine renders nothing; it queues notifications the host may display.

pub mod notifications;

pub use notifications::{Notification, NotificationKind, NotificationLog};
