//! Notifications - the application-facing event surface

mod notification;

pub use notification::Notification;
