//! Notification port
//!
//! User-visible alerts, such as a draft that cannot be committed.

/// Shows a human-readable alert to the user.
///
/// Fire-and-forget: nothing is read back.
pub trait Notifier {
    /// Shows an alert with the given message.
    fn alert(&self, message: &str);
}
