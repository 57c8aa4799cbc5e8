//! Operator notifications

use tracing::info;

/// Shows a message to the operator
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notifier that writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        info!(target: "admin_console::alert", "{}", message);
    }
}
