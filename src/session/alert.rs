use tracing::error;

pub const CALIBRATION_ALERT: &str = "Color calibration is required";
pub const UNSOLVABLE_ALERT: &str = "In the way the faces were shown, it is impossible to find a \
solution. Please bear in mind the faces must be shown with the expected orientation.";

/// Fire-and-forget notification of a session-ending problem
pub trait AlertSink: Send + Sync {
    fn alert(&self, title: &str, message: &str);
}

/// Logs the alert and prints it to stderr
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, title: &str, message: &str) {
        error!("{}: {}", title, message);
        eprintln!("✗ {}: {}", title, message);
    }
}
