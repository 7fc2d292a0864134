use std::sync::Arc;

use related_view_core::ErrorDetail;
use view_logging::view_warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastMode {
    Dismissable,
    Pester,
    Sticky,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub severity: ToastSeverity,
    pub mode: ToastMode,
}

/// User-visible notification boundary.
pub trait ToastSink: Send + Sync {
    fn show_toast(&self, toast: Toast);
}

pub struct ErrorReporter {
    sink: Arc<dyn ToastSink>,
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn ToastSink>) -> Self {
        Self { sink }
    }

    pub fn report_user_facing(&self, error: &ErrorDetail) {
        view_warn!("Fetch failed: {}", error);
        self.sink.show_toast(Toast {
            title: "Error".to_string(),
            message: error.message.clone(),
            severity: ToastSeverity::Error,
            mode: ToastMode::Dismissable,
        });
    }

    /// Diagnostic only; the user never sees transport problems.
    pub fn log_transport(&self, error: &ErrorDetail) {
        view_warn!("Error from change-event channel: {}", error);
    }
}
