use std::cell::RefCell;

/// A one-off message shown to the visitor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn resume_opened() -> Self {
        Self::new("Resume Opened", "Resume is opening in a new tab")
    }
}

/// Fire-and-forget user feedback.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Collects toasts instead of showing them.
#[derive(Default)]
pub struct RecordingNotifier {
    shown: RefCell<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Toast> {
        self.shown.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        log::debug!("[toast] {}: {}", toast.title, toast.description);
        self.shown.borrow_mut().push(toast);
    }
}
