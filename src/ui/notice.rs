use std::fmt;

/// Severity of a message shown next to the results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
}

impl NoticeKind {
    fn prefix(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Warning => "warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.kind == NoticeKind::Warning
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.prefix(), self.text)
    }
}

/// Records a notice for the user. The caller decides how to show it.
pub fn push_notice(notices: &mut Vec<Notice>, kind: NoticeKind, message: impl Into<String>) {
    let notice = Notice::new(kind, message);
    tracing::debug!(kind = ?notice.kind, "{}", notice.text);
    notices.push(notice);
}
