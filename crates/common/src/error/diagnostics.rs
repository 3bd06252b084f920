use std::{borrow::Cow, fmt, panic::Location};

/// Error message that remembers where in the gateway it was raised.
///
/// Build one with [`DiagnosticMessage::new`] or the [`diag!`] macro. The
/// `Display` form appends `(at file:line)`, which is what ends up in the
/// `trace` field of server error bodies.
#[derive(Clone, Debug)]
pub struct DiagnosticMessage {
    message: Cow<'static, str>,
    location: &'static Location<'static>,
}

impl DiagnosticMessage {
    #[track_caller]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// The message without location suffix, safe to hand to API callers.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// `file:line` of the call site.
    pub fn origin(&self) -> String {
        format!("{}:{}", self.location.file(), self.location.line())
    }
}

impl PartialEq for DiagnosticMessage {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.origin())
    }
}

/// `format!`-style shorthand for [`DiagnosticMessage::new`].
#[macro_export]
macro_rules! diag {
    ($msg:literal $(,)?) => {
        $crate::error::diagnostics::DiagnosticMessage::new($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::diagnostics::DiagnosticMessage::new(format!($fmt, $($arg)*))
    };
}
