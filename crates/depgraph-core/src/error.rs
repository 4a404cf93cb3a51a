use std::fmt;

use crate::model::TicketId;

/// Result alias used across the render pipeline.
pub type Result<T> = std::result::Result<T, DepGraphError>;

/// Everything that can abort a render.
///
/// A failed render never produces a partial document; the caller shows
/// [`DepGraphError::failure_text`] instead.
#[derive(Debug, thiserror::Error)]
pub enum DepGraphError {
    /// An option value could not be coerced to its declared type.
    #[error("invalid value {value:?} for option `{key}`: {reason}")]
    Configuration {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A blocking link references a ticket the store does not know.
    #[error("ticket #{0} is referenced by a blocking link but does not exist")]
    Lookup(TicketId),

    /// Store access or document emission failed.
    #[error("{0:#}")]
    Render(anyhow::Error),
}

impl DepGraphError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::ConfigParseError,
            Self::Lookup(_) => ErrorCode::TicketNotFound,
            Self::Render(_) => ErrorCode::RenderFailed,
        }
    }

    /// The short text shown in place of the graph when a render fails.
    #[must_use]
    pub fn failure_text(&self) -> String {
        format!("DepGraph {}: {self}", self.code())
    }
}

impl From<fmt::Error> for DepGraphError {
    fn from(_: fmt::Error) -> Self {
        Self::Render(anyhow::anyhow!("failed to write graph document"))
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    TicketNotFound,
    RenderFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::TicketNotFound => "E2001",
            Self::RenderFailed => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Option parse error",
            Self::TicketNotFound => "Ticket not found",
            Self::RenderFailed => "Graph render failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => {
                Some("`fontsize` and `word_wrap_char_limit` take positive integers.")
            }
            Self::TicketNotFound => Some("Remove the dangling link or restore the ticket."),
            Self::RenderFailed => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{DepGraphError, ErrorCode};
    use crate::model::TicketId;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::TicketNotFound,
            ErrorCode::RenderFailed,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn failure_text_keeps_the_description() {
        let err = DepGraphError::Lookup(TicketId::new(9));
        let text = err.failure_text();
        assert!(text.starts_with("DepGraph E2001:"), "{text}");
        assert!(text.contains("#9"), "{text}");
    }

    #[test]
    fn render_error_shows_context_chain() {
        let inner = anyhow::anyhow!("disk on fire").context("load links");
        let text = DepGraphError::Render(inner).to_string();
        assert_eq!(text, "load links: disk on fire");
    }
}
