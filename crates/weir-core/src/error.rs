use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ItemNotFound,
    ItemAlreadyExists,
    InvalidStateTransition,
    FeedbackReasonRequired,
    ClassificationConflict,
    MissingIdentity,
    StaleWrite,
    OperationNotFound,
    OperationAlreadyClosed,
    OperationParentOpen,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ItemNotFound => "E2001",
            Self::ItemAlreadyExists => "E2002",
            Self::InvalidStateTransition => "E2003",
            Self::FeedbackReasonRequired => "E2004",
            Self::ClassificationConflict => "E3001",
            Self::MissingIdentity => "E4001",
            Self::StaleWrite => "E5001",
            Self::OperationNotFound => "E6001",
            Self::OperationAlreadyClosed => "E6002",
            Self::OperationParentOpen => "E6003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ItemNotFound => "Item not found",
            Self::ItemAlreadyExists => "Item already exists",
            Self::InvalidStateTransition => "Invalid state transition",
            Self::FeedbackReasonRequired => "Feedback transition requires a reason",
            Self::ClassificationConflict => "Incompatible domain/paradigm pairing",
            Self::MissingIdentity => "Item identity is missing",
            Self::StaleWrite => "Stale write rejected",
            Self::OperationNotFound => "Operation record not found",
            Self::OperationAlreadyClosed => "Operation record already closed",
            Self::OperationParentOpen => "Parent operation has open children",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .weir/config.toml and retry."),
            Self::ItemNotFound => None,
            Self::ItemAlreadyExists => Some("Use update instead of submit for existing items."),
            Self::InvalidStateTransition => Some(
                "Follow the chain: found -> triaged -> to_do -> in_progress -> in_test -> done -> released.",
            ),
            Self::FeedbackReasonRequired => {
                Some("Supply a comment explaining why the released item is being reopened.")
            }
            Self::ClassificationConflict => {
                Some("Pick a paradigm from the domain's compatible set, or re-classify first.")
            }
            Self::MissingIdentity => Some("Every item needs a non-empty id."),
            Self::StaleWrite => Some("Re-read the item and retry the write."),
            Self::OperationNotFound => None,
            Self::OperationAlreadyClosed => Some("Closed records are immutable; open a new one."),
            Self::OperationParentOpen => Some("Close all child operations before the parent."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
