// file: src/models/outcome.rs
// description: classification of a single mirror submission attempt

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Failed { status: u16, body: String },
    TransportError(String),
    /// The request body could not be encoded; nothing was sent.
    InvalidRequest(String),
    /// Dry run: the request was built but not sent.
    Skipped,
}

impl Outcome {
    /// 201 creates, 409 means the mirror is already there, anything else fails.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            201 => Outcome::Created,
            409 => Outcome::AlreadyExists,
            _ => Outcome::Failed { status, body },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::Failed { .. } | Outcome::TransportError(_) | Outcome::InvalidRequest(_)
        )
    }

    pub fn describe<'a>(&'a self, full_name: &'a str) -> OutcomeMessage<'a> {
        OutcomeMessage {
            outcome: self,
            full_name,
        }
    }
}

/// Log line for an outcome, naming the repository it belongs to.
pub struct OutcomeMessage<'a> {
    outcome: &'a Outcome,
    full_name: &'a str,
}

impl fmt::Display for OutcomeMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.full_name;
        match self.outcome {
            Outcome::Created => write!(f, "Successfully mirrored {}", name),
            Outcome::AlreadyExists => write!(f, "Repository {} already exists in Gitea", name),
            Outcome::Failed { status, body } => {
                write!(f, "Failed to mirror {}: {} - {}", name, status, body)
            }
            Outcome::TransportError(cause) => write!(f, "Error migrating repo {}: {}", name, cause),
            Outcome::InvalidRequest(cause) => {
                write!(f, "Could not encode mirror request for {}: {}", name, cause)
            }
            Outcome::Skipped => write!(f, "Dry run, not mirroring {}", name),
        }
    }
}
