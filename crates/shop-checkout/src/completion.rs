use std::fmt::Display;

/// Terminal outcome of a checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    SuccessfulPayment,
    SuccessfulCardTokenization,
    Cancellation,
    PaymentMethodFetchFailure,
    RegistrationRequestFailure,
    CommitRequestFailure,
    CardProcessFailure,
}

impl CompletionKind {
    /// Human readable origin of the outcome.
    pub fn source(&self) -> &'static str {
        match self {
            CompletionKind::SuccessfulPayment => "Successful Card Payment",
            CompletionKind::SuccessfulCardTokenization => "Successful Card Tokenization",
            CompletionKind::Cancellation => "(SDK) Cancelled",
            CompletionKind::PaymentMethodFetchFailure => "(Merchant) Payment Method Fetch",
            CompletionKind::RegistrationRequestFailure => "(Merchant) Registration Request",
            CompletionKind::CommitRequestFailure => "(Merchant) Commit Request",
            CompletionKind::CardProcessFailure => "(SDK) Card Process",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CompletionKind::SuccessfulPayment | CompletionKind::SuccessfulCardTokenization
        )
    }
}

/// The single message shown to the shopper when a checkout step ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    pub kind: CompletionKind,
    /// Detail attached when the message is emitted, e.g. the raw error.
    pub description: Option<String>,
}

impl CompletionMessage {
    pub fn new(kind: CompletionKind) -> Self {
        CompletionMessage {
            kind,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Display) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn source(&self) -> &'static str {
        self.kind.source()
    }
}

impl From<CompletionKind> for CompletionMessage {
    fn from(kind: CompletionKind) -> Self {
        CompletionMessage::new(kind)
    }
}

impl Display for CompletionMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.source(), description),
            None => write!(f, "{}", self.source()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CompletionMessage::new(CompletionKind::Cancellation).to_string(),
            "(SDK) Cancelled"
        );
        assert_eq!(
            CompletionMessage::new(CompletionKind::CommitRequestFailure)
                .with_description("Bad status code 500: down")
                .to_string(),
            "(Merchant) Commit Request: Bad status code 500: down"
        );
    }

    #[test]
    fn test_sources_name_their_origin() {
        assert_eq!(
            CompletionKind::CardProcessFailure.source(),
            "(SDK) Card Process"
        );
        assert_eq!(
            CompletionMessage::new(CompletionKind::CardProcessFailure)
                .with_description("3DS aborted")
                .to_string(),
            "(SDK) Card Process: 3DS aborted"
        );
    }

    #[test]
    fn test_success_kinds() {
        assert!(CompletionKind::SuccessfulPayment.is_success());
        assert!(CompletionKind::SuccessfulCardTokenization.is_success());
        assert!(!CompletionKind::Cancellation.is_success());
        assert!(!CompletionKind::CardProcessFailure.is_success());
    }
}
