//! Boundary between the shop and the external card payment SDK.
//!
//! The SDK owns card entry, authentication and tokenization. The shop takes part in
//! two places only:
//!
//! 1. **Registration**: when the SDK needs a transaction, it calls back into a
//!    [`Registrar`] supplied by the shop, which registers the payment with the
//!    merchant backend and hands back the transaction id and redirect URL.
//! 2. **Completion**: when the SDK is done it reports exactly one
//!    [`CardProcessResult`]. [`CardProcessCompletion::on_process_result`] routes it
//!    to one of four handlers.

use std::fmt::Display;

use url::Url;

use crate::{errors::RegistrationRequestError, types::PaymentMethodDetail};

/// Merchant identity handed to the SDK when a card process is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantDetails {
    pub merchant_id: String,
    pub is_prod: bool,
}

/// Purpose of a card process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardProcessKind {
    /// Pay for the current order.
    Payment,
    /// Store a card for later use.
    Tokenization,
}

/// A registered transaction the SDK can authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSuccess {
    pub transaction_id: String,
    pub redirect_url: Url,
}

/// Why registration data could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationFailureCause {
    /// The merchant backend rejected or never answered the registration request.
    #[error(transparent)]
    Request(#[from] RegistrationRequestError),

    /// The merchant backend answered with data the SDK cannot use.
    #[error("Malformed registration response: {0}")]
    MalformedResponse(String),
}

/// Registration failed; carried back to the shop unchanged by the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFailure {
    pub error: RegistrationFailureCause,
}

impl Display for RegistrationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Answer of a [`Registrar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success(RegistrationSuccess),
    Failure(RegistrationFailure),
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Success(_))
    }

    pub fn success(transaction_id: impl Into<String>, redirect_url: Url) -> Self {
        RegistrationOutcome::Success(RegistrationSuccess {
            transaction_id: transaction_id.into(),
            redirect_url,
        })
    }

    pub fn failure(error: impl Into<RegistrationFailureCause>) -> Self {
        RegistrationOutcome::Failure(RegistrationFailure {
            error: error.into(),
        })
    }

    pub fn as_success(&self) -> Option<&RegistrationSuccess> {
        match self {
            RegistrationOutcome::Success(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&RegistrationFailure> {
        match self {
            RegistrationOutcome::Failure(f) => Some(f),
            _ => None,
        }
    }
}

/// The SDK authenticated the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSuccess {
    /// Transaction to commit.
    pub transaction_id: String,
}

/// Error intrinsic to the SDK's own flow, unrelated to merchant registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProcessFailure {
    pub error: String,
}

impl Display for CardProcessFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Terminal result of a card process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardProcessResult {
    Success(ProcessSuccess),
    Cancellation,
    RegistrationFailure(RegistrationFailure),
    CardProcessFailure(CardProcessFailure),
}

impl From<RegistrationFailure> for CardProcessResult {
    fn from(failure: RegistrationFailure) -> Self {
        CardProcessResult::RegistrationFailure(failure)
    }
}

/// Registration callback the shop hands to the SDK.
pub trait Registrar: Send + Sync {
    /// Register a payment with `method` at the merchant backend.
    fn register(
        &self,
        method: &PaymentMethodDetail,
    ) -> impl Future<Output = RegistrationOutcome> + Send;
}

/// The external card payment SDK.
pub trait PaymentSdk: Send + Sync {
    fn kind(&self) -> CardProcessKind;

    /// Run the SDK's card flow for `method`.
    ///
    /// The SDK calls `registrar` when it needs a transaction, and resolves once with
    /// the terminal result.
    fn submit_card_details<R: Registrar>(
        &self,
        method: PaymentMethodDetail,
        registrar: R,
    ) -> impl Future<Output = CardProcessResult> + Send;
}

/// Handlers for each terminal result of a card process.
pub trait CardProcessCompletion: Sync {
    fn on_success(&self, success: ProcessSuccess) -> impl Future<Output = ()> + Send;

    fn on_cancellation(&self) -> impl Future<Output = ()> + Send;

    fn on_registration_failure(
        &self,
        failure: RegistrationFailure,
    ) -> impl Future<Output = ()> + Send;

    fn on_card_process_failure(
        &self,
        failure: CardProcessFailure,
    ) -> impl Future<Output = ()> + Send;

    /// Route `result` to its handler.
    fn on_process_result(&self, result: CardProcessResult) -> impl Future<Output = ()> + Send {
        async move {
            match result {
                CardProcessResult::Success(success) => self.on_success(success).await,
                CardProcessResult::Cancellation => self.on_cancellation().await,
                CardProcessResult::RegistrationFailure(failure) => {
                    self.on_registration_failure(failure).await
                }
                CardProcessResult::CardProcessFailure(failure) => {
                    self.on_card_process_failure(failure).await
                }
            }
        }
    }
}
