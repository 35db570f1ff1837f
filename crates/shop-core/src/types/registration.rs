//! Request and response bodies of the payment registration, commit and verify calls.

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::types::PaymentMethodDetail;

/// Amount in minor currency units (cents).
pub type Cents = u64;

/// Amount of a registered payment.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    #[builder(into)]
    pub currency_code: String,
    pub total_amount: Cents,
    #[builder(default)]
    pub vat_amount: Cents,
}

/// Body of the payment registration request.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequestBody {
    #[builder(into)]
    pub customer_id: String,
    #[builder(into)]
    pub order_number: String,
    /// `None` for card payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethodDetail>,
    pub amount: Amount,
    #[builder(default)]
    pub store_card: bool,
    #[builder(into)]
    pub customer_email: String,
}

impl RegistrationRequestBody {
    /// Same body, registering with `method`.
    ///
    /// The card sentinel is sent as no method at all.
    pub fn with_method(mut self, method: &PaymentMethodDetail) -> Self {
        self.method = (!method.is_card()).then(|| method.clone());
        self
    }
}

/// Successful registration response of the merchant backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub transaction_id: String,
    #[serde(rename = "redirectOK")]
    pub redirect_ok: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_cancel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_url: Option<String>,
}

/// Operation applied to a registered transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Commit,
    Verify,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Commit => write!(f, "COMMIT"),
            Operation::Verify => write!(f, "VERIFY"),
        }
    }
}

/// Body of the commit and verify requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPaymentRequestBody {
    pub operation: Operation,
}

impl From<Operation> for ProcessPaymentRequestBody {
    fn from(operation: Operation) -> Self {
        ProcessPaymentRequestBody { operation }
    }
}

/// Response of the commit and verify requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAndVerifyResponseBody {
    pub transaction_id: Option<String>,
    pub authorization_id: Option<String>,
    pub response_code: Option<String>,
    pub response_text: Option<String>,
    pub response_source: Option<String>,
    pub execution_timestamp: Option<String>,
}

impl Display for CommitAndVerifyResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}
