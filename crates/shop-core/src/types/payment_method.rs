//! Payment methods offered by the merchant backend.

use serde::{Deserialize, Serialize};

/// A payment method supported by the merchant backend.
///
/// Two details are the same method when their `id`s match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDetail {
    pub id: String,
    pub display_name: String,
    pub fee: i32,
}

impl PaymentMethodDetail {
    /// Id of the plain card payment method.
    pub const CARD_ID: &'static str = "";
    /// Id of the tokenized-card payment method.
    pub const EASY_PAY_ID: &'static str = "EasyPayment";
    /// Id of the Apple Pay wallet.
    pub const APPLE_PAY_ID: &'static str = "ApplePay";
    /// Id of the S-Business card payment method.
    pub const S_BUSINESS_CARD_ID: &'static str = "SBusinessCard";

    pub fn new(id: impl Into<String>, display_name: impl Into<String>, fee: i32) -> Self {
        PaymentMethodDetail {
            id: id.into(),
            display_name: display_name.into(),
            fee,
        }
    }

    /// Card payment. The merchant backend expects no `method` for it on registration.
    pub fn card() -> Self {
        Self::new(Self::CARD_ID, "", 0)
    }

    /// Payment with a previously tokenized card.
    pub fn easy_pay() -> Self {
        Self::new(Self::EASY_PAY_ID, "Easy Payment", 0)
    }

    pub fn apple_pay() -> Self {
        Self::new(Self::APPLE_PAY_ID, "Apple Pay", 0)
    }

    pub fn s_business_card() -> Self {
        Self::new(Self::S_BUSINESS_CARD_ID, "SBusinessCard", 0)
    }

    pub fn is_card(&self) -> bool {
        self.id == Self::CARD_ID
    }

    pub fn is_easy_pay(&self) -> bool {
        self.id == Self::EASY_PAY_ID
    }
}

/// A card stored on the merchant backend, usable without re-entering card details.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizedCard {
    pub token_id: String,
    pub expiry_date: String,
    pub issuer: String,
    /// Copied from [`AvailablePaymentMethods::card_verification_required`] on classification.
    #[serde(skip)]
    pub card_verification_required: bool,
}

/// Payment methods and stored cards available to the current customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailablePaymentMethods {
    #[serde(default)]
    pub card_verification_required: bool,
    #[serde(default)]
    pub methods: Vec<PaymentMethodDetail>,
    #[serde(default)]
    pub tokens: Vec<TokenizedCard>,
}

impl AvailablePaymentMethods {
    pub fn contains(&self, id: &str) -> bool {
        self.methods.iter().any(|m| m.id == id)
    }
}
