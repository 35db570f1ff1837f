//! Checkout UI state.
//!
//! [`ShopUiState`] is an immutable snapshot. The [`Checkout`](crate::checkout::Checkout)
//! owns the only writable copy and replaces it wholesale on every transition.

use std::num::NonZeroU32;

use bon::Builder;
use shop_core::{
    sections::PaymentMethodSections,
    types::{
        Amount, AvailablePaymentMethods, Cents, Currency, CustomerId, PaymentMethodDetail,
        RegistrationRequestBody, TokenizedCard,
    },
};

/// A selectable entry of the payment method list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodGroup {
    /// A stored card, paid with the tokenized-card method.
    Token(TokenizedCard),
    Other(PaymentMethodDetail),
}

impl PaymentMethodGroup {
    pub fn card() -> Self {
        PaymentMethodGroup::Other(PaymentMethodDetail::card())
    }

    /// Payment method to register when paying with this entry.
    pub fn payment_method(&self) -> PaymentMethodDetail {
        match self {
            PaymentMethodGroup::Token(_) => PaymentMethodDetail::easy_pay(),
            PaymentMethodGroup::Other(detail) => detail.clone(),
        }
    }

    /// Token id or payment method id.
    pub fn id(&self) -> &str {
        match self {
            PaymentMethodGroup::Token(token) => &token.token_id,
            PaymentMethodGroup::Other(detail) => &detail.id,
        }
    }
}

/// Where the checkout is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMode {
    /// Payment methods are being fetched from the merchant backend.
    FetchingPaymentMethods,
    /// Idle, waiting for a payment method to be selected.
    SelectingPaymentMethod(Option<AvailablePaymentMethods>),
    /// A payment method is selected and payment can be submitted.
    ReadyWithPaymentMethod(PaymentMethodDetail),
    /// A payment is in flight, covering both merchant calls and the card process.
    Processing,
}

/// Order data sent along with every registration.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    #[builder(into, default = "shop-demo".to_string())]
    pub order_number: String,
    #[builder(into, default = "support@example.com".to_string())]
    pub customer_email: String,
}

impl Default for OrderDetails {
    fn default() -> Self {
        OrderDetails::builder().build()
    }
}

/// Snapshot of everything the checkout screen reflects.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct ShopUiState {
    /// Price of one item.
    #[builder(default = 100)]
    item_price: Cents,
    #[builder(default)]
    currency: Currency,
    #[builder(default = NonZeroU32::MIN)]
    item_quantity: NonZeroU32,
    /// Whether the shopper may choose to store the card for later use.
    #[builder(default = true)]
    displays_card_tokenization_toggle: bool,
    #[builder(default)]
    tokenize_card_for_later_use: bool,
    #[builder(skip)]
    payment_methods: Option<AvailablePaymentMethods>,
    #[builder(skip)]
    selection: Option<PaymentMethodGroup>,
    #[builder(skip = UiMode::FetchingPaymentMethods)]
    mode: UiMode,
}

impl Default for ShopUiState {
    fn default() -> Self {
        ShopUiState::builder().build()
    }
}

impl ShopUiState {
    pub fn item_price(&self) -> Cents {
        self.item_price
    }

    pub fn item_quantity(&self) -> u32 {
        self.item_quantity.get()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn total_amount(&self) -> Cents {
        self.item_price * Cents::from(self.item_quantity.get())
    }

    pub fn displays_card_tokenization_toggle(&self) -> bool {
        self.displays_card_tokenization_toggle
    }

    pub fn tokenize_card_for_later_use(&self) -> bool {
        self.tokenize_card_for_later_use
    }

    /// Latest fetched payment methods, `None` until a fetch succeeds.
    pub fn payment_methods(&self) -> Option<&AvailablePaymentMethods> {
        self.payment_methods.as_ref()
    }

    pub fn selection(&self) -> Option<&PaymentMethodGroup> {
        self.selection.as_ref()
    }

    pub fn mode(&self) -> &UiMode {
        &self.mode
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.as_ref().is_some_and(|s| s.id() == id)
    }

    pub fn is_payment_processing(&self) -> bool {
        matches!(self.mode, UiMode::Processing)
    }

    pub fn is_fetching_payment_methods(&self) -> bool {
        matches!(self.mode, UiMode::FetchingPaymentMethods)
    }

    pub fn is_pay_button_enabled(&self) -> bool {
        matches!(self.mode, UiMode::ReadyWithPaymentMethod(_))
    }

    /// Sections of the payment method list, derived from the latest fetch.
    pub fn sections(&self) -> Option<PaymentMethodSections> {
        self.payment_methods
            .as_ref()
            .map(PaymentMethodSections::classify)
    }

    /// Registration body for the current order, without a payment method.
    pub fn registration_body(
        &self,
        customer_id: CustomerId,
        order: &OrderDetails,
    ) -> RegistrationRequestBody {
        RegistrationRequestBody::builder()
            .customer_id(customer_id.to_string())
            .order_number(order.order_number.as_str())
            .amount(
                Amount::builder()
                    .currency_code(self.currency.currency_code)
                    .total_amount(self.total_amount())
                    .build(),
            )
            .store_card(self.tokenize_card_for_later_use)
            .customer_email(order.customer_email.as_str())
            .build()
    }

    pub(crate) fn with_mode(self, mode: UiMode) -> Self {
        ShopUiState { mode, ..self }
    }

    /// Idle with nothing selected.
    pub(crate) fn selecting(self) -> Self {
        let mode = UiMode::SelectingPaymentMethod(self.payment_methods.clone());
        ShopUiState {
            selection: None,
            mode,
            ..self
        }
    }

    pub(crate) fn with_payment_methods(self, payment_methods: Option<AvailablePaymentMethods>) -> Self {
        ShopUiState {
            payment_methods,
            ..self
        }
    }

    /// Replaces the selection and moves to the matching idle mode.
    pub(crate) fn with_selection(self, selection: Option<PaymentMethodGroup>) -> Self {
        match selection {
            Some(group) => ShopUiState {
                mode: UiMode::ReadyWithPaymentMethod(group.payment_method()),
                selection: Some(group),
                ..self
            },
            None => self.selecting(),
        }
    }

    pub(crate) fn with_item_quantity(self, item_quantity: NonZeroU32) -> Self {
        ShopUiState {
            item_quantity,
            ..self
        }
    }

    pub(crate) fn with_currency(self, currency: Currency) -> Self {
        ShopUiState { currency, ..self }
    }

    pub(crate) fn with_tokenize_card_for_later_use(self, tokenize: bool) -> Self {
        ShopUiState {
            tokenize_card_for_later_use: tokenize,
            ..self
        }
    }
}
