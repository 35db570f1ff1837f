//! Checkout orchestration over a merchant backend and a card payment SDK.
//!
//! For details, see the [`Checkout`] struct documentation.

use std::num::NonZeroU32;

use shop_core::{
    card_process::{
        CardProcessCompletion, CardProcessFailure, CardProcessKind, PaymentSdk, ProcessSuccess,
        Registrar, RegistrationFailure, RegistrationFailureCause, RegistrationOutcome,
    },
    merchant::MerchantApi,
    types::{Currency, PaymentMethodDetail, RegistrationRequestBody},
};
use tokio::sync::{mpsc, watch};
use url::Url;

use crate::{
    completion::{CompletionKind, CompletionMessage},
    errors::CheckoutError,
    state::{OrderDetails, PaymentMethodGroup, ShopUiState, UiMode},
};

/// Receiving end of the completion messages of a [`Checkout`].
pub type CompletionReceiver = mpsc::UnboundedReceiver<CompletionMessage>;

/// One checkout session.
///
/// `Checkout` drives the payment flow and owns the [`ShopUiState`] that reflects it:
///
/// 1. **Fetch** ([`fetch_payment_methods`](Checkout::fetch_payment_methods)): load the
///    available payment methods from the merchant backend.
/// 2. **Select** ([`select`](Checkout::select), [`toggle_selection`](Checkout::toggle_selection)):
///    at most one payment method is selected; a selection enables payment.
/// 3. **Pay** ([`pay`](Checkout::pay)): hand the selected method to the card payment SDK.
///    The SDK registers the payment with the merchant backend through a [`Registrar`]
///    built from the current order, then authenticates it.
/// 4. **Commit**: on SDK success the transaction is committed with the merchant backend.
///
/// Every step ends with exactly one [`CompletionMessage`] on the [`CompletionReceiver`]
/// (except a successful fetch, which just fills the state), and with the state back in
/// [`UiMode::SelectingPaymentMethod`].
///
/// ## State
///
/// The state lives in a single [`watch`] channel. Each transition computes a new snapshot
/// from the current one and swaps it in under the channel's lock, so observers never see
/// a half-applied update. Use [`subscribe`](Checkout::subscribe) to follow changes.
pub struct Checkout<M: MerchantApi, S: PaymentSdk> {
    merchant: M,
    card_process: S,
    order: OrderDetails,
    state: watch::Sender<ShopUiState>,
    completions: mpsc::UnboundedSender<CompletionMessage>,
}

impl<M: MerchantApi, S: PaymentSdk> Checkout<M, S> {
    pub fn new(merchant: M, card_process: S, state: ShopUiState) -> (Self, CompletionReceiver) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let checkout = Checkout {
            merchant,
            card_process,
            order: OrderDetails::default(),
            state: watch::Sender::new(state),
            completions,
        };
        (checkout, receiver)
    }

    pub fn with_order_details(mut self, order: OrderDetails) -> Self {
        self.order = order;
        self
    }

    pub fn merchant(&self) -> &M {
        &self.merchant
    }

    pub fn card_process(&self) -> &S {
        &self.card_process
    }

    /// Current state snapshot.
    pub fn state(&self) -> ShopUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShopUiState> {
        self.state.subscribe()
    }

    /// Fetch payment methods from the merchant backend.
    ///
    /// Any previously fetched methods and the selection are dropped first. On failure a
    /// [`CompletionKind::PaymentMethodFetchFailure`] is emitted and no methods are set.
    /// Rejected while a payment is in flight.
    pub async fn fetch_payment_methods(&self) -> Result<(), CheckoutError> {
        let started = self.state.send_if_modified(|state| {
            if state.is_payment_processing() {
                return false;
            }
            *state = state
                .clone()
                .with_payment_methods(None)
                .with_selection(None)
                .with_mode(UiMode::FetchingPaymentMethods);
            true
        });
        if !started {
            return Err(CheckoutError::AlreadyProcessing);
        }

        match self.merchant.fetch_payment_methods().await {
            Ok(available) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "Payment methods fetched: methods={}, tokens={}",
                    available.methods.len(),
                    available.tokens.len()
                );

                self.finish_fetch(|state| state.with_payment_methods(Some(available)));
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to fetch payment methods: {err}");

                self.finish_fetch(|state| state);
                self.emit(
                    CompletionMessage::new(CompletionKind::PaymentMethodFetchFailure)
                        .with_description(err),
                );
            }
        }
        Ok(())
    }

    /// Leave [`UiMode::FetchingPaymentMethods`] through `transition`.
    ///
    /// No-op when another fetch already finished and the state moved on.
    fn finish_fetch(&self, transition: impl FnOnce(ShopUiState) -> ShopUiState) {
        self.state.send_if_modified(|state| {
            if !state.is_fetching_payment_methods() {
                #[cfg(feature = "tracing")]
                tracing::debug!("Discarding superseded payment method fetch");

                return false;
            }
            *state = transition(state.clone()).selecting();
            true
        });
    }

    /// Replace the selection. `None` deselects.
    ///
    /// Ignored until payment methods are fetched, and while a fetch or a payment is in flight.
    pub fn select(&self, selection: Option<PaymentMethodGroup>) {
        self.state.send_if_modified(|state| {
            if !accepts_selection(state) {
                return false;
            }
            *state = state.clone().with_selection(selection);
            true
        });
    }

    /// Select `group`, or deselect it if it is already selected.
    pub fn toggle_selection(&self, group: PaymentMethodGroup) {
        self.state.send_if_modified(|state| {
            if !accepts_selection(state) {
                return false;
            }
            let selection = (state.selection() != Some(&group)).then_some(group);
            *state = state.clone().with_selection(selection);
            true
        });
    }

    /// Called by the card entry view when its input becomes valid or invalid.
    pub fn enable_button_for_card_process(&self, enable: bool) {
        self.select(enable.then(PaymentMethodGroup::card));
    }

    /// Pay with the selected payment method.
    ///
    /// Resolves once the payment attempt has ended and its completion message was sent.
    pub async fn pay(&self) -> Result<(), CheckoutError> {
        let method = match self.state.borrow().mode() {
            UiMode::ReadyWithPaymentMethod(selected) => selected.clone(),
            _ => return Err(CheckoutError::NotReady),
        };
        self.pay_with(method).await
    }

    /// Pay with `method` through the card payment SDK, regardless of the selection.
    ///
    /// Payment methods must have been fetched, and no fetch or payment may be in flight.
    pub async fn pay_with(&self, method: PaymentMethodDetail) -> Result<(), CheckoutError> {
        let body = self.begin_processing()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Submitting card details: method='{}', amount={} {}",
            method.id,
            body.amount.total_amount,
            body.amount.currency_code
        );

        let registrar = MerchantRegistrar {
            merchant: &self.merchant,
            body,
        };
        let result = self
            .card_process
            .submit_card_details(method, registrar)
            .await;

        self.on_process_result(result).await;
        Ok(())
    }

    /// Applies to the next payment attempt.
    pub fn update_item_quantity(&self, quantity: u32) -> Result<(), CheckoutError> {
        let quantity = NonZeroU32::new(quantity).ok_or(CheckoutError::InvalidQuantity)?;
        self.update(|state| state.clone().with_item_quantity(quantity));
        Ok(())
    }

    /// Applies to the next payment attempt.
    pub fn select_currency(&self, currency: Currency) {
        self.update(|state| state.clone().with_currency(currency));
    }

    /// Ask the SDK to store the card on the next payment.
    ///
    /// Returns `false` and changes nothing when the option is not offered.
    pub fn set_tokenize_card_for_later_use(&self, tokenize: bool) -> bool {
        self.state.send_if_modified(|state| {
            if !state.displays_card_tokenization_toggle() {
                return false;
            }
            *state = state.clone().with_tokenize_card_for_later_use(tokenize);
            true
        })
    }

    /// Enter [`UiMode::Processing`] unless a payment is already in flight or the
    /// payment methods are not known.
    ///
    /// Returns the registration body for the order as it is at this moment.
    fn begin_processing(&self) -> Result<RegistrationRequestBody, CheckoutError> {
        let mut outcome = Err(CheckoutError::NotReady);
        self.state.send_if_modified(|state| {
            if state.is_payment_processing() {
                outcome = Err(CheckoutError::AlreadyProcessing);
                return false;
            }
            if state.is_fetching_payment_methods() || state.payment_methods().is_none() {
                return false;
            }
            outcome = Ok(state.registration_body(self.merchant.customer_id(), &self.order));
            *state = state.clone().with_mode(UiMode::Processing);
            true
        });
        outcome
    }

    fn update(&self, transition: impl FnOnce(&ShopUiState) -> ShopUiState) {
        self.state.send_modify(|state| *state = transition(state));
    }

    /// Emit `message` and return to idle.
    fn send_message(&self, message: CompletionMessage) {
        self.update(|state| state.clone().selecting());
        self.emit(message);
    }

    fn emit(&self, message: CompletionMessage) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Checkout completed: {message}");

        if self.completions.send(message).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Completion receiver dropped; message discarded");
        }
    }
}

fn accepts_selection(state: &ShopUiState) -> bool {
    !state.is_payment_processing()
        && !state.is_fetching_payment_methods()
        && state.payment_methods().is_some()
}

impl<M: MerchantApi, S: PaymentSdk> CardProcessCompletion for Checkout<M, S> {
    async fn on_success(&self, success: ProcessSuccess) {
        let message = match self.merchant.commit_payment(&success.transaction_id).await {
            Ok(response) => {
                let kind = match self.card_process.kind() {
                    CardProcessKind::Payment => CompletionKind::SuccessfulPayment,
                    CardProcessKind::Tokenization => CompletionKind::SuccessfulCardTokenization,
                };
                CompletionMessage::new(kind).with_description(response)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "Failed to commit transaction '{}': {err}",
                    success.transaction_id
                );

                CompletionMessage::new(CompletionKind::CommitRequestFailure).with_description(err)
            }
        };
        self.send_message(message);
    }

    async fn on_cancellation(&self) {
        self.send_message(CompletionMessage::new(CompletionKind::Cancellation));
    }

    async fn on_registration_failure(&self, failure: RegistrationFailure) {
        self.send_message(
            CompletionMessage::new(CompletionKind::RegistrationRequestFailure)
                .with_description(failure),
        );
    }

    async fn on_card_process_failure(&self, failure: CardProcessFailure) {
        self.send_message(
            CompletionMessage::new(CompletionKind::CardProcessFailure).with_description(failure),
        );
    }
}

/// Registers payments with the merchant backend on behalf of the SDK.
pub struct MerchantRegistrar<'m, M: MerchantApi> {
    pub merchant: &'m M,
    /// Order to register; the method is filled in per call.
    pub body: RegistrationRequestBody,
}

impl<M: MerchantApi> Registrar for MerchantRegistrar<'_, M> {
    async fn register(&self, method: &PaymentMethodDetail) -> RegistrationOutcome {
        let body = self.body.clone().with_method(method);

        match self.merchant.register_payment(body).await {
            Ok(response) => match Url::parse(&response.redirect_ok) {
                Ok(redirect_url) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Payment registered: transaction='{}'", response.transaction_id);

                    RegistrationOutcome::success(response.transaction_id, redirect_url)
                }
                Err(err) => RegistrationOutcome::failure(RegistrationFailureCause::MalformedResponse(
                    format!("invalid redirect URL '{}': {err}", response.redirect_ok),
                )),
            },
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Payment registration failed: {err}");

                RegistrationOutcome::failure(err)
            }
        }
    }
}
