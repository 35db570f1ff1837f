//! # Shop Checkout
//!
//! Checkout orchestration for card payments made through an external payment SDK and
//! reconciled with a merchant backend.
//!
//! ## Modules
//!
//! - [`checkout`]: The [`Checkout`](checkout::Checkout) session and its payment flow.
//! - [`state`]: UI state snapshots, [`UiMode`](state::UiMode) and payment method selection.
//! - [`completion`]: The [`CompletionMessage`](completion::CompletionMessage) that ends every step.
//! - [`errors`]: Requests the checkout rejects.
//!
//! ## Payment Flow
//!
//! ```text
//! FetchingPaymentMethods ──▶ SelectingPaymentMethod ◀──▶ ReadyWithPaymentMethod
//!                                   ▲                           │ pay
//!                                   │                           ▼
//!                                   └──── completion ───── Processing
//! ```
//!
//! While [`Processing`](state::UiMode::Processing), the card payment SDK calls back into the
//! checkout to register the payment with the merchant backend, authenticates it, and
//! reports one of four results. A success is committed with the merchant backend; every
//! result ends in a single completion message and a return to selection.
//!
//! ## Example
//!
//! ```rust,ignore
//! let (checkout, mut completions) = Checkout::new(merchant, sdk, ShopUiState::default());
//!
//! checkout.fetch_payment_methods().await?;
//! checkout.select(Some(PaymentMethodGroup::card()));
//! checkout.pay().await?;
//!
//! if let Some(message) = completions.recv().await {
//!     println!("{message}");
//! }
//! ```

pub mod checkout;
pub mod completion;
pub mod errors;
pub mod state;
