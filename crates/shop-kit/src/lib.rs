//! # Shop Kit
//!
//! Everything needed to run a card checkout against a merchant backend:
//!
//! - [`core`]: Domain types, the [`MerchantApi`](core::merchant::MerchantApi) contract and
//!   the card payment SDK boundary.
//! - [`checkout`]: The checkout orchestration and its UI state.
//! - [`merchant_client`]: An HTTP [`MerchantApi`](core::merchant::MerchantApi) client.
//! - [`config`]: Persisted shop configuration.
//! - [`session`]: Checkout sessions built from a configuration.
//!
//! ```rust,ignore
//! use shop_kit::{config::{Configuration, MemoryStore}, session::checkout_session};
//!
//! let config = Configuration::load(&store, "com.example.shop");
//! let (checkout, mut completions) = checkout_session(&config, MySdk::new)?;
//!
//! checkout.fetch_payment_methods().await?;
//! ```

pub mod config;

#[cfg(feature = "merchant-client")]
pub mod merchant_client;

#[cfg(feature = "merchant-client")]
pub mod session;

pub use shop_checkout as checkout;
pub use shop_core as core;
