//! Checkout sessions wired from a [`Configuration`].

use std::time::Duration;

use shop_checkout::{
    checkout::{Checkout, CompletionReceiver},
    state::ShopUiState,
};
use shop_core::card_process::{MerchantDetails, PaymentSdk};

use crate::{
    config::{ConfigError, Configuration},
    merchant_client::{MerchantClientError, RemoteMerchantClient},
};

/// Request timeout of merchant clients built from a [`Configuration`].
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Merchant client error: {0}")]
    MerchantClient(#[from] MerchantClientError),
}

/// Merchant client for the active environment of `config`.
pub fn merchant_client(config: &Configuration) -> Result<RemoteMerchantClient, SessionError> {
    let client = RemoteMerchantClient::with_timeout(
        config.base_url()?,
        config.merchant_id(),
        config.customer_id()?,
        SESSION_TIMEOUT,
    )?;
    Ok(client)
}

/// Start a checkout session.
///
/// The configuration is read once; changes take effect in the next session.
/// `card_process` builds the payment SDK for the configured merchant.
pub fn checkout_session<S: PaymentSdk>(
    config: &Configuration,
    card_process: impl FnOnce(MerchantDetails) -> S,
) -> Result<(Checkout<RemoteMerchantClient, S>, CompletionReceiver), SessionError> {
    let merchant = merchant_client(config)?;
    let sdk = card_process(config.merchant_details());

    let state = ShopUiState::builder()
        .displays_card_tokenization_toggle(!config.should_hide_card_tokenization_option)
        .build();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Checkout session: merchant='{}', base_url='{}', test_mode={}",
        merchant.merchant_id,
        merchant.base_url,
        config.is_test_mode
    );

    Ok(Checkout::new(merchant, sdk, state))
}
