use shop_kit::{
    checkout::state::PaymentMethodGroup,
    config::{Configuration, Environment},
    core::{
        card_process::{
            CardProcessKind, CardProcessResult, MerchantDetails, PaymentSdk, ProcessSuccess,
            Registrar, RegistrationOutcome,
        },
        types::PaymentMethodDetail,
    },
    session::checkout_session,
};

/// Stands in for the card payment SDK: registers, then treats the shopper as authenticated.
struct SimulatedSdk {
    merchant: MerchantDetails,
}

impl PaymentSdk for SimulatedSdk {
    fn kind(&self) -> CardProcessKind {
        CardProcessKind::Payment
    }

    async fn submit_card_details<R: Registrar>(
        &self,
        method: PaymentMethodDetail,
        registrar: R,
    ) -> CardProcessResult {
        tracing::info!(
            "SDK for merchant {} paying with '{}'",
            self.merchant.merchant_id,
            method.id
        );

        match registrar.register(&method).await {
            RegistrationOutcome::Success(success) => {
                tracing::info!("Shopper redirected to {}", success.redirect_url);
                CardProcessResult::Success(ProcessSuccess {
                    transaction_id: success.transaction_id,
                })
            }
            RegistrationOutcome::Failure(failure) => failure.into(),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("MERCHANT_BASE_URL").expect("MERCHANT_BASE_URL not set");
    let merchant_id = std::env::var("MERCHANT_ID").expect("MERCHANT_ID not set");

    let config = Configuration::builder()
        .test(
            Environment::builder()
                .merchant_id(merchant_id)
                .base_url(base_url)
                .build(),
        )
        .build();

    let (checkout, mut completions) =
        checkout_session(&config, |merchant| SimulatedSdk { merchant })
            .expect("Invalid configuration");

    checkout
        .fetch_payment_methods()
        .await
        .expect("Checkout busy");
    if let Ok(message) = completions.try_recv() {
        tracing::error!("{message}");
        return;
    }

    if let Some(sections) = checkout.state().sections() {
        tracing::info!("Card schemes: {:?}", sections.card_scheme_ids);
        tracing::info!("Wallets: {:?}", sections.wallets);
        tracing::info!("Stored cards: {}", sections.tokens.len());
    }

    checkout.select(Some(PaymentMethodGroup::card()));
    checkout.pay().await.expect("Checkout not ready");

    if let Some(message) = completions.recv().await {
        tracing::info!("{message}");
    }
}
