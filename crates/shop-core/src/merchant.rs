use url::Url;

use crate::{
    errors::{FetchError, RegistrationRequestError},
    types::{
        AvailablePaymentMethods, CommitAndVerifyResponseBody, CustomerId, RegistrationRequestBody,
        RegistrationResponse,
    },
};

/// Merchant backend interface.
///
/// Every call resolves exactly once, with either the decoded response or an error.
/// Nothing is retried.
pub trait MerchantApi: Send + Sync {
    fn base_url(&self) -> &Url;

    fn merchant_id(&self) -> &str;

    fn customer_id(&self) -> CustomerId;

    /// Payment methods and stored cards available to [`MerchantApi::customer_id`].
    fn fetch_payment_methods(
        &self,
    ) -> impl Future<Output = Result<AvailablePaymentMethods, FetchError>> + Send;

    fn register_payment(
        &self,
        body: RegistrationRequestBody,
    ) -> impl Future<Output = Result<RegistrationResponse, RegistrationRequestError>> + Send;

    /// Finalize an authenticated transaction.
    fn commit_payment(
        &self,
        transaction_id: &str,
    ) -> impl Future<Output = Result<CommitAndVerifyResponseBody, FetchError>> + Send;

    fn verify_payment(
        &self,
        transaction_id: &str,
    ) -> impl Future<Output = Result<CommitAndVerifyResponseBody, FetchError>> + Send;

    fn rollback_payment(
        &self,
        transaction_id: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}
