use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use serde::de::DeserializeOwned;
use shop_core::{
    errors::{FetchError, RegistrationRequestError},
    merchant::MerchantApi,
    types::{
        AvailablePaymentMethods, CommitAndVerifyResponseBody, CustomerId, Operation,
        ProcessPaymentRequestBody, RegistrationRequestBody, RegistrationResponse,
    },
};
use url::Url;

/// Media type of every merchant backend request and response.
pub const MERCHANT_MEDIA_TYPE: &str = "application/json;charset=utf-8;version=2.0";

/// Request timeout of [`RemoteMerchantClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A merchant backend client that communicates over HTTP.
///
/// Endpoints are resolved under `{base_url}/v2/payment/`. The base URL is treated as a
/// directory whether or not it ends with a `/`.
#[derive(Debug, Clone)]
pub struct RemoteMerchantClient {
    pub base_url: Url,
    pub merchant_id: String,
    pub customer_id: CustomerId,
    pub client: reqwest::Client,
    pub headers: HeaderMap,
}

#[derive(Debug, thiserror::Error)]
pub enum MerchantClientError {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl RemoteMerchantClient {
    pub fn new(
        base_url: Url,
        merchant_id: impl Into<String>,
        customer_id: CustomerId,
    ) -> Result<Self, MerchantClientError> {
        Self::with_timeout(base_url, merchant_id, customer_id, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: Url,
        merchant_id: impl Into<String>,
        customer_id: CustomerId,
        timeout: Duration,
    ) -> Result<Self, MerchantClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(MERCHANT_MEDIA_TYPE));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(MERCHANT_MEDIA_TYPE),
        );

        Ok(RemoteMerchantClient {
            base_url,
            merchant_id: merchant_id.into(),
            customer_id,
            client,
            headers,
        })
    }

    pub fn from_url_str(
        base_url: &str,
        merchant_id: impl Into<String>,
        customer_id: CustomerId,
    ) -> Result<Self, MerchantClientError> {
        Self::new(Url::parse(base_url)?, merchant_id, customer_id)
    }

    /// Add or replace a header sent with every request.
    pub fn header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.headers.insert(key, value.to_owned());
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::InvalidUrl(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v2", "payment"])
            .extend(segments);
        Ok(url)
    }

    async fn request_text(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<String, FetchError> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Merchant request: {} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!("Merchant response: status={}, body='{}'", status, text);

            let description = if text.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                text
            };
            return Err(FetchError::BadStatusCode {
                status_code: status.as_u16(),
                description,
            });
        }

        Ok(text)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<T, FetchError> {
        let text = self.request_text(method, url, body).await?;
        serde_json::from_str(&text).map_err(|err| FetchError::Decoding(err.to_string()))
    }

    async fn process_payment(
        &self,
        transaction_id: &str,
        operation: Operation,
    ) -> Result<CommitAndVerifyResponseBody, FetchError> {
        let url = self.endpoint(&[self.merchant_id.as_str(), transaction_id])?;
        let body = to_json(&ProcessPaymentRequestBody::from(operation))?;
        self.request_json(Method::PUT, url, Some(body)).await
    }
}

fn to_json(body: &impl serde::Serialize) -> Result<String, FetchError> {
    serde_json::to_string(body).map_err(|err| FetchError::Encoding(err.to_string()))
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else if err.is_decode() {
        FetchError::Decoding(err.to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}

impl MerchantApi for RemoteMerchantClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    async fn fetch_payment_methods(&self) -> Result<AvailablePaymentMethods, FetchError> {
        let mut url = self.endpoint(&["methods"])?;
        url.query_pairs_mut()
            .append_pair("consumerId", &self.customer_id.to_string());
        self.request_json(Method::GET, url, None).await
    }

    async fn register_payment(
        &self,
        body: RegistrationRequestBody,
    ) -> Result<RegistrationResponse, RegistrationRequestError> {
        let url = self.endpoint(&[self.merchant_id.as_str(), "register"])?;
        let body = to_json(&body)?;
        Ok(self.request_json(Method::POST, url, Some(body)).await?)
    }

    async fn commit_payment(
        &self,
        transaction_id: &str,
    ) -> Result<CommitAndVerifyResponseBody, FetchError> {
        self.process_payment(transaction_id, Operation::Commit).await
    }

    async fn verify_payment(
        &self,
        transaction_id: &str,
    ) -> Result<CommitAndVerifyResponseBody, FetchError> {
        self.process_payment(transaction_id, Operation::Verify).await
    }

    async fn rollback_payment(&self, transaction_id: &str) -> Result<String, FetchError> {
        let url = self.endpoint(&[self.merchant_id.as_str(), transaction_id])?;
        self.request_text(Method::DELETE, url, None).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn client(base_url: &str) -> RemoteMerchantClient {
        RemoteMerchantClient::from_url_str(base_url, "M 1", CustomerId(13)).unwrap()
    }

    #[test]
    fn test_endpoint_under_base_path() {
        let with_slash = client("https://merchant.example.com/api/");
        let without_slash = client("https://merchant.example.com/api");

        for client in [with_slash, without_slash] {
            assert_eq!(
                client.endpoint(&["methods"]).unwrap().as_str(),
                "https://merchant.example.com/api/v2/payment/methods"
            );
        }
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = client("https://merchant.example.com/");
        assert_eq!(
            client
                .endpoint(&[client.merchant_id.as_str(), "tx/1"])
                .unwrap()
                .as_str(),
            "https://merchant.example.com/v2/payment/M%201/tx%2F1"
        );
    }

    #[test]
    fn test_default_headers() {
        let client = client("https://merchant.example.com/");
        assert_eq!(client.headers[header::ACCEPT], MERCHANT_MEDIA_TYPE);
        assert_eq!(client.headers[header::CONTENT_TYPE], MERCHANT_MEDIA_TYPE);

        let client = client.header(
            &HeaderName::from_static("x-api-key"),
            &HeaderValue::from_static("secret"),
        );
        assert_eq!(client.headers["x-api-key"], "secret");
    }

    #[test]
    fn test_non_hierarchical_base_url() {
        let client = client("mailto:shop@example.com");
        assert!(matches!(
            client.endpoint(&["methods"]),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unencodable_body() {
        // JSON object keys must be strings.
        let body = HashMap::from([((1u8, 2u8), "value")]);
        assert!(matches!(to_json(&body), Err(FetchError::Encoding(_))));

        let error = RegistrationRequestError::from(FetchError::Encoding("key".to_string()));
        assert!(matches!(
            error,
            RegistrationRequestError::Network(FetchError::Encoding(_))
        ));
    }
}
