use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use shop_kit::{
    core::{
        errors::{FetchError, RegistrationRequestError},
        merchant::MerchantApi,
        types::{Amount, CustomerId, PaymentMethodDetail, RegistrationRequestBody},
    },
    merchant_client::{MERCHANT_MEDIA_TYPE, RemoteMerchantClient},
};
use url::Url;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    uri: String,
    accept: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Backend {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Backend {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> Recorded {
        self.requests().pop().expect("no request received")
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, MERCHANT_MEDIA_TYPE)],
        body.to_string(),
    )
        .into_response()
}

/// Answers like a merchant backend under `/shop/`.
async fn merchant_backend(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    backend.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        uri: uri.to_string(),
        accept: header_str(&headers, header::ACCEPT),
        content_type: header_str(&headers, header::CONTENT_TYPE),
        body: body.clone(),
    });

    match (method, uri.path()) {
        (Method::GET, "/shop/v2/payment/methods") => json_response(
            StatusCode::OK,
            json!({
                "cardVerificationRequired": true,
                "methods": [
                    { "id": "Visa", "displayName": "Visa", "fee": 0 },
                    { "id": "Vipps", "displayName": "Vipps", "fee": 150 }
                ],
                "tokens": [
                    { "tokenId": "tok-1", "expiryDate": "12/30", "issuer": "Visa" }
                ]
            }),
        ),
        (Method::POST, "/shop/v2/payment/M1/register") => {
            let request: Value = serde_json::from_str(&body).unwrap_or_default();
            match request["orderNumber"].as_str() {
                Some("invalid") => (StatusCode::BAD_REQUEST, "missing amount").into_response(),
                Some("server") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                Some("psp") => (StatusCode::SERVICE_UNAVAILABLE, "PSP down").into_response(),
                Some("teapot") => (StatusCode::IM_A_TEAPOT, "short and stout").into_response(),
                _ => json_response(
                    StatusCode::OK,
                    json!({
                        "transactionId": "TX1",
                        "redirectOK": "https://merchant.example.com/ok",
                        "walletUrl": null
                    }),
                ),
            }
        }
        (Method::PUT, "/shop/v2/payment/M1/TX1") => {
            let request: Value = serde_json::from_str(&body).unwrap_or_default();
            json_response(
                StatusCode::OK,
                json!({
                    "transactionId": "TX1",
                    "responseCode": "OK",
                    "responseText": request["operation"],
                }),
            )
        }
        (Method::DELETE, "/shop/v2/payment/M1/TX1") => "Rolled back".into_response(),
        (_, "/shop/v2/payment/M1/garbled") => json_response(StatusCode::OK, json!("not an object")),
        (_, "/shop/v2/payment/M1/slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK.into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_backend() -> (Backend, Url) {
    let backend = Backend::default();
    let app = Router::new()
        .fallback(merchant_backend)
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base_url = Url::parse(&format!("http://{addr}/shop/")).unwrap();
    (backend, base_url)
}

fn registration(order_number: &str) -> RegistrationRequestBody {
    RegistrationRequestBody::builder()
        .customer_id("000013")
        .order_number(order_number)
        .amount(
            Amount::builder()
                .currency_code("EUR")
                .total_amount(300)
                .build(),
        )
        .customer_email("support@example.com")
        .build()
}

#[tokio::test]
async fn test_fetch_payment_methods() {
    let (backend, base_url) = spawn_backend().await;
    let client = RemoteMerchantClient::new(base_url, "M1", CustomerId(13)).unwrap();

    let available = client.fetch_payment_methods().await.unwrap();
    assert!(available.card_verification_required);
    assert_eq!(available.methods.len(), 2);
    assert_eq!(available.methods[1].fee, 150);
    assert_eq!(available.tokens[0].token_id, "tok-1");

    let request = backend.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.uri, "/shop/v2/payment/methods?consumerId=000013");
    assert_eq!(request.accept.as_deref(), Some(MERCHANT_MEDIA_TYPE));
    assert_eq!(request.content_type.as_deref(), Some(MERCHANT_MEDIA_TYPE));
}

#[tokio::test]
async fn test_register_payment() {
    let (backend, base_url) = spawn_backend().await;
    let client = RemoteMerchantClient::new(base_url, "M1", CustomerId(13)).unwrap();

    let response = client
        .register_payment(registration("order-1").with_method(&PaymentMethodDetail::new(
            "Vipps", "Vipps", 150,
        )))
        .await
        .unwrap();
    assert_eq!(response.transaction_id, "TX1");
    assert_eq!(response.redirect_ok, "https://merchant.example.com/ok");
    assert_eq!(response.wallet_url, None);

    let request = backend.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.uri, "/shop/v2/payment/M1/register");
    assert_eq!(request.content_type.as_deref(), Some(MERCHANT_MEDIA_TYPE));
    assert_eq!(
        serde_json::from_str::<Value>(&request.body).unwrap(),
        json!({
            "customerId": "000013",
            "orderNumber": "order-1",
            "method": { "id": "Vipps", "displayName": "Vipps", "fee": 150 },
            "amount": { "currencyCode": "EUR", "totalAmount": 300, "vatAmount": 0 },
            "storeCard": false,
            "customerEmail": "support@example.com"
        })
    );
}

#[tokio::test]
async fn test_register_payment_errors() {
    let (_backend, base_url) = spawn_backend().await;
    let client = RemoteMerchantClient::new(base_url, "M1", CustomerId(13)).unwrap();

    let error = |order: &'static str| {
        let client = client.clone();
        async move { client.register_payment(registration(order)).await.unwrap_err() }
    };

    assert_eq!(
        error("invalid").await,
        RegistrationRequestError::InvalidParameters("missing amount".to_string())
    );
    assert_eq!(
        error("server").await,
        RegistrationRequestError::ServerFail("Internal Server Error".to_string())
    );
    assert_eq!(
        error("psp").await,
        RegistrationRequestError::DownstreamPspError("PSP down".to_string())
    );
    assert_eq!(
        error("teapot").await,
        RegistrationRequestError::Network(FetchError::BadStatusCode {
            status_code: 418,
            description: "short and stout".to_string(),
        })
    );
}

#[tokio::test]
async fn test_commit_and_verify() {
    let (backend, base_url) = spawn_backend().await;
    let client = RemoteMerchantClient::new(base_url, "M1", CustomerId(13)).unwrap();

    let committed = client.commit_payment("TX1").await.unwrap();
    assert_eq!(committed.transaction_id.as_deref(), Some("TX1"));
    assert_eq!(committed.response_text.as_deref(), Some("COMMIT"));
    assert_eq!(committed.authorization_id, None);

    let verified = client.verify_payment("TX1").await.unwrap();
    assert_eq!(verified.response_text.as_deref(), Some("VERIFY"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.uri, "/shop/v2/payment/M1/TX1");
    }
    assert_eq!(requests[0].body, r#"{"operation":"COMMIT"}"#);
    assert_eq!(requests[1].body, r#"{"operation":"VERIFY"}"#);
}

#[tokio::test]
async fn test_rollback_returns_text() {
    let (backend, base_url) = spawn_backend().await;
    let client = RemoteMerchantClient::new(base_url, "M1", CustomerId(13)).unwrap();

    assert_eq!(client.rollback_payment("TX1").await.unwrap(), "Rolled back");
    assert_eq!(backend.last().method, Method::DELETE);
}

#[tokio::test]
async fn test_transport_errors() {
    let (_backend, base_url) = spawn_backend().await;
    let client =
        RemoteMerchantClient::with_timeout(base_url, "M1", CustomerId(13), Duration::from_millis(200))
            .unwrap();

    assert_eq!(
        client.commit_payment("unknown").await.unwrap_err(),
        FetchError::BadStatusCode {
            status_code: 404,
            description: "Not Found".to_string(),
        }
    );
    assert!(matches!(
        client.commit_payment("garbled").await,
        Err(FetchError::Decoding(_))
    ));
    assert!(matches!(
        client.commit_payment("slow").await,
        Err(FetchError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        RemoteMerchantClient::from_url_str(&format!("http://{addr}/"), "M1", CustomerId(13))
            .unwrap();

    assert!(matches!(
        client.fetch_payment_methods().await,
        Err(FetchError::Network(_))
    ));
    assert!(matches!(
        client.register_payment(registration("order-1")).await,
        Err(RegistrationRequestError::Network(FetchError::Network(_)))
    ));
}
