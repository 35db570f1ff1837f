/// Error returned by any merchant backend call.
///
/// Transport agnostic: clients map their own transport failures onto these variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The backend answered with a non-success HTTP status.
    #[error("Bad status code {status_code}: {description}")]
    BadStatusCode {
        status_code: u16,
        description: String,
    },

    /// The request did not complete within the transport timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connectivity or any other transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The request body could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status code, if the failure came from a backend response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::BadStatusCode { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

/// Failure of a payment registration request.
///
/// Derived from a [`FetchError`] by inspecting the HTTP status; see the
/// `From<FetchError>` implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationRequestError {
    /// HTTP 400.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// HTTP 500.
    #[error("Server failure: {0}")]
    ServerFail(String),

    /// HTTP 503, the payment service provider behind the merchant failed.
    #[error("Downstream PSP error: {0}")]
    DownstreamPspError(String),

    /// Any other status, or no response at all.
    #[error("Network error: {0}")]
    Network(FetchError),
}

impl From<FetchError> for RegistrationRequestError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::BadStatusCode {
                status_code: 400,
                description,
            } => RegistrationRequestError::InvalidParameters(description),
            FetchError::BadStatusCode {
                status_code: 500,
                description,
            } => RegistrationRequestError::ServerFail(description),
            FetchError::BadStatusCode {
                status_code: 503,
                description,
            } => RegistrationRequestError::DownstreamPspError(description),
            other => RegistrationRequestError::Network(other),
        }
    }
}
