use thiserror::Error;

// Errors surfaced by the hotel search layer
#[derive(Error, Debug)]
pub enum HotelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status_code} - {message}")]
    ApiResponse { status_code: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for HotelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HotelError::Network(format!("request timed out: {}", err))
        } else {
            HotelError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HotelError {
    fn from(err: serde_json::Error) -> Self {
        HotelError::MalformedResponse(err.to_string())
    }
}

impl HotelError {
    // Provider-side failures, as opposed to a misconfigured client
    pub fn is_provider_error(&self) -> bool {
        !matches!(self, HotelError::Config(_))
    }
}
