//! Subscription worker error types.

/// Errors that end one broker session.
///
/// Every variant is caught at the reconnect loop and answered with capped
/// exponential backoff; none are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    /// HTTP request to an identity provider failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Identity provider returned an error status
    #[error("auth error {status}: {message}")]
    Auth { status: u16, message: String },

    /// Identity provider response was missing an expected field
    #[error("auth decode error: {0}")]
    AuthDecode(String),

    /// MQTT client operation failed
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// MQTT connection dropped or was rejected
    #[error("MQTT connection error: {0}")]
    Connection(#[from] rumqttc::ConnectionError),
}
