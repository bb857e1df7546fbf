use std::time::Duration;

/// Any failure to get the message accepted by the provider.
///
/// None of the variants carry the request URL, since it embeds the bot token.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("unable to build HTTP client: {0}")]
    Client(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("unexpected server response: {status}{}", describe(.description))]
    Status {
        status: u16,
        description: Option<String>,
    },

    #[error("message rejected by provider{}", describe(.description))]
    Rejected { description: Option<String> },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

fn describe(description: &Option<String>) -> String {
    match description {
        Some(d) => format!(" ({})", d),
        None => String::new(),
    }
}

impl DeliveryFailure {
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            return Self::Timeout(timeout);
        }

        let e = e.without_url();

        if e.is_builder() {
            Self::Client(e.to_string())
        } else if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Network(error_chain(&e))
        }
    }
}

// reqwest's top-level message is just "error sending request"; the cause is further down.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
