use crate::config::Config;
use crate::error::DeliveryFailure;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The one network operation the notifier needs.
pub trait Transport {
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, DeliveryFailure>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryFailure> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryFailure::from_reqwest(e, timeout))?;

        Ok(Self { client, timeout })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, DeliveryFailure> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| DeliveryFailure::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| DeliveryFailure::from_reqwest(e, self.timeout))?;

        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, PartialEq)]
pub struct SentMessage {
    pub message_id: Option<i64>,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
    result: Option<ApiMessage>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message_id: Option<i64>,
}

pub fn send_message_url(config: &Config) -> String {
    format!(
        "{}/bot{}/sendMessage",
        config.api_url.as_str().trim_end_matches('/'),
        config.bot_token.expose()
    )
}

pub fn send_message(
    transport: &dyn Transport,
    config: &Config,
    text: &str,
) -> Result<SentMessage, DeliveryFailure> {
    let body = json!({
        "chat_id": config.channel_id.expose(),
        "text": text
    });

    let response = transport.post_json(&send_message_url(config), &body)?;

    interpret_response(&response)
}

fn interpret_response(response: &HttpResponse) -> Result<SentMessage, DeliveryFailure> {
    let parsed = serde_json::from_str::<ApiResponse>(&response.body);

    if !(200..300).contains(&response.status) {
        return Err(DeliveryFailure::Status {
            status: response.status,
            description: parsed.ok().and_then(|r| r.description),
        });
    }

    let api_response = parsed.map_err(|e| DeliveryFailure::MalformedResponse(e.to_string()))?;

    if !api_response.ok {
        return Err(DeliveryFailure::Rejected {
            description: api_response.description,
        });
    }

    Ok(SentMessage {
        message_id: api_response.result.and_then(|m| m.message_id),
    })
}
