use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use shared::protocol::{SupportReply, SupportRequest, WIDGET_HEADER, WIDGET_HEADER_VALUE};
use tracing::debug;
use url::Url;

use crate::error::SupportClientError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

pub const JSON_SENT_FALLBACK: &str = "Сообщение отправлено.";
pub const JSON_FAILED_FALLBACK: &str = "Ошибка отправки.";
pub const SENT_FALLBACK: &str = "Сообщение отправлено разработчикам сайта.";
pub const FAILED_FALLBACK: &str = "Не удалось отправить сообщение. Попробуйте снова.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Не удалось отправить сообщение. Проверьте подключение и попробуйте снова.";

#[async_trait]
pub trait SupportTransport: Send + Sync {
    async fn submit(&self, request: SupportRequest) -> Result<SupportReply, SupportClientError>;
}

/// The reply shown when the request never produced a usable response.
pub fn connectivity_failure() -> SupportReply {
    SupportReply::new(false, CONNECTIVITY_MESSAGE)
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Turns a received response into the reply shown to the user.
pub fn interpret_reply(
    status_ok: bool,
    content_type: &str,
    body: &[u8],
) -> Result<SupportReply, SupportClientError> {
    if !content_type.contains("application/json") {
        let message = if status_ok { SENT_FALLBACK } else { FAILED_FALLBACK };
        return Ok(SupportReply::new(status_ok, message));
    }

    let data: Value = serde_json::from_slice(body)?;
    let ok = truthy(data.get("ok"));
    let message = match data.get("message") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ if ok => JSON_SENT_FALLBACK.to_string(),
        _ => JSON_FAILED_FALLBACK.to_string(),
    };
    Ok(SupportReply::new(ok, message))
}

pub fn encode_form(request: &SupportRequest) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(request.form_fields())
        .finish()
}

#[derive(Debug, Clone)]
pub struct HttpSupportTransport {
    http: Client,
    base_url: Url,
}

impl HttpSupportTransport {
    pub fn new(base_url: &str) -> Result<Self, SupportClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SupportClientError> {
        let parsed = Url::parse(base_url).map_err(|source| SupportClientError::InvalidServerUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, request: &SupportRequest) -> Result<Url, SupportClientError> {
        self.base_url
            .join(request.path())
            .map_err(|source| SupportClientError::InvalidServerUrl {
                url: self.base_url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl SupportTransport for HttpSupportTransport {
    async fn submit(&self, request: SupportRequest) -> Result<SupportReply, SupportClientError> {
        let url = self.endpoint(&request)?;
        debug!(%url, "posting support request");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(WIDGET_HEADER, WIDGET_HEADER_VALUE)
            .body(encode_form(&request))
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes().await?;

        let reply = interpret_reply(status.is_success(), &content_type, &body)?;
        debug!(status = status.as_u16(), ok = reply.ok, "support reply received");
        Ok(reply)
    }
}
