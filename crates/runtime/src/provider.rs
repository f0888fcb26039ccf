//! OpenAI-compatible HTTP completion provider.

use anyhow::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use gcore::{General, LLM, Message, Response, StreamChunk, Tool};
use reqwest::{
    Client, Method,
    header::{self, HeaderMap},
};
use serde::Serialize;
use serde_json::{Value, json};

/// A chat-completion client for any OpenAI-compatible endpoint.
///
/// Holds only credentials and configuration; safe to clone and share
/// across concurrent requests.
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpProvider {
    /// Create a provider using bearer-token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: impl Into<String>) -> Result<Self> {
        let mut headers = base_headers()?;
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.into(),
        })
    }

    /// Create a provider without authentication (e.g. a local server).
    pub fn no_auth(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            headers: base_headers().expect("static headers are valid"),
            endpoint: endpoint.into(),
        }
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The completion endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn base_headers() -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
    headers.insert(header::ACCEPT, "application/json".parse()?);
    Ok(headers)
}

impl LLM for HttpProvider {
    type ChatConfig = General;

    async fn send(&self, config: &General, messages: &[Message]) -> Result<Response> {
        let body = Request::from(config.clone()).messages(messages);
        tracing::debug!("request: {}", serde_json::to_string(&body)?);

        let response = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("response ({status}): {text}");
        if !status.is_success() {
            anyhow::bail!("completion API returned {status}: {text}");
        }
        serde_json::from_str(&text).map_err(Into::into)
    }

    fn stream(
        &self,
        config: General,
        messages: &[Message],
        usage: bool,
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let body = Request::from(config).messages(messages).stream(usage);
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        try_stream! {
            let response = request.send().await?;
            let status = response.status();
            tracing::debug!("completion API responded with status {status}");
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                Err(anyhow::anyhow!("completion API returned {status}: {text}"))?;
            } else {
                let mut inner = response.bytes_stream();
                let mut buffer = String::new();
                while let Some(bytes) = inner.next().await {
                    let bytes = match bytes {
                        Ok(b) => b,
                        Err(e) => {
                            tracing::error!("completion stream transport error: {e:?}");
                            Err(e)?
                        }
                    };
                    buffer.push_str(&String::from_utf8_lossy(&bytes));

                    // Frames may split across network chunks; only consume
                    // up to the last complete frame.
                    while let Some(pos) = buffer.find("\n\n") {
                        let frame: String = buffer.drain(..pos + 2).collect();
                        for line in frame.lines() {
                            let Some(data) = line.strip_prefix("data:") else {
                                continue;
                            };
                            let data = data.trim_start();
                            if data.is_empty() || data == "[DONE]" {
                                continue;
                            }
                            match serde_json::from_str::<StreamChunk>(data) {
                                Ok(chunk) => yield chunk,
                                Err(e) => tracing::warn!("failed to parse chunk: {e}, data: {data}"),
                            }
                        }
                    }
                }
                tracing::debug!("completion stream closed");
            }
        }
    }
}

/// The request body for OpenAI-compatible chat-completion endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model to use.
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<Message>,

    /// The tools the model may call, in wire shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,

    /// Controls which tool is called by the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,

    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Stream options (usage reporting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<Value>,
}

impl Request {
    /// Set the conversation messages.
    pub fn messages(mut self, messages: &[Message]) -> Self {
        self.messages = messages.to_vec();
        self
    }

    /// Enable streaming for the request.
    pub fn stream(mut self, usage: bool) -> Self {
        self.stream = Some(true);
        self.stream_options = usage.then(|| json!({ "include_usage": true }));
        self
    }
}

impl From<General> for Request {
    fn from(config: General) -> Self {
        Self {
            model: config.model,
            messages: Vec::new(),
            tools: config.tools.as_deref().map(serialize_tools),
            tool_choice: config
                .tool_choice
                .as_ref()
                .and_then(|c| serde_json::to_value(c).ok()),
            stream: None,
            stream_options: None,
        }
    }
}

/// Serialize tools into the `{"type": "function", "function": ...}` wire shape.
fn serialize_tools(tools: &[Tool]) -> Value {
    tools
        .iter()
        .map(|tool| json!({ "type": "function", "function": tool }))
        .collect()
}
