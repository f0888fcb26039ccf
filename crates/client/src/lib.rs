//! Client library for the gridchat gateway.
//!
//! Opens chat requests against the HTTP API in both modes: a blocking
//! JSON round trip, and an SSE stream parsed back into typed
//! [`StreamEvent`]s with an [`AbortHandle`] for mid-stream
//! cancellation.

use anyhow::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use gcore::{AbortHandle, FileInfo};
use protocol::{ChatRequest, ChatResponse, StreamEvent, sse::EventParser};
use reqwest::{Client, header};

/// A client for one gridchat gateway.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// The gateway base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a chat request and wait for the complete response.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("chat request failed ({status}): {body}");
        }
        response.json().await.map_err(Into::into)
    }

    /// Send a chat request and stream the response events.
    ///
    /// Returns an abort handle alongside the stream; aborting stops
    /// consumption and drops the underlying transfer. The stream ends
    /// after the terminal `done`/`error` event.
    pub fn stream(
        &self,
        request: &ChatRequest,
    ) -> (AbortHandle, impl Stream<Item = Result<StreamEvent>> + Send + use<>) {
        let abort = AbortHandle::new();
        let handle = abort.clone();
        let builder = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header(header::ACCEPT, "text/event-stream")
            .json(request);

        let stream = try_stream! {
            let response = builder.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow::anyhow!("chat request failed ({status}): {body}"))?;
            } else {
                let mut parser = EventParser::new();
                let mut bytes = response.bytes_stream();
                while let Some(chunk) = bytes.next().await {
                    if abort.is_aborted() {
                        tracing::debug!("chat stream aborted by caller");
                        break;
                    }
                    for event in parser.push(&chunk?) {
                        let terminal =
                            matches!(event, StreamEvent::Done { .. } | StreamEvent::Error { .. });
                        yield event;
                        if terminal {
                            return;
                        }
                    }
                }
            }
        };

        (handle, stream)
    }

    /// Upload a text file to the gateway.
    pub async fn upload(&self, filename: &str, content: &str) -> Result<FileInfo> {
        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .json(&serde_json::json!({ "filename": filename, "content": content }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("upload failed ({status})");
        }
        response.json().await.map_err(Into::into)
    }

    /// List uploaded files.
    pub async fn files(&self) -> Result<Vec<FileInfo>> {
        let response = self
            .client
            .get(format!("{}/files", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        response.json().await.map_err(Into::into)
    }

    /// Fetch the text content of an uploaded file.
    pub async fn file_content(&self, id: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/files/{id}/content", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        response.text().await.map_err(Into::into)
    }

    /// Delete an uploaded file.
    pub async fn delete_file(&self, id: &str) -> Result<()> {
        self.client
            .delete(format!("{}/files/{id}", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
