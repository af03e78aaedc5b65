//! Hosted assistants API client
//!
//! Direct HTTP client for the OpenAI assistants API, which hosts the Tax
//! Provider agent. Provisioning uploads the knowledge-source file, creates an
//! assistant with the retrieval tool and that file attached, and opens a
//! conversation thread. A chat round trip posts the user message, starts a
//! run, polls it to a terminal state, and reads the newest assistant message.
//!
//! All requests carry a bounded timeout; a run that never settles surfaces as
//! an error instead of hanging.

use anyhow::{bail, Context, Result};
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::core::Credential;

use super::handle::AgentBinding;
use super::profile::AssistantProfile;
use super::provider::{AssistantClient, ChatReply};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(800);
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 150;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct CreateAssistantRequest<'a> {
    name: &'a str,
    instructions: String,
    model: &'a str,
    tools: Vec<ToolSpec>,
    file_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    tool_type: &'static str,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ObjectId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunStatus {
    id: String,
    status: String,
    #[serde(default)]
    last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
struct RunError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    role: String,
    content: Vec<Value>,
}

// ============================================================================
// OpenAiAssistantClient
// ============================================================================

/// HTTP client for the hosted assistants service
pub struct OpenAiAssistantClient {
    client: Client,
    api_base: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl OpenAiAssistantClient {
    /// Create a client against the default API base
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        })
    }

    /// Create a client from environment variables
    ///
    /// Reads `OPENAI_API_BASE` (optional) to override the API base, e.g. for
    /// a proxy deployment.
    pub fn from_env() -> Result<Self> {
        let mut client = Self::new()?;
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            tracing::info!("Using API base override: {}", base);
            client.api_base = base;
        }
        Ok(client)
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the run polling cadence
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the maximum number of run polls before giving up
    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Check the response status and parse the JSON body
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response body", what))?;

        tracing::debug!("[assistants] {} response: {} - {}", what, status, body);

        if !status.is_success() {
            bail!("assistants API error on {} ({}): {}", what, status, body);
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse {} response", what))
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(credential.expose())
            .header("OpenAI-Beta", "assistants=v1")
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;

        Self::parse_response(response, what).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        credential: &Credential,
        path_and_query: &str,
        what: &str,
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(path_and_query))
            .bearer_auth(credential.expose())
            .header("OpenAI-Beta", "assistants=v1")
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;

        Self::parse_response(response, what).await
    }

    /// Upload the knowledge-source file for assistant retrieval
    async fn upload_file(&self, credential: &Credential, file_path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read knowledge source: {:?}", file_path))?;
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("knowledge.txt")
            .to_string();

        tracing::info!(
            "[assistants] Uploading knowledge source '{}' ({} bytes)",
            file_name,
            bytes.len()
        );

        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.url("/files"))
            .bearer_auth(credential.expose())
            .header("OpenAI-Beta", "assistants=v1")
            .multipart(form)
            .send()
            .await
            .context("Failed to send file upload request")?;

        let uploaded: ObjectId = Self::parse_response(response, "file upload").await?;
        Ok(uploaded.id)
    }

    /// Poll a run until it reaches a terminal state
    async fn wait_for_run(
        &self,
        credential: &Credential,
        thread_id: &str,
        run_id: &str,
    ) -> Result<()> {
        for attempt in 0..self.max_poll_attempts {
            let run: RunStatus = self
                .get_json(
                    credential,
                    &format!("/threads/{}/runs/{}", thread_id, run_id),
                    "run poll",
                )
                .await?;

            tracing::debug!(
                "[assistants] Run {} status '{}' (attempt {})",
                run.id,
                run.status,
                attempt + 1
            );

            match run.status.as_str() {
                "completed" => return Ok(()),
                "queued" | "in_progress" | "cancelling" => {
                    tokio::time::sleep(self.poll_interval).await;
                }
                "failed" | "cancelled" | "expired" | "requires_action" => {
                    let detail = run
                        .last_error
                        .map(|e| format!(" ({}: {})", e.code, e.message))
                        .unwrap_or_default();
                    bail!("run {} ended with status '{}'{}", run.id, run.status, detail);
                }
                other => bail!("run {} reported unknown status '{}'", run.id, other),
            }
        }

        bail!(
            "run {} did not complete within {} polls",
            run_id,
            self.max_poll_attempts
        )
    }

    /// Read the newest assistant message on the thread
    async fn latest_assistant_reply(
        &self,
        credential: &Credential,
        thread_id: &str,
    ) -> Result<ChatReply> {
        let list: MessageList = self
            .get_json(
                credential,
                &format!("/threads/{}/messages?order=desc&limit=1", thread_id),
                "message list",
            )
            .await?;

        let message = list
            .data
            .into_iter()
            .next()
            .context("thread has no messages after run completion")?;

        if message.role != "assistant" {
            bail!("newest thread message is from '{}', not the assistant", message.role);
        }

        // Text content blocks carry the reply; anything else is handed to the
        // controller as a structured payload to normalize.
        let text: Vec<&str> = message
            .content
            .iter()
            .filter_map(|block| block.pointer("/text/value").and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            let payload = message.content.into_iter().next().unwrap_or(Value::Null);
            return Ok(ChatReply::Structured(payload));
        }

        Ok(ChatReply::Text(text.join("")))
    }
}

#[async_trait::async_trait]
impl AssistantClient for OpenAiAssistantClient {
    async fn create_agent(
        &self,
        credential: &Credential,
        profile: &AssistantProfile,
        knowledge_file: &Path,
    ) -> Result<AgentBinding> {
        let file_id = self.upload_file(credential, knowledge_file).await?;

        let assistant: ObjectId = self
            .post_json(
                credential,
                "/assistants",
                &CreateAssistantRequest {
                    name: &profile.name,
                    instructions: profile.combined_instructions(),
                    model: &profile.model,
                    tools: vec![ToolSpec {
                        tool_type: "retrieval",
                    }],
                    file_ids: vec![file_id.clone()],
                },
                "assistant create",
            )
            .await?;

        let thread: ObjectId = self
            .post_json(
                credential,
                "/threads",
                &serde_json::json!({}),
                "thread create",
            )
            .await?;

        tracing::info!(
            "[assistants] Created assistant {} on thread {}",
            assistant.id,
            thread.id
        );

        Ok(AgentBinding {
            assistant_id: assistant.id,
            thread_id: thread.id,
            knowledge_file_id: file_id,
        })
    }

    async fn chat(
        &self,
        credential: &Credential,
        binding: &AgentBinding,
        text: &str,
    ) -> Result<ChatReply> {
        let _message: ObjectId = self
            .post_json(
                credential,
                &format!("/threads/{}/messages", binding.thread_id),
                &CreateMessageRequest {
                    role: "user",
                    content: text,
                },
                "message create",
            )
            .await?;

        let run: RunStatus = self
            .post_json(
                credential,
                &format!("/threads/{}/runs", binding.thread_id),
                &CreateRunRequest {
                    assistant_id: &binding.assistant_id,
                },
                "run create",
            )
            .await?;

        self.wait_for_run(credential, &binding.thread_id, &run.id)
            .await?;

        self.latest_assistant_reply(credential, &binding.thread_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenAiAssistantClient {
        OpenAiAssistantClient::new()
            .unwrap()
            .with_api_base(server.uri())
            .with_poll_interval(Duration::from_millis(5))
            .with_max_poll_attempts(5)
    }

    fn rates_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "wrench,hardware,5%,2%").unwrap();
        file
    }

    fn binding() -> AgentBinding {
        AgentBinding {
            assistant_id: "asst_abc".to_string(),
            thread_id: "thread_abc".to_string(),
            knowledge_file_id: "file_abc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_agent_uploads_then_creates_assistant_and_thread() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/files"))
            .and(header("Authorization", "Bearer sk-valid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file_abc" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/assistants"))
            .and(body_partial_json(json!({
                "name": "Tax Provider",
                "tools": [{ "type": "retrieval" }],
                "file_ids": ["file_abc"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "asst_abc" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "thread_abc" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let file = rates_file();

        let binding = client
            .create_agent(
                &"sk-valid".into(),
                &AssistantProfile::tax_provider(),
                file.path(),
            )
            .await
            .unwrap();

        assert_eq!(binding.assistant_id, "asst_abc");
        assert_eq!(binding.thread_id, "thread_abc");
        assert_eq!(binding.knowledge_file_id, "file_abc");
    }

    #[tokio::test]
    async fn test_create_agent_surfaces_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({
                    "error": { "message": "Incorrect API key provided" }
                })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let file = rates_file();

        let err = client
            .create_agent(
                &"sk-bad".into(),
                &AssistantProfile::tax_provider(),
                file.path(),
            )
            .await
            .unwrap_err();

        let rendered = format!("{:#}", err);
        assert!(rendered.contains("401"), "unexpected error: {}", rendered);
        assert!(rendered.contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn test_chat_posts_message_runs_and_reads_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/messages"))
            .and(body_partial_json(json!({ "role": "user", "content": "wrench" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/runs"))
            .and(body_partial_json(json!({ "assistant_id": "asst_abc" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "queued" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/threads/thread_abc/runs/run_1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "completed" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/threads/thread_abc/messages"))
            .and(query_param("order", "desc"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "role": "assistant",
                    "content": [{
                        "type": "text",
                        "text": { "value": "wrench: 5% import, 2% local (category: hardware)" }
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let reply = client
            .chat(&"sk-valid".into(), &binding(), "wrench")
            .await
            .unwrap();

        assert_eq!(
            reply.into_text().unwrap(),
            "wrench: 5% import, 2% local (category: hardware)"
        );
    }

    #[tokio::test]
    async fn test_chat_fails_when_run_fails() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/runs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "queued" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/threads/thread_abc/runs/run_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "run_1",
                "status": "failed",
                "last_error": { "code": "rate_limit_exceeded", "message": "slow down" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .chat(&"sk-valid".into(), &binding(), "wrench")
            .await
            .unwrap_err();

        let rendered = format!("{:#}", err);
        assert!(rendered.contains("failed"));
        assert!(rendered.contains("rate_limit_exceeded"));
    }

    #[tokio::test]
    async fn test_chat_times_out_when_run_never_settles() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/runs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "queued" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/threads/thread_abc/runs/run_1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "in_progress" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .chat(&"sk-valid".into(), &binding(), "wrench")
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("did not complete"));
    }

    #[tokio::test]
    async fn test_chat_returns_structured_reply_when_no_text_block() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/threads/thread_abc/runs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "completed" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/threads/thread_abc/runs/run_1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "run_1", "status": "completed" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/threads/thread_abc/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "role": "assistant",
                    "content": [{ "type": "image_file", "image_file": { "file_id": "file_img" } }]
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let reply = client
            .chat(&"sk-valid".into(), &binding(), "wrench")
            .await
            .unwrap();

        assert!(matches!(reply, ChatReply::Structured(_)));
    }
}
