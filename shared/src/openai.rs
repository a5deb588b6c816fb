use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::{manifest_schema, GeneratedManifest, PromptStats, WrappedError};

pub const FUNCTION_NAME: &str = "renderVideo";
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_DIRECTIVE: &str = "You are Github Video Maker, a tool that turns a developer's year in code into a compelling narrative video. \
The video must feel personal: build it from their real activity and highlight what made their year special. \
The viewer should feel seen and valued, and get a nostalgic moment of review. You do not need to cover everything; \
focus on the few elements that made this year stand out. \
Build a story arc over time with a clear beginning, middle and end. \
When choosing colors, commit to one aesthetically pleasing palette of complementary colors that are not aggressively different. \
Videos must always have exactly 12 scenes.";

/// The generative step, behind a seam so the compiler can run against a
/// deterministic fixture.
#[async_trait]
pub trait SceneGenerator: Send + Sync {
    async fn generate(&self, stats: &PromptStats) -> Result<GeneratedManifest, WrappedError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("model", &self.model)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String, url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            url,
        }
    }

    fn request_body(&self, stats: &PromptStats) -> anyhow::Result<serde_json::Value> {
        let today = chrono::Utc::now().date_naive();
        let messages = [
            ChatMessage {
                role: "system",
                content: format!("{SYSTEM_DIRECTIVE}\nToday's date (UTC) is {today}."),
            },
            ChatMessage {
                role: "user",
                content: format!("The GitHub stats are as follows: {}", stats.to_json()?),
            },
        ];

        Ok(json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages,
            "tools": [{
                "type": "function",
                "function": {
                    "name": FUNCTION_NAME,
                    "description": "Should always be used to properly format output",
                    "parameters": manifest_schema(),
                },
            }],
            "tool_choice": { "type": "function", "function": { "name": FUNCTION_NAME } },
        }))
    }

    async fn call(&self, stats: &PromptStats) -> anyhow::Result<String> {
        let body = self.request_body(stats)?;
        let response: ChatResponse = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        extract_arguments(response)
    }
}

fn extract_arguments(response: ChatResponse) -> anyhow::Result<String> {
    response
        .choices
        .into_iter()
        .flat_map(|choice| choice.message.tool_calls.unwrap_or_default())
        .find(|call| call.function.name == FUNCTION_NAME)
        .map(|call| call.function.arguments)
        .ok_or_else(|| anyhow::anyhow!("Model did not call {FUNCTION_NAME}"))
}

#[async_trait]
impl SceneGenerator for OpenAiGenerator {
    #[instrument(skip(self, stats), fields(user = %stats.stats().username, model = %self.model))]
    async fn generate(&self, stats: &PromptStats) -> Result<GeneratedManifest, WrappedError> {
        let arguments = self
            .call(stats)
            .await
            .map_err(|e| WrappedError::CompilationFailed(format!("{e:#}")))?;
        debug!("Received {} bytes of function arguments", arguments.len());

        Ok(GeneratedManifest::from_json(&arguments)?)
    }
}
