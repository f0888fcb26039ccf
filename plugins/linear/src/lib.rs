//! Linear utility plugin.
//!
//! Issue lookups against the Linear GraphQL API. Like the GitHub
//! plugin, it registers without a token and fails informatively at
//! execute time.

use anyhow::Result;
use async_trait::async_trait;
use gcore::{Plugin, Tool};
use reqwest::{Client, header};
use serde_json::{Value, json};

const API_URL: &str = "https://api.linear.app/graphql";

/// Issue search and lookup in a Linear workspace.
pub struct LinearPlugin {
    client: Client,
    token: Option<String>,
}

impl LinearPlugin {
    /// Create the plugin. `token` may be absent.
    pub fn new(client: Client, token: Option<String>) -> Self {
        let token = token.filter(|t| !t.is_empty());
        Self { client, token }
    }

    /// Whether a token is configured.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Linear plugin is not configured (missing token)"))?;

        let response = self
            .client
            .post(API_URL)
            .header(header::AUTHORIZATION, token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Linear API returned {status}");
        }
        let body: Value = response.json().await?;
        if let Some(errors) = body.get("errors") {
            anyhow::bail!("Linear API error: {errors}");
        }
        Ok(body["data"].clone())
    }
}

fn arg<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing required argument '{name}'"))
}

#[async_trait]
impl Plugin for LinearPlugin {
    fn name(&self) -> &str {
        "linear"
    }

    fn description(&self) -> &str {
        "Search and read issues in a Linear workspace"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "search_issues".into(),
                description: "Full-text search over issues".into(),
                parameters: schemars::json_schema!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Search text" }
                    },
                    "required": ["query"]
                }),
                strict: false,
            },
            Tool {
                name: "get_issue".into(),
                description: "A single issue by identifier".into(),
                parameters: schemars::json_schema!({
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Issue identifier, e.g. ENG-123" }
                    },
                    "required": ["id"]
                }),
                strict: false,
            },
        ]
    }

    fn system_prompt(&self) -> Option<String> {
        if self.is_configured() {
            Some("Linear tools are available for issue search and lookup.".to_string())
        } else {
            Some(
                "Linear tools are declared but not configured; calls will fail until a \
                 token is provided."
                    .to_string(),
            )
        }
    }

    fn auto_include(&self) -> bool {
        true
    }

    async fn execute(&self, function: &str, args: Value) -> Result<Value> {
        match function {
            "search_issues" => {
                let query = arg(&args, "query")?;
                let data = self
                    .graphql(
                        "query($term: String!) { searchIssues(term: $term) { \
                         nodes { identifier title state { name } } } }",
                        json!({ "term": query }),
                    )
                    .await?;
                Ok(json!({ "issues": data["searchIssues"]["nodes"] }))
            }
            "get_issue" => {
                let id = arg(&args, "id")?;
                let data = self
                    .graphql(
                        "query($id: String!) { issue(id: $id) { \
                         identifier title description state { name } assignee { name } } }",
                        json!({ "id": id }),
                    )
                    .await?;
                Ok(data["issue"].clone())
            }
            other => anyhow::bail!("unknown function '{other}'"),
        }
    }
}
