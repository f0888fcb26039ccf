//! GitHub utility plugin.
//!
//! Registers with or without a token: an unconfigured plugin still
//! exposes its tool definitions (plus a not-configured prompt note)
//! and fails informatively at execute time.

use anyhow::Result;
use async_trait::async_trait;
use gcore::{Plugin, Tool};
use reqwest::{Client, header};
use serde_json::{Value, json};

const API_BASE: &str = "https://api.github.com";

/// Repository and issue lookups against the GitHub REST API.
pub struct GitHubPlugin {
    client: Client,
    token: Option<String>,
}

impl GitHubPlugin {
    /// Create the plugin. `token` may be absent.
    pub fn new(client: Client, token: Option<String>) -> Self {
        let token = token.filter(|t| !t.is_empty());
        Self { client, token }
    }

    /// Whether a token is configured.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn api_get(&self, path: &str) -> Result<Value> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("GitHub plugin is not configured (missing token)"))?;

        let response = self
            .client
            .get(format!("{API_BASE}{path}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::USER_AGENT, "gridchat")
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GitHub API returned {status} for {path}");
        }
        response.json().await.map_err(Into::into)
    }
}

fn arg<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing required argument '{name}'"))
}

fn repo_schema(extra_state: bool) -> schemars::Schema {
    if extra_state {
        schemars::json_schema!({
            "type": "object",
            "properties": {
                "owner": { "type": "string", "description": "Repository owner" },
                "repo": { "type": "string", "description": "Repository name" },
                "state": {
                    "type": "string",
                    "description": "Issue state filter: open, closed, or all",
                    "default": "open"
                }
            },
            "required": ["owner", "repo"]
        })
    } else {
        schemars::json_schema!({
            "type": "object",
            "properties": {
                "owner": { "type": "string", "description": "Repository owner" },
                "repo": { "type": "string", "description": "Repository name" }
            },
            "required": ["owner", "repo"]
        })
    }
}

#[async_trait]
impl Plugin for GitHubPlugin {
    fn name(&self) -> &str {
        "github"
    }

    fn description(&self) -> &str {
        "Look up GitHub repositories and issues"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "get_repository".into(),
                description: "Metadata for a repository".into(),
                parameters: repo_schema(false),
                strict: false,
            },
            Tool {
                name: "list_issues".into(),
                description: "Recent issues in a repository".into(),
                parameters: repo_schema(true),
                strict: false,
            },
        ]
    }

    fn system_prompt(&self) -> Option<String> {
        if self.is_configured() {
            Some("GitHub tools are available for repository and issue lookups.".to_string())
        } else {
            Some(
                "GitHub tools are declared but not configured; calls will fail until a \
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
            "get_repository" => {
                let owner = arg(&args, "owner")?;
                let repo = arg(&args, "repo")?;
                let body = self.api_get(&format!("/repos/{owner}/{repo}")).await?;
                Ok(json!({
                    "full_name": body["full_name"],
                    "description": body["description"],
                    "stars": body["stargazers_count"],
                    "open_issues": body["open_issues_count"],
                    "default_branch": body["default_branch"],
                }))
            }
            "list_issues" => {
                let owner = arg(&args, "owner")?;
                let repo = arg(&args, "repo")?;
                let state = args.get("state").and_then(Value::as_str).unwrap_or("open");
                let body = self
                    .api_get(&format!("/repos/{owner}/{repo}/issues?state={state}"))
                    .await?;
                let issues: Vec<Value> = body
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .map(|issue| {
                                json!({
                                    "number": issue["number"],
                                    "title": issue["title"],
                                    "state": issue["state"],
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(json!({ "issues": issues }))
            }
            other => anyhow::bail!("unknown function '{other}'"),
        }
    }
}
