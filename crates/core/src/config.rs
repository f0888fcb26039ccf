//! Configuration for a chat completion request.

use crate::{Tool, ToolChoice};
use serde::{Deserialize, Serialize};

/// LLM configuration.
pub trait Config: From<General> + Sized + Clone {
    /// Create a new configuration with tools.
    fn with_tools(self, tools: Vec<Tool>) -> Self;

    /// Create a new configuration with tool choice.
    ///
    /// This should be used at the per-message level.
    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self;
}

/// General chat configuration, convertible into any provider request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct General {
    /// The model to use.
    pub model: String,

    /// The tools to use.
    #[serde(skip)]
    pub tools: Option<Vec<Tool>>,

    /// Controls which tool the model may call.
    #[serde(skip)]
    pub tool_choice: Option<ToolChoice>,

    /// Whether to return usage information in stream mode.
    pub usage: bool,
}

impl General {
    /// Create a new configuration.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            tools: None,
            tool_choice: None,
            usage: false,
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for General {
    fn default() -> Self {
        Self::new("gpt-4o-mini")
    }
}

impl Config for General {
    fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }

    fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }
}
