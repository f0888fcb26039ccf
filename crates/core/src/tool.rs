//! Tool abstractions shared with the completion API.

use compact_str::CompactString;
use schemars::Schema;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

/// A single callable function handed to the completion API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tool {
    /// The name of the function.
    pub name: CompactString,

    /// The description of the function.
    pub description: String,

    /// The parameters of the function (JSON-schema object).
    pub parameters: Schema,

    /// Whether to strictly validate the parameters.
    pub strict: bool,
}

/// A tool call made by the model.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolCall {
    /// The ID of the tool call. May arrive after the first streamed
    /// fragment; a call without an id is not dispatchable.
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub id: CompactString,

    /// The index of the tool call within a single model turn (used to
    /// correlate streamed fragments before the id is known).
    #[serde(default, skip_serializing)]
    pub index: u32,

    /// The type of tool (currently only "function").
    #[serde(default, rename = "type")]
    pub call_type: String,

    /// The function to call.
    pub function: FunctionCall,
}

impl ToolCall {
    /// Merge a streamed fragment into this call.
    ///
    /// Scalar fields are overwritten when the fragment carries them;
    /// the argument string is append-only across fragments.
    pub fn merge(&mut self, call: &Self) {
        if !call.id.is_empty() {
            self.id.clone_from(&call.id);
        }
        if !call.call_type.is_empty() {
            self.call_type.clone_from(&call.call_type);
        }
        if !call.function.name.is_empty() {
            self.function.name.clone_from(&call.function.name);
        }
        self.function.arguments.push_str(&call.function.arguments);
    }

    /// Parse the accumulated argument string.
    ///
    /// Invalid or empty JSON yields an empty object so dispatch can
    /// proceed and the plugin reports its own missing-argument error.
    pub fn parsed_arguments(&self) -> serde_json::Value {
        match serde_json::from_str(&self.function.arguments) {
            Ok(value) => value,
            Err(_) => {
                if !self.function.arguments.is_empty() {
                    tracing::debug!(
                        "tool call {} has malformed arguments, using empty object",
                        self.function.name
                    );
                }
                serde_json::Value::Object(serde_json::Map::new())
            }
        }
    }
}

/// A function call within a tool call.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FunctionCall {
    /// The name of the function to call.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// The arguments to pass to the function (JSON string, accumulated
    /// by concatenation across stream deltas).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
}

/// Controls which tool is called by the model.
#[derive(Debug, Clone, Default)]
pub enum ToolChoice {
    /// Model will not call any tool.
    None,

    /// Model can pick between generating a message or calling tools.
    #[default]
    Auto,

    /// Model must call one or more tools.
    Required,

    /// Model must call the named function.
    Function(CompactString),
}

impl Serialize for ToolChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_str("none"),
            Self::Auto => serializer.serialize_str("auto"),
            Self::Required => serializer.serialize_str("required"),
            Self::Function(name) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "function")?;
                map.serialize_entry("function", &serde_json::json!({ "name": name }))?;
                map.end()
            }
        }
    }
}

impl From<&str> for ToolChoice {
    fn from(value: &str) -> Self {
        ToolChoice::Function(value.into())
    }
}
