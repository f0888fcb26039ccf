//! Timezone utility plugin.
//!
//! Always attached to chat requests so the model can answer "what
//! time is it in X" without file context.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use gcore::{Plugin, Tool};
use serde_json::{Value, json};

/// Time lookups and conversions across IANA timezones.
#[derive(Default)]
pub struct TimezonePlugin;

impl TimezonePlugin {
    /// Create the plugin.
    pub fn new() -> Self {
        Self
    }
}

fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow::anyhow!("unknown timezone '{name}', expected an IANA name"))
}

fn arg<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing required argument '{name}'"))
}

#[async_trait]
impl Plugin for TimezonePlugin {
    fn name(&self) -> &str {
        "timezone"
    }

    fn description(&self) -> &str {
        "Current time and time conversion across timezones"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "get_current_time".into(),
                description: "Get the current time in a timezone".into(),
                parameters: schemars::json_schema!({
                    "type": "object",
                    "properties": {
                        "timezone": {
                            "type": "string",
                            "description": "IANA timezone name, e.g. Europe/Berlin",
                            "default": "UTC"
                        }
                    },
                    "required": []
                }),
                strict: false,
            },
            Tool {
                name: "convert_time".into(),
                description: "Convert an RFC 3339 timestamp to another timezone".into(),
                parameters: schemars::json_schema!({
                    "type": "object",
                    "properties": {
                        "time": {
                            "type": "string",
                            "description": "RFC 3339 timestamp to convert"
                        },
                        "to": {
                            "type": "string",
                            "description": "Target IANA timezone name"
                        }
                    },
                    "required": ["time", "to"]
                }),
                strict: false,
            },
        ]
    }

    fn system_prompt(&self) -> Option<String> {
        Some("Timezone tools are available for current-time lookups and conversions.".to_string())
    }

    fn auto_include(&self) -> bool {
        true
    }

    async fn execute(&self, function: &str, args: Value) -> Result<Value> {
        match function {
            "get_current_time" => {
                let name = args
                    .get("timezone")
                    .and_then(Value::as_str)
                    .unwrap_or("UTC");
                let tz = parse_tz(name)?;
                let now = Utc::now().with_timezone(&tz);
                Ok(json!({
                    "timezone": name,
                    "time": now.to_rfc3339(),
                }))
            }
            "convert_time" => {
                let time = arg(&args, "time")?;
                let to = parse_tz(arg(&args, "to")?)?;
                let parsed = DateTime::parse_from_rfc3339(time)
                    .map_err(|e| anyhow::anyhow!("invalid RFC 3339 timestamp '{time}': {e}"))?;
                Ok(json!({
                    "timezone": arg(&args, "to")?,
                    "time": parsed.with_timezone(&to).to_rfc3339(),
                }))
            }
            other => anyhow::bail!("unknown function '{other}'"),
        }
    }
}
