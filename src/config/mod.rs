use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::error::Result;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

/// One processor entry: its registered type name plus its own options.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessorConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl ProcessorConfig {
    pub fn new(kind: impl Into<String>, options: Value) -> Self {
        let options = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { kind: kind.into(), options }
    }

    pub fn options_value(&self) -> Value {
        Value::Object(self.options.clone())
    }
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        let config_path = std::env::var("CONFIGURATION_PATH")
            .unwrap_or_else(|_| "config/config.json".to_string());
        Self::from_file(&config_path)
    }
}

fn default_channel_buffer() -> usize {
    100
}
