use super::{decode_options, DiscardSink, EventProcessor, PatternSet, TraceSink, TracingSink};
use crate::error::Result;
use crate::pipeline::event::{EventMsg, Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const DELETE_PROCESSOR_TYPE: &str = "event_delete";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeleteConfig {
    pub tags: Vec<String>,
    pub values: Vec<String>,
    pub tag_names: Vec<String>,
    pub value_names: Vec<String>,
    pub debug: bool,
}

/// `event_delete`: drops tags and values selected by regular expressions.
///
/// Options:
/// - `tags`: patterns tested against tag values
/// - `values`: patterns tested against string values
/// - `tag_names`: patterns tested against tag keys
/// - `value_names`: patterns tested against value keys
/// - `debug`: trace every match
#[derive(Debug)]
pub struct DeleteProcessor {
    tags: PatternSet,
    values: PatternSet,
    tag_names: PatternSet,
    value_names: PatternSet,
    debug_sink: Option<Arc<dyn TraceSink>>,
    sink: Arc<dyn TraceSink>,
}

impl Default for DeleteProcessor {
    fn default() -> Self {
        Self {
            tags: PatternSet::default(),
            values: PatternSet::default(),
            tag_names: PatternSet::default(),
            value_names: PatternSet::default(),
            debug_sink: None,
            sink: Arc::new(DiscardSink),
        }
    }
}

impl DeleteProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `sink` instead of `tracing` when `debug` is enabled.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    /// Records every pattern in `set` that matches `text` and reports whether any did.
    fn check(&self, set: &PatternSet, key: &str, text: &str) -> bool {
        let mut matched = false;
        for re in set.matches(text) {
            self.sink.record(
                DELETE_PROCESSOR_TYPE,
                key,
                &format!("key '{}' matched regex '{}'", key, re.as_str()),
            );
            matched = true;
        }
        matched
    }

    fn value_selected(&self, key: &str, value: &Value) -> bool {
        let by_name = self.check(&self.value_names, key, key);
        let by_value = match value {
            Value::String(s) => self.check(&self.values, key, s),
            _ => false,
        };
        by_name || by_value
    }

    fn tag_selected(&self, key: &str, value: &str) -> bool {
        let by_name = self.check(&self.tag_names, key, key);
        let by_value = self.check(&self.tags, key, value);
        by_name || by_value
    }
}

impl EventProcessor for DeleteProcessor {
    fn init(&mut self, options: &JsonValue) -> Result<()> {
        let config: DeleteConfig = decode_options(DELETE_PROCESSOR_TYPE, options)?;

        let tags = PatternSet::compile(&config.tags)?;
        let values = PatternSet::compile(&config.values)?;
        let tag_names = PatternSet::compile(&config.tag_names)?;
        let value_names = PatternSet::compile(&config.value_names)?;

        self.tags = tags;
        self.values = values;
        self.tag_names = tag_names;
        self.value_names = value_names;
        self.sink = if config.debug {
            self.debug_sink
                .clone()
                .unwrap_or_else(|| Arc::new(TracingSink))
        } else {
            Arc::new(DiscardSink)
        };

        tracing::debug!(
            tags = self.tags.len(),
            values = self.values.len(),
            tag_names = self.tag_names.len(),
            value_names = self.value_names.len(),
            "Initialized {} processor",
            DELETE_PROCESSOR_TYPE
        );
        Ok(())
    }

    fn apply(&self, event: Option<&mut EventMsg>) {
        let Some(event) = event else {
            return;
        };

        // Collect first, remove after: the maps are never mutated while walked.
        let doomed_values: Vec<String> = event
            .values
            .iter()
            .filter(|(k, v)| self.value_selected(k, v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed_values {
            event.values.remove(&key);
        }

        let doomed_tags: Vec<String> = event
            .tags
            .iter()
            .filter(|(k, v)| self.tag_selected(k, v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed_tags {
            event.tags.remove(&key);
        }
    }
}
