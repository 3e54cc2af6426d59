use super::coerce::{coerce, TargetUnit};
use super::{decode_options, DiscardSink, EventProcessor, PatternSet, TraceSink, TracingSink};
use crate::error::{AppError, Result};
use crate::pipeline::event::EventMsg;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const CONVERT_PROCESSOR_TYPE: &str = "event_convert";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub values: Vec<String>,
    pub target_unit: Option<String>,
    pub debug: bool,
}

/// `event_convert`: coerces selected values to a single scalar kind.
///
/// Options:
/// - `values`: patterns tested against value keys
/// - `target_unit`: one of `int`, `uint`, `float`, `string`
/// - `debug`: trace every conversion and every value left as is
#[derive(Debug)]
pub struct ConvertProcessor {
    values: PatternSet,
    target: TargetUnit,
    debug_sink: Option<Arc<dyn TraceSink>>,
    sink: Arc<dyn TraceSink>,
}

impl Default for ConvertProcessor {
    fn default() -> Self {
        Self {
            values: PatternSet::default(),
            target: TargetUnit::String,
            debug_sink: None,
            sink: Arc::new(DiscardSink),
        }
    }
}

impl ConvertProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `sink` instead of `tracing` when `debug` is enabled.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    pub fn target_unit(&self) -> TargetUnit {
        self.target
    }
}

impl EventProcessor for ConvertProcessor {
    fn init(&mut self, options: &JsonValue) -> Result<()> {
        let config: ConvertConfig = decode_options(CONVERT_PROCESSOR_TYPE, options)?;

        let target = config
            .target_unit
            .as_deref()
            .ok_or_else(|| AppError::Config("target_unit is required".to_string()))?
            .parse::<TargetUnit>()?;
        let values = PatternSet::compile(&config.values)?;

        self.values = values;
        self.target = target;
        self.sink = if config.debug {
            self.debug_sink
                .clone()
                .unwrap_or_else(|| Arc::new(TracingSink))
        } else {
            Arc::new(DiscardSink)
        };

        tracing::debug!(
            values = self.values.len(),
            target_unit = %self.target,
            "Initialized {} processor",
            CONVERT_PROCESSOR_TYPE
        );
        Ok(())
    }

    fn apply(&self, event: Option<&mut EventMsg>) {
        let Some(event) = event else {
            return;
        };

        // Only entries are replaced here, never keys, so walking mutably is fine.
        for (key, value) in event.values.iter_mut() {
            if !self.values.is_match(key) {
                continue;
            }
            match coerce(value, self.target) {
                Some(converted) => {
                    self.sink.record(
                        CONVERT_PROCESSOR_TYPE,
                        key,
                        &format!("converted {} '{}' to {}", value.kind(), value, self.target),
                    );
                    *value = converted;
                }
                None => {
                    self.sink.record(
                        CONVERT_PROCESSOR_TYPE,
                        key,
                        &format!("left {} '{}' unchanged for {}", value.kind(), value, self.target),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::event::Value;
    use crate::pipeline::processors::trace::testing::MemorySink;
    use serde_json::json;

    fn processor(values: &[&str], target_unit: &str) -> ConvertProcessor {
        let mut p = ConvertProcessor::new();
        p.init(&json!({"values": values, "target_unit": target_unit}))
            .unwrap();
        p
    }

    fn run(p: &ConvertProcessor, key: &str, value: Value) -> Value {
        let mut event = EventMsg::new("sub", 1).with_value(key, value);
        p.apply(Some(&mut event));
        event.values.remove(key).unwrap()
    }

    #[test]
    fn test_none_event_is_noop() {
        let p = processor(&["^number"], "int");
        p.apply(None);
    }

    #[test]
    fn test_empty_values() {
        let p = processor(&["^number"], "int");
        let mut event = EventMsg::default();
        p.apply(Some(&mut event));
        assert_eq!(event, EventMsg::default());
    }

    #[test]
    fn test_int_convert() {
        let p = processor(&["^number*"], "int");
        assert_eq!(run(&p, "name", Value::Int(1)), Value::Int(1));
        assert_eq!(run(&p, "number", Value::from("100")), Value::Int(100));
        assert_eq!(run(&p, "number", Value::Int(100)), Value::Int(100));
        assert_eq!(run(&p, "number", Value::Uint(100)), Value::Int(100));
        assert_eq!(run(&p, "number", Value::Float(100.0)), Value::Int(100));
        assert_eq!(run(&p, "number", Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_uint_convert() {
        let p = processor(&["^name*"], "uint");
        assert_eq!(run(&p, "name_value_bytes", Value::from("42")), Value::Uint(42));
        assert_eq!(run(&p, "name_value_bytes", Value::Uint(42)), Value::Uint(42));
        assert_eq!(run(&p, "name_value_bytes", Value::Int(-42)), Value::Uint(0));
        assert_eq!(run(&p, "name_value_bytes", Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_float_convert() {
        let p = processor(&["^number*"], "float");
        assert_eq!(run(&p, "number", Value::from("1.1")), Value::Float(1.1));
        assert_eq!(run(&p, "number", Value::Uint(42)), Value::Float(42.0));
        assert_eq!(run(&p, "number", Value::Int(42)), Value::Float(42.0));
        assert_eq!(run(&p, "number", Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_string_convert() {
        let p = processor(&["id"], "string");
        assert_eq!(run(&p, "id", Value::Int(1)), Value::from("1"));
        assert_eq!(run(&p, "id", Value::Int(-1)), Value::from("-1"));
        assert_eq!(run(&p, "id", Value::from("-1")), Value::from("-1"));
    }

    #[test]
    fn test_unparsable_string_unchanged() {
        let p = processor(&["^number"], "int");
        assert_eq!(run(&p, "number", Value::from("n/a")), Value::from("n/a"));
    }

    #[test]
    fn test_tags_and_unmatched_values_untouched() {
        let p = processor(&["^number"], "int");
        let mut event = EventMsg::new("sub", 3)
            .with_tag("number", "name_tag")
            .with_value("number", "100")
            .with_value("other", "200");

        p.apply(Some(&mut event));

        assert_eq!(event.values["number"], Value::Int(100));
        assert_eq!(event.values["other"], Value::from("200"));
        assert_eq!(event.tags["number"], "name_tag");
    }

    #[test]
    fn test_convert_is_idempotent() {
        for unit in ["int", "uint", "float", "string"] {
            let p = processor(&[".*"], unit);
            let mut event = EventMsg::new("sub", 1)
                .with_value("a", "12")
                .with_value("b", -3i64)
                .with_value("c", 2.5)
                .with_value("d", false);

            p.apply(Some(&mut event));
            let once = event.clone();
            p.apply(Some(&mut event));

            assert_eq!(event, once, "target_unit {unit}");
        }
    }

    #[test]
    fn test_unknown_target_unit() {
        let mut p = ConvertProcessor::new();
        let err = p
            .init(&json!({"values": ["x"], "target_unit": "bytes"}))
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownTargetUnit(ref u) if u == "bytes"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_target_unit() {
        let mut p = ConvertProcessor::new();
        let err = p.init(&json!({"values": ["x"]})).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let mut p = ConvertProcessor::new();
        let err = p
            .init(&json!({"values": ["*x"], "target_unit": "int"}))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPattern { .. }));
        assert_eq!(p.target_unit(), TargetUnit::String);
    }

    #[test]
    fn test_debug_traces_conversions() {
        let sink = Arc::new(MemorySink::default());
        let mut p = ConvertProcessor::new().with_trace_sink(sink.clone());
        p.init(&json!({"values": ["^n"], "target_unit": "int", "debug": true}))
            .unwrap();

        let mut event = EventMsg::new("sub", 1)
            .with_value("n1", "5")
            .with_value("n2", true)
            .with_value("x", "9");
        p.apply(Some(&mut event));

        assert_eq!(sink.keys(), vec!["n1".to_string(), "n2".to_string()]);
        assert_eq!(event.values["n1"], Value::Int(5));
        assert_eq!(event.values["n2"], Value::Bool(true));
    }
}
