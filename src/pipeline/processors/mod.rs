pub mod coerce;
pub mod convert;
pub mod delete;
pub mod pattern;
pub mod trace;

use crate::error::{AppError, Result};
use crate::pipeline::event::EventMsg;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

pub use pattern::PatternSet;
pub use trace::{DiscardSink, TraceSink, TracingSink};

/// Trait for event processors
///
/// `init` is called exactly once before any `apply`. After a successful `init`
/// the processor is read-only, so one instance can be shared by several workers.
pub trait EventProcessor: Send + Sync {
    /// Decode the option record and compile everything `apply` needs.
    fn init(&mut self, options: &JsonValue) -> Result<()>;

    /// Transform the event in place. A missing event is left alone.
    fn apply(&self, event: Option<&mut EventMsg>);
}

/// Decode a processor option record. Unknown fields are ignored.
pub(crate) fn decode_options<T: DeserializeOwned>(kind: &str, options: &JsonValue) -> Result<T> {
    let options = if options.is_null() {
        JsonValue::Object(Default::default())
    } else {
        options.clone()
    };
    serde_json::from_value(options)
        .map_err(|e| AppError::Config(format!("Failed to parse {} configuration: {}", kind, e)))
}
