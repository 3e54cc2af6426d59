use std::fmt;

/// Receives a note for every match or conversion a processor performs.
pub trait TraceSink: Send + Sync + fmt::Debug {
    fn record(&self, processor: &str, key: &str, message: &str);
}

/// Drops every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl TraceSink for DiscardSink {
    fn record(&self, _processor: &str, _key: &str, _message: &str) {}
}

/// Forwards entries to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, processor: &str, key: &str, message: &str) {
        tracing::debug!(processor, key, "{}", message);
    }
}
