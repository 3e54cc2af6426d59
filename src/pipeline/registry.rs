use crate::error::{AppError, Result};
use crate::pipeline::processors::convert::{ConvertProcessor, CONVERT_PROCESSOR_TYPE};
use crate::pipeline::processors::delete::{DeleteProcessor, DELETE_PROCESSOR_TYPE};
use crate::pipeline::processors::EventProcessor;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Produces a fresh, uninitialized processor.
pub type ProcessorFactory = fn() -> Box<dyn EventProcessor>;

/// Maps processor type names to factories. Owned by the host and filled at startup.
#[derive(Default)]
pub struct ProcessorRegistry {
    factories: HashMap<String, ProcessorFactory>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every processor this crate ships.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(DELETE_PROCESSOR_TYPE.to_string(), || {
            Box::new(DeleteProcessor::new())
        });
        registry.factories.insert(CONVERT_PROCESSOR_TYPE.to_string(), || {
            Box::new(ConvertProcessor::new())
        });
        registry
    }

    pub fn register(&mut self, type_name: &str, factory: ProcessorFactory) -> Result<()> {
        if self.factories.contains_key(type_name) {
            return Err(AppError::DuplicateProcessor(type_name.to_string()));
        }
        self.factories.insert(type_name.to_string(), factory);
        Ok(())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// A fresh processor that still needs `init`.
    pub fn create(&self, type_name: &str) -> Result<Box<dyn EventProcessor>> {
        self.factories
            .get(type_name)
            .map(|factory| factory())
            .ok_or_else(|| AppError::UnknownProcessor(type_name.to_string()))
    }

    /// Create and initialize; a processor whose `init` failed is never handed out.
    pub fn build(&self, type_name: &str, options: &JsonValue) -> Result<Box<dyn EventProcessor>> {
        let mut processor = self.create(type_name)?;
        processor.init(options)?;
        tracing::info!("Initialized processor of type {}", type_name);
        Ok(processor)
    }
}
