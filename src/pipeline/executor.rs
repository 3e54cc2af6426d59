use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::event::EventMsg;
use crate::pipeline::processors::EventProcessor;
use crate::pipeline::registry::ProcessorRegistry;
use crate::pipeline::{PipelineReceiver, PipelineSender};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs every event through an ordered chain of initialized processors.
#[derive(Clone)]
pub struct PipelineExecutor {
    processors: Vec<Arc<dyn EventProcessor>>,
}

impl PipelineExecutor {
    pub fn new(config: &AppConfig, registry: &ProcessorRegistry) -> Result<Self> {
        let mut processors: Vec<Arc<dyn EventProcessor>> = Vec::new();

        for (idx, processor_config) in config.processors.iter().enumerate() {
            let processor =
                registry.build(&processor_config.kind, &processor_config.options_value())?;
            debug!("Processor {} is {}", idx, processor_config.kind);
            processors.push(Arc::from(processor));
        }

        Ok(Self { processors })
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Apply every processor in order, in place.
    pub fn process(&self, event: &mut EventMsg) {
        for processor in &self.processors {
            processor.apply(Some(&mut *event));
        }
    }

    pub async fn run(self, mut receiver: PipelineReceiver, sender: PipelineSender) {
        info!("Pipeline executor started with {} processors", self.processors.len());

        while let Some(mut event) = receiver.recv().await {
            debug!("Received event: name={}, timestamp={}", event.name, event.timestamp);

            self.process(&mut event);

            if sender.send(event).await.is_err() {
                warn!("Output channel closed, stopping pipeline executor");
                break;
            }
        }

        info!("Pipeline executor stopped");
    }
}
