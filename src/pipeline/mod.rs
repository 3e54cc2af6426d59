pub mod event;
pub mod executor;
pub mod io;
pub mod processors;
pub mod registry;

use tokio::sync::mpsc;
use event::EventMsg;

pub type PipelineSender = mpsc::Sender<EventMsg>;
pub type PipelineReceiver = mpsc::Receiver<EventMsg>;

pub fn create_pipeline_channel(buffer_size: usize) -> (PipelineSender, PipelineReceiver) {
    mpsc::channel(buffer_size)
}
