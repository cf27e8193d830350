use super::evolution_engine::ProgressCallback;
use super::history::GenerationRecord;
use std::sync::mpsc::Sender;

/// Reports progress through the `log` facade
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressCallback {
    prefix: String,
}

impl ConsoleProgressCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("{}Generation {} starting...", self.prefix, generation);
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        log::info!(
            "{}Generation {}: {} event {}, proposed fitness {:.6}, system fitness {:.6}",
            self.prefix,
            record.generation,
            record.event_type,
            record.status.as_str(),
            record.proposed_fitness,
            record.accepted_fitness
        );
    }
}

// For handing progress to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationRecord),
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(record.clone()));
    }
}
