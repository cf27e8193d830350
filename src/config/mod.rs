pub mod traits;
pub mod evolution;
pub mod simulator;
pub mod files;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use simulator::SimulatorConfig;
pub use files::FilesConfig;
