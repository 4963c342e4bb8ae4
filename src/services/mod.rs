pub mod batch;
pub mod capability;
pub mod fallback;
pub mod ingest;
pub mod orchestrator;
pub mod report;
pub mod settings;

pub use batch::BatchProcessor;
pub use capability::CapabilityRegistry;
pub use orchestrator::AnalysisOrchestrator;
pub use settings::AiSettings;
