pub mod diagnostics;
pub mod repository;

pub use diagnostics::{tracing_sink, DiagnosticSink, MemorySink, Severity, TracingSink};
pub use repository::{InMemoryScoreRepository, JsonFileScoreRepository, ScoreRecord, ScoreRepository};
