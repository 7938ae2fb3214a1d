//! Application layer of autotrans: the auto-translation session engine.

pub mod engine;
pub mod observer;

pub use engine::{
    BatchTranslator, EngineCollaborators, PendingTranslation, SessionEngine, TriggerConfig,
    VisibilityScanner,
};
pub use observer::TracingObserver;
