//! Deciding when to hit the network and what to show when it fails.

mod connectivity;
mod orchestrator;
mod timer;

pub use connectivity::{spawn_probe, Connectivity};
pub use orchestrator::{ArticleOrigin, CycleOutcome, SyncOrchestrator, SyncState, Trigger};
pub use timer::RefreshTimer;
