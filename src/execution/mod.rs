// Execution module - drives reporter hosts from recorded runner events

pub mod events;
pub mod replay;

pub use events::{LifecycleEvent, RunInfoPayload};
pub use replay::{ReplaySummary, dispatch, replay};
