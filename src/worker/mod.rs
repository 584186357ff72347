//! The polling side of the bot.
//!
//! # Module Structure
//!
//! - [`effects`]: Executes review-service effects with cancellation
//! - [`poll`]: Poll interval configuration
//! - [`poster`]: Posts (or, in dry-run mode, logs) the re-run request
//! - [`check`]: Evaluates one tracked change
//! - [`scheduler`]: The resolve / evaluate / wait state machine

mod check;
mod effects;
mod poll;
mod poster;
mod scheduler;

pub use check::{CheckError, CheckOutcome, check_change};
pub use effects::{EffectError, EffectExecutor};
pub use poll::{POLL_INTERVAL_ENV, PollConfig};
pub use poster::{PostOutcome, ReviewPoster};
pub use scheduler::{
    DoneReason, PassReport, PollScheduler, RunSummary, SchedulerState, after_pass,
};
