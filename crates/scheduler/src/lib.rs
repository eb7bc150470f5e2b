//! System scheduler.
//!
//! Systems are plain closures over a context type `C`, registered under a
//! name with an update phase and a run condition. The scheduler owns the
//! play/pause state the conditions are evaluated against.
//!
//! # Invariants
//! - Systems of one phase run in registration order.
//! - A disabled system never runs.

mod scheduler;

pub use scheduler::{Condition, Phase, Scheduler, SystemFn, SystemInfo};
