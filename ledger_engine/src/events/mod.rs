//! Post-commit notifications.
//!
//! The ledger APIs publish an event after each successful atomic unit. Subscribers (notification senders, audit
//! trails and the like) register async hooks in [`EventHooks`]. Events are only ever published after the commit, so a
//! subscriber never sees a change that was rolled back.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
