//! Expiry Module
//!
//! Timer-driven entry removal: a due-time-ordered ticket scheduler and
//! the background worker that drains it.

mod scheduler;
mod ticket;
mod worker;

// Re-export public types
pub use scheduler::ExpirationScheduler;
pub use ticket::ExpirationTicket;

pub(crate) use worker::spawn_expiration_worker;
