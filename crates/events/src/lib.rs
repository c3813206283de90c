//! Domain event contract shared by the cart and order aggregates, plus the
//! trace hook the application services call after applying events.

pub mod event;
pub mod trace;

pub use event::Event;
pub use trace::trace_applied;
