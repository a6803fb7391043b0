//! Change notification mechanics for the domain store.
//!
//! Events describe completed mutations; envelopes add ordering metadata; the bus
//! fans envelopes out to observers; projections fold them into view state.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod projection;
pub mod runner;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use projection::Projection;
pub use runner::{ProjectionError, ProjectionRunner};
