use crate::{Event, EventEnvelope};

/// A projection folds the store's change stream into view state.
///
/// Dashboard panels that need history (an activity feed, a change counter)
/// implement this; panels that only need current values read the store
/// directly after being notified.
///
/// `apply` must not fail. An envelope the projection does not care about is
/// ignored. Ordering checks live in `ProjectionRunner`.
pub trait Projection {
    type Ev: Event;

    /// Apply a single envelope, updating the view state.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);
}
