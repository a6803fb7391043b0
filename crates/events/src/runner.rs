//! Projection runner utilities.
//!
//! Tracks the last applied sequence number so a view never folds the same
//! change twice or out of order.

use thiserror::Error;

use crate::{EventEnvelope, Projection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("non-monotonic sequence number (last={last}, found={found})")]
    NonMonotonicSequence { last: u64, found: u64 },
}

/// Runs envelopes through a projection and tracks progress.
#[derive(Debug)]
pub struct ProjectionRunner<P>
where
    P: Projection,
{
    projection: P,
    last_sequence_number: Option<u64>,
}

impl<P> ProjectionRunner<P>
where
    P: Projection,
{
    pub fn new(projection: P) -> Self {
        Self {
            projection,
            last_sequence_number: None,
        }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn into_projection(self) -> P {
        self.projection
    }

    /// Sequence number of the last applied envelope (if any).
    pub fn last_sequence_number(&self) -> Option<u64> {
        self.last_sequence_number
    }

    /// Apply a single envelope, enforcing monotonic sequencing.
    pub fn apply(&mut self, envelope: &EventEnvelope<P::Ev>) -> Result<(), ProjectionError> {
        let found = envelope.sequence_number();

        if let Some(last) = self.last_sequence_number {
            if found <= last {
                return Err(ProjectionError::NonMonotonicSequence { last, found });
            }
        }

        self.projection.apply(envelope);
        self.last_sequence_number = Some(found);
        Ok(())
    }

    /// Apply many envelopes in order.
    pub fn run<'a>(
        &mut self,
        envelopes: impl IntoIterator<Item = &'a EventEnvelope<P::Ev>>,
    ) -> Result<(), ProjectionError>
    where
        P::Ev: 'a,
    {
        for env in envelopes {
            self.apply(env)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use robodepot_core::EntityKind;
    use uuid::Uuid;

    use super::*;
    use crate::Event;

    #[derive(Debug, Clone)]
    struct Ping;

    impl Event for Ping {
        fn event_type(&self) -> &'static str {
            "test.ping"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }
    }

    #[derive(Debug, Default)]
    struct Counter(u32);

    impl Projection for Counter {
        type Ev = Ping;

        fn apply(&mut self, _envelope: &EventEnvelope<Ping>) {
            self.0 += 1;
        }
    }

    fn envelope(seq: u64) -> EventEnvelope<Ping> {
        EventEnvelope::new(Uuid::now_v7(), EntityKind::Robot, "R1", seq, Ping)
    }

    #[test]
    fn applies_increasing_sequence_numbers() {
        let mut runner = ProjectionRunner::new(Counter::default());
        let envs = [envelope(1), envelope(2), envelope(5)];

        runner.run(envs.iter()).unwrap();

        assert_eq!(runner.projection().0, 3);
        assert_eq!(runner.last_sequence_number(), Some(5));
    }

    #[test]
    fn rejects_replayed_envelope_without_applying_it() {
        let mut runner = ProjectionRunner::new(Counter::default());
        runner.apply(&envelope(2)).unwrap();

        let err = runner.apply(&envelope(2)).unwrap_err();

        assert_eq!(err, ProjectionError::NonMonotonicSequence { last: 2, found: 2 });
        assert_eq!(runner.into_projection().0, 1);
    }
}
