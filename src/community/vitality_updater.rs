use crossbeam::channel::unbounded;
use tracing::warn;

use super::organism::{Organism, Vitality};
use crate::concurrency::Execute;

// Ticks a batch of organisms, possibly in parallel depending on the executor
// `T`. Each organism is moved into its own task and comes back through the
// channel tagged with its position in the batch, so callers get results in
// the order they handed organisms in and can apply deaths from one thread.
pub struct VitalityUpdater<T>
where
    T: Execute,
{
    executor: T,
}

impl<T> VitalityUpdater<T>
where
    T: Execute,
{
    pub fn new(executor: T) -> Self {
        Self { executor }
    }

    // Blocks until every task has reported back or been dropped. A task that
    // never runs to completion leaves its organism out of the result.
    pub fn tick_all(&self, organisms: Vec<Organism>, dt: f32) -> Vec<(Organism, Vitality)> {
        let count = organisms.len();
        // one channel per batch, the receiver stops once every task's sender is gone
        let (sender, receiver) = unbounded();
        organisms.into_iter().enumerate().for_each(|(i, mut org)| {
            let sender = sender.clone();
            self.executor.execute(move || {
                let vitality = org.tick(dt);
                if sender.send((i, org, vitality)).is_err() {
                    warn!(slot = i, "tick result had nowhere to go");
                }
            });
        });
        drop(sender);

        let mut slots: Vec<Option<(Organism, Vitality)>> = (0..count).map(|_| None).collect();
        for (i, org, vitality) in receiver.iter() {
            slots[i] = Some((org, vitality));
        }

        let ticked: Vec<_> = slots.into_iter().flatten().collect();
        if ticked.len() < count {
            warn!(lost = count - ticked.len(), "organisms lost while ticking");
        }
        ticked
    }
}
