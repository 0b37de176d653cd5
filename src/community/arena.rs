use std::collections::BTreeMap;

use glam::Vec3;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::community::community_params::{ArenaParams, OrganismParams};
use crate::community::genome::Genome;
use crate::community::organism::{CreatureId, Organism};
use crate::community::World;

/// Headless world: holds the live organisms and hands out ids.
///
/// Organisms are kept ordered by id so iteration, and with it the order in
/// which a step reports deaths, is deterministic.
pub struct Arena {
    organisms: BTreeMap<CreatureId, Organism>,
    next_id: u64,
    params: ArenaParams,
    organism_params: OrganismParams,
    rng: StdRng,
}

impl Arena {
    pub fn new(params: ArenaParams, organism_params: OrganismParams, seed: Option<u64>) -> Arena {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Arena {
            organisms: BTreeMap::new(),
            next_id: 0,
            params,
            organism_params,
            rng,
        }
    }

    pub fn despawn(&mut self, id: CreatureId) -> Option<Organism> {
        self.organisms.remove(&id)
    }

    pub fn get(&self, id: CreatureId) -> Option<&Organism> {
        self.organisms.get(&id)
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Organism> {
        self.organisms.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.values()
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    // hands every organism out, in id order, so they can be ticked elsewhere
    pub fn take_all(&mut self) -> Vec<Organism> {
        std::mem::take(&mut self.organisms).into_values().collect()
    }

    pub fn restore(&mut self, organisms: impl IntoIterator<Item = Organism>) {
        for organism in organisms {
            self.organisms.insert(organism.id, organism);
        }
    }
}

impl World for Arena {
    fn spawn_creature(&mut self, position: Vec3, genome: Genome) -> CreatureId {
        let id = CreatureId(self.next_id);
        self.next_id += 1;

        let organism = Organism::new(id, position, genome, self.organism_params);
        self.organisms.insert(id, organism);
        id
    }

    fn scatter_position(&mut self) -> Vec3 {
        let half = self.params.ground_size / 2.0;
        Vec3::new(
            self.rng.gen_range(-half..=half),
            self.params.spawn_height,
            self.rng.gen_range(-half..=half),
        )
    }

    fn creature(&self, id: CreatureId) -> Option<&Organism> {
        self.organisms.get(&id)
    }
}
