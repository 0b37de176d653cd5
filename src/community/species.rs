use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::community::genome::Genome;
use crate::community::organism::CreatureId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub usize);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "species#{}", self.0)
    }
}

/// A lineage: a frozen founding genome plus the creatures currently alive in it.
#[derive(Debug, Clone)]
pub struct Species {
    id: SpeciesId,
    representative: Genome,
    members: Vec<CreatureId>,
}

impl Species {
    // seed species for bootstrap, nobody founded it
    pub fn seed<R: Rng + ?Sized>(id: SpeciesId, rng: &mut R) -> Species {
        Species {
            id,
            representative: Genome::seed(rng),
            members: Vec::new(),
        }
    }

    // snapshot the founder's genome now, later changes to the founder don't leak in
    pub fn founded_by(id: SpeciesId, founder: CreatureId, genome: &Genome) -> Species {
        Species {
            id,
            representative: genome.clone(),
            members: vec![founder],
        }
    }

    pub fn add_member(&mut self, creature: CreatureId) {
        if !self.contains(creature) {
            self.members.push(creature);
        }
    }

    // returns whether the creature was a member
    pub fn remove_member(&mut self, creature: CreatureId) -> bool {
        match self.members.iter().position(|&member| member == creature) {
            Some(i) => {
                self.members.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, creature: CreatureId) -> bool {
        self.members.contains(&creature)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.members.is_empty()
    }

    pub fn id(&self) -> SpeciesId {
        self.id
    }

    pub fn representative(&self) -> &Genome {
        &self.representative
    }

    pub fn members(&self) -> &[CreatureId] {
        &self.members
    }
}
