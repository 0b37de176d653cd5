pub mod arena;
pub mod community_params;
pub mod genome;
pub mod organism;
pub mod species;
pub mod vitality_updater;

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Bernoulli;
use thiserror::Error;
use tracing::{debug, info};

use crate::community::community_params::CommunityParams;
use crate::community::genome::Genome;
use crate::community::organism::{CreatureId, Organism};
use crate::community::species::{Species, SpeciesId};

#[derive(Debug, Error, PartialEq)]
pub enum PopulationError {
    #[error("{0} is not a living member of any species")]
    UnknownCreature(CreatureId),
    #[error("{0} is not in the registry")]
    UnknownSpecies(SpeciesId),
    #[error("mutation probability must lie in [0, 1], got {0}")]
    InvalidMutationProbability(f64),
}

pub type PopulationResult<T> = Result<T, PopulationError>;

/// The spawning side of the world, as the community sees it.
pub trait World {
    fn spawn_creature(&mut self, position: Vec3, genome: Genome) -> CreatureId;

    /// A random free spot to drop a bootstrap creature on.
    fn scatter_position(&mut self) -> Vec3;

    fn creature(&self, id: CreatureId) -> Option<&Organism>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Birth {
    pub offspring: CreatureId,
    pub species: SpeciesId,
    /// the offspring mutated and founded `species`
    pub speciated: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Death {
    pub creature: CreatureId,
    pub species: SpeciesId,
    /// the creature was the last of `species`, which is now gone
    pub extinct: bool,
}

/// Read-only population overview for display.
#[derive(Debug)]
pub struct Summary<'a> {
    pub total_population: usize,
    pub species_count: usize,
    pub best_species: Option<&'a Species>,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Population size: {}", self.total_population)?;
        writeln!(f, "Species count: {}", self.species_count)?;
        if let Some(best) = self.best_species {
            writeln!(f, "BEST GENOME")?;
            write!(f, "{}", best.representative())?;
        }
        Ok(())
    }
}

/// Registry of every living species and of which species each creature is in.
///
/// All membership changes go through here, so a creature is recorded in at
/// most one species and an emptied species never stays registered.
pub struct Community {
    // creation order, the best species tie-break depends on it
    species: Vec<Species>,
    index: HashMap<CreatureId, SpeciesId>,
    next_species: usize,
    speciation: Bernoulli,
    rng: StdRng,
    params: CommunityParams,
}

impl Community {
    pub fn new(params: CommunityParams) -> PopulationResult<Community> {
        let speciation = Self::speciation_roll(params.mutation_probability)?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Community {
            species: Vec::new(),
            index: HashMap::new(),
            next_species: 0,
            speciation,
            rng,
            params,
        })
    }

    fn speciation_roll(probability: f64) -> PopulationResult<Bernoulli> {
        Bernoulli::new(probability)
            .map_err(|_| PopulationError::InvalidMutationProbability(probability))
    }

    pub fn set_mutation_probability(&mut self, probability: f64) -> PopulationResult<()> {
        self.speciation = Self::speciation_roll(probability)?;
        self.params.mutation_probability = probability;
        Ok(())
    }

    /// Seeds `species_count` random species with `species_size` scattered
    /// creatures each, every creature carrying a copy of its species' genome.
    /// A seed species that ends up with no creatures is never registered.
    pub fn bootstrap<W: World + ?Sized>(&mut self, world: &mut W) {
        for _ in 0..self.params.species_count {
            let id = self.next_species_id();
            let mut species = Species::seed(id, &mut self.rng);

            for _ in 0..self.params.species_size {
                let position = world.scatter_position();
                let creature = world.spawn_creature(position, species.representative().clone());
                species.add_member(creature);
                self.index.insert(creature, id);
            }

            if !species.is_extinct() {
                self.species.push(species);
            }
        }

        info!(
            species = self.params.species_count,
            per_species = self.params.species_size,
            "bootstrapped population"
        );
    }

    /// Spawns an offspring of `parent` at the parent's position.
    ///
    /// The offspring starts as an exact copy of the parent's genome. One roll
    /// against the mutation probability decides its fate: on success the
    /// genome mutates and the offspring founds a brand new species, otherwise
    /// it joins the parent's species.
    pub fn reproduce<W: World + ?Sized>(
        &mut self,
        parent: CreatureId,
        world: &mut W,
    ) -> PopulationResult<Birth> {
        let parent_species = self
            .species_of(parent)
            .ok_or(PopulationError::UnknownCreature(parent))?;
        let (position, mut genome) = match world.creature(parent) {
            Some(organism) => (organism.position, organism.genome.clone()),
            None => return Err(PopulationError::UnknownCreature(parent)),
        };

        let speciated = self.speciation.sample(&mut self.rng);
        let birth = if speciated {
            genome.mutate(&mut self.rng);
            let snapshot = genome.clone();
            let offspring = world.spawn_creature(position, genome);

            let id = self.next_species_id();
            self.species.push(Species::founded_by(id, offspring, &snapshot));
            self.index.insert(offspring, id);
            info!(%parent, %offspring, species = %id, genome = %snapshot, "new species founded");

            Birth {
                offspring,
                species: id,
                speciated,
            }
        } else {
            let offspring = world.spawn_creature(position, genome);
            self.add_member(parent_species, offspring)?;
            debug!(%parent, %offspring, species = %parent_species, "offspring born");

            Birth {
                offspring,
                species: parent_species,
                speciated,
            }
        };

        self.refresh();
        Ok(birth)
    }

    /// Removes a dead creature from its species, retiring the species if it
    /// was the last member.
    pub fn report_death(&mut self, creature: CreatureId) -> PopulationResult<Death> {
        let species = self
            .index
            .remove(&creature)
            .ok_or(PopulationError::UnknownCreature(creature))?;
        let extinct = self.detach(creature, species);
        debug!(%creature, %species, "creature died");

        self.refresh();
        Ok(Death {
            creature,
            species,
            extinct,
        })
    }

    /// Records `creature` as a member of `species`, first taking it out of
    /// whatever species it was recorded in before.
    pub fn add_member(&mut self, species: SpeciesId, creature: CreatureId) -> PopulationResult<()> {
        if !self.species.iter().any(|s| s.id() == species) {
            return Err(PopulationError::UnknownSpecies(species));
        }

        match self.index.insert(creature, species) {
            Some(previous) if previous == species => return Ok(()),
            Some(previous) => {
                self.detach(creature, previous);
            }
            None => {}
        }

        if let Some(target) = self.species.iter_mut().find(|s| s.id() == species) {
            target.add_member(creature);
        }
        Ok(())
    }

    // drops creature from species, returns true if that made it extinct
    fn detach(&mut self, creature: CreatureId, species: SpeciesId) -> bool {
        let Some(pos) = self.species.iter().position(|s| s.id() == species) else {
            return false;
        };

        self.species[pos].remove_member(creature);
        if !self.species[pos].is_extinct() {
            return false;
        }

        self.species.remove(pos);
        info!(%species, "species extinct");
        true
    }

    pub fn summarize(&self) -> Summary<'_> {
        let mut best: Option<&Species> = None;
        for species in &self.species {
            if best.map_or(true, |b| species.size() > b.size()) {
                best = Some(species);
            }
        }

        Summary {
            total_population: self.species.iter().map(Species::size).sum(),
            species_count: self.species.len(),
            best_species: best,
        }
    }

    // stands in for the display refresh after every population change
    fn refresh(&self) {
        let summary = self.summarize();
        debug!(
            population = summary.total_population,
            species = summary.species_count,
            best = ?summary.best_species.map(Species::id),
            "population summary"
        );
    }

    fn next_species_id(&mut self) -> SpeciesId {
        let id = SpeciesId(self.next_species);
        self.next_species += 1;
        id
    }

    pub fn species_of(&self, creature: CreatureId) -> Option<SpeciesId> {
        self.index.get(&creature).copied()
    }

    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        self.species.iter().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

}
