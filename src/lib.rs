//! Creatures with heritable traits, grouped into species by lineage.
//!
//! [`community`] holds the genetics and the population bookkeeping,
//! [`Simulation`] drives it headlessly.

/// Genes, organisms, species and the population registry
pub mod community;

/// Executors for ticking organisms off the main thread
pub mod concurrency;

use community::arena::Arena;
use community::community_params::{ArenaParams, CommunityParams, OrganismParams};
use community::organism::{CreatureId, FeedOutcome, Vitality};
use community::vitality_updater::VitalityUpdater;
use community::{Birth, Community, Death, PopulationError, Summary};
use concurrency::thread_pool::ThreadPool;
use concurrency::{ConcurrencyError, Execute};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use std::fs;
use std::path::Path;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read parameters from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed parameters: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error(transparent)]
    Population(#[from] PopulationError),
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// threads used to tick organisms, 0 ticks them on the caller
    pub worker_threads: usize,
    pub community: CommunityParams,
    pub organism: OrganismParams,
    pub arena: ArenaParams,
}

impl SimulationParams {
    pub fn get_test_params() -> SimulationParams {
        SimulationParams {
            worker_threads: 0,
            community: CommunityParams::get_test_params(),
            organism: OrganismParams::new(),
            arena: ArenaParams::new(),
        }
    }
}

/// Everything that happened during one [`Simulation::step`].
#[derive(Debug, Default)]
pub struct StepReport {
    pub deaths: Vec<Death>,
}

pub enum Executor {
    Inline(concurrency::Inline),
    Pool(ThreadPool),
}

impl Execute for Executor {
    fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Executor::Inline(inline) => inline.execute(f),
            Executor::Pool(pool) => pool.execute(f),
        }
    }
}

pub struct Simulation<E: Execute = Executor> {
    community: Community,
    arena: Arena,
    updater: VitalityUpdater<E>,
}

impl Simulation<Executor> {
    pub fn from_parameters(parameter_path: impl AsRef<Path>) -> Result<Self> {
        let params = Self::read_parameter_file(parameter_path.as_ref())?;
        Self::new(params)
    }

    /// Picks the executor from `worker_threads`.
    pub fn new(params: SimulationParams) -> Result<Self> {
        let executor = match params.worker_threads {
            0 => Executor::Inline(concurrency::Inline),
            n => Executor::Pool(ThreadPool::new(n)?),
        };
        Self::with_executor(params, executor)
    }

    fn read_parameter_file(path: &Path) -> Result<SimulationParams> {
        let yaml_string = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse_parameter_yaml(&yaml_string)
    }

    pub fn parse_parameter_yaml(fstring: &str) -> Result<SimulationParams> {
        let params: SimulationParams = serde_yml::from_str(fstring)?;
        Ok(params)
    }
}

impl<E: Execute> Simulation<E> {
    pub fn with_executor(params: SimulationParams, executor: E) -> Result<Self> {
        let mut community = Community::new(params.community.clone())?;
        // offset so the arena does not replay the community's random stream
        let arena_seed = params.community.seed.map(|seed| seed.wrapping_add(1));
        let mut arena = Arena::new(params.arena, params.organism, arena_seed);

        community.bootstrap(&mut arena);

        Ok(Simulation {
            community,
            arena,
            updater: VitalityUpdater::new(executor),
        })
    }

    /// Ages every organism by `dt` and buries the ones that starved.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let organisms = self.arena.take_all();
        let ticked = self.updater.tick_all(organisms, dt);

        let mut starved = Vec::new();
        let survivors = ticked.into_iter().filter_map(|(org, vitality)| match vitality {
            Vitality::Alive => Some(org),
            Vitality::Starved => {
                starved.push(org.id);
                None
            }
        });
        self.arena.restore(survivors.collect::<Vec<_>>());

        // deaths are applied one at a time, in id order
        let mut report = StepReport::default();
        for id in starved {
            match self.community.report_death(id) {
                Ok(death) => report.deaths.push(death),
                Err(e) => warn!(creature = %id, "starved creature was untracked: {e}"),
            }
        }

        if !report.deaths.is_empty() {
            debug!(deaths = report.deaths.len(), "step finished");
        }
        report
    }

    /// Feeds a creature; a well fed adult reproduces on the spot.
    ///
    /// Fails before touching the organism unless it is both alive in the
    /// arena and recorded in a species.
    pub fn feed(&mut self, creature: CreatureId) -> Result<(FeedOutcome, Option<Birth>)> {
        if self.community.species_of(creature).is_none() {
            return Err(PopulationError::UnknownCreature(creature).into());
        }
        let organism = self
            .arena
            .get_mut(creature)
            .ok_or(PopulationError::UnknownCreature(creature))?;

        let outcome = organism.feed();
        let birth = match outcome {
            FeedOutcome::Reproduce => Some(self.community.reproduce(creature, &mut self.arena)?),
            FeedOutcome::Matured | FeedOutcome::Nourished => None,
        };

        Ok((outcome, birth))
    }

    pub fn plan_jump(&mut self, creature: CreatureId, target: Option<Vec3>) -> Result<Option<Vec3>> {
        let organism = self
            .arena
            .get_mut(creature)
            .ok_or(PopulationError::UnknownCreature(creature))?;

        Ok(organism.plan_jump(target))
    }

    pub fn summary(&self) -> Summary<'_> {
        self.community.summarize()
    }

    /// Logs the current summary at info level.
    pub fn report(&self) {
        let summary = self.summary();
        info!(
            population = summary.total_population,
            species = summary.species_count,
            "\n{summary}"
        );
    }

    pub fn community(&self) -> &Community {
        &self.community
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parse_parameter_string() {
        let pstring = r#"
        worker_threads: 2

        community:
          species_count: 4
          species_size: 6
          mutation_probability: 0.25
          seed: 17

        organism:
          health_leak: 0.5
          adult_age: 8.0

        arena:
          ground_size: 40.0
        "#;

        let t: SimulationParams = Simulation::parse_parameter_yaml(pstring).unwrap();

        assert_eq!(t.worker_threads, 2);
        assert_eq!(t.community.mutation_probability, 0.25);
        assert_eq!(t.community.seed, Some(17));
        assert_eq!(t.organism.health_leak, 0.5);
        // unspecified fields keep their defaults
        assert_eq!(t.organism.max_health, 100.0);
        assert_eq!(t.arena.spawn_height, 0.4);
    }

    #[rstest]
    fn test_empty_parameters_are_defaults() {
        let t = Simulation::parse_parameter_yaml("{}").unwrap();
        assert_eq!(t, SimulationParams::default());
        assert_eq!(t.community.species_count, 5);
    }

    #[rstest]
    fn test_malformed_parameters() {
        let err = Simulation::parse_parameter_yaml("community: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[rstest]
    fn test_missing_parameter_file() {
        let err = Simulation::from_parameters("does/not/exist.yaml").err().unwrap();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[rstest]
    fn test_feed_adult_reproduces() {
        let mut sim = Simulation::new(SimulationParams::get_test_params()).unwrap();
        let creature = CreatureId(0);

        // first meal only ages the juvenile
        let (outcome, birth) = sim.feed(creature).unwrap();
        assert_eq!(outcome, FeedOutcome::Matured);
        assert!(birth.is_none());

        for _ in 0..100 {
            sim.step(0.1);
        }
        let (outcome, birth) = sim.feed(creature).unwrap();
        assert_eq!(outcome, FeedOutcome::Reproduce);
        assert!(birth.is_some());
        assert_eq!(sim.summary().total_population, 7);
        assert_eq!(sim.arena().len(), 7);
    }

    #[rstest]
    fn test_feed_untracked_creature_is_untouched() {
        let mut sim = Simulation::new(SimulationParams::get_test_params()).unwrap();
        let creature = CreatureId(0);
        // the arena still holds it but the community has already buried it
        sim.community.report_death(creature).unwrap();

        let err = sim.feed(creature).unwrap_err();

        assert!(matches!(
            err,
            Error::Population(PopulationError::UnknownCreature(CreatureId(0)))
        ));
        let organism = sim.arena().get(creature).unwrap();
        assert_eq!(organism.health, 100.0);
        assert_eq!(organism.age, 0.0);
    }

    #[rstest]
    fn test_feed_unknown_creature() {
        let mut sim = Simulation::new(SimulationParams::get_test_params()).unwrap();
        let err = sim.feed(CreatureId(1000)).unwrap_err();
        assert!(matches!(
            err,
            Error::Population(PopulationError::UnknownCreature(CreatureId(1000)))
        ));
    }
}
