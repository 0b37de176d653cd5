use lineage::community::arena::Arena;
use lineage::community::community_params::{ArenaParams, CommunityParams, OrganismParams};
use lineage::community::genome::Genome;
use lineage::community::species::{Species, SpeciesId};
use lineage::community::{Community, World};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::*;

#[fixture]
fn arena() -> Arena {
    Arena::new(ArenaParams::new(), OrganismParams::new(), Some(5))
}

#[fixture]
fn two_by_three(mut arena: Arena) -> (Community, Arena) {
    let mut comm = Community::new(CommunityParams {
        species_count: 2,
        species_size: 3,
        mutation_probability: 0.1,
        seed: Some(1),
    })
    .unwrap();
    comm.bootstrap(&mut arena);
    (comm, arena)
}

#[rstest]
fn test_scenario(two_by_three: (Community, Arena)) {
    let (mut comm, mut arena) = two_by_three;
    let summary = comm.summarize();
    assert_eq!(summary.total_population, 6);
    assert_eq!(summary.species_count, 2);

    let species_a = comm.iter().next().map(Species::id).unwrap();
    let parent = comm.species(species_a).unwrap().members()[0];

    // roll below threshold never happens
    comm.set_mutation_probability(0.0).unwrap();
    let birth = comm.reproduce(parent, &mut arena).unwrap();
    assert!(!birth.speciated);
    assert_eq!(comm.species(species_a).unwrap().size(), 4);
    assert_eq!(comm.summarize().species_count, 2);
    assert_eq!(comm.summarize().total_population, 7);

    // roll always lands below threshold
    comm.set_mutation_probability(1.0).unwrap();
    let birth = comm.reproduce(parent, &mut arena).unwrap();
    assert!(birth.speciated);
    let species_c = birth.species;
    assert_eq!(comm.species(species_c).unwrap().size(), 1);
    assert_eq!(comm.species(species_a).unwrap().size(), 4);
    assert_eq!(comm.summarize().species_count, 3);
    assert_eq!(comm.summarize().total_population, 8);

    let doomed: Vec<_> = comm.species(species_a).unwrap().members().to_vec();
    for creature in doomed {
        comm.report_death(creature).unwrap();
        arena.despawn(creature);
    }

    assert!(comm.species(species_a).is_none());
    assert_eq!(comm.summarize().species_count, 2);
    assert_eq!(comm.summarize().total_population, 4);
    assert!(comm.species(species_c).is_some());
}

#[rstest]
fn test_extinction_drops_species_count(two_by_three: (Community, Arena)) {
    let (mut comm, mut arena) = two_by_three;
    comm.set_mutation_probability(1.0).unwrap();
    let parent = comm.iter().next().unwrap().members()[0];
    let birth = comm.reproduce(parent, &mut arena).unwrap();

    let before = comm.summarize().species_count;
    let death = comm.report_death(birth.offspring).unwrap();

    assert!(death.extinct);
    assert_eq!(comm.summarize().species_count, before - 1);
    assert!(comm.iter().all(|s| s.id() != birth.species));
}

#[rstest]
fn test_best_species_tie_break(mut arena: Arena) {
    let mut comm = Community::new(CommunityParams {
        species_count: 4,
        species_size: 1,
        ..CommunityParams::get_test_params()
    })
    .unwrap();
    comm.bootstrap(&mut arena);

    // top every seeded species up from one creature to its target size
    let ids: Vec<SpeciesId> = comm.iter().map(Species::id).collect();
    let mut rng = StdRng::seed_from_u64(3);
    for (id, size) in ids.iter().zip([3, 5, 5, 2]) {
        for _ in 1..size {
            let creature = arena.spawn_creature(Vec3::ZERO, Genome::seed(&mut rng));
            comm.add_member(*id, creature).unwrap();
        }
    }

    let best = comm.summarize().best_species.unwrap();
    assert_eq!(best.id(), ids[1]);
    assert_eq!(best.size(), 5);
}

#[rstest]
fn test_speciation_is_exclusive(two_by_three: (Community, Arena)) {
    let (mut comm, mut arena) = two_by_three;
    comm.set_mutation_probability(0.5).unwrap();

    for _ in 0..200 {
        let parent = comm.iter().next().unwrap().members()[0];
        let parent_species = comm.species_of(parent).unwrap();
        let parent_size = comm.species(parent_species).unwrap().size();
        let count = comm.len();

        let birth = comm.reproduce(parent, &mut arena).unwrap();
        let members = comm.iter().filter(|s| s.members().contains(&birth.offspring)).count();
        assert_eq!(members, 1);

        if birth.speciated {
            assert_eq!(comm.len(), count + 1);
            assert_eq!(comm.species(birth.species).unwrap().members(), &[birth.offspring]);
            assert_eq!(comm.species(parent_species).unwrap().size(), parent_size);
        } else {
            assert_eq!(comm.len(), count);
            assert_eq!(birth.species, parent_species);
            assert_eq!(comm.species(parent_species).unwrap().size(), parent_size + 1);
        }
    }
}

#[rstest]
fn test_empty_bootstrap_has_no_best_species(mut arena: Arena) {
    let mut comm = Community::new(CommunityParams {
        species_count: 3,
        species_size: 0,
        ..CommunityParams::get_test_params()
    })
    .unwrap();
    comm.bootstrap(&mut arena);

    let summary = comm.summarize();
    assert_eq!(summary.species_count, 0);
    assert!(summary.best_species.is_none());
    assert!(arena.is_empty());
}
