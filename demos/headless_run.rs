use lineage::community::organism::CreatureId;
use lineage::Simulation;

use glam::Vec3;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> lineage::Result<()> {
    // default to info when RUST_LOG is not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut sim = Simulation::from_parameters("demos/parameters/headless_run.yaml")?;
    sim.report();

    // collisions live outside this crate, so meals are handed out at random
    let mut rng = StdRng::seed_from_u64(7);
    let dt = 0.1;
    let food_chance = 0.02;

    for step in 1..=3000 {
        sim.step(dt);

        let ids: Vec<CreatureId> = sim.arena().iter().map(|org| org.id).collect();
        if ids.is_empty() {
            info!(step, "population died out");
            break;
        }

        for id in ids {
            let food = Vec3::new(rng.gen_range(-15.0..15.0), 0.25, rng.gen_range(-15.0..15.0));
            sim.plan_jump(id, Some(food))?;

            if rng.gen_bool(food_chance) {
                sim.feed(id)?;
            }
        }

        if step % 500 == 0 {
            info!(step, "checkpoint");
            sim.report();
        }
    }

    sim.report();
    Ok(())
}
