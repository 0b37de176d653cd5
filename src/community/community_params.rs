use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityParams {
    /// number of seed species created at bootstrap
    pub species_count: usize,
    /// creatures spawned into each seed species
    pub species_size: usize,
    /// chance that an offspring mutates and founds a new species
    pub mutation_probability: f64,
    /// fixes the random stream when set
    pub seed: Option<u64>,
}

impl CommunityParams {
    pub fn new() -> CommunityParams {
        CommunityParams {
            species_count: 5,
            species_size: 5,
            mutation_probability: 0.1,
            seed: None,
        }
    }

    pub fn get_test_params() -> CommunityParams {
        CommunityParams {
            species_count: 2,
            species_size: 3,
            mutation_probability: 0.1,
            seed: Some(42),
        }
    }
}

impl Default for CommunityParams {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismParams {
    pub max_health: f32,
    pub health_cap: f32,
    pub health_leak: f32,
    pub food_health: f32,
    pub adult_age: f32,
    /// fraction of `adult_age` a well fed juvenile gains per meal
    pub maturity_boost: f32,
    pub jump_factor: f32,
}

impl OrganismParams {
    pub fn new() -> OrganismParams {
        OrganismParams {
            max_health: 100.0,
            health_cap: 200.0,
            health_leak: 0.25,
            food_health: 50.0,
            adult_age: 10.0,
            maturity_boost: 0.2,
            jump_factor: 180.0,
        }
    }
}

impl Default for OrganismParams {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaParams {
    /// side length of the square ground, centred on the origin
    pub ground_size: f32,
    pub spawn_height: f32,
}

impl ArenaParams {
    pub fn new() -> ArenaParams {
        ArenaParams {
            ground_size: 30.0,
            spawn_height: 0.4,
        }
    }
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self::new()
    }
}
