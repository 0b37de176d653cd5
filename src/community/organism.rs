use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::community::community_params::OrganismParams;
use crate::community::genome::{GeneKind, Genome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u64);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "creature#{}", self.0)
    }
}

/// Result of advancing an organism by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vitality {
    Alive,
    Starved,
}

/// What a meal did to an organism.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedOutcome {
    /// health went up but stayed under the reproduction threshold
    Nourished,
    /// a well fed juvenile ages faster instead of reproducing
    Matured,
    /// a well fed adult should produce an offspring
    Reproduce,
}

/// A live creature as the world holds it.
///
/// The species it belongs to is tracked by the community, not here.
#[derive(Clone, Debug)]
pub struct Organism {
    pub id: CreatureId,
    pub genome: Genome,
    pub position: Vec3,
    pub health: f32,
    pub age: f32,
    jump_timer: f32,
    params: OrganismParams,
}

impl Organism {
    pub fn new(id: CreatureId, position: Vec3, genome: Genome, params: OrganismParams) -> Organism {
        Organism {
            id,
            genome,
            position,
            health: params.max_health,
            age: 0.0,
            jump_timer: 0.0,
            params,
        }
    }

    // health leaks every tick regardless of dt, age and the jump timer follow dt
    pub fn tick(&mut self, dt: f32) -> Vitality {
        self.health -= self.params.health_leak;
        if !self.is_alive() {
            return Vitality::Starved;
        }

        self.age += dt;
        self.jump_timer -= dt;
        Vitality::Alive
    }

    pub fn feed(&mut self) -> FeedOutcome {
        self.health += self.params.food_health;
        if self.health <= self.params.max_health {
            return FeedOutcome::Nourished;
        }

        let outcome = if self.is_adult() {
            FeedOutcome::Reproduce
        } else {
            self.age += self.params.adult_age * self.params.maturity_boost;
            FeedOutcome::Matured
        };

        self.health = self.health.min(self.params.health_cap);
        outcome
    }

    /// Impulse toward (or away from) `target`, or `None` while cooling down.
    ///
    /// The horizontal direction is scaled by the food attraction gene so that
    /// negative attraction jumps away from food, the vertical component is
    /// fixed at one before the jump force gene scales the whole vector.
    /// Planning a jump restarts the cooldown from the jump cooldown gene.
    pub fn plan_jump(&mut self, target: Option<Vec3>) -> Option<Vec3> {
        if self.jump_timer > 0.0 {
            return None;
        }
        let target = target?;

        let attraction = self.genome.get(GeneKind::FoodAttraction);
        let mut impulse = (target - self.position).normalize_or_zero()
            * (0.5 * attraction.signum() + 0.5 * attraction);
        impulse.y = 1.0;
        impulse *= self.genome.get(GeneKind::JumpForce) * self.params.jump_factor;

        self.jump_timer += self.genome.get(GeneKind::JumpCooldown);
        Some(impulse)
    }

    pub fn is_adult(&self) -> bool {
        self.age >= self.params.adult_age
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn jump_timer(&self) -> f32 {
        self.jump_timer
    }
}
