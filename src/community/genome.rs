use std::fmt;
use std::str::FromStr;

use rand::prelude::*;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeneticsError {
    #[error("gene not found: {0}")]
    GeneNotFound(String),
}

/// The closed set of behavioural traits every genome carries.
///
/// Each kind owns its bounds and mutation step, so the canonical gene set is
/// a property of the type rather than of any one genome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeneKind {
    FoodAttraction,
    JumpCooldown,
    JumpForce,
}

impl GeneKind {
    pub const COUNT: usize = 3;

    /// Canonical ordering, also the storage order inside a genome.
    pub const ALL: [GeneKind; GeneKind::COUNT] = [
        GeneKind::FoodAttraction,
        GeneKind::JumpCooldown,
        GeneKind::JumpForce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneKind::FoodAttraction => "Food Attraction",
            GeneKind::JumpCooldown => "Jump Cooldown",
            GeneKind::JumpForce => "Jump Force",
        }
    }

    // (min, max, mutation range)
    fn bounds(self) -> (f32, f32, f32) {
        match self {
            GeneKind::FoodAttraction => (-1.0, 1.0, 0.2),
            GeneKind::JumpCooldown => (0.8, 3.5, 0.3),
            GeneKind::JumpForce => (0.4, 1.2, 0.05),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for GeneKind {
    type Err = GeneticsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        GeneKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| GeneticsError::GeneNotFound(name.to_string()))
    }
}

impl fmt::Display for GeneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single bounded scalar trait. `value` always lies in `[min, max]`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gene {
    kind: GeneKind,
    min: f32,
    max: f32,
    mutation_range: f32,
    value: f32,
}

impl Gene {
    /// Builds the gene for `kind` with a value drawn uniformly from its range.
    pub fn new<R: Rng + ?Sized>(kind: GeneKind, rng: &mut R) -> Gene {
        let (min, max, mutation_range) = kind.bounds();
        let value = Uniform::new_inclusive(min, max).sample(rng);

        Gene {
            kind,
            min,
            max,
            mutation_range,
            value: value.clamp(min, max),
        }
    }

    /// Nudges the value by up to `mutation_range` either way and clamps it
    /// back into bounds.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let step = Uniform::new_inclusive(-self.mutation_range, self.mutation_range);
        self.value = (self.value + step.sample(rng)).clamp(self.min, self.max);
    }

    pub fn kind(&self) -> GeneKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn mutation_range(&self) -> f32 {
        self.mutation_range
    }
}

/// Cosmetic lineage marker, each channel in `[0, 1)`.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Color {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    color: Color,
    genes: [Gene; GeneKind::COUNT],
}

impl Genome {
    /// Random color and a randomly initialized canonical gene set.
    pub fn seed<R: Rng + ?Sized>(rng: &mut R) -> Genome {
        let color = Color::random(rng);
        Genome::with_color(color, rng)
    }

    pub fn with_color<R: Rng + ?Sized>(color: Color, rng: &mut R) -> Genome {
        let genes = GeneKind::ALL.map(|kind| Gene::new(kind, rng));
        Genome { color, genes }
    }

    /// Mutates every gene in place and repaints the genome. This is the only
    /// source of variation, reproduction never mixes two genomes.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for gene in &mut self.genes {
            gene.mutate(rng);
        }
        self.color = Color::random(rng);
    }

    pub fn get(&self, kind: GeneKind) -> f32 {
        self.genes[kind.index()].value
    }

    /// Lookup by display name, for callers holding a string.
    pub fn lookup(&self, name: &str) -> Result<f32, GeneticsError> {
        let kind: GeneKind = name.parse()?;
        Ok(self.get(kind))
    }

    pub fn gene(&self, kind: GeneKind) -> &Gene {
        &self.genes[kind.index()]
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            writeln!(f, "{} = {}", gene.name(), gene.value)?;
        }
        Ok(())
    }
}
