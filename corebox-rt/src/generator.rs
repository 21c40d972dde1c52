//! Synthetic program generator (spec §4.5).
//!
//! Grounded on `original_source/Scheduler.cpp::generateDummyInstructions`,
//! extended with the `FOR` variant and depth cap the distilled spec adds.
//! Seedable so tests can ask for deterministic programs (spec §8).

use crate::instruction::Instruction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Maximum nesting depth for generated `FOR` loops (spec §4.5).
const MAX_FOR_DEPTH: u32 = 3;

/// Generates guest programs for the dispatcher and for manually created
/// processes.
pub struct ProgramGenerator {
    rng: StdRng,
}

impl ProgramGenerator {
    /// A generator seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// A generator with a fixed seed, for deterministic tests.
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Pick a uniformly random instruction count within `[min, max]`
    /// (inclusive). Falls back to `min` if the bounds are inverted.
    pub fn random_length(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    /// Generate `count` top-level instructions at nesting depth 0.
    pub fn generate(&mut self, count: u32) -> Vec<Instruction> {
        self.generate_at_depth(count, 0)
    }

    fn generate_at_depth(&mut self, count: u32, depth: u32) -> Vec<Instruction> {
        (0..count)
            .map(|i| self.generate_one(i, depth))
            .collect()
    }

    fn generate_one(&mut self, slot: u32, depth: u32) -> Instruction {
        match self.rng.gen_range(0..6) {
            0 => Instruction::Print,
            1 => Instruction::Declare { args: vec![format!("var{}", slot), "10".into()] },
            2 => Instruction::Add { args: vec![format!("var{}", slot), "1".into(), "2".into()] },
            3 => Instruction::Subtract { args: vec![format!("var{}", slot), "5".into(), "3".into()] },
            4 => Instruction::Sleep { args: vec!["1".into()] },
            _ if depth >= MAX_FOR_DEPTH => Instruction::Print, // FOR substituted with PRINT at the cap
            _ => {
                let repeat = self.rng.gen_range(2..=4);
                let body_len = self.rng.gen_range(2..=4);
                let body = self.generate_at_depth(body_len, depth + 1);
                Instruction::For { repeat, body }
            }
        }
    }
}
