// gridloc_sim/src/simulation/prng.rs

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// A newtype wrapper around `ChaCha8Rng`.
/// This is the single pseudo-random source for a run; seeding it makes the
/// sensor readings, and therefore the whole run, reproducible.
#[derive(Debug, Clone)]
pub struct SimulationRng(pub ChaCha8Rng);

impl SimulationRng {
    /// Seeds from `seed`, or from OS entropy when there is none.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                info!("Seeding sensor noise with {}", seed);
                Self(ChaCha8Rng::seed_from_u64(seed))
            }
            None => {
                info!("No seed configured, sensor noise is seeded from entropy");
                Self(ChaCha8Rng::from_entropy())
            }
        }
    }
}
