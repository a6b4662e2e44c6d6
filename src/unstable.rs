use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Decides whether a simulated Warning tile is reported as an unstable build
/// with partial data.
pub trait UnstableDecider: Send + Sync {
    fn is_unstable(&self) -> bool;
}

pub struct RandomUnstable {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomUnstable {
    pub fn new(probability: f64, seed: Option<u64>) -> Result<Self> {
        validate_probability(probability)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            probability,
            rng: Mutex::new(rng),
        })
    }
}

impl UnstableDecider for RandomUnstable {
    fn is_unstable(&self) -> bool {
        self.rng.lock().gen_bool(self.probability)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedUnstable(pub bool);

impl UnstableDecider for FixedUnstable {
    fn is_unstable(&self) -> bool {
        self.0
    }
}

pub fn build_decider(probability: f64, seed: Option<u64>) -> Result<Box<dyn UnstableDecider>> {
    validate_probability(probability)?;
    if probability == 0.0 {
        return Ok(Box::new(FixedUnstable(false)));
    }
    if probability == 1.0 {
        return Ok(Box::new(FixedUnstable(true)));
    }
    Ok(Box::new(RandomUnstable::new(probability, seed)?))
}

fn validate_probability(probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::InvalidProbability(probability));
    }
    Ok(())
}
