use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::key::ResourceKey;
use crate::models::ReferencePolicy;
use crate::timeline::{clamped_seconds, shift, MAX_SPAN_SECS};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Per-key reference times. A key's reference time is chosen on first
/// lookup and never changes for the lifetime of the clock.
pub struct ReferenceClock {
    policy: ReferencePolicy,
    times: RwLock<HashMap<ResourceKey, DateTime<Utc>>>,
    rng: Mutex<StdRng>,
}

impl ReferenceClock {
    pub fn new(policy: ReferencePolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            policy,
            times: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    pub fn reference_time_for(&self, key: &ResourceKey, now: DateTime<Utc>) -> DateTime<Utc> {
        if let Some(existing) = self.times.read().get(key) {
            return *existing;
        }

        // Re-checked under the write lock: a concurrent caller may have won.
        let mut times = self.times.write();
        *times.entry(key.clone()).or_insert_with(|| {
            let reference = self.generate(now);
            debug!(key = %key, reference = %reference, "established reference time");
            reference
        })
    }

    pub fn len(&self) -> usize {
        self.times.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.read().is_empty()
    }

    fn generate(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.policy {
            ReferencePolicy::FixedOffset { offset_secs } => {
                shift(now, -clamped_seconds(offset_secs))
            }
            ReferencePolicy::Randomized { window_secs } => {
                if window_secs <= 0 {
                    return now;
                }
                let window_secs = window_secs.min(MAX_SPAN_SECS);
                let offset = self.rng.lock().gen_range(0..=window_secs);
                shift(now, -clamped_seconds(offset))
            }
        }
    }
}
