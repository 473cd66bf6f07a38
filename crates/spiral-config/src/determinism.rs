use rand::{rngs::StdRng, SeedableRng};

/// Environment variable consulted when no explicit seed is given.
pub const SEED_ENV: &str = "SPIRAL_DETERMINISTIC_SEED";

/// Where a run's master seed came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    Explicit(u64),
    Environment(u64),
    Entropy,
}

impl SeedSource {
    /// Resolves the seed: explicit value first, then `SPIRAL_DETERMINISTIC_SEED`,
    /// otherwise operating system entropy. Unparsable environment values are ignored.
    pub fn resolve(explicit: Option<u64>) -> Self {
        Self::resolve_with(explicit, std::env::var(SEED_ENV).ok().as_deref())
    }

    fn resolve_with(explicit: Option<u64>, env: Option<&str>) -> Self {
        if let Some(seed) = explicit {
            return SeedSource::Explicit(seed);
        }
        match env.and_then(|raw| raw.trim().parse::<u64>().ok()) {
            Some(seed) => SeedSource::Environment(seed),
            None => SeedSource::Entropy,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            SeedSource::Explicit(seed) | SeedSource::Environment(seed) => Some(*seed),
            SeedSource::Entropy => None,
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
