/// Cooldown bucket: uniform random selection that refuses recent picks.
///
/// Used by the mouth flap and the voice babble so the same sprite or
/// sound piece does not come up again right away.
use rand::Rng;
use std::collections::VecDeque;

/// A pool of integer ids where the last `depth` picks sit out.
///
/// Every id of the filled range is either fresh (selectable) or stale
/// (cooling down). Stale ids go back to the fresh pool oldest-first once
/// more than `depth` of them have piled up.
#[derive(Debug, Clone)]
pub struct CooldownSampler {
    depth: usize,
    fresh: Vec<i32>,
    stale: VecDeque<i32>,
}

impl CooldownSampler {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            fresh: Vec::new(),
            stale: VecDeque::with_capacity(depth + 1),
        }
    }

    /// Build a sampler already filled with `start..end`.
    pub fn with_range(depth: usize, start: i32, end: i32) -> Self {
        let mut sampler = Self::new(depth);
        sampler.fill(start, end);
        sampler
    }

    /// Reset the pool to `start..end`, forgetting any cooldown history.
    pub fn fill(&mut self, start: i32, end: i32) {
        self.fresh.clear();
        self.stale.clear();
        self.fresh.extend(start..end);
    }

    /// Pick a fresh id uniformly at random and put it on cooldown.
    ///
    /// # Panics
    ///
    /// Panics if no fresh id is left. Keep `depth` strictly below the
    /// range size and that never happens.
    pub fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i32 {
        assert!(
            !self.fresh.is_empty(),
            "cooldown sampler ran dry: depth {} leaves no fresh id in a pool of {}",
            self.depth,
            self.len()
        );

        let index = rng.gen_range(0..self.fresh.len());
        let value = self.fresh.swap_remove(index);
        self.stale.push_back(value);

        while self.stale.len() > self.depth {
            if let Some(fresh_again) = self.stale.pop_front() {
                self.fresh.push(fresh_again);
            }
        }

        value
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of ids in the filled range, fresh and stale together.
    pub fn len(&self) -> usize {
        self.fresh.len() + self.stale.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `value` is currently cooling down.
    pub fn is_stale(&self, value: i32) -> bool {
        self.stale.contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn fill_resets_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bucket = CooldownSampler::new(2);
        bucket.fill(0, 5);
        bucket.take(&mut rng);
        bucket.take(&mut rng);
        assert_eq!(bucket.len(), 5);

        bucket.fill(10, 12);
        assert_eq!(bucket.len(), 2);
        let value = bucket.take(&mut rng);
        assert!(value == 10 || value == 11);
    }

    #[test]
    fn depth_one_never_repeats_previous_pick() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut bucket = CooldownSampler::with_range(1, 0, 3);
            let mut previous = bucket.take(&mut rng);
            for _ in 0..2 {
                let next = bucket.take(&mut rng);
                assert_ne!(next, previous, "seed {} repeated {}", seed, next);
                previous = next;
            }
        }
    }

    #[test]
    fn no_repeat_within_cooldown_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let depth = 3;
        let mut bucket = CooldownSampler::with_range(depth, 0, 5);
        let picks: Vec<i32> = (0..500).map(|_| bucket.take(&mut rng)).collect();

        for window in picks.windows(depth + 1) {
            let unique: BTreeSet<_> = window.iter().collect();
            assert_eq!(unique.len(), window.len(), "repeat in window {:?}", window);
        }
    }

    #[test]
    fn fresh_and_stale_cover_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bucket = CooldownSampler::with_range(2, -1, 3);
        for _ in 0..50 {
            bucket.take(&mut rng);
            let mut all: Vec<i32> = bucket.fresh.iter().copied().collect();
            all.extend(bucket.stale.iter().copied());
            all.sort_unstable();
            assert_eq!(all, vec![-1, 0, 1, 2]);
            assert!(bucket.stale.len() <= 2);
            for value in &bucket.stale {
                assert!(!bucket.fresh.contains(value));
            }
        }
    }

    #[test]
    fn oldest_stale_returns_first() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut bucket = CooldownSampler::with_range(2, 0, 4);
        let first = bucket.take(&mut rng);
        let second = bucket.take(&mut rng);
        assert!(bucket.is_stale(first));
        assert!(bucket.is_stale(second));

        bucket.take(&mut rng);
        assert!(!bucket.is_stale(first));
        assert!(bucket.is_stale(second));
    }

    #[test]
    fn every_value_is_reachable() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut bucket = CooldownSampler::with_range(1, -1, 3);
        let seen: BTreeSet<i32> = (0..200).map(|_| bucket.take(&mut rng)).collect();
        assert_eq!(seen, BTreeSet::from([-1, 0, 1, 2]));
    }

    #[test]
    #[should_panic(expected = "ran dry")]
    fn take_from_exhausted_pool_panics() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut bucket = CooldownSampler::with_range(3, 0, 3);
        for _ in 0..4 {
            bucket.take(&mut rng);
        }
    }

    #[test]
    #[should_panic(expected = "ran dry")]
    fn take_from_unfilled_pool_panics() {
        let mut rng = StdRng::seed_from_u64(0);
        CooldownSampler::new(0).take(&mut rng);
    }
}
