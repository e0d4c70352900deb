//! Seeded xorshift generator used by the planner
//!
//! The generator is a plain value: each planning call owns its own instance,
//! so the same seed always yields the same sequence of draws.

/// Seed used when the caller does not supply one
pub const DEFAULT_SEED: u32 = 42;

/// Upper bound of the length offset drawn for length plans
pub const MAX_LENGTH_OFFSET: usize = 5;

/// 32-bit xorshift pseudo-random generator
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator; zero is a fixed point of xorshift, so it maps to the default seed
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform draw in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Pick one element uniformly
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next_f64() * items.len() as f64) as usize;
        &items[idx.min(items.len() - 1)]
    }

    /// Bell-shaped offset in `0..=MAX_LENGTH_OFFSET` (mean of three uniforms)
    pub fn length_offset(&mut self) -> usize {
        let mean = (self.next_f64() + self.next_f64() + self.next_f64()) / 3.0;
        let offset = (mean * MAX_LENGTH_OFFSET as f64).round() as usize;
        offset.min(MAX_LENGTH_OFFSET)
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new(7);
        let mut b = SeededRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let left: Vec<_> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<_> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn test_zero_seed_does_not_stall() {
        let mut rng = SeededRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_draws_in_range() {
        let mut rng = SeededRng::new(99);
        let items = [1, 2, 3];
        for _ in 0..1000 {
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));
            assert!(items.contains(rng.pick(&items)));
            assert!(rng.length_offset() <= MAX_LENGTH_OFFSET);
        }
    }

    #[test]
    fn test_length_offset_clusters_in_the_middle() {
        let mut rng = SeededRng::new(5);
        let mut counts = [0usize; MAX_LENGTH_OFFSET + 1];
        for _ in 0..5000 {
            counts[rng.length_offset()] += 1;
        }
        assert!(counts[2] + counts[3] > counts[0] + counts[5]);
    }
}
