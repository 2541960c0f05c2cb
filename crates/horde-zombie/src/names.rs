//! Zombie names, e.g. `crawler-wombat-imbecile`.

use rand::Rng;

const FIRST: &[&str] = &["batman", "brain", "wombat", "leg", "eye", "night"];
const LAST: &[&str] = &["drinker", "eater", "nomnom", "imbecile", "knight"];

/// Word lists zombie names are drawn from.
///
/// The randomness always comes from the caller, so a seeded RNG gives
/// the same names every run.
#[derive(Debug, Clone, Copy)]
pub struct NamePool {
    first: &'static [&'static str],
    last: &'static [&'static str],
}

impl Default for NamePool {
    fn default() -> Self {
        Self {
            first: FIRST,
            last: LAST,
        }
    }
}

impl NamePool {
    /// Picks `<first>-<last>`.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let first = self.first[rng.random_range(0..self.first.len())];
        let last = self.last[rng.random_range(0..self.last.len())];
        format!("{first}-{last}")
    }

    /// Picks `<prefix>-<first>-<last>`.
    pub fn pick_prefixed<R: Rng + ?Sized>(&self, prefix: &str, rng: &mut R) -> String {
        format!("{prefix}-{}", self.pick(rng))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_pick_uses_both_lists() {
        let pool = NamePool::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let name = pool.pick(&mut rng);
            let (first, last) = name.split_once('-').expect("two words");
            assert!(FIRST.contains(&first), "{first} not a first name");
            assert!(LAST.contains(&last), "{last} not a last name");
        }
    }

    #[test]
    fn test_same_seed_same_names() {
        let pool = NamePool::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(pool.pick(&mut a), pool.pick(&mut b));
        }
    }

    #[test]
    fn test_prefix() {
        let pool = NamePool::default();
        let mut rng = StdRng::seed_from_u64(1);
        let name = pool.pick_prefixed("crawler", &mut rng);
        let parts: Vec<_> = name.split('-').collect();
        assert_eq!(parts.len(), 3, "{name}");
        assert_eq!(parts[0], "crawler");
        assert!(FIRST.contains(&parts[1]));
        assert!(LAST.contains(&parts[2]));
    }
}
