//! Random assignee selection.

use rand::seq::SliceRandom;
use rand::Rng;

/// Choose up to `count` distinct logins uniformly at random.
///
/// Returns fewer than `count` when there are not enough candidates, and an
/// empty list when there are none. Deterministic for a seeded `rng`.
pub fn pick_assignees<R: Rng + ?Sized>(logins: &[String], count: usize, rng: &mut R) -> Vec<String> {
    logins.choose_multiple(rng, count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn logins(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_assignees(&[], 1, &mut rng).is_empty());
    }

    #[test]
    fn test_single_pick_from_candidates() {
        let candidates = logins(&["bob", "carol"]);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick_assignees(&candidates, 1, &mut rng);
        assert_eq!(picked.len(), 1);
        assert!(candidates.contains(&picked[0]));
    }

    #[test]
    fn test_picks_are_distinct() {
        let candidates = logins(&["a", "b", "c", "d", "e"]);
        let mut rng = StdRng::seed_from_u64(42);
        let picked = pick_assignees(&candidates, 3, &mut rng);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(picked.len(), 3);
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_count_larger_than_input() {
        let candidates = logins(&["bob", "carol"]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut picked = pick_assignees(&candidates, 5, &mut rng);
        picked.sort();
        assert_eq!(picked, candidates);
    }

    #[test]
    fn test_same_seed_same_result() {
        let candidates = logins(&["a", "b", "c", "d", "e", "f"]);
        let first = pick_assignees(&candidates, 2, &mut StdRng::seed_from_u64(99));
        let second = pick_assignees(&candidates, 2, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_candidate_reachable() {
        let candidates = logins(&["a", "b", "c", "d"]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen: HashMap<String, usize> = HashMap::new();

        for _ in 0..4000 {
            for login in pick_assignees(&candidates, 1, &mut rng) {
                *seen.entry(login).or_default() += 1;
            }
        }

        assert_eq!(seen.len(), 4);
        // Loose bound: each of 4 candidates should land near 1000 draws.
        assert!(seen.values().all(|&n| (700..1300).contains(&n)));
    }
}
