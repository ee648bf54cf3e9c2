use crate::error::{Result, ScanError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Browser-like user agents rotated per request attempt.
///
/// The random source is owned by the pool so tests can seed it.
#[derive(Debug)]
pub struct UserAgentPool {
    agents: Vec<String>,
    rng: Mutex<StdRng>,
}

impl UserAgentPool {
    /// Create a pool seeded from OS entropy.
    pub fn new(agents: Vec<String>) -> Result<Self> {
        Self::with_rng(agents, StdRng::from_entropy())
    }

    /// Create a pool with an explicit generator.
    pub fn with_rng(agents: Vec<String>, rng: StdRng) -> Result<Self> {
        let agents: Vec<String> = agents
            .into_iter()
            .map(|agent| agent.trim().to_string())
            .filter(|agent| !agent.is_empty())
            .collect();

        if agents.is_empty() {
            return Err(ScanError::HttpClient(
                "user agent pool must not be empty".to_string(),
            ));
        }

        Ok(Self {
            agents,
            rng: Mutex::new(rng),
        })
    }

    /// Choose the identity for the next attempt.
    pub fn pick(&self) -> &str {
        let idx = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.gen_range(0..self.agents.len())
        };
        &self.agents[idx]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents() -> Vec<String> {
        vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/115.0".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15".to_string(),
            "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:90.0) Firefox/90.0".to_string(),
        ]
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(UserAgentPool::new(vec![]).is_err());
        assert!(UserAgentPool::new(vec!["  ".to_string()]).is_err());
    }

    #[test]
    fn test_pick_comes_from_pool() {
        let pool = UserAgentPool::new(agents()).expect("non-empty pool");
        let all = agents();
        for _ in 0..20 {
            let picked = pool.pick();
            assert!(all.iter().any(|a| a == picked), "unexpected agent {picked}");
        }
    }

    #[test]
    fn test_seeded_pools_agree() {
        let a = UserAgentPool::with_rng(agents(), StdRng::seed_from_u64(7)).expect("pool");
        let b = UserAgentPool::with_rng(agents(), StdRng::seed_from_u64(7)).expect("pool");

        let picks_a: Vec<String> = (0..10).map(|_| a.pick().to_string()).collect();
        let picks_b: Vec<String> = (0..10).map(|_| b.pick().to_string()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_rotation_varies() {
        // Probabilistic, but 30 draws over 3 agents landing on one is negligible
        let pool = UserAgentPool::with_rng(agents(), StdRng::seed_from_u64(1)).expect("pool");
        let first = pool.pick().to_string();
        let all_same = (0..30).all(|_| pool.pick() == first);
        assert!(!all_same, "Expected variation in user agents");
    }
}
