//! Keyed result collector for the analysis graph
//!
//! Tracker outputs land here under dotted string keys: the tick vector under
//! `rhythm.ticks`, and - only for trackers that have one - the confidence
//! scalar under `rhythm.confidence`. Readers probe with `contains`-style
//! typed getters that return `Option`, so an absent output is a normal typed
//! outcome rather than a lookup panic.

use std::collections::HashMap;

/// Key under which the tick-timestamp vector is stored
pub const TICKS_KEY: &str = "rhythm.ticks";

/// Key under which the scalar confidence is stored (MultiFeature only)
pub const CONFIDENCE_KEY: &str = "rhythm.confidence";

#[derive(Debug, Clone)]
enum PoolValue {
    Real(f64),
    RealVec(Vec<f64>),
}

/// Named keyed store for graph results
#[derive(Debug, Default)]
pub struct Pool {
    values: HashMap<String, PoolValue>,
}

impl Pool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a scalar under `key`, replacing any previous value
    pub fn set_real(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), PoolValue::Real(value));
    }

    /// Store a vector under `key`, replacing any previous value
    pub fn set_real_vec(&mut self, key: &str, value: Vec<f64>) {
        self.values.insert(key.to_string(), PoolValue::RealVec(value));
    }

    /// Scalar stored under `key`, if present and of scalar type
    pub fn real(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(PoolValue::Real(v)) => Some(*v),
            _ => None,
        }
    }

    /// Vector stored under `key`, if present and of vector type
    pub fn real_vec(&self, key: &str) -> Option<&[f64]> {
        match self.values.get(key) {
            Some(PoolValue::RealVec(v)) => Some(v),
            _ => None,
        }
    }

    /// Whether any value is stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_round_trip() {
        let mut pool = Pool::new();
        pool.set_real_vec(TICKS_KEY, vec![0.5, 1.0, 1.5]);

        assert!(pool.contains(TICKS_KEY));
        assert_eq!(pool.real_vec(TICKS_KEY), Some(&[0.5, 1.0, 1.5][..]));
    }

    #[test]
    fn test_absent_confidence_is_none() {
        let mut pool = Pool::new();
        pool.set_real_vec(TICKS_KEY, vec![]);

        assert!(!pool.contains(CONFIDENCE_KEY));
        assert_eq!(pool.real(CONFIDENCE_KEY), None);
    }

    #[test]
    fn test_type_mismatch_is_none() {
        let mut pool = Pool::new();
        pool.set_real(TICKS_KEY, 1.0);
        assert_eq!(pool.real_vec(TICKS_KEY), None);
    }
}
