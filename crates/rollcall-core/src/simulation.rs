//! Detection and recognition capabilities, plus randomized stand-ins.
//!
//! The console only talks to the traits; a real model slots in by
//! implementing them. The `Simulated*` types fabricate every result.

use crate::registry::Registry;
use crate::types::{BoundingBox, Emotion, Recognition};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Range the simulated age is drawn from.
pub const SIMULATED_AGE_RANGE: RangeInclusive<u8> = 18..=45;

const SIMULATED_FACE: BoundingBox = BoundingBox {
    x: 10.0,
    y: 10.0,
    width: 100.0,
    height: 100.0,
};

/// Face localization and per-face attribute prediction.
pub trait FaceDetector {
    /// Locate faces in the current camera frame.
    fn detect_faces(&mut self) -> Vec<BoundingBox>;
    fn predict_age(&mut self, face: &BoundingBox) -> u8;
    fn predict_emotion(&mut self, face: &BoundingBox) -> Emotion;
}

/// Identity matching against the registered users.
pub trait FaceRecognizer {
    fn recognize(&mut self, face: &BoundingBox, registry: &Registry) -> Recognition;
}

/// Detector that always "finds" one fixed face and draws attributes at random.
pub struct SimulatedDetector<R> {
    rng: R,
}

impl<R: Rng> SimulatedDetector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> FaceDetector for SimulatedDetector<R> {
    fn detect_faces(&mut self) -> Vec<BoundingBox> {
        vec![SIMULATED_FACE]
    }

    fn predict_age(&mut self, _face: &BoundingBox) -> u8 {
        self.rng.gen_range(SIMULATED_AGE_RANGE)
    }

    fn predict_emotion(&mut self, _face: &BoundingBox) -> Emotion {
        Emotion::ALL[self.rng.gen_range(0..Emotion::ALL.len())]
    }
}

/// Recognizer that ignores the face and picks uniformly among the
/// registered names plus `Unknown`.
pub struct SimulatedRecognizer<R> {
    rng: R,
}

impl<R: Rng> SimulatedRecognizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> FaceRecognizer for SimulatedRecognizer<R> {
    fn recognize(&mut self, _face: &BoundingBox, registry: &Registry) -> Recognition {
        let mut candidates: Vec<Recognition> = registry
            .names()
            .map(|n| Recognition::Known(n.to_string()))
            .collect();
        if candidates.is_empty() {
            return Recognition::Unknown;
        }
        candidates.push(Recognition::Unknown);
        candidates
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or(Recognition::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_detector_returns_fixed_face() {
        let mut d = SimulatedDetector::new(StdRng::seed_from_u64(1));
        assert_eq!(d.detect_faces(), vec![SIMULATED_FACE]);
    }

    #[test]
    fn test_age_within_range() {
        let mut d = SimulatedDetector::new(StdRng::seed_from_u64(7));
        for _ in 0..200 {
            assert!(SIMULATED_AGE_RANGE.contains(&d.predict_age(&SIMULATED_FACE)));
        }
    }

    #[test]
    fn test_emotion_covers_all_labels() {
        let mut d = SimulatedDetector::new(StdRng::seed_from_u64(3));
        let seen: std::collections::HashSet<_> =
            (0..500).map(|_| d.predict_emotion(&SIMULATED_FACE)).collect();
        assert_eq!(seen.len(), Emotion::ALL.len());
    }

    #[test]
    fn test_empty_registry_is_always_unknown() {
        let mut r = SimulatedRecognizer::new(StdRng::seed_from_u64(42));
        let registry = Registry::new();
        for _ in 0..50 {
            assert_eq!(r.recognize(&SIMULATED_FACE, &registry), Recognition::Unknown);
        }
    }

    #[test]
    fn test_recognize_draws_from_registry_and_unknown() {
        let mut registry = Registry::new();
        registry.register("alice", "CS-1").unwrap();
        registry.register("bob", "CS-2").unwrap();

        let mut r = SimulatedRecognizer::new(StdRng::seed_from_u64(9));
        let seen: std::collections::HashSet<_> =
            (0..300).map(|_| format!("{:?}", r.recognize(&SIMULATED_FACE, &registry))).collect();
        let mut seen: Vec<_> = seen.into_iter().collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![r#"Known("alice")"#, r#"Known("bob")"#, "Unknown"]
        );
    }
}
