use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

// ── Newtypes ────────────────────────────────────────────────────────

/// Hit points. Never negative; `<= 0` means destroyed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hp(pub f64);

impl Hp {
    pub fn new(v: f64) -> Self {
        debug_assert!(v.is_finite(), "Hp must be finite");
        Self(v.max(0.0))
    }

    pub fn add_clamped(self, delta: f64, max: f64) -> Self {
        Self((self.0 + delta).clamp(0.0, max))
    }

    pub fn sub_clamped(self, delta: f64) -> Self {
        let v = (self.0 - delta).max(0.0);
        debug_assert!(v.is_finite());
        Self(v)
    }

    pub fn is_alive(self) -> bool {
        self.0 > 0.0
    }
}

/// Duration in seconds. Always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f64);

impl Seconds {
    pub fn new(v: f64) -> Self {
        Self(v.max(0.0))
    }

    /// Whole ticks at `tps`, rounded to nearest.
    pub fn to_ticks(self, tps: f64) -> u32 {
        (self.0.max(0.0) * tps).round() as u32
    }
}

/// Signed shortest-arc difference `to - from`, in (-PI, PI].
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// Discrete tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Tick(pub u64);

impl Tick {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hp_floors_at_zero() {
        let hp = Hp::new(2.0).sub_clamped(4.0);
        assert_eq!(hp, Hp(0.0));
        assert!(!hp.is_alive());
    }

    #[test]
    fn hp_heal_caps_at_max() {
        assert_eq!(Hp(8.0).add_clamped(5.0, 10.0), Hp(10.0));
    }

    #[test]
    fn shortest_arc() {
        assert_relative_eq!(angle_delta(0.1, TAU - 0.1), -0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_delta(TAU - 0.1, 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_delta(0.0, 1.0), 1.0);
    }
}
