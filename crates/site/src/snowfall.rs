//! Decorative snowfall.
//!
//! Flakes are generated server-side from a seeded PRNG and rendered as
//! per-flake CSS rules inside a nonce'd `<style>` block, so the page needs no
//! script and every render of the same seed looks identical.

use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Flakes drawn on every page.
pub const DEFAULT_FLAKE_COUNT: usize = 40;

/// One snowflake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flake {
    /// Horizontal start position, percent of the viewport width.
    pub left: f32,
    /// Diameter in pixels.
    pub size: f32,
    /// Seconds for one fall.
    pub duration: f32,
    /// Negative start offset in seconds so the sky is not empty on load.
    pub delay: f32,
    pub opacity: f32,
    /// Sideways sway in pixels.
    pub drift: f32,
}

/// A generated set of flakes.
#[derive(Debug, Clone, PartialEq)]
pub struct Snowfall {
    flakes: Vec<Flake>,
}

impl Snowfall {
    /// Generate `count` flakes from `seed`.
    #[must_use]
    pub fn generate(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let flakes = (0..count)
            .map(|_| Flake {
                left: rng.random_range(0.0..100.0),
                size: rng.random_range(2.0..7.0),
                duration: rng.random_range(8.0..18.0),
                delay: rng.random_range(0.0..18.0),
                opacity: rng.random_range(0.35..0.95),
                drift: rng.random_range(-40.0..40.0),
            })
            .collect();
        Self { flakes }
    }

    /// Snowfall for the current UTC day: stable across requests, changes daily.
    #[must_use]
    pub fn daily(count: usize) -> Self {
        let day = chrono::Utc::now().timestamp().div_euclid(86_400);
        Self::generate(day.unsigned_abs(), count)
    }

    #[must_use]
    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    /// CSS rules `.flake-{n}` for each flake, in order.
    #[must_use]
    pub fn stylesheet(&self) -> String {
        let mut css = String::with_capacity(self.flakes.len() * 160);
        for (i, flake) in self.flakes.iter().enumerate() {
            let _ = writeln!(
                css,
                ".flake-{i}{{left:{:.2}%;width:{:.2}px;height:{:.2}px;opacity:{:.2};\
                 animation-duration:{:.2}s;animation-delay:-{:.2}s;--drift:{:.2}px}}",
                flake.left,
                flake.size,
                flake.size,
                flake.opacity,
                flake.duration,
                flake.delay,
                flake.drift,
            );
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_flakes() {
        let a = Snowfall::generate(2026, 25);
        let b = Snowfall::generate(2026, 25);
        assert_eq!(a, b);
        assert_eq!(a.stylesheet(), b.stylesheet());
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(Snowfall::generate(1, 10), Snowfall::generate(2, 10));
    }

    #[test]
    fn test_flakes_stay_in_range() {
        let snowfall = Snowfall::generate(7, 200);
        assert_eq!(snowfall.len(), 200);
        for flake in snowfall.flakes() {
            assert!((0.0..100.0).contains(&flake.left));
            assert!((2.0..7.0).contains(&flake.size));
            assert!((0.35..0.95).contains(&flake.opacity));
            assert!((-40.0..40.0).contains(&flake.drift));
        }
    }

    #[test]
    fn test_stylesheet_has_one_rule_per_flake() {
        let snowfall = Snowfall::generate(3, 4);
        let css = snowfall.stylesheet();
        assert_eq!(css.lines().count(), 4);
        assert!(css.starts_with(".flake-0{left:"));
        assert!(css.contains(".flake-3{"));
        assert!(Snowfall::generate(3, 0).is_empty());
    }
}
