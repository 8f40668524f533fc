//! Random star-shaped rings (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic ring generator for benches and randomized tests. Rings mix
//!   lines, quadratics and cubics so every intersection path gets exercised.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, and join consecutive polar samples counterclockwise.
//! - Each side is a line, or with probability `curved_fraction` a Bézier whose
//!   control points sit off the chord by at most `bulge` chord lengths.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::curve::{cubic, line, quadratic, Curve2};
use crate::region::Ring2;
use crate::vec::Vec2;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `base_radius * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub center: Vec2,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
    /// Probability that a side is a quadratic or cubic instead of a line.
    pub curved_fraction: f64,
    /// Largest control point offset from the chord, in chord lengths. Clamped to [0, 0.5].
    pub bulge: f64,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            center: Vec2::ORIGIN,
            random_phase: true,
            curved_fraction: 0.5,
            bulge: 0.15,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random counterclockwise star-shaped ring around `cfg.center`.
pub fn draw_ring_radial(cfg: RadialCfg, tok: ReplayToken) -> Ring2 {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.99);
    let r0 = cfg.base_radius.max(1e-9);
    let bulge = cfg.bulge.clamp(0.0, 0.5);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    // jitter stays below half the spacing, so the angles remain sorted
    let pts: Vec<Vec2> = (0..n)
        .map(|k| {
            let theta = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            cfg.center + Vec2::polar(theta) * r
        })
        .collect();

    let offset = |rng: &mut StdRng, chord: f64| (rng.gen::<f64>() * 2.0 - 1.0) * bulge * chord;
    let curves: Vec<Curve2> = (0..n)
        .map(|i| {
            let (p, q) = (pts[i], pts[(i + 1) % n]);
            if !rng.gen_bool(cfg.curved_fraction.clamp(0.0, 1.0)) {
                return line(p, q);
            }
            let chord = (q - p).length();
            // outward normal of a counterclockwise side
            let normal = Vec2::new(q.y - p.y, p.x - q.x).norm();
            if rng.gen_bool(0.5) {
                let c = p.lerp(q, 0.5) + normal * offset(&mut rng, chord);
                quadratic(p, c, q)
            } else {
                let c1 = p.lerp(q, 1.0 / 3.0) + normal * offset(&mut rng, chord);
                let c2 = p.lerp(q, 2.0 / 3.0) + normal * offset(&mut rng, chord);
                cubic(p, c1, c2, q)
            }
        })
        .collect();
    Ring2::new(curves)
}
