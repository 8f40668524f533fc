//! Tolerances and tunables.
//!
//! Policy
//! - Numeric tolerances are fixed constants shared by every module. They are
//!   coupled (the intersection epsilons assume the solver epsilons), so they are
//!   not exposed as per-call knobs.
//! - Behavioural knobs that callers legitimately vary (sampling tolerance, clip
//!   repair budget, shuffle seed) live in small `*Cfg` structs with `Default`.

/// Magnitude below which a scalar is treated as zero (leading coefficients, parameter dedup).
pub const SCALAR_EPSILON: f64 = 1e-14;
/// Discriminants within `-DISCRIMINANT_EPSILON` of zero are clamped to a double root.
pub const DISCRIMINANT_EPSILON: f64 = 1e-10;
/// Residual bound a root must satisfy to be reported.
pub const SOLUTION_EPSILON: f64 = 1e-8;
/// Spacing between 1.0 and the next representable `f64`.
pub const MACHINE_EPSILON: f64 = f64::EPSILON;

/// Parameters within this distance of 0 or 1 snap to the endpoint.
pub const PARAMETRIC_EPSILON: f64 = 1e-5;
/// Points closer than this are considered coincident.
pub const SPATIAL_EPSILON: f64 = 1e-5;
/// Sub-ranges clipped by the fat-line search are quantized to this parametric grid.
pub const FAT_LINE_PARAMETRIC_RESOLUTION: f64 = 1e-5;
/// Fat lines are widened by this much before clipping.
pub const FAT_LINE_SPATIAL_EPSILON: f64 = 1e-5;
/// Two cubics meet in at most nine points; also the sample count of the collinearity probe.
pub const MAX_CUBIC_CUBIC_INTERSECTIONS: usize = 9;
/// Intersection pairs closer than this (per parameter) are merged.
pub const INTERSECTION_DEDUP_EPSILON: f64 = 1e-9;

/// Adaptive sampler configuration.
///
/// `distance_tolerance` bounds the deviation between the emitted polyline and the
/// curve. The angle and cusp limits are disabled by default (zero).
#[derive(Clone, Copy, Debug)]
pub struct SamplerCfg {
    pub distance_tolerance: f64,
    pub angle_tolerance: f64,
    /// Angle tolerances below this are treated as "no angle criterion".
    pub angle_tolerance_epsilon: f64,
    pub cusp_limit: f64,
    pub recursion_limit: u32,
    /// Chord-distance below which control points count as collinear.
    pub collinearity_epsilon: f64,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            distance_tolerance: 0.5,
            angle_tolerance: 0.0,
            angle_tolerance_epsilon: 0.01,
            cusp_limit: 0.0,
            recursion_limit: 8,
            collinearity_epsilon: 1e-30,
        }
    }
}

impl SamplerCfg {
    #[inline]
    pub fn with_tolerance(distance_tolerance: f64) -> Self {
        Self {
            distance_tolerance,
            ..Self::default()
        }
    }
}

/// Boolean-operation (clip) configuration.
#[derive(Clone, Copy, Debug)]
pub struct ClipCfg {
    /// Passes of cycle extraction + graph repair before giving up on leftover arcs.
    pub max_repair_attempts: usize,
    /// Cap on enumerated permutations / arc combinations.
    pub max_permutations: usize,
    /// Seed for the shuffles used once exhaustive permutation is too large.
    pub seed: u64,
}

impl Default for ClipCfg {
    fn default() -> Self {
        Self {
            max_repair_attempts: 10,
            max_permutations: 32,
            seed: 0x6b61_7274_6966_6578,
        }
    }
}
