//! Planar geometry kernel: Bézier curves, robust curve intersection, adaptive
//! sampling, and boolean operations on curve-bounded regions.
//!
//! Layers, leaves first
//! - `scalars`, `equations`: tolerance-aware scalar helpers and closed-form
//!   polynomial solvers.
//! - `vec`, `bounds`, `curve`: points, boxes and the `Curve2` sum type.
//! - `intersect`: analytic line cases plus fat-line clipping / subdivision.
//! - `graph`, `sweep`: the combinatorial machinery the region engine runs on.
//! - `region`: rings, regions, point tests and union/intersection/difference.
//!
//! API Policy
//! - Numeric tolerances are fixed constants in [`cfg`]; callers tune only the
//!   small `*Cfg` structs.
//! - Nothing here is fallible except graph queries; numerical trouble shows up
//!   as fewer roots or intersections, never as an error.

pub mod bounds;
pub mod cfg;
pub mod curve;
pub mod equations;
pub mod graph;
pub mod intersect;
pub mod rand;
pub mod region;
pub mod scalars;
pub mod sweep;
pub mod vec;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use bounds::{Box2, Interval};
pub use cfg::{ClipCfg, SamplerCfg};
pub use curve::{CubicBezier2, Curve2, Line2, QuadraticBezier2};
pub use region::{Region2, Ring2, TestResult};
pub use vec::{Mat3, Vec2, Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::bounds::{Box2, Interval};
    pub use crate::cfg::{ClipCfg, SamplerCfg};
    pub use crate::curve::{cubic, line, quadratic, CubicBezier2, Curve2, Line2, QuadraticBezier2, Sample};
    pub use crate::intersect::Strategy;
    pub use crate::rand::{draw_ring_radial, RadialCfg, ReplayToken, VertexCount};
    pub use crate::region::{Region2, Ring2, TestResult};
    pub use crate::vec::{rotate, scale, scale_xy, translate, Mat3, Vec2, Vec3};
}
