//! Rings, regions and boolean operations on them.
//!
//! Purpose
//! - `Ring2` is a closed loop of monotonic curves with cached bounds, area and
//!   orientation; `Region2` is a set of rings where clockwise rings are holes.
//! - Point classification casts a ray and counts crossings; boolean operations
//!   split both boundaries at their intersections and rebuild rings from the
//!   arcs each operation keeps.
//!
//! Conventions
//! - Orientation follows the sign of the shoelace area: counterclockwise
//!   encloses, clockwise cuts out.
//! - Boolean operations never fail. A graph they cannot close is logged and
//!   the rings recovered so far are returned.

mod clip;
mod combinatorics;
mod region2;
mod ring;
mod split;

pub use combinatorics::{combinations, permutations};
pub use region2::Region2;
pub use ring::{Ring2, TestResult};
pub use split::{split, SplitResult};
