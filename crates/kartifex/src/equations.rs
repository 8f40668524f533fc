//! Real roots of linear, quadratic and cubic polynomials.
//!
//! Purpose
//! - Closed-form/Newton solvers tuned for the curve code: roots are only reported
//!   when their residual is below `SOLUTION_EPSILON`, so a near-miss yields fewer
//!   roots rather than a wrong one.
//!
//! Notes
//! - Coefficients are rescaled by a power of two (`normalization_factor`) so the
//!   residual check works on a comparable scale for tiny and huge inputs.
//! - The quadratic discriminant falls back to Dekker-split products when
//!   `b² ≈ ac`, recovering the bits a naive `b*b - a*c` cancels away.
//! - The cubic follows the Newton scheme popularised by paper.js: a closed-form
//!   seed, monotone Newton refinement, then deflation to a quadratic.
//!
//! Returned roots are sorted ascending and deduplicated.

use crate::cfg::{DISCRIMINANT_EPSILON, MACHINE_EPSILON, SCALAR_EPSILON, SOLUTION_EPSILON};
use crate::scalars::normalization_factor;

/// Bound on Newton steps in [`solve_cubic`]; convergence is monotone and needs far fewer.
const MAX_NEWTON_STEPS: usize = 128;

/// Dekker split of `n` into a high and low half with 26 significant bits each.
#[inline]
fn split(n: f64) -> (f64, f64) {
    let x = n * 134_217_729.0;
    let y = n - x;
    let hi = y + x;
    (hi, n - hi)
}

/// `b² - ac` with compensated products when the naive difference cancels.
fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    let d = b * b - a * c;
    let e = b * b + a * c;
    if d.abs() * 3.0 >= e {
        return d;
    }
    let (ah, al) = split(a);
    let (bh, bl) = split(b);
    let (ch, cl) = split(c);
    let p = b * b;
    let dp = bh * bh - p + 2.0 * bh * bl + bl * bl;
    let q = a * c;
    let dq = ah * ch - q + ah * cl + al * ch + al * cl;
    p - q + (dp - dq)
}

fn sort_dedup(mut roots: Vec<f64>) -> Vec<f64> {
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|x, prev| (*x - *prev).abs() <= SCALAR_EPSILON * prev.abs().max(1.0));
    roots
}

/// Root of `a·x + b = 0`; none when `|a| < SCALAR_EPSILON`.
pub fn solve_linear(a: f64, b: f64) -> Vec<f64> {
    if a.abs() < SCALAR_EPSILON {
        Vec::new()
    } else {
        vec![-b / a]
    }
}

/// Real roots of `a·x² + b·x + c = 0`.
///
/// Degrades to [`solve_linear`] for `|a| < SCALAR_EPSILON`. Discriminants in
/// `[-DISCRIMINANT_EPSILON, 0)` count as a double root.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < SCALAR_EPSILON {
        return solve_linear(b, c);
    }
    let b = b * -0.5;
    let k = normalization_factor(&[a, b, c]);
    let (a, b, c) = (a * k, b * k, c * k);

    let d = discriminant(a, b, c);
    if d < -DISCRIMINANT_EPSILON {
        return Vec::new();
    }
    let q = if d < 0.0 { 0.0 } else { d.sqrt() };
    let r = b + if b < 0.0 { -q } else { q };
    let candidates = if r == 0.0 {
        [q / a, -q / a]
    } else {
        [r / a, c / r]
    };
    // the discriminant tolerance is generous, so check the work
    let roots = candidates
        .into_iter()
        .filter(|&x| (a * x * x - 2.0 * b * x + c).abs() < SOLUTION_EPSILON)
        .collect();
    sort_dedup(roots)
}

/// Real roots of `a·x³ + b·x² + c·x + d = 0`.
///
/// Degrades to [`solve_quadratic`] for `|a| < SCALAR_EPSILON` (after scaling).
/// Every returned root satisfies `|f(x)| < SOLUTION_EPSILON` on the scaled
/// coefficients; candidates that fail are dropped.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let k = normalization_factor(&[a, b, c, d]);
    let (a, b, c, d) = (a * k, b * k, c * k, d * k);
    if a.abs() < SCALAR_EPSILON {
        return solve_quadratic(b, c, d);
    }

    let residual = |x: f64| ((a * x + b) * x + c) * x + d;

    let mut x;
    let mut b1;
    let mut c2;
    if d.abs() < SCALAR_EPSILON {
        // x = 0 is a root; the rest come from a·x² + b·x + c
        x = 0.0;
        b1 = b;
        c2 = c;
    } else {
        x = -(b / a) / 3.0;
        b1 = a * x + b;
        c2 = b1 * x + c;
        let mut qd = (a * x + b1) * x + c2;
        let mut q = c2 * x + d;
        let t = q / a;
        let r = t.abs().cbrt();
        let s = if t < 0.0 { -1.0 } else { 1.0 };
        let td = -qd / a;
        let rd = if td > 0.0 {
            1.324717957244746 * r.max(td.sqrt())
        } else {
            r
        };
        let mut x0 = x - s * rd;
        if x0 != x {
            for _ in 0..MAX_NEWTON_STEPS {
                x = x0;
                b1 = a * x + b;
                c2 = b1 * x + c;
                qd = (a * x + b1) * x + c2;
                q = c2 * x + d;
                x0 = if qd == 0.0 {
                    x
                } else {
                    x - q / (qd / (1.0 + MACHINE_EPSILON))
                };
                if s * x0 <= s * x {
                    break;
                }
            }
            if a.abs() * x * x > (d / x).abs() {
                c2 = -d / x;
                b1 = (c2 - c) / x;
            }
        }
    }

    let mut roots: Vec<f64> = solve_quadratic(a, b1, c2)
        .into_iter()
        .filter(|&r| residual(r).abs() < SOLUTION_EPSILON)
        .collect();
    if residual(x).abs() < SOLUTION_EPSILON {
        roots.push(x);
    }
    sort_dedup(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quad(a: f64, b: f64, c: f64, x: f64) -> f64 {
        a * x * x + b * x + c
    }

    fn cubic(a: f64, b: f64, c: f64, d: f64, x: f64) -> f64 {
        ((a * x + b) * x + c) * x + d
    }

    #[test]
    fn linear_basic_and_degenerate() {
        assert_eq!(solve_linear(2.0, -4.0), vec![2.0]);
        assert!(solve_linear(0.0, 1.0).is_empty());
        assert!(solve_linear(1e-15, 1.0).is_empty());
    }

    #[test]
    fn quadratic_two_roots() {
        let r = solve_quadratic(1.0, -3.0, 2.0);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 1.0).abs() < 1e-12);
        assert!((r[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_double_root_is_reported_once() {
        let r = solve_quadratic(1.0, -2.0, 1.0);
        assert_eq!(r.len(), 1);
        assert!((r[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn quadratic_falls_back_to_linear() {
        let r = solve_quadratic(0.0, 2.0, -1.0);
        assert_eq!(r, vec![0.5]);
    }

    #[test]
    fn quadratic_near_cancellation() {
        // b² ≈ 4ac: roots 1 and 1 + 1e-7
        let (r0, r1) = (1.0, 1.0 + 1e-7);
        let r = solve_quadratic(1.0, -(r0 + r1), r0 * r1);
        assert!(!r.is_empty());
        for x in r {
            assert!(quad(1.0, -(r0 + r1), r0 * r1, x).abs() < 1e-12);
        }
    }

    #[test]
    fn quadratic_scaled_coefficients() {
        // same roots at 1e12 scale
        let r = solve_quadratic(1e12, -3e12, 2e12);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 1.0).abs() < 1e-9);
        assert!((r[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3) = x³ - 6x² + 11x - 6
        let r = solve_cubic(1.0, -6.0, 11.0, -6.0);
        assert_eq!(r.len(), 3);
        for (got, want) in r.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
    }

    #[test]
    fn cubic_single_real_root() {
        // x³ + x + 1 has one real root near -0.6823
        let r = solve_cubic(1.0, 0.0, 1.0, 1.0);
        assert_eq!(r.len(), 1);
        assert!((r[0] + 0.682_327_803_828_019_3).abs() < 1e-9);
    }

    #[test]
    fn cubic_zero_constant_term() {
        // x(x - 1)(x + 1)
        let r = solve_cubic(1.0, 0.0, -1.0, 0.0);
        assert_eq!(r.len(), 3);
        assert!((r[0] + 1.0).abs() < 1e-12);
        assert!(r[1].abs() < 1e-12);
        assert!((r[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cubic_all_zero_has_no_roots() {
        assert!(solve_cubic(0.0, 0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn cubic_degrades_to_quadratic() {
        let r = solve_cubic(0.0, 1.0, -3.0, 2.0);
        assert_eq!(r.len(), 2);
    }

    proptest! {
        #[test]
        fn quadratic_roots_have_small_residual(
            a in prop_oneof![-10.0..-0.1f64, 0.1..10.0f64],
            b in -10.0..10.0f64,
            c in -10.0..10.0f64,
        ) {
            for x in solve_quadratic(a, b, c) {
                prop_assert!(quad(a, b, c, x).abs() < 1e-6, "a={a} b={b} c={c} x={x}");
            }
        }

        #[test]
        fn cubic_roots_have_small_residual(
            a in prop_oneof![-10.0..-0.1f64, 0.1..10.0f64],
            b in -10.0..10.0f64,
            c in -10.0..10.0f64,
            d in -10.0..10.0f64,
        ) {
            let roots = solve_cubic(a, b, c, d);
            // odd degree: a real root always exists
            prop_assert!(!roots.is_empty());
            for x in roots {
                prop_assert!(cubic(a, b, c, d, x).abs() < 1e-6, "x={x}");
            }
        }

        #[test]
        fn cubic_recovers_planted_roots(
            r0 in -5.0..5.0f64,
            gap1 in 0.1..3.0f64,
            gap2 in 0.1..3.0f64,
        ) {
            let (r1, r2) = (r0 + gap1, r0 + gap1 + gap2);
            let b = -(r0 + r1 + r2);
            let c = r0 * r1 + r0 * r2 + r1 * r2;
            let d = -(r0 * r1 * r2);
            let roots = solve_cubic(1.0, b, c, d);
            prop_assert_eq!(roots.len(), 3);
            for (got, want) in roots.iter().zip([r0, r1, r2]) {
                prop_assert!((got - want).abs() < 1e-5);
            }
        }
    }
}
