use super::*;
use crate::cfg::SamplerCfg;
use proptest::prelude::*;

fn v(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

fn near(a: Vec2, b: Vec2, eps: f64) -> bool {
    Vec2::approx_eq(a, b, eps)
}

fn sample_curves() -> Vec<Curve2> {
    vec![
        line(v(0.0, 0.0), v(3.0, 4.0)),
        quadratic(v(0.0, 0.0), v(1.0, 2.0), v(2.0, 0.0)),
        cubic(v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0)),
        cubic(v(0.0, 0.0), v(100.0, 0.0), v(0.0, 100.0), v(100.0, 100.0)),
    ]
}

#[test]
fn endpoints_are_exact() {
    for c in sample_curves() {
        assert_eq!(c.position(0.0), c.start());
        assert_eq!(c.position(1.0), c.end());
    }
}

#[test]
fn split_halves_meet_at_the_split_point() {
    for c in sample_curves() {
        let [a, b] = c.split(0.3);
        let p = c.position(0.3);
        assert_eq!(a.end(), p);
        assert_eq!(b.start(), p);
        assert!(near(a.position(0.5), c.position(0.15), 1e-9));
        assert!(near(b.position(0.5), c.position(0.65), 1e-9));
    }
}

#[test]
#[should_panic]
fn split_rejects_endpoint_parameters() {
    let _ = line(v(0.0, 0.0), v(1.0, 0.0)).split(1.0);
}

#[test]
fn range_reparameterizes_the_interval() {
    for c in sample_curves() {
        let r = c.range(0.2, 0.7);
        assert_eq!(r.start(), c.position(0.2));
        assert_eq!(r.end(), c.position(0.7));
        for i in 0..=10 {
            let s = i as f64 / 10.0;
            assert!(near(r.position(s), c.position(0.2 + 0.5 * s), 1e-9));
        }
        assert_eq!(c.range(0.0, 1.0), c);
    }
}

#[test]
fn split_at_dedupes_and_ignores_endpoints() {
    let c = cubic(v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0));
    let parts = c.split_at(&[0.75, 0.0, 0.25, 0.25, 1.0]);
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].start(), c.start());
    assert_eq!(parts[0].end(), c.position(0.25));
    assert_eq!(parts[1].start(), c.position(0.25));
    assert_eq!(parts[1].end(), c.position(0.75));
    assert_eq!(parts[2].end(), c.end());
    assert_eq!(c.split_at(&[0.0, 1.0]), vec![c]);
}

#[test]
fn unit_square_area_from_lines() {
    let pts = [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)];
    let area: f64 = (0..4).map(|i| line(pts[i], pts[(i + 1) % 4]).signed_area()).sum();
    assert!((area - 1.0).abs() < 1e-12);
}

#[test]
fn bezier_areas_match_their_polylines() {
    // closing the curve with its chord gives the area under the arch
    let q = quadratic(v(0.0, 0.0), v(1.0, 2.0), v(2.0, 0.0));
    let arch = q.signed_area() + line(q.end(), q.start()).signed_area();
    // 2/3 of the control triangle, clockwise here
    assert!((arch.abs() - 4.0 / 3.0).abs() < 1e-12);
    let shifted = q.transform(&crate::vec::translate(110.0, -40.0));
    let moved = shifted.signed_area() + line(shifted.end(), shifted.start()).signed_area();
    assert!((moved - arch).abs() < 1e-9);

    let c = cubic(v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0));
    let arch = c.signed_area() + line(c.end(), c.start()).signed_area();
    let poly = c.subdivide(1e-7);
    let approx: f64 = poly
        .windows(2)
        .map(|w| line(w[0], w[1]).signed_area())
        .sum::<f64>()
        + line(c.end(), c.start()).signed_area();
    assert!((arch - approx).abs() < 1e-6);
}

#[test]
fn lengths() {
    assert_eq!(line(v(0.0, 0.0), v(3.0, 4.0)).length(), 5.0);
    // collinear quadratic: length is the chord
    let q = quadratic(v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0));
    assert!((q.length() - 2.0).abs() < 1e-12);
    // quarter circle approximation, radius 1
    let k = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
    let c = cubic(v(1.0, 0.0), v(1.0, k), v(k, 1.0), v(0.0, 1.0));
    assert!((c.length() - std::f64::consts::FRAC_PI_2).abs() < 1e-3);
}

#[test]
fn bounds_include_extrema() {
    let q = quadratic(v(0.0, 0.0), v(1.0, 2.0), v(2.0, 0.0));
    let b = q.bounds();
    assert!((b.uy - 1.0).abs() < 1e-12);
    assert_eq!(b.lx, 0.0);
    assert_eq!(b.ux, 2.0);

    let c = cubic(v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0));
    assert!((c.bounds().uy - 0.75).abs() < 1e-12);
}

#[test]
fn inflections_split_into_monotonic_pieces() {
    let c = cubic(v(0.0, 0.0), v(100.0, 0.0), v(0.0, 100.0), v(100.0, 100.0));
    let ts = c.inflections();
    assert!(!ts.is_empty());
    assert!(ts.windows(2).all(|w| w[0] < w[1]));
    for piece in c.split_at(&ts) {
        let dm = piece.direction(0.5);
        for i in 1..20 {
            let d = piece.direction(i as f64 / 20.0);
            let slack = -1e-9 * d.length() * dm.length();
            assert!(d.x * dm.x >= slack && d.y * dm.y >= slack);
        }
    }
    assert!(line(v(0.0, 0.0), v(1.0, 1.0)).inflections().is_empty());
}

#[test]
fn flatness() {
    assert!(quadratic(v(0.0, 0.0), v(1.0, 1e-7), v(2.0, 0.0)).is_flat(1e-5));
    assert!(!quadratic(v(0.0, 0.0), v(1.0, 1.0), v(2.0, 0.0)).is_flat(1e-5));
    assert!(cubic(v(0.0, 0.0), v(1.0, 1e-7), v(2.0, -1e-7), v(3.0, 0.0)).is_flat(1e-5));
    assert!(line(v(0.0, 0.0), v(1.0, 0.0)).is_flat(0.0));
}

#[test]
fn endpoints_keep_tangents() {
    let q = quadratic(v(0.0, 0.0), v(1.0, 1.0), v(2.0, 0.0));
    let moved = q.endpoints(v(0.0, 0.0), v(4.0, 0.0));
    assert_eq!(moved.start(), v(0.0, 0.0));
    assert_eq!(moved.end(), v(4.0, 0.0));
    assert!(near(moved.direction(0.0).norm(), q.direction(0.0).norm(), 1e-12));
    assert!(near(moved.direction(1.0).norm(), q.direction(1.0).norm(), 1e-12));

    // parallel tangents cannot meet; the control point falls back to the chord midpoint
    let flat = quadratic(v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0));
    let Curve2::Quadratic(moved) = flat.endpoints(v(0.0, 0.0), v(0.0, 2.0)) else {
        panic!("variant changed");
    };
    assert_eq!(moved.p1, v(0.0, 1.0));

    let c = cubic(v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0));
    let Curve2::Cubic(moved) = c.endpoints(v(1.0, 1.0), v(2.0, 1.0)) else {
        panic!("variant changed");
    };
    assert_eq!(moved.p1, v(1.0, 2.0));
    assert_eq!(moved.p2, v(2.0, 2.0));
}

#[test]
fn nearest_point_recovers_parameters() {
    for c in sample_curves() {
        for &t in &[0.1, 0.35, 0.5, 0.8] {
            let p = c.position(t);
            let found = c.nearest_point(p);
            assert!(near(c.position(found), p, 1e-6), "{c:?} t={t} found={found}");
        }
    }
    // beyond the end of a line
    assert_eq!(line(v(0.0, 0.0), v(1.0, 0.0)).nearest_point(v(2.0, 5.0)), 2.0);
}

#[test]
fn reverse_and_transform() {
    for c in sample_curves() {
        let r = c.reverse();
        assert_eq!(r.start(), c.end());
        assert!(near(r.position(0.3), c.position(0.7), 1e-12));
        assert!((r.signed_area() + c.signed_area()).abs() < 1e-9);
        let m = crate::vec::translate(1.0, 2.0);
        assert!(near(c.transform(&m).position(0.4), c.position(0.4) + v(1.0, 2.0), 1e-9));
    }
}

#[test]
fn subdivide_error_bound() {
    let c = cubic(v(0.0, 0.0), v(0.0, 100.0), v(100.0, 100.0), v(100.0, 0.0));
    let coarse = c.subdivide(1.0);
    let fine = c.subdivide(0.01);
    assert!(fine.len() > coarse.len());
    assert_eq!(coarse[0], c.start());
    assert_eq!(*coarse.last().unwrap(), c.end());
    assert_eq!(line(v(0.0, 0.0), v(1.0, 1.0)).subdivide(0.1).len(), 2);
}

#[test]
fn approximate_cubic_with_quadratics() {
    let c = CubicBezier2::new(v(0.0, 0.0), v(0.0, 100.0), v(100.0, 100.0), v(100.0, 0.0));
    let qs = c.approximate(0.1);
    assert!(qs.len() > 1);
    assert_eq!(qs[0].p0, c.p0);
    assert_eq!(qs.last().unwrap().p2, c.p3);
    for w in qs.windows(2) {
        assert_eq!(w[0].p2, w[1].p0);
    }
    // every quadratic midpoint lies close to the cubic
    for q in &qs {
        let m = q.position(0.5);
        let t = c.nearest_point(m);
        assert!((c.position(t) - m).length() < 0.1 + 1e-9);
    }
    // an elevated quadratic round-trips in one piece
    let q = QuadraticBezier2::new(v(0.0, 0.0), v(1.0, 2.0), v(2.0, 0.0));
    let back = q.to_cubic().approximate(1e-9);
    assert_eq!(back.len(), 1);
    assert!(near(back[0].p1, q.p1, 1e-12));
}

#[test]
fn line_samples_are_its_endpoints() {
    let l = line(v(0.0, 0.0), v(10.0, 0.0));
    assert_eq!(l.adaptive_positions(0.1), vec![v(0.0, 0.0), v(10.0, 0.0)]);
    assert_eq!(line(v(1.0, 1.0), v(1.0, 1.0)).adaptive_positions(0.1).len(), 1);
}

#[test]
fn samples_start_and_end_on_the_curve() {
    for c in sample_curves() {
        let pts = c.adaptive_positions_with_t(0.05);
        assert_eq!(pts[0], (c.start(), 0.0));
        assert_eq!(*pts.last().unwrap(), (c.end(), 1.0));
        assert!(pts.windows(2).all(|w| w[0].1 <= w[1].1));
        let dirs = c.adaptive_positions_and_directions(0.05);
        assert_eq!(dirs.len(), pts.len());
    }
}

#[test]
fn sample_iterator_restarts_when_cloned() {
    let c = cubic(v(0.0, 0.0), v(0.0, 100.0), v(100.0, 100.0), v(100.0, 0.0));
    let mut it = c.sample(0.25);
    it.next();
    it.next();
    let rest: Vec<Sample> = it.clone().collect();
    let again: Vec<Sample> = it.collect();
    assert_eq!(rest, again);
    assert_eq!(c.adaptive_positions(0.25), c.adaptive_positions(0.25));
}

#[test]
fn tighter_tolerance_gives_more_points() {
    let c = cubic(v(0.0, 0.0), v(0.0, 100.0), v(100.0, 100.0), v(100.0, 0.0));
    assert!(c.adaptive_positions(0.01).len() > c.adaptive_positions(1.0).len());
    let cfg = SamplerCfg {
        recursion_limit: 1,
        ..SamplerCfg::with_tolerance(1e-6)
    };
    assert!(c.sample_with(&cfg).count() <= 2 + 4);
}

#[test]
fn depth_cap_keeps_the_finest_polyline() {
    for s in [100.0, 500.0] {
        let c = cubic(v(0.0, 0.0), v(0.0, s), v(s, s), v(s, 0.0));
        let pts = c.adaptive_positions(0.001);
        // 2^9 segments at the cap
        assert_eq!(pts.len(), 513);
        assert!(deviation(&c, &pts) < s * 1e-5);
    }
    let q = quadratic(v(0.0, 0.0), v(250.0, 500.0), v(500.0, 0.0));
    let pts = q.adaptive_positions(1e-4);
    assert!(pts.len() > 256);
    assert!(deviation(&q, &pts) < 0.002);
    let capped = SamplerCfg {
        recursion_limit: 1,
        ..SamplerCfg::with_tolerance(1e-6)
    };
    assert_eq!(q.sample_with(&capped).count(), 5);
}

fn deviation(c: &Curve2, pts: &[Vec2]) -> f64 {
    let seg = |p: Vec2, a: Vec2, b: Vec2| {
        let d = b - a;
        let l = d.length_squared();
        let t = if l == 0.0 { 0.0 } else { ((p - a).dot(d) / l).clamp(0.0, 1.0) };
        (p - a.lerp(b, t)).length()
    };
    (0..=400)
        .map(|i| {
            let p = c.position(i as f64 / 400.0);
            pts.windows(2)
                .map(|w| seg(p, w[0], w[1]))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max)
}

/// Control points placed over the chord, offset by at most half its length.
fn arch(p0: Vec2, p3: Vec2, u: (f64, f64), h: (f64, f64)) -> (Curve2, Curve2) {
    let d = p3 - p0;
    let n = v(-d.y, d.x);
    let c1 = p0 + d * u.0 + n * h.0;
    let c2 = p0 + d * u.1 + n * h.1;
    (quadratic(p0, c1, p3), cubic(p0, c1, c2, p3))
}

proptest! {
    #[test]
    fn adaptive_polyline_stays_within_tolerance(
        x0 in -100.0..100.0f64, y0 in -100.0..100.0f64,
        x3 in -100.0..100.0f64, y3 in -100.0..100.0f64,
        u1 in 0.05..0.5f64, u2 in 0.5..0.95f64,
        h1 in -0.5..0.5f64, h2 in -0.5..0.5f64,
        tol in prop_oneof![Just(0.001), Just(0.01), Just(0.1), Just(0.25), Just(0.5), Just(1.0)],
    ) {
        prop_assume!((v(x3, y3) - v(x0, y0)).length() > 1.0);
        let (q, c) = arch(v(x0, y0), v(x3, y3), (u1, u2), (h1, h2));
        for curve in [q, c] {
            let pts = curve.adaptive_positions(tol);
            prop_assert!(deviation(&curve, &pts) <= tol, "{curve:?}");
        }
    }
}
