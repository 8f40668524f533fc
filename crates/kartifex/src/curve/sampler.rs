//! Adaptive flattening of Bézier curves (the AGG recursive scheme).
//!
//! The recursion runs on an explicit work stack inside [`Samples`], so the
//! sequence is lazy and cloning the iterator restarts it from the same point.
//! Each frame carries the parameter of every control point alongside its
//! position; emitted samples report the parameter of the emitted point by the
//! same midpoint arithmetic. Frames past `recursion_limit` emit their end
//! point unconditionally, so the cap coarsens the output instead of dropping it.

use std::f64::consts::PI;

use super::Curve2;
use crate::cfg::SamplerCfg;
use crate::vec::Vec2;

/// One point of an adaptive polyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub position: Vec2,
    /// Local direction (chord of the frame that emitted the point, unnormalized).
    pub direction: Vec2,
    pub t: f64,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    p: Vec2,
    t: f64,
}

impl Node {
    #[inline]
    fn mid(self, o: Node) -> Node {
        Node {
            p: (self.p + o.p) * 0.5,
            t: (self.t + o.t) * 0.5,
        }
    }
}

#[derive(Clone, Debug)]
enum Frame {
    Quadratic([Node; 3], u32),
    Cubic([Node; 4], u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    First,
    Body,
    Last,
    Done,
}

/// Lazy adaptive sample sequence; see [`Curve2::sample`].
#[derive(Clone, Debug)]
pub struct Samples {
    cfg: SamplerCfg,
    tolerance_sq: f64,
    first: Sample,
    last: Sample,
    stack: Vec<Frame>,
    pending: Vec<Sample>,
    previous: Option<Vec2>,
    stage: Stage,
}

#[inline]
fn squared_distance(a: Vec2, b: Vec2) -> f64 {
    (b - a).length_squared()
}

/// Angle between directions `a → b` and `b → c`, folded into `[0, π]`.
fn turn(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let da = ((c.y - b.y).atan2(c.x - b.x) - (b.y - a.y).atan2(b.x - a.x)).abs();
    if da >= PI {
        2.0 * PI - da
    } else {
        da
    }
}

impl Samples {
    pub(crate) fn new(curve: &Curve2, cfg: &SamplerCfg) -> Self {
        let (first, last, stack) = match curve {
            Curve2::Line(c) => {
                let d = c.p1 - c.p0;
                let first = Sample { position: c.p0, direction: d, t: 0.0 };
                let last = Sample { position: c.p1, direction: d, t: 1.0 };
                (first, last, Vec::new())
            }
            Curve2::Quadratic(c) => {
                let nodes = [
                    Node { p: c.p0, t: 0.0 },
                    Node { p: c.p1, t: 0.5 },
                    Node { p: c.p2, t: 1.0 },
                ];
                let first = Sample { position: c.p0, direction: c.p1 - c.p0, t: 0.0 };
                let last = Sample { position: c.p2, direction: c.p2 - c.p1, t: 1.0 };
                (first, last, vec![Frame::Quadratic(nodes, 0)])
            }
            Curve2::Cubic(c) => {
                let nodes = [
                    Node { p: c.p0, t: 0.0 },
                    Node { p: c.p1, t: 1.0 / 3.0 },
                    Node { p: c.p2, t: 2.0 / 3.0 },
                    Node { p: c.p3, t: 1.0 },
                ];
                let first = Sample { position: c.p0, direction: c.p1 - c.p0, t: 0.0 };
                let last = Sample { position: c.p3, direction: c.p3 - c.p2, t: 1.0 };
                (first, last, vec![Frame::Cubic(nodes, 0)])
            }
        };
        Self {
            cfg: *cfg,
            tolerance_sq: cfg.distance_tolerance * cfg.distance_tolerance,
            first,
            last,
            stack,
            pending: Vec::with_capacity(2),
            previous: None,
            stage: Stage::First,
        }
    }

    fn queue(&mut self, n: Node, direction: Vec2) {
        self.pending.push(Sample { position: n.p, direction, t: n.t });
    }

    fn emit(&mut self, s: Sample) -> Option<Sample> {
        match self.previous {
            Some(p) if squared_distance(p, s.position) <= 0.0 => None,
            _ => {
                self.previous = Some(s.position);
                Some(s)
            }
        }
    }

    fn step_quadratic(&mut self, [n1, n2, n3]: [Node; 3], level: u32) {
        if level > self.cfg.recursion_limit {
            // finest allowed polyline
            self.queue(n3, n3.p - n1.p);
            return;
        }
        let (x1, x2, x3) = (n1.p, n2.p, n3.p);
        let n12 = n1.mid(n2);
        let n23 = n2.mid(n3);
        let n123 = n12.mid(n23);

        let dx = x3.x - x1.x;
        let dy = x3.y - x1.y;
        let d = ((x2.x - x3.x) * dy - (x2.y - x3.y) * dx).abs();

        if d > self.cfg.collinearity_epsilon {
            if d * d <= self.tolerance_sq * (dx * dx + dy * dy) {
                if self.cfg.angle_tolerance < self.cfg.angle_tolerance_epsilon
                    || turn(x1, x2, x3) < self.cfg.angle_tolerance
                {
                    self.queue(n123, x3 - x1);
                    return;
                }
            }
        } else {
            let k = dx * dx + dy * dy;
            let d = if k == 0.0 {
                squared_distance(x1, x2)
            } else {
                let d = ((x2.x - x1.x) * dx + (x2.y - x1.y) * dy) / k;
                if d > 0.0 && d < 1.0 {
                    // 1---2---3, the endpoints suffice
                    return;
                }
                if d <= 0.0 {
                    squared_distance(x2, x1)
                } else {
                    squared_distance(x2, x3)
                }
            };
            if d < self.tolerance_sq {
                self.queue(n2, x3 - x1);
                return;
            }
        }

        self.stack.push(Frame::Quadratic([n123, n23, n3], level + 1));
        self.stack.push(Frame::Quadratic([n1, n12, n123], level + 1));
    }

    fn step_cubic(&mut self, [n1, n2, n3, n4]: [Node; 4], level: u32) {
        if level > self.cfg.recursion_limit {
            self.queue(n4, n4.p - n1.p);
            return;
        }
        let (x1, x2, x3, x4) = (n1.p, n2.p, n3.p, n4.p);
        let n12 = n1.mid(n2);
        let n23 = n2.mid(n3);
        let n34 = n3.mid(n4);
        let n123 = n12.mid(n23);
        let n234 = n23.mid(n34);
        let n1234 = n123.mid(n234);

        let dx = x4.x - x1.x;
        let dy = x4.y - x1.y;
        let chord_sq = dx * dx + dy * dy;
        let mut d2 = ((x2.x - x4.x) * dy - (x2.y - x4.y) * dx).abs();
        let mut d3 = ((x3.x - x4.x) * dy - (x3.y - x4.y) * dx).abs();

        let eps = self.cfg.collinearity_epsilon;
        let cusp = self.cfg.cusp_limit;
        let no_angle = self.cfg.angle_tolerance < self.cfg.angle_tolerance_epsilon;
        let dir = x4 - x1;

        match (d2 > eps, d3 > eps) {
            (false, false) => {
                // all collinear or p1 == p4
                if chord_sq == 0.0 {
                    d2 = squared_distance(x1, x2);
                    d3 = squared_distance(x4, x3);
                } else {
                    let k = 1.0 / chord_sq;
                    d2 = k * ((x2.x - x1.x) * dx + (x2.y - x1.y) * dy);
                    d3 = k * ((x3.x - x1.x) * dx + (x3.y - x1.y) * dy);
                    if d2 > 0.0 && d2 < 1.0 && d3 > 0.0 && d3 < 1.0 {
                        // 1---2---3---4, the endpoints suffice
                        return;
                    }
                    d2 = if d2 <= 0.0 {
                        squared_distance(x2, x1)
                    } else if d2 >= 1.0 {
                        squared_distance(x2, x4)
                    } else {
                        squared_distance(x2, Vec2::new(x1.x + d2 * dx, x1.y + d2 * dy))
                    };
                    d3 = if d3 <= 0.0 {
                        squared_distance(x3, x1)
                    } else if d3 >= 1.0 {
                        squared_distance(x3, x4)
                    } else {
                        squared_distance(x3, Vec2::new(x1.x + d3 * dx, x1.y + d3 * dy))
                    };
                }
                if d2 > d3 {
                    if d2 < self.tolerance_sq {
                        self.queue(n2, dir);
                        return;
                    }
                } else if d3 < self.tolerance_sq {
                    self.queue(n3, dir);
                    return;
                }
            }
            (false, true) => {
                // p1, p2, p4 collinear; p3 decides
                if d3 * d3 <= self.tolerance_sq * chord_sq {
                    if no_angle {
                        self.queue(n23, dir);
                        return;
                    }
                    let da = turn(x2, x3, x4);
                    if da < self.cfg.angle_tolerance {
                        self.queue(n2, dir);
                        self.queue(n3, dir);
                        return;
                    }
                    if cusp != 0.0 && da > cusp {
                        self.queue(n3, dir);
                        return;
                    }
                }
            }
            (true, false) => {
                // p1, p3, p4 collinear; p2 decides
                if d2 * d2 <= self.tolerance_sq * chord_sq {
                    if no_angle {
                        self.queue(n23, dir);
                        return;
                    }
                    let da = turn(x1, x2, x3);
                    if da < self.cfg.angle_tolerance {
                        self.queue(n2, dir);
                        self.queue(n3, dir);
                        return;
                    }
                    if cusp != 0.0 && da > cusp {
                        self.queue(n2, dir);
                        return;
                    }
                }
            }
            (true, true) => {
                if (d2 + d3) * (d2 + d3) <= self.tolerance_sq * chord_sq {
                    if no_angle {
                        self.queue(n23, dir);
                        return;
                    }
                    let da1 = turn(x1, x2, x3);
                    let da2 = turn(x2, x3, x4);
                    if da1 + da2 < self.cfg.angle_tolerance {
                        self.queue(n23, dir);
                        return;
                    }
                    if cusp != 0.0 {
                        if da1 > cusp {
                            self.queue(n2, dir);
                            return;
                        }
                        if da2 > cusp {
                            self.queue(n3, dir);
                            return;
                        }
                    }
                }
            }
        }

        self.stack.push(Frame::Cubic([n1234, n234, n34, n4], level + 1));
        self.stack.push(Frame::Cubic([n1, n12, n123, n1234], level + 1));
    }
}

impl Iterator for Samples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        loop {
            match self.stage {
                Stage::First => {
                    self.stage = Stage::Body;
                    let first = self.first;
                    return self.emit(first);
                }
                Stage::Body => {
                    if !self.pending.is_empty() {
                        let s = self.pending.remove(0);
                        if let Some(s) = self.emit(s) {
                            return Some(s);
                        }
                        continue;
                    }
                    match self.stack.pop() {
                        Some(Frame::Quadratic(nodes, level)) => self.step_quadratic(nodes, level),
                        Some(Frame::Cubic(nodes, level)) => self.step_cubic(nodes, level),
                        None => self.stage = Stage::Last,
                    }
                }
                Stage::Last => {
                    self.stage = Stage::Done;
                    let last = self.last;
                    if let Some(s) = self.emit(last) {
                        return Some(s);
                    }
                }
                Stage::Done => return None,
            }
        }
    }
}
