use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kartifex::cfg::ClipCfg;
use kartifex::curve::Curve2;
use kartifex::intersect::{intersections_with, Strategy};
use kartifex::region::Region2;
use kartifex::vec::Vec2;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "kartifex")]
#[command(about = "Curve intersection, sampling and region booleans on JSON geometry")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Op {
    Union,
    Intersection,
    Difference,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    FatLine,
    Subdivision,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::FatLine => Strategy::FatLine,
            StrategyArg::Subdivision => Strategy::Subdivision,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Combine two regions and write the result plus a provenance sidecar
    Boolean {
        #[arg(long, value_enum)]
        op: Op,
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Seed for the clip graph repair shuffles
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the `[t0, t1]` parameter pairs where two curves meet
    Intersect {
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        /// Defaults to the library's build-time strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },
    /// Write the adaptive polyline of a curve
    Sample {
        #[arg(long)]
        curve: PathBuf,
        #[arg(long, default_value_t = 0.5)]
        tolerance: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print whether a point lies inside (or on) a region
    Contains {
        #[arg(long)]
        region: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Print version and code revision
    Report,
}

/// Adaptive samples as parallel arrays.
#[derive(Debug, Serialize)]
struct Polyline {
    points: Vec<Vec2>,
    directions: Vec<Vec2>,
    t: Vec<f64>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Boolean { op, a, b, out, seed } => {
            let region = boolean(op, &a, &b, &out, seed)?;
            tracing::info!(rings = region.rings().len(), "wrote {}", out.display());
            Ok(())
        }
        Action::Intersect { a, b, strategy } => {
            let pairs = intersect(&a, &b, strategy_or_default(strategy))?;
            println!("{}", serde_json::to_string(&pairs)?);
            Ok(())
        }
        Action::Sample { curve, tolerance, out } => {
            let polyline = sample(&curve, tolerance, &out)?;
            tracing::info!(points = polyline.points.len(), "wrote {}", out.display());
            Ok(())
        }
        Action::Contains { region, x, y } => {
            println!("{}", contains(&region, Vec2::new(x, y))?);
            Ok(())
        }
        Action::Report => report(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("decoding {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?).with_context(|| format!("writing {}", path.display()))
}

fn boolean(op: Op, a: &Path, b: &Path, out: &Path, seed: Option<u64>) -> Result<Region2> {
    tracing::info!(?op, a = %a.display(), b = %b.display(), ?seed, "boolean");
    let ra: Region2 = read_json(a)?;
    let rb: Region2 = read_json(b)?;
    let mut cfg = ClipCfg::default();
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    let result = match op {
        Op::Union => ra.union_with(&rb, cfg),
        Op::Intersection => ra.intersection_with(&rb, cfg),
        Op::Difference => ra.difference_with(&rb, cfg),
    };
    write_json(out, &result)?;
    let payload = provenance::Payload::new(
        "boolean",
        json!({
            "op": format!("{op:?}").to_lowercase(),
            "a": a.to_string_lossy(),
            "b": b.to_string_lossy(),
            "seed": cfg.seed,
            "rings": result.rings().len(),
        }),
    );
    provenance::write_sidecar(out, payload)?;
    Ok(result)
}

/// An unset flag follows the library default, which the `subdivision` feature flips.
fn strategy_or_default(arg: Option<StrategyArg>) -> Strategy {
    arg.map_or_else(Strategy::default, Strategy::from)
}

fn intersect(a: &Path, b: &Path, strategy: Strategy) -> Result<Vec<[f64; 2]>> {
    tracing::info!(a = %a.display(), b = %b.display(), ?strategy, "intersect");
    let ca: Curve2 = read_json(a)?;
    let cb: Curve2 = read_json(b)?;
    Ok(intersections_with(&ca, &cb, strategy)
        .into_iter()
        .map(|t| [t.x, t.y])
        .collect())
}

fn sample(curve: &Path, tolerance: f64, out: &Path) -> Result<Polyline> {
    tracing::info!(curve = %curve.display(), tolerance, "sample");
    anyhow::ensure!(tolerance > 0.0, "tolerance must be positive, got {tolerance}");
    let c: Curve2 = read_json(curve)?;
    let mut polyline = Polyline {
        points: Vec::new(),
        directions: Vec::new(),
        t: Vec::new(),
    };
    for s in c.sample(tolerance) {
        polyline.points.push(s.position);
        polyline.directions.push(s.direction);
        polyline.t.push(s.t);
    }
    write_json(out, &polyline)?;
    let payload = provenance::Payload::new(
        "sample",
        json!({
            "curve": curve.to_string_lossy(),
            "tolerance": tolerance,
            "points": polyline.points.len(),
        }),
    );
    provenance::write_sidecar(out, payload)?;
    Ok(polyline)
}

fn contains(region: &Path, p: Vec2) -> Result<bool> {
    tracing::info!(region = %region.display(), x = p.x, y = p.y, "contains");
    let r: Region2 = read_json(region)?;
    Ok(r.contains(p))
}

fn report() -> Result<()> {
    let obj = json!({
        "version": kartifex::VERSION,
        "code_rev": provenance::current_git_rev(),
        "strategy": format!("{:?}", Strategy::default()),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kartifex::bounds::Box2;
    use kartifex::curve::line;
    use tempfile::tempdir;

    fn rect(dir: &Path, name: &str, lx: f64, ly: f64, ux: f64, uy: f64) -> PathBuf {
        let path = dir.join(name);
        let region = Box2::new(Vec2::new(lx, ly), Vec2::new(ux, uy)).outline().region();
        write_json(&path, &region).unwrap();
        path
    }

    #[test]
    fn boolean_writes_region_and_sidecar() {
        let dir = tempdir().unwrap();
        let a = rect(dir.path(), "a.json", 0.0, 0.0, 100.0, 100.0);
        let b = rect(dir.path(), "b.json", 50.0, 50.0, 150.0, 150.0);
        let out = dir.path().join("out/union.json");
        boolean(Op::Union, &a, &b, &out, Some(3)).unwrap();

        let region: Region2 = read_json(&out).unwrap();
        assert_eq!(region.rings().len(), 1);
        assert!((region.rings()[0].area - 17_500.0).abs() < 1e-6);
        let sidecar = dir.path().join("out/union.provenance.json");
        let doc: serde_json::Value = read_json(&sidecar).unwrap();
        assert_eq!(doc["command"], "boolean");
        assert_eq!(doc["params"]["op"], "union");
        assert_eq!(doc["params"]["seed"], 3);
    }

    #[test]
    fn difference_of_disjoint_regions_keeps_the_minuend() {
        let dir = tempdir().unwrap();
        let a = rect(dir.path(), "a.json", 0.0, 0.0, 1.0, 1.0);
        let b = rect(dir.path(), "b.json", 5.0, 5.0, 6.0, 6.0);
        let out = dir.path().join("diff.json");
        let region = boolean(Op::Difference, &a, &b, &out, None).unwrap();
        assert_eq!(region, read_json::<Region2>(&a).unwrap());
    }

    #[test]
    fn intersect_reports_parameter_pairs() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        write_json(&a, &line(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0))).unwrap();
        write_json(&b, &line(Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0))).unwrap();
        for strategy in [Strategy::FatLine, Strategy::Subdivision] {
            assert_eq!(intersect(&a, &b, strategy).unwrap(), vec![[0.5, 0.5]]);
        }
    }

    #[test]
    fn sample_writes_polyline_through_endpoints() {
        let dir = tempdir().unwrap();
        let curve = dir.path().join("c.json");
        let c = kartifex::curve::cubic(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(30.0, -20.0),
            Vec2::new(40.0, 10.0),
        );
        write_json(&curve, &c).unwrap();
        let out = dir.path().join("poly.json");
        let polyline = sample(&curve, 0.1, &out).unwrap();
        assert!(polyline.points.len() > 2);
        assert_eq!(polyline.points.first(), Some(&c.start()));
        assert_eq!(polyline.points.last(), Some(&c.end()));
        let doc: serde_json::Value = read_json(&out).unwrap();
        assert_eq!(doc["points"].as_array().map(Vec::len), Some(polyline.points.len()));
        assert!(sample(&curve, 0.0, &out).is_err());
    }

    #[test]
    fn contains_reads_region() {
        let dir = tempdir().unwrap();
        let region = rect(dir.path(), "r.json", 0.0, 0.0, 1.0, 1.0);
        assert!(contains(&region, Vec2::new(0.5, 0.5)).unwrap());
        assert!(!contains(&region, Vec2::new(-0.5, 0.5)).unwrap());
    }

    #[test]
    fn missing_input_names_the_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = contains(&missing, Vec2::ORIGIN).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn cli_parses_boolean_arguments() {
        let cmd = Cmd::try_parse_from([
            "kartifex", "boolean", "--op", "difference", "--a", "a.json", "--b", "b.json", "--out", "o.json",
        ])
        .unwrap();
        assert!(matches!(cmd.action, Action::Boolean { op: Op::Difference, seed: None, .. }));
        let cmd = Cmd::try_parse_from(["kartifex", "intersect", "--a", "a", "--b", "b", "--strategy", "subdivision"]).unwrap();
        assert!(matches!(cmd.action, Action::Intersect { strategy: Some(StrategyArg::Subdivision), .. }));
        let cmd = Cmd::try_parse_from(["kartifex", "intersect", "--a", "a", "--b", "b"]).unwrap();
        assert!(matches!(cmd.action, Action::Intersect { strategy: None, .. }));
    }

    #[test]
    fn intersect_strategy_defaults_to_the_library() {
        assert_eq!(strategy_or_default(None), Strategy::default());
        assert_eq!(strategy_or_default(Some(StrategyArg::FatLine)), Strategy::FatLine);
        assert_eq!(strategy_or_default(Some(StrategyArg::Subdivision)), Strategy::Subdivision);
    }
}
