use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use gapnav::prelude::*;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "gapnav-cli")]
#[command(about = "Build visibility structures and replay gap tracking along paths")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build the static structure; write snapshot JSON, adjacency CSV and provenance
    Build {
        /// Polygons JSON, wall first
        #[arg(long)]
        polygons: PathBuf,
        /// Snapshot path; the CSV lands next to it with extension `.csv`
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 1)]
        workers: usize,
        #[arg(long, default_value_t = 10)]
        batch_size: usize,
    },
    /// Walk a robot along a waypoint file; one JSON line per segment on stdout
    Walk {
        #[arg(long)]
        polygons: PathBuf,
        #[arg(long)]
        path: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build {
            polygons,
            out,
            workers,
            batch_size,
        } => {
            let cfg = BuildCfg {
                workers,
                batch_size,
            };
            build(&polygons, &out, &cfg).map(|_| ())
        }
        Action::Walk { polygons, path } => {
            for line in walk(&polygons, &path)? {
                println!("{}", serde_json::to_string(&line)?);
            }
            Ok(())
        }
        Action::Report => {
            let obj = provenance::block(json!({}));
            println!("{}", serde_json::to_string_pretty(&obj)?);
            Ok(())
        }
    }
}

/// Returns the paths written: snapshot, CSV, provenance.
fn build(polygons: &Path, out: &Path, cfg: &BuildCfg) -> Result<[PathBuf; 3]> {
    tracing::info!(polygons = %polygons.display(), out = %out.display(), workers = cfg.workers, "build");
    let polys = io::read_polygons(polygons)?;
    let vg = VisGraph::build(&polys, cfg)
        .with_context(|| format!("building visibility graph for {}", polygons.display()))?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&vg.snapshot())?)
        .with_context(|| format!("writing {}", out.display()))?;
    let csv = out.with_extension("csv");
    fs::write(&csv, vg.chain_adjacency_csv())
        .with_context(|| format!("writing {}", csv.display()))?;

    let payload = provenance::Payload::new(json!({
        "polygons": polygons.to_string_lossy(),
        "workers": cfg.workers,
        "batch_size": cfg.batch_size,
        "bitangents": vg.bitangents().len(),
        "chains": vg.chains().len(),
    }))
    .with_sibling(&csv);
    let prov = provenance::write_sidecar(out, payload)?;
    Ok([out.to_path_buf(), csv, prov])
}

/// One record per path segment: events crossed and the gaps held afterwards.
fn walk(polygons: &Path, path: &Path) -> Result<Vec<Value>> {
    let polys = io::read_polygons(polygons)?;
    let waypoints = io::read_path(path)?;
    let Some(&start) = waypoints.first() else {
        bail!("{} holds no waypoints", path.display());
    };
    let vg = VisGraph::build(&polys, &BuildCfg::default())
        .with_context(|| format!("building visibility graph for {}", polygons.display()))?;
    if !vg.point_valid(start) {
        bail!("start ({}, {}) is not in free space", start.x, start.y);
    }

    let mut robot = Robot::new(&vg, start).context("placing robot")?;
    let mut lines = Vec::with_capacity(waypoints.len());
    for (i, w) in waypoints.windows(2).enumerate() {
        let seg = Segment::new(w[0], w[1]);
        if vg.graph().segment_blocked(seg) {
            bail!(
                "segment {} ({}, {}) -> ({}, {}) runs through an obstacle",
                i,
                seg.p1.x,
                seg.p1.y,
                seg.p2.x,
                seg.p2.y
            );
        }
        let events = robot
            .move_along(seg)
            .with_context(|| format!("moving along segment {i}"))?;
        let gaps: Vec<Value> = robot
            .gaps()
            .iter()
            .map(|g| {
                json!({
                    "id": g.id.0,
                    "identity": robot.identity_of(g.id).0,
                    "vertex": [vg.graph().pos(g.vertex).x, vg.graph().pos(g.vertex).y],
                    "side": g.side,
                })
            })
            .collect();
        lines.push(json!({
            "segment": i,
            "from": [seg.p1.x, seg.p1.y],
            "to": [seg.p2.x, seg.p2.y],
            "events": events
                .iter()
                .map(|e| json!({"kind": e.kind(), "at": [e.pos().x, e.pos().y]}))
                .collect::<Vec<_>>(),
            "gaps": gaps,
        }));
    }
    tracing::info!(segments = lines.len(), gaps = robot.gaps().len(), "walk done");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CHEVRON: &str =
        "[[[0,0],[100,0],[100,100],[0,100]],[[40,40],[60,50],[40,60],[45,50]]]";

    #[test]
    fn build_writes_snapshot_csv_and_sidecar() {
        let dir = tempdir().unwrap();
        let polys = dir.path().join("scene.json");
        fs::write(&polys, CHEVRON).unwrap();
        let out = dir.path().join("out").join("snap.json");
        let [snap, csv, prov] = build(&polys, &out, &BuildCfg::default()).unwrap();

        let parsed: Value = serde_json::from_slice(&fs::read(&snap).unwrap()).unwrap();
        assert_eq!(parsed["version"], gapnav::VERSION);
        assert_eq!(parsed["bitangents"].as_array().unwrap().len(), 1);
        assert_eq!(fs::read_to_string(&csv).unwrap(), "0,-1,0,1\n0,1,0,-1\n");
        assert!(prov.ends_with("snap.provenance.json"));
    }

    #[test]
    fn walk_reports_events_per_segment() {
        let dir = tempdir().unwrap();
        let polys = dir.path().join("scene.json");
        fs::write(&polys, CHEVRON).unwrap();
        let path = dir.path().join("path.txt");
        fs::write(&path, "20,20\n35,20\n45,20\n").unwrap();

        let lines = walk(&polys, &path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["events"][0]["kind"], "Appear");
        assert_eq!(lines[0]["gaps"].as_array().unwrap().len(), 3);
        assert_eq!(lines[1]["events"][0]["kind"], "Merge");
        assert_eq!(lines[1]["gaps"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn walk_rejects_blocked_segments() {
        let dir = tempdir().unwrap();
        let polys = dir.path().join("scene.json");
        fs::write(&polys, CHEVRON).unwrap();
        let path = dir.path().join("path.txt");
        fs::write(&path, "50,30\n50,70\n").unwrap();
        let err = walk(&polys, &path).unwrap_err();
        assert!(err.to_string().contains("obstacle"));
    }
}
