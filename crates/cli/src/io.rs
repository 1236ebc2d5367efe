//! Input readers: polygons (JSON) and paths (headerless CSV via polars).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gapnav::Vec2;
use polars::prelude::*;

/// `[[[x, y], ...], ...]`, wall first.
pub fn read_polygons<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Vec2>>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<Vec<[f64; 2]>> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing polygons from {}", path.display()))?;
    if raw.is_empty() {
        bail!("{} holds no polygons (the wall must come first)", path.display());
    }
    Ok(raw
        .into_iter()
        .map(|poly| poly.into_iter().map(|[x, y]| Vec2::new(x, y)).collect())
        .collect())
}

/// One waypoint per line, `x,y`, no header.
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vec2>> {
    let path = path.as_ref();
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select([
            col("column_1").cast(DataType::Float64).alias("x"),
            col("column_2").cast(DataType::Float64).alias("y"),
        ])
        .collect()
        .with_context(|| format!("reading waypoints from {}", path.display()))?;
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    let mut out = Vec::with_capacity(df.height());
    for (row, (x, y)) in xs.into_iter().zip(ys.into_iter()).enumerate() {
        match (x, y) {
            (Some(x), Some(y)) => out.push(Vec2::new(x, y)),
            _ => bail!("{}: waypoint {} is incomplete", path.display(), row + 1),
        }
    }
    tracing::info!(rows = out.len(), path = %path.display(), "waypoints");
    Ok(out)
}
