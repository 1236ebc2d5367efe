//! Random scenes and corridor walks (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic inputs for property tests and benches: a square wall with
//!   one star-shaped obstacle per grid cell, plus polyline paths that stay in
//!   the corridors between cells.
//!
//! Model
//! - Obstacle in cell `(i, j)`: `n` sorted, jittered angles around the cell
//!   center with jittered radii. Sorted angles keep the polygon simple; radial
//!   jitter produces a mix of convex and reflex vertices.
//! - Radii stay below `0.75 · cell/2`, so the lines `x = k · cell`,
//!   `y = k · cell` (and the margin lines next to the wall) are obstacle free.
//! - Each cell draws from its own `ReplayToken { seed, index }`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Vec2;

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
                rng.gen_range(lo..=max.max(lo))
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SceneCfg {
    /// Side length of the square wall (lower-left corner at the origin).
    pub size: f64,
    /// Cells per side; one obstacle per cell.
    pub grid: usize,
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing. Clamped to [0, 0.45].
    pub angle_jitter_frac: f64,
    /// Radius = `0.6 · cell/2 · (1 + u)`, `u ∈ [-radial_jitter, radial_jitter]`.
    /// Clamped to [0, 0.25].
    pub radial_jitter: f64,
}

impl Default for SceneCfg {
    fn default() -> Self {
        Self {
            size: 100.0,
            grid: 3,
            vertex_count: VertexCount::Uniform { min: 3, max: 7 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
        }
    }
}

impl SceneCfg {
    #[inline]
    pub fn cell(&self) -> f64 {
        self.size / self.grid.max(1) as f64
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// Wall first, then one obstacle per cell in row-major order.
pub fn random_scene(cfg: &SceneCfg, seed: u64) -> Vec<Vec<Vec2>> {
    let s = cfg.size;
    let mut polys = vec![vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(s, 0.0),
        Vec2::new(s, s),
        Vec2::new(0.0, s),
    ]];
    let grid = cfg.grid.max(1);
    for j in 0..grid {
        for i in 0..grid {
            let tok = ReplayToken {
                seed,
                index: (j * grid + i) as u64,
            };
            polys.push(draw_obstacle(cfg, i, j, tok));
        }
    }
    polys
}

fn draw_obstacle(cfg: &SceneCfg, i: usize, j: usize, tok: ReplayToken) -> Vec<Vec2> {
    let mut rng = tok.rng();
    let cell = cfg.cell();
    let center = Vec2::new((i as f64 + 0.5) * cell, (j as f64 + 0.5) * cell);
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.45);
    let rj = cfg.radial_jitter.clamp(0.0, 0.25);
    let r0 = 0.6 * cell / 2.0;
    let delta = std::f64::consts::TAU / n as f64;
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    let mut angles: Vec<f64> = (0..n)
        .map(|k| phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta)
        .collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    angles
        .into_iter()
        .map(|th| {
            let r = r0 * (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj);
            center + Vec2::new(th.cos(), th.sin()) * r
        })
        .collect()
}

/// Random walk of `len` waypoints on the corridor lattice of `cfg`.
///
/// Lattice lines sit at `k · cell` for interior `k` and at a small margin
/// inside the wall for `k = 0` and `k = grid`; waypoints are jittered slightly
/// off the lines and consecutive waypoints are lattice neighbours.
pub fn random_corridor_walk(cfg: &SceneCfg, seed: u64, len: usize) -> Vec<Vec2> {
    let grid = cfg.grid.max(1) as i64;
    let cell = cfg.cell();
    let margin = 0.06 * cell;
    let jitter = 0.03 * cell;
    let coord = |k: i64| (k as f64 * cell).clamp(margin, cfg.size - margin);

    let mut rng = ReplayToken {
        seed,
        index: u64::MAX,
    }
    .rng();
    let (mut k, mut l) = (rng.gen_range(0..=grid), rng.gen_range(0..=grid));
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let jx = (rng.gen::<f64>() * 2.0 - 1.0) * jitter;
        let jy = (rng.gen::<f64>() * 2.0 - 1.0) * jitter;
        out.push(Vec2::new(coord(k) + jx, coord(l) + jy));
        loop {
            let (dk, dl) = match rng.gen_range(0..4) {
                0 => (1, 0),
                1 => (-1, 0),
                2 => (0, 1),
                _ => (0, -1),
            };
            let (nk, nl) = (k + dk, l + dl);
            if (0..=grid).contains(&nk) && (0..=grid).contains(&nl) {
                k = nk;
                l = nl;
                break;
            }
        }
    }
    out
}
