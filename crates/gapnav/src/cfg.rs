//! Tolerances and build configuration.
//!
//! Policy
//! - Geometric tolerances are fixed constants so that predicate results are
//!   reproducible across runs and machines.
//! - Runtime knobs that do not change results (parallelism) live in `BuildCfg`.

/// Cross products are multiplied by this factor and truncated before the sign
/// test in `geom::orientation` (i.e. |cross| < 1e-10 counts as collinear).
pub const COLIN_SCALE: f64 = 1e10;

/// The "+X" half line of the sweep seed and of the crossing-number test ends
/// this far to the right of the largest x coordinate involved.
pub const RAY_MARGIN: f64 = 1.0;

/// Offset of the winding probe from the first edge's midpoint.
pub const WINDING_PROBE: f64 = 0.01;

/// Allowed deviation of a gap direction from unit length.
pub const UNIT_TOL: f64 = 1e-10;

/// Build configuration for `VisGraph::build`.
#[derive(Clone, Copy, Debug)]
pub struct BuildCfg {
    /// Worker threads for the bitangent sweep. `1` runs inline.
    pub workers: usize,
    /// Source vertices per sweep batch.
    pub batch_size: usize,
}

impl Default for BuildCfg {
    fn default() -> Self {
        Self {
            workers: 1,
            batch_size: 10,
        }
    }
}
