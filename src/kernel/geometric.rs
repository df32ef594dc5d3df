//! Random triangles inscribed in the region under `y = -2x + 2`.

use super::{ChunkResult, Kernel};
use crate::core::constants::{HYPOTENUSE_INTERCEPT, HYPOTENUSE_SLOPE};
use crate::core::types::{Aggregate, KernelKind, Triangle, Vertex};
use crate::partition::Chunk;
use crate::report::GeometricReport;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A generated triangle together with its area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InscribedTriangle {
    /// The vertices
    pub triangle: Triangle,
    /// Shoelace area
    pub area: f32,
}

/// Geometric variant. Each dataset element is the sample seed of one triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricKernel;

impl GeometricKernel {
    /// Create the kernel.
    pub fn new() -> Self {
        GeometricKernel
    }

    /// Draw one inscribed triangle from `seed`.
    ///
    /// `r` sits on the vertical leg in `[0, 2)`, `t` on the horizontal leg in
    /// `[0, 1)` and `s` on the hypotenuse.
    pub fn sample(seed: u64) -> Triangle {
        let mut rng = StdRng::seed_from_u64(seed);
        let u1: f32 = rng.gen();
        let u2: f32 = rng.gen();
        let u3: f32 = rng.gen();

        let r = Vertex::new(0.0, HYPOTENUSE_INTERCEPT * u1);
        let t = Vertex::new(u2, 0.0);
        let s = Vertex::new(u3, HYPOTENUSE_SLOPE * u3 + HYPOTENUSE_INTERCEPT);
        Triangle::new(r, s, t)
    }
}

impl Kernel for GeometricKernel {
    type Input = u64;
    type Output = InscribedTriangle;
    type Report = GeometricReport;

    fn kind(&self) -> KernelKind {
        KernelKind::Geometric
    }

    fn aggregate_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn synthesize(&self, size: usize, seed: u64) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..size).map(|_| rng.gen()).collect()
    }

    fn compute(&self, chunk: Chunk, inputs: &[u64]) -> ChunkResult<InscribedTriangle> {
        log::debug!("geometric kernel over {:?}", chunk.range());
        let outputs = inputs
            .par_iter()
            .map(|&seed| {
                let triangle = Self::sample(seed);
                InscribedTriangle {
                    triangle,
                    area: triangle.area(),
                }
            })
            .collect();
        ChunkResult::from_outputs(outputs)
    }

    fn report(&self, outputs: &[InscribedTriangle], _totals: &[Aggregate]) -> GeometricReport {
        GeometricReport::new(outputs.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_is_inscribed() {
        for seed in 0..200 {
            let Triangle { r, s, t } = GeometricKernel::sample(seed);
            assert_eq!(r.x, 0.0);
            assert!((0.0..2.0).contains(&r.y));
            assert_eq!(t.y, 0.0);
            assert!((0.0..1.0).contains(&t.x));
            assert_relative_eq!(s.y, -2.0 * s.x + 2.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(GeometricKernel::sample(7), GeometricKernel::sample(7));
        assert_ne!(GeometricKernel::sample(7), GeometricKernel::sample(8));
    }

    #[test]
    fn test_compute_matches_inputs() {
        let kernel = GeometricKernel::new();
        let seeds = kernel.synthesize(16, 3);
        let result = kernel.compute(Chunk::new(0, seeds.len()), &seeds);

        assert_eq!(result.outputs.len(), 16);
        assert!(result.aggregates.is_empty());
        for (seed, record) in seeds.iter().zip(&result.outputs) {
            assert_eq!(record.triangle, GeometricKernel::sample(*seed));
            assert_relative_eq!(record.area, record.triangle.area());
            assert!(record.area >= 0.0);
        }
    }

    #[test]
    fn test_compute_is_independent_of_chunking() {
        let kernel = GeometricKernel::new();
        let seeds = kernel.synthesize(12, 11);
        let whole = kernel.compute(Chunk::new(0, 12), &seeds).outputs;
        let mut pieces = kernel.compute(Chunk::new(0, 4), &seeds[..4]).outputs;
        pieces.extend(kernel.compute(Chunk::new(4, 8), &seeds[4..]).outputs);
        assert_eq!(whole, pieces);
    }

    #[test]
    fn test_synthesize_respects_seed() {
        let kernel = GeometricKernel::new();
        assert_eq!(kernel.synthesize(8, 1), kernel.synthesize(8, 1));
        assert_ne!(kernel.synthesize(8, 1), kernel.synthesize(8, 2));
    }
}
