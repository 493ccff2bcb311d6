//! Forward real-to-complex transform capability

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex32;
use std::sync::Arc;

/// Forward transform of a fixed-length real buffer into `len/2 + 1` bins
///
/// Implementations must be deterministic and must not allocate in
/// [`Transform::process`]; every buffer is sized once up front.
pub trait Transform {
    /// Input length this transform was planned for
    fn len(&self) -> usize;

    /// Transform `input` (length [`Transform::len`]) into `output`
    /// (length `len/2 + 1`). `input` may be used as scratch space.
    fn process(&mut self, input: &mut [f32], output: &mut [Complex32]);
}

/// [`Transform`] backed by a `realfft` plan
pub struct RealFftTransform {
    plan: Arc<dyn RealToComplex<f32>>,
    scratch: Vec<Complex32>,
}

impl RealFftTransform {
    /// Plan a forward transform of `len` real samples
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(len);
        let scratch = plan.make_scratch_vec();
        Self { plan, scratch }
    }
}

impl std::fmt::Debug for RealFftTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFftTransform")
            .field("len", &self.plan.len())
            .finish()
    }
}

impl Transform for RealFftTransform {
    fn len(&self) -> usize {
        self.plan.len()
    }

    fn process(&mut self, input: &mut [f32], output: &mut [Complex32]) {
        if let Err(e) = self
            .plan
            .process_with_scratch(input, output, &mut self.scratch)
        {
            // Only reachable with mis-sized buffers
            log::error!("Forward transform failed: {}", e);
            output.fill(Complex32::new(0.0, 0.0));
        }
    }
}
