use crate::{Float, Point2f, Point2i};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::str::FromStr;

/// Per-pixel sample generation strategy. Closed set; new strategies are added
/// here and nowhere else.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SamplerKind {
    Uniform,
    Stratified,
}

impl SamplerKind {
    pub const VARIANTS: &'static [&'static str] = &["uniform", "stratified"];
}

impl Default for SamplerKind {
    fn default() -> Self {
        SamplerKind::Stratified
    }
}

impl FromStr for SamplerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(SamplerKind::Uniform),
            "stratified" => Ok(SamplerKind::Stratified),
            other => Err(anyhow::anyhow!("unknown sampler type: {}", other)),
        }
    }
}

// splitmix64 finalizer. Decorrelates the packed stream keys so neighboring
// pixels and consecutive sample indices land in unrelated RNG states.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Produces deterministic, restartable sample streams keyed by
/// `(pixel, sample index)`. Every draw is a pure function of
/// `(seed, pixel, sample index, dimension, strategy)`, which is what makes
/// renders reproducible regardless of batch splits or thread scheduling.
#[derive(Debug, Copy, Clone)]
pub struct SamplerBank {
    kind: SamplerKind,
    seed: u64,
    nsamples: u32,
    strata: (u32, u32),
}

impl SamplerBank {
    pub fn new(kind: SamplerKind, nsamples: u32, seed: u64) -> Self {
        assert!(nsamples > 0);
        let nsx = (nsamples as Float).sqrt().ceil() as u32;
        let nsy = (nsamples + nsx - 1) / nsx;
        Self {
            kind,
            seed,
            nsamples,
            strata: (nsx, nsy),
        }
    }

    pub fn nsamples(&self) -> u32 {
        self.nsamples
    }

    /// Opens the stream for one sample of one pixel. Streams for the same key
    /// replay identical draw sequences no matter which thread or batch call
    /// opens them.
    pub fn stream(&self, pixel: Point2i, sample_index: u32) -> SampleStream {
        let px = ((pixel.x as u32 as u64) << 32) | pixel.y as u32 as u64;
        let state = mix64(mix64(self.seed ^ px) ^ sample_index as u64);
        SampleStream {
            rng: Xoshiro256Plus::seed_from_u64(state),
            kind: self.kind,
            sample_index,
            strata: self.strata,
        }
    }
}

/// A single sample's dimension-ordered stream of `[0,1)` draws.
pub struct SampleStream {
    rng: Xoshiro256Plus,
    kind: SamplerKind,
    sample_index: u32,
    strata: (u32, u32),
}

impl SampleStream {
    pub fn next_1d(&mut self) -> Float {
        self.rng.gen()
    }

    pub fn next_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.gen(), self.rng.gen())
    }

    /// The intra-pixel offset for this sample, in `[0,1)^2`. The stratified
    /// strategy pins the image-plane dimensions to a jittered stratum of the
    /// total sample budget; later dimensions fall back to plain draws.
    pub fn pixel_offset(&mut self) -> Point2f {
        match self.kind {
            SamplerKind::Uniform => self.next_2d(),
            SamplerKind::Stratified => {
                let (nsx, nsy) = self.strata;
                let sx = self.sample_index % nsx;
                let sy = (self.sample_index / nsx) % nsy;
                let jitter = self.next_2d();
                Point2f::new(
                    (sx as Float + jitter.x) / nsx as Float,
                    (sy as Float + jitter.y) / nsy as Float,
                )
            }
        }
    }
}
