use crate::camera::Camera;
use crate::film::Film;
use crate::filter::FilterKind;
use crate::sampler::{SamplerBank, SamplerKind};
use crate::scene::Scene;
use crate::shader::{DirectLighting, Estimator, Eyelight, PathTracer, ShaderKind};
use crate::spectrum::Spectrum;
use crate::{Bounds2i, Float, Point2f};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Immutable configuration for a whole render. Built once from the CLI (or
/// by hand in tests) and shared read-only by everything downstream.
#[derive(Debug, Clone)]
pub struct TraceParams {
    pub camera_id: usize,
    pub rtype: SamplerKind,
    pub ftype: FilterKind,
    pub stype: ShaderKind,
    pub envmap_invisible: bool,
    pub shadow_notransmission: bool,
    pub block_size: u32,
    pub batch_size: u32,
    pub nsamples: u32,
    pub parallel: bool,
    pub width: u32,
    pub height: u32,
    pub ambient: Spectrum,
    pub seed: u64,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            camera_id: 0,
            rtype: SamplerKind::default(),
            ftype: FilterKind::default(),
            stype: ShaderKind::default(),
            envmap_invisible: false,
            shadow_notransmission: false,
            block_size: 32,
            batch_size: 16,
            nsamples: 256,
            parallel: true,
            width: 0,
            height: 540,
            ambient: Spectrum::black(),
            seed: 0,
        }
    }
}

/// Output width derived from the camera aspect. Computed once, before the
/// accumulation state is created, and never again mid-render.
pub fn resolve_resolution(aspect: Float, height: u32) -> (u32, u32) {
    ((aspect * height as Float).round() as u32, height)
}

/// Receives completion events from inside a batch call. The render core
/// reports through this instead of any process-wide logger; callers that
/// don't care pass [`SilentSink`].
pub trait ProgressSink: Sync {
    fn block_done(&self, finished: usize, total: usize);
}

pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn block_done(&self, _finished: usize, _total: usize) {}
}

/// Drives batches of samples into a [`Film`]: cuts the image into blocks,
/// dispatches them across rayon's pool (or a plain loop), and joins before
/// returning so callers can snapshot immediately after.
pub struct Renderer {
    params: TraceParams,
    bank: SamplerBank,
    estimator: Box<dyn Estimator>,
}

impl Renderer {
    pub fn new(params: TraceParams, scene: &Scene) -> Self {
        let bank = SamplerBank::new(params.rtype, params.nsamples, params.seed);
        // The estimator's environment term folds the scene's background and
        // the flat ambient radiance together, resolved once up front.
        let environment = scene.environment + params.ambient;
        let estimator: Box<dyn Estimator> = match params.stype {
            ShaderKind::Pathtrace => Box::new(PathTracer::new(
                environment,
                params.envmap_invisible,
                params.shadow_notransmission,
            )),
            ShaderKind::Eyelight => Box::new(Eyelight {
                environment,
                envmap_invisible: params.envmap_invisible,
            }),
            ShaderKind::Direct => Box::new(DirectLighting {
                environment,
                envmap_invisible: params.envmap_invisible,
                shadow_notransmission: params.shadow_notransmission,
            }),
        };
        Self {
            params,
            bank,
            estimator,
        }
    }

    pub fn params(&self) -> &TraceParams {
        &self.params
    }

    /// Zero-initialized accumulation state sized to the configured
    /// resolution, with the configured reconstruction filter attached.
    pub fn create_film(&self) -> Film {
        Film::new(
            self.params.width,
            self.params.height,
            self.params.ftype.create(),
        )
    }

    pub fn block_count(&self) -> usize {
        Bounds2i::with_dims(self.params.width as i32, self.params.height as i32)
            .iter_blocks(self.params.block_size as i32)
            .count()
    }

    /// Advances every pixel of `film` by exactly `batch_size` new samples,
    /// continuing from the film's persistent global sample index. Blocks are
    /// processed with no ordering guarantee; the call is a full barrier, so
    /// the film is consistent (and snapshot-safe) as soon as it returns.
    pub fn trace_samples(
        &self,
        film: &Film,
        scene: &Scene,
        camera: &Camera,
        batch_size: u32,
        sink: &dyn ProgressSink,
    ) {
        let base = film.samples_taken();
        let bounds = film.bounds();
        let block_size = self.params.block_size as i32;
        let total = self.block_count();
        let finished = AtomicUsize::new(0);
        let finished = &finished;
        let (width, height) = (self.params.width as Float, self.params.height as Float);

        let work = |block: Bounds2i| {
            let mut tile = film.tile(block, batch_size);
            for pixel in block.iter_points() {
                for i in 0..batch_size {
                    let mut stream = self.bank.stream(pixel, base + i);
                    let offset = stream.pixel_offset();
                    let p_film = Point2f::new(
                        pixel.x as Float + offset.x,
                        pixel.y as Float + offset.y,
                    );
                    let ray = camera
                        .generate_ray(Point2f::new(p_film.x / width, p_film.y / height));
                    let (radiance, alpha) =
                        self.estimator.incident_radiance(ray, scene, &mut stream);
                    film.add_sample_to_tile(&mut tile, p_film, radiance, alpha);
                }
            }
            film.merge_tile(tile);
            sink.block_done(finished.fetch_add(1, Ordering::Relaxed) + 1, total);
        };

        if self.params.parallel {
            bounds.iter_blocks(block_size).par_bridge().for_each(work);
        } else {
            bounds.iter_blocks(block_size).for_each(work);
        }
        film.advance_samples(batch_size);
    }
}
