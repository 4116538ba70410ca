use crate::filter::Filter;
use crate::spectrum::Spectrum;
use crate::{Bounds2i, Float, Point2f, Point2i};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// One pixel's accumulation state: filter-weighted radiance and alpha sums,
/// the matching filter weight, and the count of samples generated for this
/// pixel. For the box filter `filter_weight_sum == samples` at all times.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Pixel {
    pub contrib_sum: Spectrum,
    pub alpha_sum: Float,
    pub filter_weight_sum: Float,
    pub samples: u32,
}

/// The whole-render accumulation state. Created once per render, sized to the
/// output resolution, and advanced in place by every batch call.
///
/// Workers never touch the pixel buffer directly: they accumulate into
/// block-local [`FilmTile`]s and merge them back under the lock. Merging is
/// additive, so the result does not depend on the order blocks finish in.
pub struct Film {
    bounds: Bounds2i,
    filter: Box<dyn Filter>,
    pixels: Mutex<Vec<Pixel>>,
    next_sample: AtomicU32,
}

impl Film {
    pub fn new(width: u32, height: u32, filter: Box<dyn Filter>) -> Self {
        let bounds = Bounds2i::with_dims(width as i32, height as i32);
        let pixels = vec![Pixel::default(); bounds.area() as usize];
        Self {
            bounds,
            filter,
            pixels: Mutex::new(pixels),
            next_sample: AtomicU32::new(0),
        }
    }

    pub fn bounds(&self) -> Bounds2i {
        self.bounds
    }

    pub fn width(&self) -> u32 {
        self.bounds.dims().x as u32
    }

    pub fn height(&self) -> u32 {
        self.bounds.dims().y as u32
    }

    /// Global sample index the next batch continues from. Persisting this in
    /// the film is what keeps every pixel's sample stream continuous across
    /// batch calls.
    pub fn samples_taken(&self) -> u32 {
        self.next_sample.load(Ordering::Acquire)
    }

    pub(crate) fn advance_samples(&self, batch: u32) {
        self.next_sample.fetch_add(batch, Ordering::AcqRel);
    }

    /// Opens a tile for a scheduling block. The tile's pixel range is the
    /// block extended by the filter radius (clipped to the image), so kernels
    /// wider than a pixel can splat across block edges without touching
    /// another worker's tile.
    pub fn tile(&self, block: Bounds2i, samples_per_pixel: u32) -> FilmTile {
        let r = self.filter.radius();
        let p0 = Point2i::new(
            (block.min.x as Float - 0.5 - r.x).ceil() as i32,
            (block.min.y as Float - 0.5 - r.y).ceil() as i32,
        );
        let p1 = Point2i::new(
            (block.max.x as Float - 0.5 + r.x).floor() as i32 + 1,
            (block.max.y as Float - 0.5 + r.y).floor() as i32 + 1,
        );
        let bounds = Bounds2i::with_bounds(p0, p1).intersection(&self.bounds);
        FilmTile {
            bounds,
            owned: block,
            samples: samples_per_pixel,
            pixels: vec![TilePixel::default(); bounds.area() as usize],
        }
    }

    /// Splats one sample into the tile, weighted by the film's filter kernel.
    pub fn add_sample_to_tile(
        &self,
        tile: &mut FilmTile,
        p_film: Point2f,
        radiance: Spectrum,
        alpha: Float,
    ) {
        debug_assert!(!radiance.has_nans());
        let r = self.filter.radius();
        if r.x <= 0.5 && r.y <= 0.5 {
            // Box kernels give full weight to the single covering pixel.
            let p = Point2i::new(p_film.x.floor() as i32, p_film.y.floor() as i32);
            if let Some(px) = tile.pixel_mut(p) {
                px.add(radiance, alpha, 1.0);
            }
            return;
        }

        let x0 = (p_film.x - 0.5 - r.x).ceil() as i32;
        let x1 = (p_film.x - 0.5 + r.x).floor() as i32;
        let y0 = (p_film.y - 0.5 - r.y).ceil() as i32;
        let y1 = (p_film.y - 0.5 + r.y).floor() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point2i::new(x, y);
                let offset = Point2f::new(
                    x as Float + 0.5 - p_film.x,
                    y as Float + 0.5 - p_film.y,
                );
                let weight = self.filter.evaluate(offset);
                if weight == 0.0 {
                    continue;
                }
                if let Some(px) = tile.pixel_mut(p) {
                    px.add(radiance, alpha, weight);
                }
            }
        }
    }

    /// Adds a finished tile's sums into the film. Short critical section; the
    /// bulk of the work happened lock-free in the tile.
    pub fn merge_tile(&self, tile: FilmTile) {
        let width = self.bounds.dims().x;
        let mut pixels = self.pixels.lock();
        for (i, p) in tile.bounds.iter_points().enumerate() {
            let t = &tile.pixels[i];
            let px = &mut pixels[(p.y * width + p.x) as usize];
            px.contrib_sum += t.contrib_sum;
            px.alpha_sum += t.alpha_sum;
            px.filter_weight_sum += t.filter_weight_sum;
        }
        for p in tile.owned.iter_points() {
            pixels[(p.y * width + p.x) as usize].samples += tile.samples;
        }
    }

    /// Read-only copy of the accumulation state, usable for tonemapping at
    /// any point between batch calls. Repeated calls with no intervening
    /// accumulation return identical values.
    pub fn snapshot(&self) -> FilmSnapshot {
        FilmSnapshot {
            bounds: self.bounds,
            pixels: self.pixels.lock().clone(),
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct TilePixel {
    contrib_sum: Spectrum,
    alpha_sum: Float,
    filter_weight_sum: Float,
}

impl TilePixel {
    fn add(&mut self, contrib: Spectrum, alpha: Float, weight: Float) {
        self.contrib_sum += contrib * weight;
        self.alpha_sum += alpha * weight;
        self.filter_weight_sum += weight;
    }
}

/// Block-local accumulation buffer; exclusively owned by the worker tracing
/// its block for the duration of a pass.
pub struct FilmTile {
    bounds: Bounds2i,
    owned: Bounds2i,
    samples: u32,
    pixels: Vec<TilePixel>,
}

impl FilmTile {
    pub fn owned_bounds(&self) -> Bounds2i {
        self.owned
    }

    fn pixel_mut(&mut self, p: Point2i) -> Option<&mut TilePixel> {
        if !self.bounds.contains(p) {
            return None;
        }
        let w = self.bounds.dims().x;
        let local = p - self.bounds.min;
        Some(&mut self.pixels[(local.y * w + local.x) as usize])
    }
}

/// Frozen view of the film returned by [`Film::snapshot`].
#[derive(Debug, Clone)]
pub struct FilmSnapshot {
    bounds: Bounds2i,
    pixels: Vec<Pixel>,
}

impl FilmSnapshot {
    pub fn width(&self) -> u32 {
        self.bounds.dims().x as u32
    }

    pub fn height(&self) -> u32 {
        self.bounds.dims().y as u32
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Resolves the weighted sums into premultiplied-by-nothing RGBA
    /// radiance. Unsampled pixels resolve to transparent black.
    pub fn to_rgba(&self) -> Vec<[Float; 4]> {
        self.pixels
            .iter()
            .map(|px| {
                if px.filter_weight_sum == 0.0 {
                    [0.0; 4]
                } else {
                    let inv = 1.0 / px.filter_weight_sum;
                    let rgb = px.contrib_sum * inv;
                    [rgb[0], rgb[1], rgb[2], px.alpha_sum * inv]
                }
            })
            .collect()
    }
}
