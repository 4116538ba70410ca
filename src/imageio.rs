use crate::film::FilmSnapshot;
use crate::tonemap::ToneMap;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes a film snapshot to `path`, picking the encoding by extension:
/// `.hdr` gets the linear radiance untouched, everything else gets the
/// tonemapped 8-bit image.
pub fn save_image(path: &Path, snapshot: &FilmSnapshot, tonemap: &ToneMap) -> anyhow::Result<()> {
    let rgba = snapshot.to_rgba();
    let (w, h) = (snapshot.width(), snapshot.height());
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if ext.eq_ignore_ascii_case("hdr") {
        let file =
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        let pixels: Vec<image::Rgb<f32>> =
            rgba.iter().map(|p| image::Rgb([p[0], p[1], p[2]])).collect();
        image::hdr::HDREncoder::new(BufWriter::new(file))
            .encode(&pixels, w as usize, h as usize)
            .with_context(|| format!("cannot write image {}", path.display()))?;
    } else {
        let mut data = Vec::with_capacity(rgba.len() * 4);
        for px in &rgba {
            let mapped = tonemap.map_rgba(*px);
            data.extend(mapped.iter().map(|c| (c * 255.0).round() as u8));
        }
        let img =
            image::RgbaImage::from_raw(w, h, data).expect("buffer is sized to the image");
        img.save(path)
            .with_context(|| format!("cannot write image {}", path.display()))?;
    }
    Ok(())
}

/// Checkpoint path derived from the final output path:
/// `<dir>/<base>.<cur_sample>.<ext>`.
pub fn progressive_path(path: &Path, cur_sample: u32) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, cur_sample, ext),
        None => format!("{}.{}", stem, cur_sample),
    };
    path.with_file_name(name)
}
