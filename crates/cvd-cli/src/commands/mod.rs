//! CLI command implementations

pub mod batch;
pub mod color;
pub mod matrices;
pub mod simulate;

use anyhow::{Context, Result, bail};
use cvd_core::{Image, Rgba8};
use cvd_vision::VisionCondition;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    cvd_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    cvd_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Makes the image acceptable to the simulator.
///
/// With a background, translucent pixels are flattened onto it. Without
/// one, a translucent pixel is an error that names the way out.
pub fn ensure_opaque(image: &mut Image, flatten: Option<Rgba8>, path: &Path) -> Result<()> {
    match flatten {
        Some(bg) => {
            let touched = cvd_io::flatten_alpha(image, bg);
            debug!(path = %path.display(), touched, "flattened");
        }
        None => {
            if let Some((x, y, px)) = image.find_translucent() {
                bail!(
                    "{}: pixel ({}, {}) has alpha {}; pass --flatten <COLOR> to composite it first",
                    path.display(),
                    x,
                    y,
                    px.a
                );
            }
        }
    }
    Ok(())
}

/// `<dir>/<stem>_<condition>.png`
pub fn condition_output(input: &Path, dir: &Path, condition: VisionCondition) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    dir.join(format!("{}_{}.png", stem, condition.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_output() {
        let out = condition_output(
            Path::new("shots/frame.0001.png"),
            Path::new("out"),
            VisionCondition::Tritanopia,
        );
        assert_eq!(out, PathBuf::from("out/frame.0001_tritanopia.png"));
    }

    #[test]
    fn test_ensure_opaque() {
        let path = Path::new("mem.png");
        let mut img = Image::filled(2, 2, Rgba8::new(0, 0, 0, 0));
        let err = ensure_opaque(&mut img.clone(), None, path).unwrap_err();
        assert!(err.to_string().contains("--flatten"));

        ensure_opaque(&mut img, Some(Rgba8::WHITE), path).unwrap();
        assert_eq!(img.pixel(0, 0), Rgba8::WHITE);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let img = Image::filled(2, 3, Rgba8::opaque(5, 6, 7));
        save_image(&path, &img).unwrap();
        assert_eq!(load_image(&path).unwrap(), img);
    }
}
