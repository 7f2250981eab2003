//! CLI command implementations

pub mod apply;
pub mod defaults;
pub mod list;

use std::path::Path;

use anyhow::{Context, Result, bail};
use tmo_core::{Rect, XyzImage};

/// Bytes per stored sample.
const SAMPLE_BYTES: usize = 4;

/// Loads a raw little-endian f32 interleaved image.
pub fn load_raw(path: &Path, width: u32, height: u32, channels: usize) -> Result<XyzImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    let expected = width as usize * height as usize * channels * SAMPLE_BYTES;
    if bytes.len() != expected {
        bail!(
            "{}: expected {} bytes for {}x{}x{} f32, found {}",
            path.display(),
            expected,
            width,
            height,
            channels,
            bytes.len()
        );
    }
    let data = bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    XyzImage::from_data(width, height, channels, data)
        .with_context(|| format!("Invalid image: {}", path.display()))
}

/// Saves an image as raw little-endian f32 interleaved samples.
pub fn save_raw(path: &Path, image: &XyzImage) -> Result<()> {
    let bytes: Vec<u8> = image.data().iter().flat_map(|v| v.to_le_bytes()).collect();
    std::fs::write(path, bytes).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parses `x,y,w,h` into a region.
pub fn parse_region(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x,y,w,h, got '{}'", s));
    }
    let mut values = [0u32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not a non-negative integer", part))?;
    }
    Ok(Rect::from((values[0], values[1], values[2], values[3])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parsing() {
        assert_eq!(parse_region("1,2,30,40").unwrap(), Rect::new(1, 2, 30, 40));
        assert_eq!(parse_region(" 0, 0 ,5,5").unwrap(), Rect::new(0, 0, 5, 5));
        assert!(parse_region("1,2,3").is_err());
        assert!(parse_region("1,2,-3,4").is_err());
        assert!(parse_region("a,b,c,d").is_err());
    }

    #[test]
    fn raw_io_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.raw");
        let mut img = XyzImage::filled(3, 2, &[0.1, 0.2, 0.3, 1.0]).unwrap();
        img.set_xyz(2, 1, [5.0, 6.0, 7.0]);
        save_raw(&path, &img).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 3 * 2 * 4 * 4);

        let back = load_raw(&path, 3, 2, 4).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn raw_size_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.raw");
        std::fs::write(&path, [0u8; 20]).unwrap();
        let err = load_raw(&path, 2, 2, 3).unwrap_err();
        assert!(err.to_string().contains("expected 48 bytes"));
        assert!(load_raw(&dir.path().join("missing.raw"), 1, 1, 3).is_err());
    }
}
