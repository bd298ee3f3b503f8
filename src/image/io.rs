//! I/O helpers for rasters, masks and JSON reports.
//!
//! - `load_raster`: decode a PNG/JPEG/TIFF/etc. into a [`RasterBuffer`]
//!   (gray stays gray, anything with color becomes RGB, alpha is dropped).
//! - `save_mask_png`: write an [`EdgeMask`] as an 8-bit PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! These sit on the collaborator side of the pipeline: binaries and tests call
//! them, the stages never do.
use super::RasterBuffer;
use crate::edges::EdgeMask;
use crate::error::{ExportError, InputError};
use crate::image::ImageView;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Decode an image file into an owned raster.
pub fn load_raster(path: &Path) -> Result<RasterBuffer, InputError> {
    let unreadable = |reason: String| InputError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };
    let img = image::open(path).map_err(|e| unreadable(e.to_string()))?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    if img.color().has_color() {
        RasterBuffer::new(width, height, 3, img.into_rgb8().into_raw())
    } else {
        RasterBuffer::gray(width, height, img.into_luma8().into_raw())
    }
}

/// Save an edge mask as a black/white PNG.
pub fn save_mask_png(mask: &EdgeMask, path: &Path) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.width() as u32, mask.height() as u32);
    for (y, row) in mask.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([px]));
        }
    }
    out.save(path)
        .map_err(|e| ExportError::Io(io::Error::other(format!("{}: {e}", path.display()))))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
