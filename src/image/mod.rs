//! Image containers used by the pipeline.
//!
//! - [`RasterBuffer`]: owned, decoded input (1, 3 or 4 interleaved 8-bit
//!   channels) with an optional pixel→world transform.
//! - [`ImageF32`]: owned float plane for numeric work (luminance, blur,
//!   gradient magnitude).
//! - [`io`]: decoding/encoding helpers for binaries and tests; the core never
//!   touches files.

pub mod io;
pub mod plane;
pub mod raster;
pub mod traits;

pub use self::plane::ImageF32;
pub use self::raster::RasterBuffer;
pub use self::traits::{ImageView, ImageViewMut, Rows};
