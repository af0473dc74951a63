//! Raster I/O module
//!
//! Image buffer types plus TIFF reading and writing for camera images,
//! pole masks, cached working images and debug snapshots.

mod reader;
mod writer;
mod tiff_reader;
mod standard_tiff_writer;
pub mod types;

pub use reader::RasterReader;
pub use writer::RasterWriter;
pub use tiff_reader::TiffRasterReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{RgbImageData, RgbaImageData, TiffCompression};
