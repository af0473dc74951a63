use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::types::{RgbaImageData, TiffCompression};

pub trait RasterWriter {
    fn write_rgba(&self, image: &RgbaImageData, output: &mut dyn Write, compression: TiffCompression) -> Result<()>;
}
