use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::types::{RgbImageData, RgbaImageData};

pub trait RasterReader {
    fn read_rgb(&self, data: &[u8]) -> Result<RgbImageData>;
    fn read_rgba(&self, data: &[u8]) -> Result<RgbaImageData>;
}
