use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, FusionError};
use crate::image_pipeline::raster::types::{RgbaImageData, TiffCompression};
use crate::image_pipeline::raster::writer::RasterWriter;

pub struct StandardTiffWriter;

impl RasterWriter for StandardTiffWriter {
    fn write_rgba(&self, image: &RgbaImageData, output: &mut dyn Write, compression: TiffCompression) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width, image.height);

        let mut buffer = Vec::new();

        let compression = match compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| FusionError::Encode(e.to_string()))?
            .with_compression(compression);

        encoder.write_image::<tiff::encoder::colortype::RGBA8>(
            image.width as u32,
            image.height as u32,
            &image.data,
        ).map_err(|e| FusionError::Encode(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
