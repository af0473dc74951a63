//! Raster reader implementation using the tiff library.
//!
//! Accepts 8-bit grayscale, grayscale+alpha, RGB and RGBA TIFF files and
//! normalizes them to the RGB or RGBA layout the fusion stages expect.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::raster::reader::RasterReader;
use crate::image_pipeline::raster::types::{RgbImageData, RgbaImageData};

pub struct TiffRasterReader;

struct DecodedTiff {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

fn decode(data: &[u8]) -> Result<DecodedTiff> {
    debug!("Decoding TIFF image, {} bytes", data.len());

    let mut decoder =
        Decoder::new(Cursor::new(data)).map_err(|e| FusionError::Decode(e.to_string()))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| FusionError::Decode(e.to_string()))?;
    let channels = match decoder
        .colortype()
        .map_err(|e| FusionError::Decode(e.to_string()))?
    {
        ColorType::Gray(8) => 1,
        ColorType::GrayA(8) => 2,
        ColorType::RGB(8) => 3,
        ColorType::RGBA(8) => 4,
        other => {
            return Err(FusionError::Decode(format!(
                "unsupported TIFF color type {:?}",
                other
            )));
        }
    };

    let data = match decoder
        .read_image()
        .map_err(|e| FusionError::Decode(e.to_string()))?
    {
        DecodingResult::U8(buf) => buf,
        _ => return Err(FusionError::Decode("expected 8-bit samples".to_string())),
    };

    debug!("Decoded image: {}x{}x{}", width, height, channels);

    Ok(DecodedTiff {
        width: width as usize,
        height: height as usize,
        channels,
        data,
    })
}

impl RasterReader for TiffRasterReader {
    fn read_rgb(&self, data: &[u8]) -> Result<RgbImageData> {
        let decoded = decode(data)?;
        let rgb: Vec<u8> = match decoded.channels {
            1 => decoded.data.iter().flat_map(|&v| [v, v, v]).collect(),
            2 => decoded
                .data
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0]])
                .collect(),
            3 => decoded.data,
            _ => decoded
                .data
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect(),
        };
        RgbImageData::new(decoded.width, decoded.height, rgb)
    }

    fn read_rgba(&self, data: &[u8]) -> Result<RgbaImageData> {
        let decoded = decode(data)?;
        let rgba: Vec<u8> = match decoded.channels {
            1 => decoded.data.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect(),
            2 => decoded
                .data
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            3 => decoded
                .data
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                .collect(),
            _ => decoded.data,
        };
        RgbaImageData::new(decoded.width, decoded.height, rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::raster::{RasterWriter, StandardTiffWriter, TiffCompression};

    #[test]
    fn rgba_roundtrip_through_tiff() {
        let mut image = RgbaImageData::filled(5, 3, [10, 20, 30, 255]);
        image.set_pixel(4, 2, [200, 100, 50, 0]);

        let mut buffer = Vec::new();
        StandardTiffWriter
            .write_rgba(&image, &mut buffer, TiffCompression::Lzw)
            .unwrap();

        let decoded = TiffRasterReader.read_rgba(&buffer).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rgb_read_drops_alpha() {
        let image = RgbaImageData::filled(2, 2, [1, 2, 3, 4]);
        let mut buffer = Vec::new();
        StandardTiffWriter
            .write_rgba(&image, &mut buffer, TiffCompression::None)
            .unwrap();

        let rgb = TiffRasterReader.read_rgb(&buffer).unwrap();
        assert_eq!(rgb.data, [1, 2, 3].repeat(4));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = TiffRasterReader.read_rgb(b"not a tiff").unwrap_err();
        assert!(matches!(err, FusionError::Decode(_)));
    }
}
