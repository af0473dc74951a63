use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::frame_cache::field_codec::{decode_field, encode_field};
use crate::image_pipeline::frame_cache::types::FrameCacheEntry;
use crate::image_pipeline::raster::{RasterReader, RasterWriter, RgbaImageData, TiffCompression};

/// File names inside a frame cache directory.
pub struct CacheLayout;

impl CacheLayout {
    pub fn field_path(dir: &Path) -> PathBuf {
        dir.join("flow").join("flow_bottom_secondary.bin")
    }

    pub fn primary_image_path(dir: &Path) -> PathBuf {
        dir.join("flow_images").join("bottomImage.tiff")
    }

    pub fn secondary_image_path(dir: &Path) -> PathBuf {
        dir.join("flow_images").join("bottomImage2.tiff")
    }
}

/// Reads and writes [`FrameCacheEntry`] values on disk.
pub struct FrameCacheStore<'a> {
    reader: &'a dyn RasterReader,
    writer: &'a dyn RasterWriter,
    compression: TiffCompression,
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| FusionError::MissingResource(format!("{}: {}", path.display(), e)))
}

impl<'a> FrameCacheStore<'a> {
    pub fn new(
        reader: &'a dyn RasterReader,
        writer: &'a dyn RasterWriter,
        compression: TiffCompression,
    ) -> Self {
        Self {
            reader,
            writer,
            compression,
        }
    }

    fn read_image(&self, path: &Path) -> Result<RgbaImageData> {
        let bytes = read_bytes(path)?;
        self.reader
            .read_rgba(&bytes)
            .map_err(|e| FusionError::Serialization(format!("{}: {}", path.display(), e)))
    }

    fn write_image(&self, path: &Path, image: &RgbaImageData) -> Result<()> {
        let mut file = fs::File::create(path)
            .map_err(|e| FusionError::OutputWrite(format!("{}: {}", path.display(), e)))?;
        self.writer.write_rgba(image, &mut file, self.compression)
    }

    /// Loads the previous frame's seed from `dir`.
    pub fn read(&self, dir: &Path) -> Result<FrameCacheEntry> {
        info!(dir = %dir.display(), "Reading previous frame flow for bottom-secondary camera");

        let field_path = CacheLayout::field_path(dir);
        let field = decode_field(&read_bytes(&field_path)?)?;
        let primary = self.read_image(&CacheLayout::primary_image_path(dir))?;
        let secondary = self.read_image(&CacheLayout::secondary_image_path(dir))?;

        if primary.dimensions() != field.dimensions() || secondary.dimensions() != field.dimensions() {
            return Err(FusionError::Serialization(format!(
                "cached field is {}x{} but cached images are {}x{} and {}x{}",
                field.width,
                field.height,
                primary.width,
                primary.height,
                secondary.width,
                secondary.height
            )));
        }

        debug!(width = field.width, height = field.height, "Previous frame seed loaded");
        Ok(FrameCacheEntry {
            field,
            primary,
            secondary,
        })
    }

    /// Saves `entry` under `dir` so the next frame can use it as its seed.
    pub fn write(&self, dir: &Path, entry: &FrameCacheEntry) -> Result<()> {
        info!(dir = %dir.display(), "Serializing bottom-secondary flow and images");

        let field_path = CacheLayout::field_path(dir);
        let primary_path = CacheLayout::primary_image_path(dir);
        for parent in [field_path.parent(), primary_path.parent()].into_iter().flatten() {
            fs::create_dir_all(parent)
                .map_err(|e| FusionError::OutputWrite(format!("{}: {}", parent.display(), e)))?;
        }

        let mut file = fs::File::create(&field_path)
            .map_err(|e| FusionError::OutputWrite(format!("{}: {}", field_path.display(), e)))?;
        encode_field(&entry.field, &mut file)?;

        self.write_image(&primary_path, &entry.primary)?;
        self.write_image(&CacheLayout::secondary_image_path(dir), &entry.secondary)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::motion::MotionField;
    use crate::image_pipeline::raster::{StandardTiffWriter, TiffRasterReader};

    fn entry() -> FrameCacheEntry {
        let mut primary = RgbaImageData::filled(6, 5, [10, 20, 30, 255]);
        primary.set_pixel(1, 1, [0, 0, 0, 0]);
        let mut field = MotionField::zeros(6, 5);
        field.set(2, 3, [1.5, -0.25]);
        FrameCacheEntry {
            field,
            primary,
            secondary: RgbaImageData::filled(6, 5, [40, 50, 60, 128]),
        }
    }

    #[test]
    fn write_then_read_restores_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FrameCacheStore::new(&TiffRasterReader, &StandardTiffWriter, TiffCompression::Lzw);

        store.write(dir.path(), &entry()).unwrap();
        assert!(CacheLayout::field_path(dir.path()).exists());

        let restored = store.read(dir.path()).unwrap();
        assert_eq!(restored, entry());
    }

    #[test]
    fn missing_directory_is_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let store = FrameCacheStore::new(&TiffRasterReader, &StandardTiffWriter, TiffCompression::None);
        assert!(matches!(
            store.read(&dir.path().join("nope")),
            Err(FusionError::MissingResource(_))
        ));
    }

    #[test]
    fn corrupt_image_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FrameCacheStore::new(&TiffRasterReader, &StandardTiffWriter, TiffCompression::None);
        store.write(dir.path(), &entry()).unwrap();
        fs::write(CacheLayout::secondary_image_path(dir.path()), b"garbage").unwrap();

        assert!(matches!(
            store.read(dir.path()),
            Err(FusionError::Serialization(_))
        ));
    }

    #[test]
    fn field_and_image_size_disagreement_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FrameCacheStore::new(&TiffRasterReader, &StandardTiffWriter, TiffCompression::None);
        let mut bad = entry();
        bad.field = MotionField::zeros(3, 3);
        store.write(dir.path(), &bad).unwrap();

        assert!(matches!(
            store.read(dir.path()),
            Err(FusionError::Serialization(_))
        ));
    }
}
