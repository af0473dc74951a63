//! Binary motion-field layout: little-endian `i32` rows, `i32` cols, then
//! `rows * cols` `(f32 dx, f32 dy)` pairs in row-major order.

use std::io::Write;

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::motion::MotionField;

const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 8;

pub fn encode_field(field: &MotionField, output: &mut dyn Write) -> Result<()> {
    let rows = i32::try_from(field.height)
        .map_err(|_| FusionError::Serialization(format!("field height {} too large", field.height)))?;
    let cols = i32::try_from(field.width)
        .map_err(|_| FusionError::Serialization(format!("field width {} too large", field.width)))?;

    let mut buffer = Vec::with_capacity(HEADER_LEN + field.data.len() * ENTRY_LEN);
    buffer.extend_from_slice(&rows.to_le_bytes());
    buffer.extend_from_slice(&cols.to_le_bytes());
    for [dx, dy] in &field.data {
        buffer.extend_from_slice(&dx.to_le_bytes());
        buffer.extend_from_slice(&dy.to_le_bytes());
    }
    output.write_all(&buffer)?;
    Ok(())
}

pub fn decode_field(bytes: &[u8]) -> Result<MotionField> {
    if bytes.len() < HEADER_LEN {
        return Err(FusionError::Serialization(format!(
            "motion field truncated: {} bytes",
            bytes.len()
        )));
    }
    let read_i32 = |at: usize| i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    let (rows, cols) = (read_i32(0), read_i32(4));
    if rows < 0 || cols < 0 {
        return Err(FusionError::Serialization(format!(
            "negative motion field dimensions {}x{}",
            cols, rows
        )));
    }
    let (height, width) = (rows as usize, cols as usize);

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(ENTRY_LEN))
        .and_then(|n| n.checked_add(HEADER_LEN))
        .ok_or_else(|| FusionError::Serialization("motion field size overflow".to_string()))?;
    if bytes.len() != expected {
        return Err(FusionError::Serialization(format!(
            "motion field {}x{} needs {} bytes, found {}",
            width,
            height,
            expected,
            bytes.len()
        )));
    }

    let data = bytes[HEADER_LEN..]
        .chunks_exact(ENTRY_LEN)
        .enumerate()
        .map(|(i, e)| {
            let d = [
                f32::from_le_bytes([e[0], e[1], e[2], e[3]]),
                f32::from_le_bytes([e[4], e[5], e[6], e[7]]),
            ];
            if d.iter().all(|v| v.is_finite()) {
                Ok(d)
            } else {
                Err(FusionError::Serialization(format!(
                    "non-finite motion vector at ({}, {})",
                    i % width.max(1),
                    i / width.max(1)
                )))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MotionField { width, height, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_field() {
        let data = (0..12).map(|i| [i as f32 * 0.5 - 2.25, -(i as f32) / 3.0]).collect();
        let field = MotionField::new(4, 3, data).unwrap();

        let mut bytes = Vec::new();
        encode_field(&field, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 12 * 8);

        let decoded = decode_field(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        for (a, b) in decoded.data.iter().zip(&field.data) {
            assert!((a[0] - b[0]).abs() <= f32::EPSILON);
            assert!((a[1] - b[1]).abs() <= f32::EPSILON);
        }
    }

    #[test]
    fn header_is_rows_then_cols() {
        let mut bytes = Vec::new();
        encode_field(&MotionField::zeros(5, 2), &mut bytes).unwrap();
        assert_eq!(&bytes[0..4], &2i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &5i32.to_le_bytes());
    }

    #[test]
    fn truncated_payload_is_serialization_error() {
        let mut bytes = Vec::new();
        encode_field(&MotionField::zeros(3, 3), &mut bytes).unwrap();
        bytes.pop();
        assert!(matches!(decode_field(&bytes), Err(FusionError::Serialization(_))));
        assert!(matches!(decode_field(&bytes[..5]), Err(FusionError::Serialization(_))));
    }

    #[test]
    fn non_finite_vectors_are_rejected() {
        let mut field = MotionField::zeros(2, 2);
        field.set(1, 1, [f32::NAN, 0.0]);
        let mut bytes = Vec::new();
        encode_field(&field, &mut bytes).unwrap();
        assert!(matches!(decode_field(&bytes), Err(FusionError::Serialization(_))));

        field.set(1, 1, [0.0, f32::INFINITY]);
        bytes.clear();
        encode_field(&field, &mut bytes).unwrap();
        assert!(matches!(decode_field(&bytes), Err(FusionError::Serialization(_))));
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        bytes.extend_from_slice(&4i32.to_le_bytes());
        assert!(matches!(decode_field(&bytes), Err(FusionError::Serialization(_))));
    }
}
