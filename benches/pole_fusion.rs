use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use bottom_pole_fusion::image_pipeline::{
    CameraModel, CameraRole, MotionAligner, MotionEstimatorRegistry, MotionField, PoleRemoval,
    RgbImageData, RgbaImageData,
};
use bottom_pole_fusion::image_pipeline::fusion::BottomInputs;
use bottom_pole_fusion::image_pipeline::motion::warp_by_field;

fn generate_mock_image(width: usize, height: usize) -> RgbImageData {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 7 + y * 13) % 256) as u8;
            data.extend_from_slice(&[value, value / 2, 255 - value]);
        }
    }
    RgbImageData::new(width, height, data).unwrap()
}

fn generate_pole_mask(width: usize, height: usize) -> RgbImageData {
    let mut mask = RgbImageData::filled(width, height, [0, 0, 0]);
    for y in height / 2..height {
        for x in width / 2 - 4..width / 2 + 4 {
            mask.set_pixel(x, y, [255, 0, 0]);
        }
    }
    mask
}

fn benchmark_fusion_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion_by_size");
    group.sample_size(10);

    let sizes = vec![
        (128, 128, "128x128"),
        (256, 256, "256x256"),
    ];

    let registry = MotionEstimatorRegistry::with_defaults();

    for (width, height, label) in sizes {
        let image = generate_mock_image(width, height);
        let mask = generate_pole_mask(width, height);
        let radius = width as f32 * 0.45;
        let primary_model = CameraModel::new("cam_bottom", CameraRole::Bottom, radius);
        let secondary_model =
            CameraModel::new("cam_bottom2", CameraRole::BottomSecondary, radius).with_flip180(true);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &(image, mask),
            |b, (image, mask)| {
                let aligner = MotionAligner::from_registry(&registry, "block_match").unwrap();
                let fusion = PoleRemoval::new(aligner, 10);
                let inputs = BottomInputs {
                    primary: image,
                    secondary: image,
                    primary_mask: mask,
                    secondary_mask: mask,
                };

                b.iter(|| {
                    let _ = fusion.combine(
                        &primary_model,
                        &secondary_model,
                        black_box(inputs),
                        None,
                    );
                });
            },
        );
    }

    group.finish();
}

fn benchmark_warp(c: &mut Criterion) {
    let rgb = generate_mock_image(512, 512);
    let source = RgbaImageData::from_rgb_opaque(&rgb);
    let field = MotionField::new(512, 512, vec![[1.5, -0.25]; 512 * 512]).unwrap();

    c.bench_function("warp_512x512", |b| {
        b.iter(|| warp_by_field(black_box(&source), black_box(&field)))
    });
}

criterion_group!(benches, benchmark_fusion_sizes, benchmark_warp);
criterion_main!(benches);
