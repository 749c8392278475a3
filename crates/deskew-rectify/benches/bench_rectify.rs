use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use deskew_geometry::Point2;
use deskew_image::{GenericImage, Image};
use deskew_imgproc::interpolation::InterpolationMode;
use deskew_rectify::{PerspectiveRectifier, Rectifier, RectifierConfig};

fn bench_rectify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rectify");

    for (width, height) in [(640usize, 480usize), (1280, 960), (2560, 1920)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = GenericImage::Rgb8(Image::<u8, 3>::from_size_val(image_size, 128).unwrap());

        // a card photographed at an angle, scaled with the image
        let (w, h) = (*width as f64, *height as f64);
        let points = [
            Point2::new(0.12 * w, 0.10 * h),
            Point2::new(0.91 * w, 0.16 * h),
            Point2::new(0.86 * w, 0.88 * h),
            Point2::new(0.07 * w, 0.80 * h),
        ];

        for interpolation in [InterpolationMode::Nearest, InterpolationMode::Bilinear] {
            let rectifier = PerspectiveRectifier::new(
                RectifierConfig::default().with_interpolation(interpolation),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{interpolation:?}"), &parameter_string),
                &(&image, points),
                |b, i| {
                    let (image, points) = (i.0, i.1);
                    b.iter(|| {
                        rectifier.rectify(black_box(image), black_box(&points), None, None)
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_rectify);
criterion_main!(benches);
