use deskew_image::{Image, ImageDtype};

// Keys cubic convolution parameter, same value as OpenCV.
const A: f32 = -0.75;

#[inline]
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
    } else {
        0.0
    }
}

/// Kernel for bicubic interpolation over the 4x4 neighbourhood of `(u, v)`.
///
/// Neighbours outside the image are replaced by the nearest edge pixel.
pub(crate) fn bicubic_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let u = u.clamp(0.0, (cols - 1) as f32);
    let v = v.clamp(0.0, (rows - 1) as f32);

    let u0 = u.floor();
    let v0 = v.floor();

    let mut wx = [0.0f32; 4];
    let mut wy = [0.0f32; 4];
    let mut ix = [0usize; 4];
    let mut iy = [0usize; 4];
    for i in 0..4 {
        let offset = i as f32 - 1.0;
        wx[i] = cubic_weight(u - (u0 + offset));
        wy[i] = cubic_weight(v - (v0 + offset));
        ix[i] = (u0 + offset).clamp(0.0, (cols - 1) as f32) as usize;
        iy[i] = (v0 + offset).clamp(0.0, (rows - 1) as f32) as usize;
    }

    let data = image.as_slice();
    let mut pixel = [0.0; C];
    for (j, &row) in iy.iter().enumerate() {
        for (i, &col) in ix.iter().enumerate() {
            let w = wx[i] * wy[j];
            if w == 0.0 {
                continue;
            }
            let base = (row * cols + col) * C;
            for k in 0..C {
                pixel[k] += data[base + k].into() * w;
            }
        }
    }

    pixel
}
