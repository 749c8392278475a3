use deskew_image::Image;

/// Set a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Clip the segment `p0 -> p1` to the inclusive box `[lo, hi]` (Liang-Barsky).
///
/// Returns `None` if the segment misses the box. Endpoints already inside are kept as is.
fn clip_segment(
    p0: (i64, i64),
    p1: (i64, i64),
    lo: (i64, i64),
    hi: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    if lo.0 > hi.0 || lo.1 > hi.1 {
        return None;
    }

    let inside = |p: (i64, i64)| p.0 >= lo.0 && p.0 <= hi.0 && p.1 >= lo.1 && p.1 <= hi.1;
    if inside(p0) && inside(p1) {
        return Some((p0, p1));
    }

    let (x0, y0) = (p0.0 as f64, p0.1 as f64);
    let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, x0 - lo.0 as f64),
        (dx, hi.0 as f64 - x0),
        (-dy, y0 - lo.1 as f64),
        (dy, hi.1 as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    if t0 > t1 {
        return None;
    }

    let at = |t: f64| {
        (
            ((x0 + t * dx).round() as i64).clamp(lo.0, hi.0),
            ((y0 + t * dy).round() as i64).clamp(lo.1, hi.1),
        )
    };
    Some((at(t0), at(t1)))
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// The segment is clipped to the image first, so far away endpoints cost nothing.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. Thicker lines stamp a square per point.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let half = if thickness > 1 {
        thickness as i64 / 2
    } else {
        0
    };

    let lo = (-half, -half);
    let hi = (img.cols() as i64 - 1 + half, img.rows() as i64 - 1 + half);
    let Some(((mut x0, mut y0), (x1, y1))) = clip_segment(p0, p1, lo, hi) else {
        return;
    };

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        for i in -half..=half {
            for j in -half..=half {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a filled rectangle on an image inplace.
///
/// Both corners are inclusive; the parts outside the image are clipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y).
/// * `bottom_right` - The bottom-right corner coordinates (x, y).
/// * `color` - The fill color of the rectangle.
pub fn draw_filled_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
) {
    let x_min = top_left.0.min(bottom_right.0).max(0);
    let y_min = top_left.1.min(bottom_right.1).max(0);
    let x_max = top_left.0.max(bottom_right.0).min(img.cols() as i64 - 1);
    let y_max = top_left.1.max(bottom_right.1).min(img.rows() as i64 - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            set_pixel(img, x, y, color);
        }
    }
}

/// Draws the outline of a closed polygon on an image inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The polygon vertices in drawing order; the last one is joined to the first.
/// * `color` - The color of the outline.
/// * `thickness` - The thickness of the lines.
pub fn draw_polygon<const C: usize>(
    img: &mut Image<u8, C>,
    points: &[(i64, i64)],
    color: [u8; C],
    thickness: usize,
) {
    for (i, &p0) in points.iter().enumerate() {
        let p1 = points[(i + 1) % points.len()];
        draw_line(img, p0, p1, color, thickness);
    }
}
