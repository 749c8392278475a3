use deskew_geometry::OrderedQuad;
use deskew_image::Image;
use deskew_imgproc::draw::{draw_filled_rect, draw_polygon};

const CORNER_COLOR: [u8; 3] = [255, 0, 0];
const EDGE_COLOR: [u8; 3] = [0, 255, 0];
const EDGE_THICKNESS: usize = 2;

/// Draw the corners and edges of a quadrilateral on a copy of `image`.
///
/// Corners are filled red squares whose half side is `max(5, min(width, height) / 100)`
/// pixels, and the closed outline TL → TR → BR → BL is drawn in green on top.
pub fn draw_quadrilateral_overlay(image: &Image<u8, 3>, quad: &OrderedQuad) -> Image<u8, 3> {
    let mut canvas = image.clone();

    let radius = (image.width().min(image.height()) / 100).max(5) as i64;
    let corners = quad
        .to_array()
        .map(|p| (p.x.round() as i64, p.y.round() as i64));

    for &(x, y) in corners.iter() {
        draw_filled_rect(
            &mut canvas,
            (x.saturating_sub(radius), y.saturating_sub(radius)),
            (x.saturating_add(radius), y.saturating_add(radius)),
            CORNER_COLOR,
        );
    }

    draw_polygon(&mut canvas, &corners, EDGE_COLOR, EDGE_THICKNESS);

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskew_geometry::{order_points, Point2};
    use deskew_image::ImageSize;

    #[test]
    fn overlay_marks_corners_and_edges() -> Result<(), Box<dyn std::error::Error>> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 100,
                height: 80,
            },
            0,
        )?;
        let quad = order_points(&[
            Point2::new(10.0, 10.0),
            Point2::new(90.0, 10.0),
            Point2::new(90.0, 70.0),
            Point2::new(10.0, 70.0),
        ])?;

        let overlay = draw_quadrilateral_overlay(&image, &quad);

        // the source is untouched
        assert!(image.as_slice().iter().all(|&v| v == 0));

        // corner squares span 5 pixels around the corner, beyond the edge lines
        assert_eq!(overlay.get_pixel(5, 5)?, &CORNER_COLOR);
        assert_eq!(overlay.get_pixel(95, 75)?, &CORNER_COLOR);

        // midpoints of the top and left edges
        assert_eq!(overlay.get_pixel(50, 10)?, &EDGE_COLOR);
        assert_eq!(overlay.get_pixel(10, 40)?, &EDGE_COLOR);

        // interior stays untouched
        assert_eq!(overlay.get_pixel(50, 40)?, &[0, 0, 0]);
        Ok(())
    }

    #[test]
    fn overlay_with_far_away_corners() -> Result<(), Box<dyn std::error::Error>> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 40,
                height: 30,
            },
            0,
        )?;
        let quad = order_points(&[
            Point2::new(-1e300, -1e300),
            Point2::new(1e12, -5.0),
            Point2::new(1e300, 1e300),
            Point2::new(-5.0, 1e12),
        ])?;

        let overlay = draw_quadrilateral_overlay(&image, &quad);
        assert_eq!(overlay.size(), image.size());
        Ok(())
    }
}
