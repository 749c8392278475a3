use deskew_geometry::OrderedQuad;
use deskew_image::ImageSize;

use crate::{AspectRatioPolicy, RectifierConfig, RectifyError};

/// Smallest accepted explicit target side; a single pixel row collapses the destination.
const MIN_TARGET_SIZE: usize = 2;

fn round_side(len: f64, min_size: usize) -> usize {
    (len.round() as usize).max(min_size)
}

/// Estimate the rectified size of a quadrilateral from its edge lengths.
///
/// The width is the mean of the top and bottom edges and the height the mean of the left
/// and right edges, both rounded and raised to at least `min_size`.
pub fn estimate_output_size(quad: &OrderedQuad, min_size: usize) -> ImageSize {
    let width = (quad.width_top() + quad.width_bottom()) / 2.0;
    let height = (quad.height_left() + quad.height_right()) / 2.0;
    ImageSize {
        width: round_side(width, min_size),
        height: round_side(height, min_size),
    }
}

/// Pull the `long / short` ratio of `size` into the policy band by recomputing the short side.
///
/// Sizes already inside the band are returned unchanged.
pub fn apply_aspect_policy(
    size: ImageSize,
    policy: &AspectRatioPolicy,
    min_size: usize,
) -> ImageSize {
    let landscape = size.width >= size.height;
    let (long, short) = if landscape {
        (size.width, size.height)
    } else {
        (size.height, size.width)
    };

    let ratio = long as f64 / short as f64;
    let (lo, hi) = policy.band();
    let clamped = ratio.clamp(lo, hi);
    if clamped == ratio {
        return size;
    }

    let short = round_side(long as f64 / clamped, min_size);
    let corrected = if landscape {
        ImageSize {
            width: long,
            height: short,
        }
    } else {
        ImageSize {
            width: short,
            height: long,
        }
    };

    log::warn!(
        "aspect ratio {ratio:.3} outside [{lo:.3}, {hi:.3}], output size {size} corrected to {corrected}"
    );

    corrected
}

/// Decide the output size from the caller targets and the corner geometry.
///
/// Supplied targets are used as they are, missing ones are estimated from the edge
/// lengths. The aspect ratio policy only applies when both sides were estimated.
///
/// # Errors
///
/// Returns [`RectifyError::InvalidInput`] if a supplied target is smaller than 2 pixels or
/// the resulting size has more than `config.max_output_pixels` pixels.
pub fn resolve_output_size(
    quad: &OrderedQuad,
    target_width: Option<usize>,
    target_height: Option<usize>,
    config: &RectifierConfig,
) -> Result<ImageSize, RectifyError> {
    for (name, target) in [("width", target_width), ("height", target_height)] {
        if let Some(target) = target.filter(|t| *t < MIN_TARGET_SIZE) {
            return Err(RectifyError::InvalidInput(format!(
                "target {name} must be at least {MIN_TARGET_SIZE}, got {target}"
            )));
        }
    }

    let estimated = estimate_output_size(quad, config.min_size);

    let size = match (target_width, target_height) {
        (Some(width), Some(height)) => ImageSize { width, height },
        (Some(width), None) => ImageSize {
            width,
            height: estimated.height,
        },
        (None, Some(height)) => ImageSize {
            width: estimated.width,
            height,
        },
        (None, None) => match &config.aspect_ratio {
            Some(policy) => apply_aspect_policy(estimated, policy, config.min_size),
            None => estimated,
        },
    };

    let fits = size
        .width
        .checked_mul(size.height)
        .is_some_and(|area| area <= config.max_output_pixels);
    if !fits {
        return Err(RectifyError::InvalidInput(format!(
            "output size {size} exceeds the limit of {} pixels",
            config.max_output_pixels
        )));
    }

    Ok(size)
}
