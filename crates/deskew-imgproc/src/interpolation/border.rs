use serde::{Deserialize, Serialize};

/// What a resampler writes for destination pixels that map outside the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Every channel is set to zero.
    ///
    /// With an alpha channel the pixel is fully transparent; formats without alpha cannot
    /// express transparency and come out black.
    #[default]
    Transparent,

    /// A constant color, in the value range of the image type.
    ///
    /// The first `C` entries are used, e.g. only the first one for grayscale images.
    Constant([f32; 4]),

    /// The sample coordinate is clamped to the nearest edge pixel.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,
}

impl BorderMode {
    /// The fill value for an image with `C` channels, or `None` when the border is sampled
    /// from the image itself.
    pub fn fill_value<const C: usize>(&self) -> Option<[f32; C]> {
        match self {
            BorderMode::Transparent => Some([0.0; C]),
            BorderMode::Constant(color) => {
                let mut out = [0.0; C];
                for (o, c) in out.iter_mut().zip(color.iter()) {
                    *o = *c;
                }
                Some(out)
            }
            BorderMode::Replicate => None,
        }
    }
}
