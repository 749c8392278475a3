use argh::FromArgs;
use std::path::PathBuf;

use deskew::geometry::{CoordinateOrigin, Point2, Quadrilateral};
use deskew::image::GenericImage;
use deskew::imgproc::interpolation::{BorderMode, InterpolationMode};
use deskew::io::{convert, functional as F};
use deskew::rectify::{
    draw_quadrilateral_overlay, DocumentEdgeDetector, MarginDetector, PerspectiveRectifier,
    RectifiedImage, Rectifier, RectifierConfig, RectifyError,
};

#[derive(FromArgs)]
/// Straighten a quadrilateral region of an image into a rectangle
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to write the rectified image to
    #[argh(option, short = 'o')]
    output_path: PathBuf,

    /// the four corners as a json array, e.g. [[10,10],[210,30],[200,180],[5,160]];
    /// the image bounds shrunk by 5% are used when omitted
    #[argh(option, short = 'p')]
    points: Option<String>,

    /// the corners are normalized to [0, 1]
    #[argh(switch)]
    normalized: bool,

    /// normalized corners measure y from the bottom of the image
    #[argh(switch)]
    bottom_left: bool,

    /// output width, estimated from the corners when omitted
    #[argh(option)]
    width: Option<usize>,

    /// output height, estimated from the corners when omitted
    #[argh(option)]
    height: Option<usize>,

    /// path to a json rectifier configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// interpolation mode: nearest, bilinear or bicubic
    #[argh(option, from_str_fn(parse_interpolation))]
    interpolation: Option<InterpolationMode>,

    /// replicate the edge pixels instead of leaving the border transparent
    #[argh(switch)]
    replicate_border: bool,

    /// longest accepted image side before downscaling
    #[argh(option, default = "convert::DEFAULT_MAX_DIMENSION")]
    max_dimension: usize,

    /// path to write the input image with the corners drawn on it
    #[argh(option)]
    overlay_path: Option<PathBuf>,

    /// fail on degenerate corners instead of falling back to the default region
    #[argh(switch)]
    no_fallback: bool,
}

fn parse_interpolation(value: &str) -> Result<InterpolationMode, String> {
    match value {
        "nearest" => Ok(InterpolationMode::Nearest),
        "bilinear" => Ok(InterpolationMode::Bilinear),
        "bicubic" => Ok(InterpolationMode::Bicubic),
        _ => Err(format!("unknown interpolation mode: {value}")),
    }
}

fn load_config(args: &Args) -> Result<RectifierConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => RectifierConfig::default(),
    };

    // command line flags take precedence over the file
    if let Some(interpolation) = args.interpolation {
        config = config.with_interpolation(interpolation);
    }
    if args.replicate_border {
        config = config.with_border(BorderMode::Replicate);
    }

    Ok(config)
}

fn load_corners(
    args: &Args,
    image: &GenericImage,
    scale: (f64, f64),
) -> Result<Quadrilateral, Box<dyn std::error::Error>> {
    let Some(points) = &args.points else {
        log::info!("no corners given, using the default region");
        return MarginDetector::default()
            .detect(image)
            .ok_or_else(|| "image too small for the default region".into());
    };

    let points = serde_json::from_str::<Vec<[f64; 2]>>(points)?
        .into_iter()
        .map(Point2::from)
        .collect::<Vec<_>>();

    let quad = if args.normalized {
        let origin = if args.bottom_left {
            CoordinateOrigin::BottomLeft
        } else {
            CoordinateOrigin::TopLeft
        };
        Quadrilateral::from_normalized(&points, image.size(), origin)?
    } else {
        // pixel corners refer to the image before any downscaling
        let scaled = points
            .iter()
            .map(|p| Point2::new(p.x * scale.0, p.y * scale.1))
            .collect::<Vec<_>>();
        Quadrilateral::from_slice(&scaled)?
    };

    Ok(quad)
}

fn rectify_with_fallback(
    rectifier: &PerspectiveRectifier,
    image: &GenericImage,
    quad: &Quadrilateral,
    args: &Args,
) -> Result<RectifiedImage, Box<dyn std::error::Error>> {
    match rectifier.rectify(image, &quad.points, args.width, args.height) {
        Err(RectifyError::DegenerateGeometry(msg)) if !args.no_fallback => {
            log::warn!("{msg}, falling back to the default region");
            let fallback = MarginDetector::default()
                .detect(image)
                .ok_or("image too small for the default region")?;
            Ok(rectifier.rectify(image, &fallback.points, args.width, args.height)?)
        }
        res => Ok(res?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // read the image and bring it into a supported format
    let image = F::read_image_any(&args.image_path)?;
    let original_size = image.size();
    let image = convert::convert_to_supported_format(image, args.max_dimension)?;
    log::info!(
        "loaded {} as {} {}",
        args.image_path.display(),
        image.size(),
        image.format_name()
    );

    let scale = (
        image.size().width as f64 / original_size.width as f64,
        image.size().height as f64 / original_size.height as f64,
    );

    let config = load_config(&args)?;
    let quad = load_corners(&args, &image, scale)?;

    let rectifier = PerspectiveRectifier::new(config);
    let rectified = rectify_with_fallback(&rectifier, &image, &quad, &args)?;

    F::write_image_any(&args.output_path, &rectified.image)?;
    log::info!(
        "wrote {} {} image to {}",
        rectified.image.size(),
        rectified.image.format_name(),
        args.output_path.display()
    );

    if let Some(overlay_path) = &args.overlay_path {
        let rgb = convert::to_rgb8(&image)?;
        let overlay = draw_quadrilateral_overlay(&rgb, &rectified.corners);
        F::write_image_any(overlay_path, &GenericImage::Rgb8(overlay))?;
    }

    println!("{}", serde_json::to_string_pretty(&rectified.metrics)?);

    Ok(())
}
