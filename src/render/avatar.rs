use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

pub const AVATAR_SIZE: u32 = 125;

const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);
const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Keeps the pixels inside the square's inscribed circle and clears the rest.
///
/// Distances are measured from each pixel's centre to the centre of the
/// square, so a 125px input has radius 62.5 around (62.5, 62.5). Non-square
/// inputs are cropped to their top-left square first.
pub fn circle_crop(image: &RgbaImage) -> RgbaImage {
    let size = image.width().min(image.height());
    let radius = f64::from(size) / 2.0;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = f64::from(x) + 0.5 - radius;
        let dy = f64::from(y) + 0.5 - radius;
        if dx.hypot(dy) < radius {
            *image.get_pixel(x, y)
        } else {
            TRANSPARENT
        }
    })
}

/// Flat square used when the real avatar can't be fetched.
pub fn placeholder_avatar(size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size, size, PLACEHOLDER_COLOR)
}

/// Resizes the avatar (or the placeholder) to `size` and crops it round.
pub fn prepare_avatar(avatar: Option<&DynamicImage>, size: u32) -> RgbaImage {
    let square = match avatar {
        Some(image) => image.resize_exact(size, size, FilterType::Lanczos3).to_rgba8(),
        None => placeholder_avatar(size),
    };
    circle_crop(&square)
}
