use crate::error::{GitHubPreviewError, Result};
use crate::render::text::TextMeasure;
use crate::render::{CANVAS_HEIGHT, CANVAS_WIDTH};
use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_REGULAR_FONT: &str = "msyh.ttc";
pub const DEFAULT_BOLD_FONT: &str = "msyhbd.ttc";
pub const TEMPLATE_FILE: &str = "template.png";
const FONTS_DIR: &str = "fonts";

const OWNER_SIZE: f32 = 25.0;
const NAME_SIZE: f32 = 30.0;
const DESCRIPTION_SIZE: f32 = 15.0;
const COUNT_SIZE: f32 = 20.0;

/// A font at a fixed pixel size
#[derive(Clone)]
pub struct FontFace {
    pub font: Arc<FontVec>,
    pub scale: PxScale,
}

impl FontFace {
    pub fn new(font: Arc<FontVec>, size: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(size),
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str) -> u32 {
        imageproc::drawing::text_size(self.scale, self.font.as_ref(), text).0
    }
}

/// The four faces a preview card is drawn with: two weights, two sizes each
#[derive(Clone)]
pub struct FontSet {
    pub owner: FontFace,
    pub name: FontFace,
    pub description: FontFace,
    pub count: FontFace,
}

impl FontSet {
    pub fn new(regular: Arc<FontVec>, bold: Arc<FontVec>) -> Self {
        Self {
            owner: FontFace::new(regular.clone(), OWNER_SIZE),
            name: FontFace::new(bold.clone(), NAME_SIZE),
            description: FontFace::new(regular, DESCRIPTION_SIZE),
            count: FontFace::new(bold, COUNT_SIZE),
        }
    }
}

/// Where the template and font files live
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub regular_font: String,
    pub bold_font: String,
    pub template: String,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            regular_font: DEFAULT_REGULAR_FONT.to_string(),
            bold_font: DEFAULT_BOLD_FONT.to_string(),
            template: TEMPLATE_FILE.to_string(),
        }
    }

    pub fn font_path(&self, file: &str) -> PathBuf {
        self.root.join(FONTS_DIR).join(file)
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.template)
    }
}

/// Template bitmap plus fonts, loaded once and shared across renders
#[derive(Clone)]
pub struct Assets {
    template: RgbaImage,
    fonts: FontSet,
}

impl Assets {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_from(&AssetPaths::new(dir.as_ref()))
    }

    pub fn load_from(paths: &AssetPaths) -> Result<Self> {
        let regular = Arc::new(load_font(&paths.font_path(&paths.regular_font))?);
        let bold = Arc::new(load_font(&paths.font_path(&paths.bold_font))?);
        let template = load_template(&paths.template_path())?;

        Ok(Self::from_parts(template, regular, bold))
    }

    pub fn from_parts(template: RgbaImage, regular: Arc<FontVec>, bold: Arc<FontVec>) -> Self {
        Self {
            template: fit_canvas(template),
            fonts: FontSet::new(regular, bold),
        }
    }

    pub fn template(&self) -> &RgbaImage {
        &self.template
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }
}

pub fn load_font(path: &Path) -> Result<FontVec> {
    debug!("Loading font {}", path.display());
    let bytes = std::fs::read(path)?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| GitHubPreviewError::FontError(format!("{}: {}", path.display(), e)))
}

/// Loads the card background. A missing file falls back to a blank canvas.
pub fn load_template(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        warn!(
            "Template {} not found, using a blank canvas",
            path.display()
        );
        return Ok(blank_canvas());
    }

    let template = image::open(path)?.to_rgba8();
    Ok(fit_canvas(template))
}

pub fn blank_canvas() -> RgbaImage {
    RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([255, 255, 255, 255]))
}

fn fit_canvas(template: RgbaImage) -> RgbaImage {
    if template.dimensions() == (CANVAS_WIDTH, CANVAS_HEIGHT) {
        return template;
    }

    warn!(
        "Template is {}x{}, resizing to {}x{}",
        template.width(),
        template.height(),
        CANVAS_WIDTH,
        CANVAS_HEIGHT
    );
    imageops::resize(&template, CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3)
}
