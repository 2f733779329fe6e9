pub mod assets;
pub mod avatar;
pub mod text;

pub use assets::{AssetPaths, Assets, FontFace, FontSet};
pub use avatar::{circle_crop, placeholder_avatar, prepare_avatar, AVATAR_SIZE};
pub use text::{describe_lines, wrap_columns, TextMeasure, WrapPolicy};

use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::{ImageSegment, RepoInfo};
use base64::{engine::general_purpose, Engine as _};
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::io::Cursor;
use tracing::{debug, warn};

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 400;

const OWNER_COLOR: Rgba<u8> = Rgba([50, 50, 50, 255]);
const NAME_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MUTED_COLOR: Rgba<u8> = Rgba([100, 100, 100, 255]);

/// Fixed coordinates of every element on the card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub owner: (i32, i32),
    pub name: (i32, i32),
    pub description: (i32, i32),
    pub description_line_height: i32,
    pub stars: (i32, i32),
    pub forks: (i32, i32),
    pub avatar: (i64, i64),
    pub avatar_size: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            owner: (50, 50),
            name: (50, 80),
            description: (50, 120),
            description_line_height: 25,
            stars: (335, 305),
            forks: (435, 305),
            avatar: (600, 60),
            avatar_size: AVATAR_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Description width in pixels above which it gets wrapped
    pub cutoff: u32,
    pub wrap: WrapPolicy,
    pub wrap_columns: usize,
    pub layout: Layout,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cutoff: 400,
            wrap: WrapPolicy::default(),
            wrap_columns: 70,
            layout: Layout::default(),
        }
    }
}

/// A finished 800x400 preview card
#[derive(Debug, Clone)]
pub struct RenderedImage {
    image: RgbaImage,
}

impl RenderedImage {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Standard base64 of the PNG encoding
    pub fn to_base64(&self) -> Result<String> {
        Ok(general_purpose::STANDARD.encode(self.to_png()?))
    }

    pub fn to_segment(&self) -> Result<ImageSegment> {
        Ok(ImageSegment::from_base64(self.to_base64()?))
    }
}

pub struct Renderer {
    assets: Assets,
    config: RenderConfig,
}

impl Renderer {
    pub fn new(assets: Assets, config: RenderConfig) -> Self {
        Self { assets, config }
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Lines the description will be drawn on.
    pub fn description_lines(&self, description: &str) -> Vec<String> {
        describe_lines(
            description,
            &self.assets.fonts().description,
            self.config.cutoff,
            self.config.wrap,
            self.config.wrap_columns,
        )
    }

    /// Composites the card. `avatar` of `None` draws the placeholder.
    pub fn render(&self, info: &RepoInfo, avatar: Option<&DynamicImage>) -> RenderedImage {
        let mut canvas = self.assets.template().clone();
        let fonts = self.assets.fonts();
        let layout = &self.config.layout;

        let owner = format!("{}/", info.owner.as_deref().unwrap_or_default());
        draw_label(&mut canvas, OWNER_COLOR, layout.owner, &fonts.owner, &owner);
        draw_label(
            &mut canvas,
            NAME_COLOR,
            layout.name,
            &fonts.name,
            info.name.as_deref().unwrap_or_default(),
        );

        let lines = self.description_lines(info.description.as_deref().unwrap_or_default());
        debug!(lines = lines.len(), "Description layout");
        let (x, y) = layout.description;
        for (i, line) in lines.iter().enumerate() {
            let line_y = y + layout.description_line_height * i as i32;
            draw_label(&mut canvas, MUTED_COLOR, (x, line_y), &fonts.description, line);
        }

        let stars = info.stars.unwrap_or_default().to_string();
        let forks = info.forks.unwrap_or_default().to_string();
        draw_label(&mut canvas, MUTED_COLOR, layout.stars, &fonts.count, &stars);
        draw_label(&mut canvas, MUTED_COLOR, layout.forks, &fonts.count, &forks);

        let avatar = prepare_avatar(avatar, layout.avatar_size);
        imageops::overlay(&mut canvas, &avatar, layout.avatar.0, layout.avatar.1);

        RenderedImage { image: canvas }
    }

    /// Fetches the owner's avatar for `info`. Failures are logged and yield
    /// `None`, so the card gets the placeholder instead of being aborted.
    pub async fn load_avatar(&self, client: &GitHubClient, info: &RepoInfo) -> Option<DynamicImage> {
        let Some(url) = info.avatar.as_deref() else {
            warn!("Repository has no owner avatar, using placeholder");
            return None;
        };

        match client.fetch_avatar(url).await {
            Ok(avatar) => Some(avatar),
            Err(e) => {
                warn!("Failed to fetch avatar {}: {}", url, e);
                None
            }
        }
    }
}

fn draw_label(canvas: &mut RgbaImage, color: Rgba<u8>, at: (i32, i32), face: &FontFace, text: &str) {
    if text.is_empty() {
        return;
    }
    draw_text_mut(canvas, color, at.0, at.1, face.scale, face.font.as_ref(), text);
}
