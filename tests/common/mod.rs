#![allow(dead_code)]

use ab_glyph::FontVec;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use github_preview::github::{ClientConfig, GitHubClient};
use github_preview::render::{Assets, RenderConfig, Renderer};
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::json;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const AVATAR_COLOR: Rgba<u8> = Rgba([30, 60, 200, 255]);
pub const TEMPLATE_COLOR: Rgba<u8> = Rgba([240, 240, 240, 255]);

#[derive(Clone)]
struct StubState {
    base_url: String,
    repo_hits: Arc<Mutex<Vec<String>>>,
    avatar_hits: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
}

/// Local stand-in for api.github.com and the avatar host
pub struct StubGitHub {
    pub base_url: String,
    state: StubState,
}

impl StubGitHub {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let base_url = format!("http://{}", addr);

        let state = StubState {
            base_url: base_url.clone(),
            repo_hits: Arc::new(Mutex::new(Vec::new())),
            avatar_hits: Arc::new(AtomicUsize::new(0)),
            last_auth: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/repos/:owner/:repo", get(repo_handler))
            .route("/avatars/:name", get(avatar_handler))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server crashed");
        });

        StubGitHub { base_url, state }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default().with_api_base(self.base_url.clone())
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::new(self.config()).expect("Failed to create client")
    }

    pub fn avatar_url(&self, name: &str) -> String {
        format!("{}/avatars/{}", self.base_url, name)
    }

    pub fn repo_hits(&self) -> Vec<String> {
        self.state.repo_hits.lock().unwrap().clone()
    }

    pub fn avatar_hits(&self) -> usize {
        self.state.avatar_hits.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.state.last_auth.lock().unwrap().clone()
    }
}

async fn repo_handler(
    State(state): State<StubState>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    state
        .repo_hits
        .lock()
        .unwrap()
        .push(format!("{}/{}", owner, repo));
    *state.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    match (owner.as_str(), repo.as_str()) {
        ("octocat", "Hello-World") => Json(json!({
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "description": "My first repository on GitHub!",
            "owner": {
                "login": "octocat",
                "avatar_url": format!("{}/avatars/octocat.png", state.base_url),
            },
            "stargazers_count": 80,
            "subscribers_count": 9,
            "forks": 9,
            "license": { "spdx_id": "MIT" },
        }))
        .into_response(),
        ("octocat", "bare") => Json(json!({
            "name": "bare",
            "description": null,
            "owner": null,
            "license": null,
        }))
        .into_response(),
        ("octocat", "broken-avatar") => Json(json!({
            "name": "broken-avatar",
            "description": "Avatar host answers 404",
            "owner": {
                "login": "octocat",
                "avatar_url": format!("{}/avatars/missing.png", state.base_url),
            },
            "stargazers_count": 1,
            "forks": 2,
        }))
        .into_response(),
        ("broken", "json") => (StatusCode::OK, "this is not json").into_response(),
        ("server", "error") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        ("rate", "limited") => (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "API rate limit exceeded" })),
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn avatar_handler(State(state): State<StubState>, Path(name): Path<String>) -> Response {
    state.avatar_hits.fetch_add(1, Ordering::SeqCst);

    match name.as_str() {
        "octocat.png" => (
            [(header::CONTENT_TYPE, "image/png")],
            png_bytes(&RgbaImage::from_pixel(125, 125, AVATAR_COLOR)),
        )
            .into_response(),
        "garbage.png" => (StatusCode::OK, "definitely not an image").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buf.into_inner()
}

/// An address nothing is listening on.
pub fn dead_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{}", addr)
}

/// Builds a minimal TrueType font with a single glyph: a solid box with an
/// advance of exactly one em. At pixel size `s` every character measures `s`
/// pixels wide, which keeps layout arithmetic exact.
///
/// The box spans `GLYPH_INK_LEFT..GLYPH_INK_RIGHT` of the advance and sits
/// `GLYPH_INK_TOP..GLYPH_INK_BOTTOM` of the size below the drawing origin.
pub fn test_font_bytes() -> Vec<u8> {
    const UNITS_PER_EM: u16 = 1024;

    let mut head = Vec::new();
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // font revision
    head.extend_from_slice(&0u32.to_be_bytes()); // checksum adjustment
    head.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
    head.extend_from_slice(&0u16.to_be_bytes()); // flags
    head.extend_from_slice(&UNITS_PER_EM.to_be_bytes());
    head.extend_from_slice(&[0u8; 16]); // created + modified
    for v in [0i16, -256, 1024, 768] {
        head.extend_from_slice(&v.to_be_bytes()); // bbox
    }
    head.extend_from_slice(&0u16.to_be_bytes()); // mac style
    head.extend_from_slice(&8u16.to_be_bytes()); // lowest rec ppem
    head.extend_from_slice(&2i16.to_be_bytes()); // direction hint
    head.extend_from_slice(&0i16.to_be_bytes()); // index to loc format (short)
    head.extend_from_slice(&0i16.to_be_bytes()); // glyph data format
    assert_eq!(head.len(), 54);

    let mut hhea = Vec::new();
    hhea.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    hhea.extend_from_slice(&768i16.to_be_bytes()); // ascender
    hhea.extend_from_slice(&(-256i16).to_be_bytes()); // descender
    hhea.extend_from_slice(&0i16.to_be_bytes()); // line gap
    hhea.extend_from_slice(&UNITS_PER_EM.to_be_bytes()); // advance width max
    hhea.extend_from_slice(&[0u8; 6]); // min lsb, min rsb, x max extent
    hhea.extend_from_slice(&1i16.to_be_bytes()); // caret slope rise
    hhea.extend_from_slice(&[0u8; 4]); // caret slope run, caret offset
    hhea.extend_from_slice(&[0u8; 8]); // reserved
    hhea.extend_from_slice(&0i16.to_be_bytes()); // metric data format
    hhea.extend_from_slice(&1u16.to_be_bytes()); // number of h metrics
    assert_eq!(hhea.len(), 36);

    let mut hmtx = Vec::new();
    hmtx.extend_from_slice(&UNITS_PER_EM.to_be_bytes()); // advance
    hmtx.extend_from_slice(&128i16.to_be_bytes()); // lsb

    let mut maxp = Vec::new();
    maxp.extend_from_slice(&0x0000_5000u32.to_be_bytes()); // version 0.5
    maxp.extend_from_slice(&1u16.to_be_bytes()); // glyph count

    // One simple glyph: a single four-point contour, x 128..896, y 0..640
    let mut glyf = Vec::new();
    glyf.extend_from_slice(&1i16.to_be_bytes()); // contour count
    for v in [128i16, 0, 896, 640] {
        glyf.extend_from_slice(&v.to_be_bytes()); // bbox
    }
    glyf.extend_from_slice(&3u16.to_be_bytes()); // last point of contour
    glyf.extend_from_slice(&0u16.to_be_bytes()); // instruction length
    glyf.extend_from_slice(&[0x01; 4]); // on-curve, long coordinates
    for dx in [128i16, 0, 768, 0] {
        glyf.extend_from_slice(&dx.to_be_bytes());
    }
    for dy in [0i16, 640, 0, -640] {
        glyf.extend_from_slice(&dy.to_be_bytes());
    }
    assert_eq!(glyf.len(), 34);

    let mut loca = Vec::new();
    loca.extend_from_slice(&0u16.to_be_bytes());
    loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());

    // Table records sorted by tag
    let tables: [(&[u8; 4], Vec<u8>); 6] = [
        (b"glyf", glyf),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"loca", loca),
        (b"maxp", maxp),
    ];

    let mut font = Vec::new();
    font.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // sfnt version
    font.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    font.extend_from_slice(&64u16.to_be_bytes()); // search range
    font.extend_from_slice(&2u16.to_be_bytes()); // entry selector
    font.extend_from_slice(&32u16.to_be_bytes()); // range shift

    let mut offset = 12 + 16 * tables.len();
    let mut data = Vec::new();
    for (tag, table) in &tables {
        font.extend_from_slice(*tag);
        font.extend_from_slice(&0u32.to_be_bytes()); // checksum
        font.extend_from_slice(&(offset as u32).to_be_bytes());
        font.extend_from_slice(&(table.len() as u32).to_be_bytes());

        data.extend_from_slice(table);
        let padded = (table.len() + 3) & !3;
        data.resize(data.len() + padded - table.len(), 0);
        offset += padded;
    }
    font.extend_from_slice(&data);
    font
}

/// Horizontal ink extent of a test glyph, as a fraction of its size
pub const GLYPH_INK_LEFT: f32 = 128.0 / 1024.0;
pub const GLYPH_INK_RIGHT: f32 = 896.0 / 1024.0;
/// Vertical ink extent below the drawing origin, as a fraction of the size.
/// The baseline sits at the 768/1024 ascent; the box rises 640 units above it.
pub const GLYPH_INK_TOP: f32 = 128.0 / 1024.0;
pub const GLYPH_INK_BOTTOM: f32 = 768.0 / 1024.0;

/// A pixel well inside the first glyph drawn at `origin` with pixel size `size`.
pub fn first_glyph_center(origin: (i32, i32), size: f32) -> (u32, u32) {
    let x = origin.0 as f32 + size * (GLYPH_INK_LEFT + GLYPH_INK_RIGHT) / 2.0;
    let y = origin.1 as f32 + size * (GLYPH_INK_TOP + GLYPH_INK_BOTTOM) / 2.0;
    (x as u32, y as u32)
}

pub fn test_font() -> Arc<FontVec> {
    Arc::new(FontVec::try_from_vec(test_font_bytes()).expect("Test font should parse"))
}

pub fn test_assets() -> Assets {
    let font = test_font();
    Assets::from_parts(
        RgbaImage::from_pixel(800, 400, TEMPLATE_COLOR),
        font.clone(),
        font,
    )
}

pub fn test_renderer(config: RenderConfig) -> Renderer {
    Renderer::new(test_assets(), config)
}
