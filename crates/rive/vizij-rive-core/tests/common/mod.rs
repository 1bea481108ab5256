#![allow(dead_code)]
//! Recording factory and renderer plus small builders shared by the
//! integration tests.

use std::any::Any;
use std::sync::Arc;

use vizij_rive_core::render::RenderFont;
use vizij_rive_core::{
    BlendMode, Config, Factory, File, FillRule, Mat2D, RawPath, RenderImage, RenderPaint,
    RenderPath, Renderer,
};
use vizij_test_fixtures::riv::RivDocument;

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[derive(Debug)]
pub struct TestPath {
    pub verbs: usize,
    pub fill_rule: FillRule,
}

impl RenderPath for TestPath {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
pub struct TestPaint {
    pub color: u32,
    pub blend_mode: BlendMode,
}

impl RenderPaint for TestPaint {
    fn color(&mut self, argb: u32) {
        self.color = argb;
    }

    fn blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct TestImage {
    pub width: u32,
    pub height: u32,
}

impl RenderImage for TestImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug)]
pub struct TestFont;

impl RenderFont for TestFont {}

/// Decodes images from two-byte payloads `[width, height]`.
#[derive(Debug, Default)]
pub struct TestFactory {
    pub paths: usize,
    pub paints: usize,
    pub images: usize,
    pub fonts: usize,
}

impl Factory for TestFactory {
    fn make_render_path(&mut self, path: &RawPath, fill_rule: FillRule) -> Box<dyn RenderPath> {
        self.paths += 1;
        Box::new(TestPath {
            verbs: path.verbs().len(),
            fill_rule,
        })
    }

    fn make_render_paint(&mut self) -> Box<dyn RenderPaint> {
        self.paints += 1;
        Box::new(TestPaint::default())
    }

    fn decode_image(&mut self, bytes: &[u8]) -> Option<Arc<dyn RenderImage>> {
        let [width, height] = bytes else {
            return None;
        };
        self.images += 1;
        Some(Arc::new(TestImage {
            width: u32::from(*width),
            height: u32::from(*height),
        }))
    }

    fn decode_font(&mut self, bytes: &[u8]) -> Option<Arc<dyn RenderFont>> {
        if bytes.is_empty() {
            return None;
        }
        self.fonts += 1;
        Some(Arc::new(TestFont))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Transform(Mat2D),
    Clip { verbs: usize },
    Path { verbs: usize, color: u32, blend_mode: BlendMode },
    Image { width: u32, height: u32, opacity: f32 },
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn paths(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Path { .. }))
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn transform(&mut self, transform: &Mat2D) {
        self.calls.push(DrawCall::Transform(*transform));
    }

    fn draw_path(&mut self, path: &dyn RenderPath, paint: &dyn RenderPaint) {
        let path = path.as_any().downcast_ref::<TestPath>().expect("test path");
        let paint = paint.as_any().downcast_ref::<TestPaint>().expect("test paint");
        self.calls.push(DrawCall::Path {
            verbs: path.verbs,
            color: paint.color,
            blend_mode: paint.blend_mode,
        });
    }

    fn clip_path(&mut self, path: &dyn RenderPath) {
        let path = path.as_any().downcast_ref::<TestPath>().expect("test path");
        self.calls.push(DrawCall::Clip { verbs: path.verbs });
    }

    fn draw_image(&mut self, image: &dyn RenderImage, _blend_mode: BlendMode, opacity: f32) {
        self.calls.push(DrawCall::Image {
            width: image.width(),
            height: image.height(),
            opacity,
        });
    }
}

pub fn seeded_config(seed: u64) -> Config {
    Config {
        random_seed: Some(seed),
        ..Config::default()
    }
}

pub fn import_fixture(name: &str) -> File {
    let bytes = vizij_test_fixtures::documents::bytes(name).expect("fixture bytes");
    File::import(&bytes, &Config::default(), None, None).expect("fixture imports")
}

pub fn import_doc(doc: &RivDocument, config: &Config) -> File {
    File::import(&doc.encode(), config, None, None).expect("document imports")
}

/// Seeded config shared with other fixture consumers.
pub fn deterministic_config() -> Config {
    let text = vizij_test_fixtures::configs::json("deterministic").expect("config fixture");
    Config::from_json(&text).expect("config parses")
}
