//! File assets (images, fonts), their embedded contents and out-of-band loading.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vizij_rive_codec::PropertyValue;

use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::render::{Factory, RenderFont, RenderImage};
use crate::scene::{set_f32, set_u32};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Image,
    Font,
}

/// Decoded payload attached to an asset once its bytes have been loaded.
#[derive(Clone, Debug)]
pub enum DecodedAsset {
    Image(Arc<dyn RenderImage>),
    Font(Arc<dyn RenderFont>),
}

#[derive(Clone, Debug)]
pub struct FileAsset {
    pub kind: AssetKind,
    pub name: String,
    pub asset_id: u32,
    /// Intrinsic size, images only.
    pub width: f32,
    pub height: f32,
    pub(crate) decoded: Option<DecodedAsset>,
}

impl FileAsset {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            name: String::new(),
            asset_id: 0,
            width: 0.0,
            height: 0.0,
            decoded: None,
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self.kind {
            AssetKind::Image => "png",
            AssetKind::Font => "ttf",
        }
    }

    /// Name used to look up out-of-band contents: `<stem>-<assetId>.<ext>`.
    pub fn unique_filename(&self) -> String {
        let stem = match self.name.rfind('.') {
            Some(dot) => &self.name[..dot],
            None => self.name.as_str(),
        };
        format!("{stem}-{}.{}", self.asset_id, self.file_extension())
    }

    pub fn image(&self) -> Option<&Arc<dyn RenderImage>> {
        match &self.decoded {
            Some(DecodedAsset::Image(image)) => Some(image),
            _ => None,
        }
    }

    pub fn font(&self) -> Option<&Arc<dyn RenderFont>> {
        match &self.decoded {
            Some(DecodedAsset::Font(font)) => Some(font),
            _ => None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }

    /// Hands `bytes` to the factory. Returns false when it could not decode them.
    pub fn decode(&mut self, bytes: &[u8], factory: &mut dyn Factory) -> bool {
        self.decoded = match self.kind {
            AssetKind::Image => factory.decode_image(bytes).map(DecodedAsset::Image),
            AssetKind::Font => factory.decode_font(bytes).map(DecodedAsset::Font),
        };
        if self.decoded.is_none() {
            log::warn!("could not decode asset '{}' ({} bytes)", self.name, bytes.len());
        }
        self.decoded.is_some()
    }
}

impl Core for FileAsset {
    fn core_type(&self) -> u16 {
        match self.kind {
            AssetKind::Image => tk::IMAGE_ASSET,
            AssetKind::Font => tk::FONT_ASSET,
        }
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match (key, self.kind) {
            (pk::ASSET_NAME, _) => Some(PropertyValue::String(self.name.clone())),
            (pk::FILE_ASSET_ID, _) => Some(PropertyValue::Uint(self.asset_id)),
            (pk::DRAWABLE_ASSET_WIDTH, AssetKind::Image) => Some(PropertyValue::Double(self.width)),
            (pk::DRAWABLE_ASSET_HEIGHT, AssetKind::Image) => {
                Some(PropertyValue::Double(self.height))
            }
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, self.kind, value) {
            (pk::ASSET_NAME, _, PropertyValue::String(v)) => {
                self.name = v;
                true
            }
            (pk::FILE_ASSET_ID, _, v) => set_u32(&mut self.asset_id, v),
            (pk::DRAWABLE_ASSET_WIDTH, AssetKind::Image, v) => set_f32(&mut self.width, v),
            (pk::DRAWABLE_ASSET_HEIGHT, AssetKind::Image, v) => set_f32(&mut self.height, v),
            _ => false,
        }
    }
}

/// In-band bytes for the asset record that precedes it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileAssetContents {
    pub bytes: Vec<u8>,
}

impl Core for FileAssetContents {
    fn core_type(&self) -> u16 {
        tk::FILE_ASSET_CONTENTS
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::FILE_ASSET_BYTES => Some(PropertyValue::Bytes(self.bytes.clone())),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, value) {
            (pk::FILE_ASSET_BYTES, PropertyValue::Bytes(bytes)) => {
                self.bytes = bytes;
                true
            }
            _ => false,
        }
    }
}

/// Supplies bytes for assets that are not embedded in the file.
pub trait FileAssetResolver {
    fn load_contents(&mut self, asset: &FileAsset) -> Option<Vec<u8>>;
}

/// Resolver backed by an in-memory map from unique filename to bytes.
#[derive(Clone, Debug, Default)]
pub struct InMemoryResolver {
    files: hashbrown::HashMap<String, Vec<u8>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(filename.into(), bytes);
    }
}

impl FileAssetResolver for InMemoryResolver {
    fn load_contents(&mut self, asset: &FileAsset) -> Option<Vec<u8>> {
        self.files.get(&asset.unique_filename()).cloned()
    }
}
