//! An imported file: backboard, assets and artboards.

use std::sync::Arc;

use vizij_rive_codec::{PropertyValue, RuntimeHeader};

use crate::artboard::Artboard;
use crate::assets::{FileAsset, FileAssetResolver};
use crate::config::Config;
use crate::core::keys::type_key as tk;
use crate::core::object::Core;
use crate::error::ImportError;
use crate::importer;
use crate::render::Factory;
use crate::reset::ResetPool;

/// File-level settings record. Carries no properties this runtime reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Backboard;

impl Core for Backboard {
    fn core_type(&self) -> u16 {
        tk::BACKBOARD
    }

    fn property(&self, _key: u16) -> Option<PropertyValue> {
        None
    }

    fn set_property(&mut self, _key: u16, _value: PropertyValue) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct File {
    header: RuntimeHeader,
    backboard: Backboard,
    assets: Vec<FileAsset>,
    artboards: Vec<Artboard>,
    config: Config,
    pool: Arc<ResetPool>,
}

impl File {
    /// Decodes `bytes`. Embedded assets are decoded with `factory`; assets
    /// without embedded contents are loaded through `resolver` when both are
    /// given.
    pub fn import(
        bytes: &[u8],
        config: &Config,
        factory: Option<&mut dyn Factory>,
        resolver: Option<&mut dyn FileAssetResolver>,
    ) -> Result<File, ImportError> {
        importer::import(bytes, config, factory, resolver)
    }

    pub(crate) fn from_parts(
        header: RuntimeHeader,
        backboard: Backboard,
        assets: Vec<FileAsset>,
        artboards: Vec<Artboard>,
        config: Config,
        pool: Arc<ResetPool>,
    ) -> Self {
        Self {
            header,
            backboard,
            assets,
            artboards,
            config,
            pool,
        }
    }

    pub fn header(&self) -> &RuntimeHeader {
        &self.header
    }

    pub fn backboard(&self) -> &Backboard {
        &self.backboard
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn assets(&self) -> &[FileAsset] {
        &self.assets
    }

    pub fn artboards(&self) -> &[Artboard] {
        &self.artboards
    }

    pub fn artboard_count(&self) -> usize {
        self.artboards.len()
    }

    /// First artboard with `name`.
    pub fn artboard(&self, name: &str) -> Option<&Artboard> {
        self.artboards.iter().find(|a| a.name() == name)
    }

    pub fn artboard_at(&self, index: usize) -> Option<&Artboard> {
        self.artboards.get(index)
    }

    /// The first artboard, which hosts treat as the default.
    pub fn default_artboard(&self) -> Option<&Artboard> {
        self.artboards.first()
    }

    /// A fresh mutable copy of the named artboard. Instances share
    /// animation and state machine definitions with the file.
    pub fn artboard_instance(&self, name: &str) -> Option<Artboard> {
        self.artboard(name).map(Artboard::instance)
    }

    pub fn artboard_instance_at(&self, index: usize) -> Option<Artboard> {
        self.artboard_at(index).map(Artboard::instance)
    }

    /// Pool backing animation resets for every artboard of this file.
    pub fn reset_pool(&self) -> &Arc<ResetPool> {
        &self.pool
    }
}
