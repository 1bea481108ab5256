//! Reads `.riv` bytes into a [`File`].
//!
//! The stream after the header is a backboard record, a counted list of
//! asset records and a counted list of artboards. Each artboard is a counted
//! list of flat object records followed by counted animation and state
//! machine trees. A record is `typeKey (key payload)* 0`; a tree is a record
//! followed by a child count and that many trees.

use std::sync::Arc;

use vizij_rive_codec::{BinaryReader, RuntimeHeader, MAJOR_VERSION};

use crate::animation::LinearAnimation;
use crate::artboard::Artboard;
use crate::assets::{FileAsset, FileAssetResolver};
use crate::config::Config;
use crate::core::object::{Core, CoreObject};
use crate::core::registry;
use crate::error::ImportError;
use crate::file::{Backboard, File};
use crate::render::Factory;
use crate::reset::ResetPool;
use crate::state_machine::{LayerState, StateMachine};

/// A decoded record and the records nested under it.
#[derive(Debug)]
struct TreeNode {
    object: Option<CoreObject>,
    children: Vec<TreeNode>,
}

struct Importer<'a, 'b> {
    reader: BinaryReader<'a>,
    header: RuntimeHeader,
    config: &'b Config,
}

impl<'a, 'b> Importer<'a, 'b> {
    fn check(&self, what: &str) -> Result<(), ImportError> {
        if self.reader.did_overflow() {
            return Err(ImportError::malformed(format!(
                "unexpected end of data in {what} at byte {}",
                self.reader.position()
            )));
        }
        Ok(())
    }

    fn read_count(&mut self, what: &str) -> Result<usize, ImportError> {
        let count = self.reader.read_var_uint32();
        self.check(what)?;
        Ok(count as usize)
    }

    /// Reads one record. Unknown types still consume their properties and
    /// come back as `None`.
    fn read_record(&mut self) -> Result<Option<CoreObject>, ImportError> {
        let raw_type = self.reader.read_var_uint32();
        self.check("record type")?;
        let type_key = u16::try_from(raw_type)
            .map_err(|_| ImportError::malformed(format!("type key {raw_type} out of range")))?;
        let mut object = registry::make_core_instance(type_key);

        loop {
            let raw_key = self.reader.read_var_uint32();
            self.check("property key")?;
            if raw_key == 0 {
                break;
            }
            let key = u16::try_from(raw_key)
                .map_err(|_| ImportError::malformed(format!("property key {raw_key} out of range")))?;
            let consumed = match object.as_mut() {
                Some(object) => object.deserialize(key, &mut self.reader),
                None => false,
            };
            if !consumed {
                let field_type = registry::property_field_type(key)
                    .or_else(|| self.header.property_field_type(key))
                    .ok_or_else(|| {
                        ImportError::malformed(format!(
                            "property {key} of type {type_key} has no known field type"
                        ))
                    })?;
                field_type.skip(&mut self.reader);
            }
            self.check("property value")?;
        }

        if object.is_none() {
            log::debug!("skipped object of unknown type {type_key}");
        }
        Ok(object)
    }

    fn read_tree(&mut self, depth: usize) -> Result<TreeNode, ImportError> {
        if depth > self.config.max_tree_depth {
            return Err(ImportError::malformed(format!(
                "object tree deeper than {}",
                self.config.max_tree_depth
            )));
        }
        let object = self.read_record()?;
        let count = self.read_count("child count")?;
        let mut children = Vec::new();
        for _ in 0..count {
            children.push(self.read_tree(depth + 1)?);
        }
        Ok(TreeNode { object, children })
    }

    fn read_backboard(&mut self) -> Result<Backboard, ImportError> {
        match self.read_record()? {
            Some(CoreObject::Backboard(backboard)) => Ok(backboard),
            _ => Err(ImportError::malformed("file does not start with a backboard")),
        }
    }

    fn read_assets(
        &mut self,
        mut factory: Option<&mut (dyn Factory + '_)>,
    ) -> Result<Vec<FileAsset>, ImportError> {
        let count = self.read_count("asset count")?;
        let mut assets: Vec<FileAsset> = Vec::new();
        for _ in 0..count {
            match self.read_record()? {
                Some(CoreObject::FileAsset(asset)) => assets.push(asset),
                Some(CoreObject::FileAssetContents(contents)) => {
                    let (Some(asset), Some(factory)) = (assets.last_mut(), factory.as_deref_mut())
                    else {
                        continue;
                    };
                    asset.decode(&contents.bytes, factory);
                }
                _ => log::debug!("ignored non-asset record in asset list"),
            }
        }
        Ok(assets)
    }

    /// Reads one artboard. `Ok(None)` means the artboard was readable but
    /// failed to initialize; the stream stays in sync either way.
    fn read_artboard(
        &mut self,
        index: usize,
        pool: &Arc<ResetPool>,
    ) -> Result<Option<Artboard>, ImportError> {
        let object_count = self.read_count("object count")?;
        if object_count == 0 {
            return Err(ImportError::malformed(format!("artboard {index} has no objects")));
        }
        if object_count > self.config.max_objects_per_artboard {
            return Err(ImportError::malformed(format!(
                "artboard {index} declares {object_count} objects"
            )));
        }

        let root = self.read_record()?;
        let mut artboard = match root {
            Some(CoreObject::Artboard(node)) => {
                Some(Artboard::with_config(node, self.config.clone(), Arc::clone(pool)))
            }
            _ => {
                log::warn!("artboard {index} does not start with an artboard record");
                None
            }
        };

        for _ in 1..object_count {
            let object = self.read_record()?;
            if let Some(artboard) = artboard.as_mut() {
                match object {
                    Some(object) => artboard.add_object(object),
                    None => artboard.add_empty_slot(),
                };
            }
        }

        let animation_count = self.read_count("animation count")?;
        for _ in 0..animation_count {
            let tree = self.read_tree(0)?;
            // Animation states refer to animations by index, so a bad tree
            // still takes a slot.
            let animation = build_animation(tree).unwrap_or_default();
            if let Some(artboard) = artboard.as_mut() {
                artboard.add_animation(animation);
            }
        }

        let machine_count = self.read_count("state machine count")?;
        for _ in 0..machine_count {
            let tree = self.read_tree(0)?;
            if let (Some(machine), Some(artboard)) = (build_state_machine(tree), artboard.as_mut()) {
                artboard.add_state_machine(machine);
            }
        }

        let Some(mut artboard) = artboard else {
            return Ok(None);
        };
        match artboard.initialize() {
            Ok(()) => Ok(Some(artboard)),
            Err(err) => {
                log::warn!("artboard {index} '{}' failed to initialize: {err}", artboard.name());
                Ok(None)
            }
        }
    }
}

fn build_animation(tree: TreeNode) -> Option<LinearAnimation> {
    let Some(CoreObject::LinearAnimation(mut animation)) = tree.object else {
        log::debug!("animation tree without a linear animation root");
        return None;
    };
    for object_node in tree.children {
        let Some(CoreObject::KeyedObject(mut keyed)) = object_node.object else {
            continue;
        };
        for property_node in object_node.children {
            let Some(CoreObject::KeyedProperty(mut property)) = property_node.object else {
                continue;
            };
            if property.key().is_none() {
                log::warn!(
                    "dropping keyed property {} on object {}: not a property key",
                    property.property_key,
                    keyed.object_id
                );
                continue;
            }
            property.keyframes.extend(property_node.children.into_iter().filter_map(|k| match k.object {
                Some(CoreObject::KeyFrame(keyframe)) => Some(keyframe),
                _ => None,
            }));
            keyed.properties.push(property);
        }
        animation.keyed_objects.push(keyed);
    }
    Some(animation)
}

fn build_state(tree: TreeNode) -> Option<LayerState> {
    let Some(CoreObject::State(mut state)) = tree.object else {
        log::debug!("layer child is not a state");
        return None;
    };
    for child in tree.children {
        match child.object {
            Some(CoreObject::Transition(mut transition)) => {
                transition.conditions.extend(child.children.into_iter().filter_map(|c| {
                    match c.object {
                        Some(CoreObject::Condition(condition)) => Some(condition),
                        _ => None,
                    }
                }));
                state.transitions.push(transition);
            }
            Some(CoreObject::BlendAnimation(blend)) => {
                if !state.add_blend_animation(blend) {
                    log::debug!("blend animation under a non-blend state");
                }
            }
            _ => {}
        }
    }
    Some(state)
}

fn build_state_machine(tree: TreeNode) -> Option<StateMachine> {
    let Some(CoreObject::StateMachine(mut machine)) = tree.object else {
        log::debug!("state machine tree without a state machine root");
        return None;
    };
    for child in tree.children {
        match child.object {
            Some(CoreObject::Input(input)) => machine.inputs.push(input),
            Some(CoreObject::Layer(mut layer)) => {
                layer
                    .states
                    .extend(child.children.into_iter().filter_map(build_state));
                machine.layers.push(layer);
            }
            _ => log::debug!("ignored state machine child"),
        }
    }
    Some(machine)
}

/// Parses a whole file. Codec-level damage fails the file; an artboard that
/// fails to initialize is dropped on its own.
pub(crate) fn import(
    bytes: &[u8],
    config: &Config,
    mut factory: Option<&mut dyn Factory>,
    resolver: Option<&mut dyn FileAssetResolver>,
) -> Result<File, ImportError> {
    let mut reader = BinaryReader::new(bytes);
    let header = RuntimeHeader::read(&mut reader)
        .map_err(|err| ImportError::malformed(err.to_string()))?;
    if header.major_version != MAJOR_VERSION {
        return Err(ImportError::UnsupportedVersion {
            major: header.major_version,
            minor: header.minor_version,
            supported: MAJOR_VERSION,
        });
    }

    let mut importer = Importer {
        reader,
        header,
        config,
    };
    let backboard = importer.read_backboard()?;
    let mut assets = importer.read_assets(factory.as_deref_mut())?;

    if let (Some(resolver), Some(factory)) = (resolver, factory.as_deref_mut()) {
        for asset in assets.iter_mut().filter(|a| !a.is_decoded()) {
            if let Some(bytes) = resolver.load_contents(asset) {
                asset.decode(&bytes, factory);
            }
        }
    }

    let pool = ResetPool::new(config.reset_pool_capacity);
    let count = importer.read_count("artboard count")?;
    let mut artboards = Vec::new();
    for index in 0..count {
        if let Some(mut artboard) = importer.read_artboard(index, &pool)? {
            artboard.attach_assets(&assets);
            artboards.push(artboard);
        }
    }
    if count > 0 && artboards.is_empty() {
        return Err(ImportError::malformed("no artboard could be initialized"));
    }

    Ok(File::from_parts(
        importer.header,
        backboard,
        assets,
        artboards,
        config.clone(),
        pool,
    ))
}
