//! Artboards own the object arena, order its components into a dependency
//! graph and run the players that animate them.
//!
//! Objects are addressed by their index in the arena. Parents, dependents
//! and animation targets all hold plain ids, so nothing outside the arena
//! owns a component.

use std::sync::Arc;

use hashbrown::HashMap;
use vizij_rive_codec::PropertyValue;

use crate::animation::{Interpolator, LinearAnimation, LinearAnimationInstance};
use crate::assets::FileAsset;
use crate::component::{ComponentBase, ComponentDirt};
use crate::config::Config;
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::{Core, CoreObject};
use crate::dependency::sort_dependencies;
use crate::error::GraphError;
use crate::ids::{IdAllocator, ObjectId, PlayerId};
use crate::inputs::{Inputs, PlayerCommand};
use crate::math::Mat2D;
use crate::outputs::{CoreEvent, Outputs};
use crate::player::{Playback, Player};
use crate::render::{BlendMode, Factory, FillRule, RawPath, Renderer};
use crate::reset::ResetPool;
use crate::scene::{ArtboardNode, Node};
use crate::state_machine::{StateMachine, StateMachineInstance};
use crate::target::{color_with_opacity, PropertyTarget};

/// What to issue for one drawable, fixed when the artboard initializes.
#[derive(Clone, Debug)]
enum DrawPlan {
    Shape {
        id: ObjectId,
        paths: Vec<ObjectId>,
        /// `(fill, solid color)` pairs in object order.
        paints: Vec<(ObjectId, ObjectId)>,
    },
    Image {
        id: ObjectId,
    },
}

#[derive(Debug)]
pub struct Artboard {
    objects: Vec<Option<CoreObject>>,
    animations: Vec<Arc<LinearAnimation>>,
    state_machines: Vec<Arc<StateMachine>>,
    dependency_order: Vec<ObjectId>,
    draw_plans: Vec<DrawPlan>,
    dirt: ComponentDirt,
    initialized: bool,
    players: Vec<Player>,
    ids: IdAllocator,
    outputs: Outputs,
    pending_events: Vec<CoreEvent>,
    config: Config,
    pool: Arc<ResetPool>,
}

impl Artboard {
    pub fn new(node: ArtboardNode) -> Self {
        let config = Config::default();
        let pool = ResetPool::new(config.reset_pool_capacity);
        Self::with_config(node, config, pool)
    }

    /// An artboard whose root is `node` (id 0), sharing `pool` with its file.
    pub fn with_config(node: ArtboardNode, config: Config, pool: Arc<ResetPool>) -> Self {
        Self {
            objects: vec![Some(CoreObject::Artboard(node))],
            animations: Vec::new(),
            state_machines: Vec::new(),
            dependency_order: Vec::new(),
            draw_plans: Vec::new(),
            dirt: ComponentDirt::NONE,
            initialized: false,
            players: Vec::new(),
            ids: IdAllocator::new(),
            outputs: Outputs::default(),
            pending_events: Vec::new(),
            config,
            pool,
        }
    }

    pub fn node(&self) -> Option<&ArtboardNode> {
        match self.objects.first()? {
            Some(CoreObject::Artboard(node)) => Some(node),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        self.node().map_or("", |n| n.component.name.as_str())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ----- arena -----

    /// Appends an object before initialization and returns its id.
    pub fn add_object(&mut self, object: CoreObject) -> ObjectId {
        self.objects.push(Some(object));
        ObjectId(self.objects.len() as u32 - 1)
    }

    /// Reserves an id for an object this runtime cannot represent.
    pub(crate) fn add_empty_slot(&mut self) -> ObjectId {
        self.objects.push(None);
        ObjectId(self.objects.len() as u32 - 1)
    }

    pub fn add_animation(&mut self, animation: LinearAnimation) {
        self.animations.push(Arc::new(animation));
    }

    pub fn add_state_machine(&mut self, machine: StateMachine) {
        self.state_machines.push(Arc::new(machine));
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Bounds-checked lookup. Empty slots resolve to `None`.
    pub fn resolve(&self, id: u32) -> Option<&CoreObject> {
        self.objects.get(id as usize)?.as_ref()
    }

    pub fn resolve_mut(&mut self, id: u32) -> Option<&mut CoreObject> {
        self.objects.get_mut(id as usize)?.as_mut()
    }

    fn component(&self, id: ObjectId) -> Option<&ComponentBase> {
        self.resolve(id.0)?.component()
    }

    fn component_mut(&mut self, id: ObjectId) -> Option<&mut ComponentBase> {
        self.resolve_mut(id.0)?.component_mut()
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &CoreObject)> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().map(|o| (ObjectId(i as u32), o)))
    }

    /// First component named `name`.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects()
            .find(|(_, o)| o.name() == Some(name))
            .map(|(id, _)| id)
    }

    /// First component named `name` whose type is or derives from `type_key`.
    pub fn find_of_type(&self, name: &str, type_key: u16) -> Option<ObjectId> {
        self.objects()
            .find(|(_, o)| o.name() == Some(name) && o.is_type_of(type_key))
            .map(|(id, _)| id)
    }

    pub fn animations(&self) -> &[Arc<LinearAnimation>] {
        &self.animations
    }

    pub fn animation(&self, name: &str) -> Option<&Arc<LinearAnimation>> {
        self.animations.iter().find(|a| a.name == name)
    }

    pub fn state_machines(&self) -> &[Arc<StateMachine>] {
        &self.state_machines
    }

    pub fn state_machine(&self, name: &str) -> Option<&Arc<StateMachine>> {
        self.state_machines.iter().find(|m| m.name == name)
    }

    pub fn dependency_order(&self) -> &[ObjectId] {
        &self.dependency_order
    }

    // ----- initialization -----

    /// Resolves parents, validates structure, builds and sorts the dependency
    /// graph and binds animations and state machines. Any failure leaves the
    /// artboard unusable.
    pub fn initialize(&mut self) -> Result<(), GraphError> {
        self.resolve_parents()?;
        self.validate()?;
        self.build_dependencies();
        self.sort_dependencies()?;
        self.build_draw_plans();

        let interpolators = self.resolve_interpolators();
        self.resolve_animations(&interpolators)?;
        for machine in &mut self.state_machines {
            Arc::make_mut(machine).resolve(&self.animations, &interpolators)?;
        }

        let order = self.dependency_order.clone();
        for id in order {
            self.add_dirt(id, ComponentDirt::FILTHY, false);
        }
        self.initialized = true;
        self.update_components();
        Ok(())
    }

    fn resolve_parents(&mut self) -> Result<(), GraphError> {
        for index in 1..self.objects.len() {
            let Some(parent_id) = self.objects[index]
                .as_ref()
                .and_then(CoreObject::component)
                .map(|c| c.parent_id)
            else {
                continue;
            };
            if self.resolve(parent_id).and_then(CoreObject::component).is_none() {
                return Err(GraphError::missing(
                    index as u32,
                    format!("parent {parent_id}"),
                ));
            }
            if let Some(component) = self.objects[index]
                .as_mut()
                .and_then(CoreObject::component_mut)
            {
                component.parent = Some(ObjectId(parent_id));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), GraphError> {
        for (id, object) in self.objects() {
            let required = match object {
                CoreObject::Fill(_) => (tk::SHAPE, "fill"),
                CoreObject::SolidColor(_) => (tk::SHAPE_PAINT, "solid color"),
                CoreObject::Rectangle(_) | CoreObject::Ellipse(_) => (tk::SHAPE, "path"),
                _ => continue,
            };
            let (base, what) = required;
            let parent = object
                .component()
                .and_then(ComponentBase::parent)
                .and_then(|p| self.resolve(p.0));
            match parent {
                Some(parent) if parent.is_type_of(base) => {}
                Some(parent) => {
                    return Err(GraphError::invalid(
                        id.0,
                        format!("{what} parented to type {}", parent.core_type()),
                    ))
                }
                None => return Err(GraphError::missing(id.0, format!("parent of {what}"))),
            }
        }
        Ok(())
    }

    /// Children depend on their parent. Solid colors also depend on the
    /// shape that owns their fill.
    fn build_dependencies(&mut self) {
        let mut edges = Vec::new();
        for (id, object) in self.objects() {
            let Some(parent) = object.component().and_then(ComponentBase::parent) else {
                continue;
            };
            edges.push((parent, id));
            if matches!(object, CoreObject::SolidColor(_)) {
                if let Some(shape) = self.component(parent).and_then(ComponentBase::parent) {
                    edges.push((shape, id));
                }
            }
        }
        for (dependency, dependent) in edges {
            if let Some(component) = self.component_mut(dependency) {
                component.add_dependent(dependent);
            }
        }
    }

    fn sort_dependencies(&mut self) -> Result<(), GraphError> {
        let nodes: Vec<ObjectId> = self
            .objects()
            .filter(|(_, o)| o.component().is_some())
            .map(|(id, _)| id)
            .collect();
        let objects = &self.objects;
        let order = sort_dependencies(&nodes, |id| {
            objects
                .get(id.index())
                .and_then(Option::as_ref)
                .and_then(CoreObject::component)
                .map_or(&[][..], ComponentBase::dependents)
        })?;
        for (graph_order, id) in order.iter().enumerate() {
            if let Some(component) = self.component_mut(*id) {
                component.graph_order = graph_order;
            }
        }
        self.dependency_order = order;
        Ok(())
    }

    fn children_of(&self, parent: ObjectId) -> impl Iterator<Item = (ObjectId, &CoreObject)> {
        self.objects()
            .filter(move |(_, o)| o.component().and_then(ComponentBase::parent) == Some(parent))
    }

    fn build_draw_plans(&mut self) {
        let mut plans = Vec::new();
        for (id, object) in self.objects() {
            match object {
                CoreObject::Shape(_) => {
                    let paths = self
                        .children_of(id)
                        .filter(|(_, o)| matches!(o, CoreObject::Rectangle(_) | CoreObject::Ellipse(_)))
                        .map(|(child, _)| child)
                        .collect();
                    let paints = self
                        .children_of(id)
                        .filter(|(_, o)| matches!(o, CoreObject::Fill(_)))
                        .filter_map(|(fill, _)| {
                            self.children_of(fill)
                                .find(|(_, o)| matches!(o, CoreObject::SolidColor(_)))
                                .map(|(color, _)| (fill, color))
                        })
                        .collect();
                    plans.push(DrawPlan::Shape { id, paths, paints });
                }
                CoreObject::Image(_) => plans.push(DrawPlan::Image { id }),
                _ => {}
            }
        }
        self.draw_plans = plans;
    }

    fn resolve_interpolators(&mut self) -> HashMap<u32, Arc<Interpolator>> {
        let mut interpolators = HashMap::new();
        for (index, slot) in self.objects.iter_mut().enumerate() {
            let interpolator = match slot {
                Some(CoreObject::CubicEase(cubic)) => {
                    cubic.initialize();
                    Interpolator::Cubic(cubic.clone())
                }
                Some(CoreObject::Elastic(elastic)) => {
                    elastic.initialize();
                    Interpolator::Elastic(elastic.clone())
                }
                _ => continue,
            };
            interpolators.insert(index as u32, Arc::new(interpolator));
        }
        interpolators
    }

    fn resolve_animations(
        &mut self,
        interpolators: &HashMap<u32, Arc<Interpolator>>,
    ) -> Result<(), GraphError> {
        let object_count = self.objects.len();
        for animation in &mut self.animations {
            let animation = Arc::make_mut(animation);
            animation.compute_keyframe_seconds();
            for keyed in &mut animation.keyed_objects {
                if keyed.object_id as usize >= object_count {
                    return Err(GraphError::missing(
                        keyed.object_id,
                        format!("target of animation '{}'", animation.name),
                    ));
                }
                for keyframe in keyed.properties.iter_mut().flat_map(|p| p.keyframes.iter_mut()) {
                    if keyframe.interpolator_id == u32::MAX {
                        continue;
                    }
                    let interpolator = interpolators
                        .get(&keyframe.interpolator_id)
                        .ok_or_else(|| GraphError::missing(keyframe.interpolator_id, "keyframe interpolator"))?;
                    keyframe.interpolator = Some(Arc::clone(interpolator));
                }
            }
        }
        Ok(())
    }

    /// Binds image drawables to the decoded images of `assets`.
    pub(crate) fn attach_assets(&mut self, assets: &[FileAsset]) {
        for object in self.objects.iter_mut().flatten() {
            if let CoreObject::Image(image) = object {
                image.image = assets
                    .get(image.asset_id as usize)
                    .and_then(FileAsset::image)
                    .cloned();
                if image.image.is_none() {
                    log::debug!("image has no decoded asset {}", image.asset_id);
                }
            }
        }
    }

    /// A fresh copy sharing animations and state machines, with no players.
    pub fn instance(&self) -> Artboard {
        Artboard {
            objects: self.objects.clone(),
            animations: self.animations.clone(),
            state_machines: self.state_machines.clone(),
            dependency_order: self.dependency_order.clone(),
            draw_plans: self.draw_plans.clone(),
            dirt: self.dirt,
            initialized: self.initialized,
            players: Vec::new(),
            ids: IdAllocator::new(),
            outputs: Outputs::default(),
            pending_events: Vec::new(),
            config: self.config.clone(),
            pool: Arc::clone(&self.pool),
        }
    }

    // ----- dirt and updates -----

    /// Marks `dirt` on a component. Returns false when every bit was already
    /// set. With `recurse` the same bits spread to all dependents.
    pub fn add_dirt(&mut self, id: ObjectId, dirt: ComponentDirt, recurse: bool) -> bool {
        let Some(component) = self.component_mut(id) else {
            return false;
        };
        if component.dirt.contains(dirt) {
            return false;
        }
        component.dirt |= dirt;
        self.dirt |= ComponentDirt::COMPONENTS;

        if recurse {
            let mut i = 0;
            while let Some(dependent) = self
                .component(id)
                .and_then(|c| c.dependents().get(i).copied())
            {
                self.add_dirt(dependent, dirt, true);
                i += 1;
            }
        }
        true
    }

    pub fn has_dirt(&self, dirt: ComponentDirt) -> bool {
        self.dirt.intersects(dirt)
    }

    /// Walks the dependency order once, updating dirty components. Dirt
    /// landing on a component already visited stays until the next call.
    pub fn update_components(&mut self) -> bool {
        self.update_components_with(|_, _| {})
    }

    /// The update pass, calling `after_update` once each dirty component
    /// has been updated.
    fn update_components_with(&mut self, mut after_update: impl FnMut(&mut Self, ObjectId)) -> bool {
        if !self.dirt.contains(ComponentDirt::COMPONENTS) {
            return false;
        }
        self.dirt.remove(ComponentDirt::COMPONENTS);
        for i in 0..self.dependency_order.len() {
            let id = self.dependency_order[i];
            let Some(component) = self.component_mut(id) else {
                continue;
            };
            let dirt = component.dirt;
            if dirt.is_empty() {
                continue;
            }
            component.dirt = ComponentDirt::NONE;
            self.update_component(id, dirt);
            after_update(self, id);
        }
        true
    }

    fn update_component(&mut self, id: ObjectId, dirt: ComponentDirt) {
        let parent = self.component(id).and_then(ComponentBase::parent);
        let (parent_world, parent_opacity) = parent
            .and_then(|p| self.resolve(p.0))
            .and_then(CoreObject::transform)
            .map_or((Mat2D::IDENTITY, 1.0), |t| (t.world, t.render_opacity));
        // Solid colors take the opacity of the shape that owns their fill.
        let shape_opacity = parent
            .and_then(|fill| self.component(fill)?.parent())
            .and_then(|shape| self.resolve(shape.0)?.transform())
            .map_or(1.0, |t| t.render_opacity);

        let Some(object) = self.resolve_mut(id.0) else {
            return;
        };
        if dirt.intersects(ComponentDirt::PATH) {
            match object {
                CoreObject::Rectangle(rect) => rect.rebuild_path(),
                CoreObject::Ellipse(ellipse) => ellipse.rebuild_path(),
                _ => {}
            }
        }
        if let CoreObject::SolidColor(color) = object {
            if dirt.intersects(ComponentDirt::PAINT | ComponentDirt::RENDER_OPACITY) {
                color.render_color = color_with_opacity(color.color_value, shape_opacity);
            }
            return;
        }

        let local = object.node().map(Node::local_transform);
        if let Some(transform) = object.transform_mut() {
            if dirt.intersects(ComponentDirt::TRANSFORM) {
                if let Some(local) = local {
                    transform.local = local;
                }
            }
            if dirt.intersects(ComponentDirt::WORLD_TRANSFORM) {
                transform.world = parent_world * transform.local;
            }
            if dirt.intersects(ComponentDirt::RENDER_OPACITY) {
                transform.render_opacity = transform.opacity * parent_opacity;
            }
        }
    }

    fn on_property_changed(&mut self, id: ObjectId, key: u16) {
        match key {
            pk::X | pk::Y | pk::ROTATION | pk::SCALE_X | pk::SCALE_Y => {
                self.add_dirt(id, ComponentDirt::TRANSFORM, false);
                self.add_dirt(id, ComponentDirt::WORLD_TRANSFORM, true);
            }
            pk::OPACITY => {
                self.add_dirt(id, ComponentDirt::RENDER_OPACITY, true);
            }
            pk::PATH_WIDTH | pk::PATH_HEIGHT | pk::PATH_ORIGIN_X | pk::PATH_ORIGIN_Y | pk::CORNER_RADIUS => {
                self.add_dirt(id, ComponentDirt::PATH, false);
            }
            pk::COLOR_VALUE => {
                self.add_dirt(id, ComponentDirt::PAINT, false);
            }
            _ => {}
        }
    }

    // ----- playback -----

    /// Runs every player by `elapsed` seconds, then updates components.
    /// Returns whether any player wants another frame.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        let mut players = std::mem::take(&mut self.players);
        let mut outputs = std::mem::take(&mut self.outputs);
        let mut keep_going = false;
        for player in &mut players {
            keep_going |= player.advance(self, elapsed, &mut outputs);
        }
        self.players = players;
        self.outputs = outputs;
        self.update_components();
        keep_going
    }

    /// Applies queued commands, advances, and returns the events produced.
    pub fn update(&mut self, dt: f32, inputs: &Inputs) -> &Outputs {
        self.outputs.clear();
        let pending = std::mem::take(&mut self.pending_events);
        self.outputs.events.extend(pending);
        for command in &inputs.player_cmds {
            self.apply_command(command);
        }
        self.advance(dt);
        &self.outputs
    }

    fn apply_command(&mut self, command: &PlayerCommand) {
        let id = command.player();
        let Some(index) = self.players.iter().position(|p| p.id == id) else {
            self.outputs.push_event(CoreEvent::Error {
                message: format!("unknown player {}", id.0),
            });
            return;
        };
        if let PlayerCommand::Stop { .. } = command {
            self.players.remove(index);
            self.outputs.push_event(CoreEvent::PlaybackStopped { player: id });
            return;
        }

        let player = &mut self.players[index];
        let accepted = match command {
            PlayerCommand::Play { .. } => {
                if player.paused {
                    player.paused = false;
                    self.outputs.push_event(CoreEvent::PlaybackResumed { player: id });
                }
                true
            }
            PlayerCommand::Pause { .. } => {
                if !player.paused {
                    player.paused = true;
                    self.outputs.push_event(CoreEvent::PlaybackPaused { player: id });
                }
                true
            }
            PlayerCommand::SetSpeed { speed, .. } => {
                player.speed = *speed;
                true
            }
            PlayerCommand::Seek { time, .. } => match player.animation_mut() {
                Some(instance) => {
                    instance.set_time(*time);
                    true
                }
                None => false,
            },
            PlayerCommand::SetNumber { input, value, .. } => player
                .state_machine_mut()
                .is_some_and(|m| m.set_number(input, *value)),
            PlayerCommand::SetBool { input, value, .. } => player
                .state_machine_mut()
                .is_some_and(|m| m.set_bool(input, *value)),
            PlayerCommand::FireTrigger { input, .. } => player
                .state_machine_mut()
                .is_some_and(|m| m.fire_trigger(input)),
            PlayerCommand::Stop { .. } => true,
        };
        if !accepted {
            self.outputs.push_event(CoreEvent::Error {
                message: format!("player {} rejected {command:?}", id.0),
            });
        }
    }

    fn add_player(&mut self, name: String, playback: Playback) -> PlayerId {
        let id = self.ids.alloc_player();
        self.pending_events.push(CoreEvent::PlaybackStarted {
            player: id,
            name: name.clone(),
        });
        self.players.push(Player::new(id, name, playback));
        id
    }

    /// Starts the named linear animation. `None` when no animation has that name.
    pub fn play_animation(&mut self, name: &str) -> Option<PlayerId> {
        let animation = Arc::clone(self.animation(name)?);
        let instance = LinearAnimationInstance::new(animation);
        Some(self.add_player(name.to_string(), Playback::Animation(instance)))
    }

    /// Starts the named state machine from its entry states.
    pub fn play_state_machine(&mut self, name: &str) -> Option<PlayerId> {
        let machine = Arc::clone(self.state_machine(name)?);
        let instance = StateMachineInstance::new(machine, &*self, Arc::clone(&self.pool), &self.config);
        Some(self.add_player(name.to_string(), Playback::StateMachine(instance)))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn state_machine_instance(&self, id: PlayerId) -> Option<&StateMachineInstance> {
        self.player(id)?.state_machine()
    }

    pub fn state_machine_instance_mut(&mut self, id: PlayerId) -> Option<&mut StateMachineInstance> {
        self.player_mut(id)?.state_machine_mut()
    }

    pub fn set_number(&mut self, player: PlayerId, input: &str, value: f32) -> bool {
        self.state_machine_instance_mut(player)
            .is_some_and(|m| m.set_number(input, value))
    }

    pub fn set_bool(&mut self, player: PlayerId, input: &str, value: bool) -> bool {
        self.state_machine_instance_mut(player)
            .is_some_and(|m| m.set_bool(input, value))
    }

    pub fn fire_trigger(&mut self, player: PlayerId, input: &str) -> bool {
        self.state_machine_instance_mut(player)
            .is_some_and(|m| m.fire_trigger(input))
    }

    /// Runs `f` with a state machine player and the artboard as its target.
    pub fn with_state_machine<R>(
        &mut self,
        player: PlayerId,
        f: impl FnOnce(&mut StateMachineInstance, &mut dyn PropertyTarget) -> R,
    ) -> Option<R> {
        let index = self.players.iter().position(|p| p.id == player)?;
        let mut taken = self.players.remove(index);
        let result = taken.state_machine_mut().map(|machine| f(machine, self));
        self.players.insert(index, taken);
        result
    }

    // ----- drawing -----

    /// Issues draw calls for every drawable in object order.
    pub fn draw(&self, factory: &mut dyn Factory, renderer: &mut dyn Renderer) {
        let Some(node) = self.node() else {
            return;
        };
        renderer.save();
        if self.config.features.honor_clip && node.clip {
            let mut bounds = RawPath::new();
            bounds.add_rect(0.0, 0.0, node.width, node.height);
            let clip = factory.make_render_path(&bounds, FillRule::NonZero);
            renderer.clip_path(clip.as_ref());
        }
        renderer.transform(&Mat2D::from_translate(
            node.width * node.origin_x,
            node.height * node.origin_y,
        ));
        for plan in &self.draw_plans {
            match plan {
                DrawPlan::Shape { id, paths, paints } => {
                    self.draw_shape(*id, paths, paints, factory, renderer)
                }
                DrawPlan::Image { id } => self.draw_image(*id, renderer),
            }
        }
        renderer.restore();
    }

    fn draw_shape(
        &self,
        id: ObjectId,
        paths: &[ObjectId],
        paints: &[(ObjectId, ObjectId)],
        factory: &mut dyn Factory,
        renderer: &mut dyn Renderer,
    ) {
        let Some(CoreObject::Shape(shape)) = self.resolve(id.0) else {
            return;
        };
        if shape.drawable.node.transform.render_opacity <= 0.0 {
            return;
        }
        let mut world = RawPath::new();
        for path_id in paths {
            let (local, transform) = match self.resolve(path_id.0) {
                Some(CoreObject::Rectangle(r)) => (r.path.local_path(), &r.path.node.transform),
                Some(CoreObject::Ellipse(e)) => (e.path.local_path(), &e.path.node.transform),
                _ => continue,
            };
            world.add_path(local, &transform.world_transform());
        }
        if world.is_empty() {
            return;
        }
        let blend_mode = BlendMode::from_value(shape.drawable.blend_mode);
        for (fill_id, color_id) in paints {
            let (Some(CoreObject::Fill(fill)), Some(CoreObject::SolidColor(color))) =
                (self.resolve(fill_id.0), self.resolve(color_id.0))
            else {
                continue;
            };
            if !fill.is_visible {
                continue;
            }
            let mut paint = factory.make_render_paint();
            paint.color(color.render_color());
            paint.blend_mode(blend_mode);
            let path = factory.make_render_path(&world, FillRule::from_value(fill.fill_rule));
            renderer.draw_path(path.as_ref(), paint.as_ref());
        }
    }

    fn draw_image(&self, id: ObjectId, renderer: &mut dyn Renderer) {
        let Some(CoreObject::Image(image)) = self.resolve(id.0) else {
            return;
        };
        let Some(render_image) = image.render_image() else {
            return;
        };
        let transform = &image.drawable.node.transform;
        if transform.render_opacity() <= 0.0 {
            return;
        }
        let centered = transform.world_transform()
            * Mat2D::from_translate(
                -(render_image.width() as f32) / 2.0,
                -(render_image.height() as f32) / 2.0,
            );
        renderer.save();
        renderer.transform(&centered);
        renderer.draw_image(
            render_image.as_ref(),
            BlendMode::from_value(image.drawable.blend_mode),
            transform.render_opacity(),
        );
        renderer.restore();
    }
}

impl PropertyTarget for Artboard {
    fn property(&self, object_id: u32, property_key: u16) -> Option<PropertyValue> {
        self.resolve(object_id)?.property(property_key)
    }

    fn set_property(&mut self, object_id: u32, property_key: u16, value: PropertyValue) -> bool {
        let Some(object) = self.resolve_mut(object_id) else {
            return false;
        };
        if object.property(property_key).as_ref() == Some(&value) {
            return true;
        }
        if !object.set_property(property_key, value) {
            return false;
        }
        self.on_property_changed(ObjectId(object_id), property_key);
        true
    }
}
