//! World-space marker controller.
//!
//! Same lifecycle as the screen controller, plus camera-relative placement,
//! billboard orientation, spin transitions and off-screen edge handling.
//! Per tick: placement, edge check, phase work, then orientation.

use std::sync::Arc;

use glam::{Quat, Vec3};
use log::{debug, error, trace, warn};

use crate::animator::{Accessor, AlphaTrack, PropertyTrack, TransitionClock};
use crate::error::GraphicError;
use crate::idle::{apply_breathing, breathing_multiplier, levitation_offset, pulse_step};
use crate::ids::MarkerId;
use crate::interp::functions::{distance_to_revolution, look_rotation};
use crate::interp::lerp_f32;
use crate::node::{ColorLayers, Pose, WorldNode};
use crate::outputs::{MarkerEvent, MarkerEvents};
use crate::scene::{CameraView, SceneReferences};
use crate::settings::{
    EdgeBehaviour, IdleAnimation, PlacementBehaviour, WorldAnimation, WorldGraphicSettings,
};
use crate::state::{sanitize_dt, MarkerPhase, MarkerVisualState};
use crate::step::{InteractionType, StepHandle};
use crate::tolerances::{BILLBOARD_FLIP_DEG, ROTATION_REACHED_EPSILON_DEG, ZOOM_REACHED_EPSILON};

const SCALE: Accessor<WorldNode, Vec3> = Accessor {
    get: |n| n.pose.scale,
    set: |n, v| n.pose.scale = v,
};

#[derive(Debug)]
struct WorldBinding {
    step: StepHandle,
    scene: Arc<SceneReferences>,
    settings: Arc<WorldGraphicSettings>,
}

#[derive(Debug)]
struct WorldTransition {
    clock: TransitionClock,
    kind: WorldAnimation,
    scale: Option<PropertyTrack<WorldNode, Vec3>>,
    /// Spin angle endpoints in degrees.
    spin: Option<(f32, f32)>,
    alpha: Option<AlphaTrack>,
}

impl WorldTransition {
    fn new(kind: WorldAnimation, duration: f32, reversing: bool) -> Self {
        Self {
            clock: TransitionClock::new(duration, reversing),
            kind,
            scale: None,
            spin: None,
            alpha: None,
        }
    }

    fn apply(&self, node: &mut WorldNode, spin_degrees: &mut f32, t: f32) {
        if let Some(track) = &self.scale {
            track.apply(node, t);
        }
        if let Some((from, to)) = self.spin {
            *spin_degrees = lerp_f32(from, to, t);
        }
        if let Some(track) = &self.alpha {
            track.apply(node, t);
        }
    }

    fn reached(&self, node: &WorldNode, spin_degrees: f32) -> bool {
        let scale_reached = || {
            self.scale
                .as_ref()
                .map_or(true, |s| s.distance_to_target(node) < ZOOM_REACHED_EPSILON)
        };
        match self.kind {
            WorldAnimation::None => true,
            WorldAnimation::Zoom => scale_reached(),
            WorldAnimation::ZoomAndRotate => {
                scale_reached() && distance_to_revolution(spin_degrees) < ROTATION_REACHED_EPSILON_DEG
            }
            WorldAnimation::Fade => self.clock.duration_elapsed(),
        }
    }
}

enum TransitionOutcome {
    Running,
    Appeared { forced: bool },
    Vanished,
}

/// Controller for one world-space marker.
#[derive(Debug)]
pub struct WorldGraphicController {
    id: MarkerId,
    settings: Option<Arc<WorldGraphicSettings>>,
    edge_behaviour: Option<EdgeBehaviour>,
    node: Option<WorldNode>,
    binding: Option<WorldBinding>,
    state: MarkerVisualState,
    baseline_translation: Vec3,
    baseline_rotation: Quat,
    idle_base: Option<Pose>,
    /// Orientation the disappear transition spins from, when it does not
    /// billboard.
    disappear_base: Option<Quat>,
    spin_degrees: f32,
    off_screen: bool,
    transition: Option<WorldTransition>,
    disabled: bool,
    events: MarkerEvents,
}

impl WorldGraphicController {
    pub fn new(id: MarkerId, settings: Option<Arc<WorldGraphicSettings>>, node: WorldNode) -> Self {
        Self {
            id,
            settings,
            edge_behaviour: None,
            node: Some(node),
            binding: None,
            state: MarkerVisualState::default(),
            baseline_translation: Vec3::ZERO,
            baseline_rotation: Quat::IDENTITY,
            idle_base: None,
            disappear_base: None,
            spin_degrees: 0.0,
            off_screen: false,
            transition: None,
            disabled: false,
            events: MarkerEvents::default(),
        }
    }

    /// Override the settings' `default_edge_behaviour` for this marker.
    pub fn with_edge_behaviour(mut self, behaviour: EdgeBehaviour) -> Self {
        self.edge_behaviour = Some(behaviour);
        self
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn phase(&self) -> MarkerPhase {
        self.state.phase
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.node.is_none()
    }

    /// Last edge check found the marker behind the camera or outside the
    /// padded frame (only tracked under `DisableOnExit`).
    pub fn is_off_screen(&self) -> bool {
        self.off_screen
    }

    pub fn node(&self) -> Option<&WorldNode> {
        self.node.as_ref()
    }

    pub fn settings(&self) -> Option<&Arc<WorldGraphicSettings>> {
        self.binding.as_ref().map(|b| &b.settings)
    }

    pub fn step(&self) -> Option<&StepHandle> {
        self.binding.as_ref().map(|b| &b.step)
    }

    pub fn transition_progress(&self) -> Option<f32> {
        self.transition.as_ref().map(|t| t.clock.progress())
    }

    /// Current transition spin about the vertical axis, degrees.
    pub fn spin_degrees(&self) -> f32 {
        self.spin_degrees
    }

    pub fn drain_events(&mut self) -> Vec<MarkerEvent> {
        self.events.drain()
    }

    pub fn initialize(
        &mut self,
        step: Option<StepHandle>,
        scene: Option<Arc<SceneReferences>>,
    ) -> Result<(), GraphicError> {
        if self.disabled {
            return Err(GraphicError::Disabled(self.id));
        }
        let Some(step) = step else {
            error!("world marker {}: initialize without a tutorial step; disabling", self.id);
            self.disabled = true;
            return Err(GraphicError::MissingStep(self.id));
        };
        let Some(scene) = scene else {
            error!("world marker {}: initialize without scene references; disabling", self.id);
            self.disabled = true;
            return Err(GraphicError::MissingSceneReferences(self.id));
        };
        let Some(node) = self.node.as_mut() else {
            return Err(GraphicError::Released(self.id));
        };

        let settings = self
            .settings
            .clone()
            .unwrap_or_else(|| scene.default_world_settings.clone());

        let decorative_step = step.interaction_type == InteractionType::None;
        for layer in node.layers.iter_mut() {
            if layer.decorative || decorative_step {
                layer.hit_testable = false;
            }
        }

        if settings.placement_behaviour == PlacementBehaviour::FrontOfCamera {
            node.pose.translation = front_of_camera(&scene.camera.get(), &settings);
        }
        node.active = false;

        self.baseline_translation = node.pose.translation;
        self.baseline_rotation = node.pose.rotation;
        if let Some(previous) = self.binding.as_ref() {
            self.state.dwell.release(&previous.step);
        }
        self.state = MarkerVisualState {
            initial_scale: node.pose.scale,
            initial_colors: node.capture_colors(),
            ..MarkerVisualState::default()
        };
        self.state.dwell.arm(&step);

        self.binding = Some(WorldBinding {
            step,
            scene,
            settings,
        });
        debug!("world marker {}: initialized", self.id);
        Ok(())
    }

    pub fn show(&mut self, step: StepHandle) {
        if self.disabled {
            return;
        }
        let (Some(binding), Some(node)) = (self.binding.as_mut(), self.node.as_mut()) else {
            warn!(
                "world marker {}: show ignored (not initialized or already destroyed)",
                self.id
            );
            return;
        };
        if !Arc::ptr_eq(&binding.step, &step) {
            self.state.dwell.release(&binding.step);
            self.state.dwell.arm(&step);
            binding.step = step;
        }

        node.pose.scale = self.state.initial_scale;
        if binding.settings.placement_behaviour == PlacementBehaviour::WorldSpace {
            node.pose.translation = self.baseline_translation;
        }
        for (i, c) in self.state.initial_colors.iter().enumerate() {
            node.set_slot_alpha(i, *c, c.w);
        }
        node.set_layers_visible(true);
        self.spin_degrees = 0.0;

        let settings = &binding.settings;
        let mut tr = WorldTransition::new(settings.appear_animation, settings.appear_duration, false);
        match settings.appear_animation {
            WorldAnimation::None => {}
            WorldAnimation::Zoom => {
                tr.scale = Some(PropertyTrack::new(SCALE, Vec3::ZERO, self.state.initial_scale));
            }
            WorldAnimation::ZoomAndRotate => {
                tr.scale = Some(PropertyTrack::new(SCALE, Vec3::ZERO, self.state.initial_scale));
                tr.spin = Some((0.0, full_spin(settings)));
            }
            WorldAnimation::Fade => {
                tr.alpha = Some(AlphaTrack::fade_in(&self.state.initial_colors));
            }
        }
        tr.apply(node, &mut self.spin_degrees, 0.0);
        node.active = true;

        self.transition = Some(tr);
        self.idle_base = None;
        self.disappear_base = None;
        self.state.begin_appear();
        self.events.push(MarkerEvent::Shown { marker: self.id });
        debug!("world marker {}: appearing", self.id);
    }

    pub fn hide(&mut self) {
        if !matches!(self.state.phase, MarkerPhase::Appearing | MarkerPhase::Idle) {
            return;
        }
        let (Some(binding), Some(node)) = (self.binding.as_ref(), self.node.as_mut()) else {
            return;
        };
        let settings = &binding.settings;
        if settings.disappear_animation == WorldAnimation::None {
            self.destroy();
            return;
        }

        node.set_layers_visible(true);
        let mut tr = WorldTransition::new(
            settings.disappear_animation,
            settings.disappear_duration,
            true,
        );
        match settings.disappear_animation {
            WorldAnimation::None => {}
            WorldAnimation::Zoom => {
                tr.scale = Some(PropertyTrack::from_current(SCALE, node, Vec3::ZERO));
            }
            WorldAnimation::ZoomAndRotate => {
                tr.scale = Some(PropertyTrack::from_current(SCALE, node, Vec3::ZERO));
                // Mid-appear the spin unwinds from where it is.
                let from = if self.state.phase == MarkerPhase::Appearing {
                    self.spin_degrees
                } else {
                    full_spin(settings)
                };
                tr.spin = Some((from, 0.0));
            }
            WorldAnimation::Fade => {
                tr.alpha = Some(AlphaTrack::fade_out(&self.state.initial_colors, node));
            }
        }
        // Keep the current orientation unless the marker billboards anyway.
        let unspun = node.pose.rotation * Quat::from_rotation_y(-self.spin_degrees.to_radians());
        self.disappear_base = (!settings.billboards()).then_some(unspun);
        self.transition = Some(tr);
        self.state.begin_disappear();
        self.events.push(MarkerEvent::DisappearStarted { marker: self.id });
        debug!("world marker {}: disappearing", self.id);
    }

    pub fn tick(&mut self, dt: f32) {
        if self.disabled || self.node.is_none() {
            return;
        }
        let phase = self.state.phase;
        if !matches!(
            phase,
            MarkerPhase::Appearing | MarkerPhase::Idle | MarkerPhase::Disappearing
        ) {
            return;
        }
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        let dt = sanitize_dt(dt);
        let camera = binding.scene.camera.get();
        let settings = binding.settings.clone();

        let placed = self.place(&camera, &settings);
        self.update_edge(&camera, &settings);
        match phase {
            MarkerPhase::Appearing | MarkerPhase::Disappearing => self.advance_transition(dt),
            MarkerPhase::Idle => {
                self.advance_idle(dt, &settings, placed);
                self.advance_dwell(dt);
            }
            MarkerPhase::Uninitialized | MarkerPhase::Destroyed => {}
        }
        self.orient(&camera, &settings);
    }

    pub fn destroy(&mut self) {
        if self.node.take().is_some() {
            self.transition = None;
            self.state.phase = MarkerPhase::Destroyed;
            self.state.ready = false;
            self.events.push(MarkerEvent::Destroyed { marker: self.id });
            debug!("world marker {}: destroyed", self.id);
        }
    }

    /// World markers carry no text layer; any text is a soft misconfiguration.
    pub fn set_text(&mut self, text: &str) -> Result<(), GraphicError> {
        if self.node.is_none() {
            return Err(GraphicError::Released(self.id));
        }
        error!(
            "world marker {}: text {:?} supplied but world markers have no text layer",
            self.id, text
        );
        Err(GraphicError::MissingTextLayer(self.id))
    }

    fn place(&mut self, camera: &CameraView, settings: &WorldGraphicSettings) -> Option<Vec3> {
        if settings.placement_behaviour != PlacementBehaviour::FrontOfCamera {
            return None;
        }
        let node = self.node.as_mut()?;
        let at = front_of_camera(camera, settings);
        node.pose.translation = at;
        Some(at)
    }

    fn update_edge(&mut self, camera: &CameraView, settings: &WorldGraphicSettings) {
        let Some(node) = self.node.as_mut() else {
            return;
        };
        let behaviour = self.edge_behaviour.unwrap_or(settings.default_edge_behaviour);
        if behaviour == EdgeBehaviour::None {
            self.off_screen = false;
            node.visible = true;
            return;
        }
        let pad = settings.screen_edge_padding;
        let size = camera.viewport_px;
        let off = match camera.world_to_screen(node.pose.translation) {
            None => true,
            Some(px) => px.x < pad || px.y < pad || px.x > size.x - pad || px.y > size.y - pad,
        };
        if off != self.off_screen {
            debug!(
                "world marker {}: {} screen",
                self.id,
                if off { "left" } else { "re-entered" }
            );
        }
        self.off_screen = off;
        node.visible = !off;
    }

    fn advance_transition(&mut self, dt: f32) {
        let outcome = {
            let (Some(tr), Some(node)) = (self.transition.as_mut(), self.node.as_mut()) else {
                return;
            };
            tr.clock.advance(dt);
            tr.apply(node, &mut self.spin_degrees, tr.clock.progress());
            let reached = tr.reached(node, self.spin_degrees);
            let forced = tr.clock.is_forced();
            if !(reached || forced) {
                TransitionOutcome::Running
            } else if tr.clock.reversing {
                TransitionOutcome::Vanished
            } else {
                if let Some(track) = &tr.scale {
                    track.snap(node);
                }
                if let Some(track) = &tr.alpha {
                    track.snap(node);
                }
                // A whole number of turns lands back on zero.
                self.spin_degrees = 0.0;
                TransitionOutcome::Appeared {
                    forced: forced && !reached,
                }
            }
        };
        match outcome {
            TransitionOutcome::Running => {}
            TransitionOutcome::Vanished => self.destroy(),
            TransitionOutcome::Appeared { forced } => {
                if forced {
                    trace!("world marker {}: appear force-completed", self.id);
                }
                self.transition = None;
                self.state.enter_idle();
                self.events.push(MarkerEvent::AppearCompleted {
                    marker: self.id,
                    forced,
                });
            }
        }
    }

    fn advance_idle(&mut self, dt: f32, settings: &WorldGraphicSettings, placed: Option<Vec3>) {
        let Some(node) = self.node.as_mut() else {
            return;
        };
        let idle = &settings.idle;
        self.state.idle_time += dt;
        let t = self.state.idle_time;
        let entry = *self.idle_base.get_or_insert(node.pose);
        match idle.animation {
            IdleAnimation::None | IdleAnimation::RotateSpin => {}
            IdleAnimation::Levitate => {
                let base = placed.unwrap_or(entry.translation);
                node.pose.translation = base + levitation_offset(idle, t);
            }
            IdleAnimation::Pulse => {
                node.pose.scale = pulse_step(node.pose.scale, self.state.initial_scale, idle, t, dt);
            }
            IdleAnimation::Fade => {
                let m = breathing_multiplier(t, idle.fade_duration);
                apply_breathing(node, &self.state.initial_colors, m);
            }
            IdleAnimation::Blink => {
                if self.off_screen {
                    if self.state.blink.is_hidden() {
                        node.set_layers_visible(true);
                        self.state.blink.force_shown();
                    }
                } else if let Some(visible) = self.state.blink.advance(dt, idle) {
                    node.set_layers_visible(visible);
                }
            }
        }
    }

    fn advance_dwell(&mut self, dt: f32) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        if self.state.dwell.advance(dt, &binding.step) {
            self.events.push(MarkerEvent::DwellSatisfied {
                marker: self.id,
                step: binding.step.id.clone(),
            });
            debug!("world marker {}: dwell satisfied", self.id);
        }
    }

    fn orient(&mut self, camera: &CameraView, settings: &WorldGraphicSettings) {
        let Some(node) = self.node.as_mut() else {
            return;
        };
        let idle = &settings.idle;
        let disappear_base = self
            .disappear_base
            .filter(|_| self.state.phase == MarkerPhase::Disappearing);
        let base = if let Some(base) = disappear_base {
            base
        } else if self.state.phase == MarkerPhase::Idle
            && idle.animation == IdleAnimation::RotateSpin
        {
            let entry = self
                .idle_base
                .map_or(self.baseline_rotation, |p| p.rotation);
            let axis = idle.spin_axis.try_normalize().unwrap_or(Vec3::Y);
            entry * Quat::from_axis_angle(axis, (idle.spin_speed * self.state.idle_time).to_radians())
        } else if settings.billboards() {
            let forward = camera.forward();
            look_rotation(-forward, camera.right().cross(forward))
                * Quat::from_rotation_y(BILLBOARD_FLIP_DEG.to_radians())
        } else {
            self.baseline_rotation
        };
        node.pose.rotation = base * Quat::from_rotation_y(self.spin_degrees.to_radians());
    }
}

fn full_spin(settings: &WorldGraphicSettings) -> f32 {
    settings.spin_revolutions as f32 * 360.0
}

fn front_of_camera(camera: &CameraView, settings: &WorldGraphicSettings) -> Vec3 {
    let vp = settings
        .front_anchor_position
        .viewport_point(camera.viewport_px, settings.margin_pixels);
    camera.viewport_to_world(vp, settings.front_camera_distance)
}
