//! Screen-space (overlay) marker controller.
//!
//! Animates a [`ScreenNode`] on the tutorial canvas: anchored placement,
//! zoom/fade/slide transitions, idle motion, the dwell interlock and the
//! optional confirm button.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use log::{debug, error, trace, warn};
use serde::{Deserialize, Serialize};

use crate::anchor::ScreenAnchor;
use crate::animator::{Accessor, AlphaTrack, PropertyTrack, TransitionClock};
use crate::error::GraphicError;
use crate::idle::{apply_breathing, breathing_multiplier, levitation_offset, pulse_step};
use crate::ids::MarkerId;
use crate::node::{ColorLayers, ScreenNode};
use crate::outputs::{MarkerEvent, MarkerEvents};
use crate::scene::SceneReferences;
use crate::settings::{GraphicSettings, IdleAnimation, ScreenAnimation};
use crate::state::{sanitize_dt, MarkerPhase, MarkerVisualState};
use crate::step::{InteractionType, StepHandle};
use crate::tolerances::{SLIDE_REACHED_FRACTION, ZOOM_REACHED_EPSILON};

const SCALE: Accessor<ScreenNode, Vec3> = Accessor {
    get: |n| n.scale,
    set: |n, v| n.scale = v,
};

const POSITION: Accessor<ScreenNode, Vec2> = Accessor {
    get: |n| n.anchored_position,
    set: |n, v| n.anchored_position = v,
};

/// How the marker is placed on the canvas at initialization.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPlacement {
    /// Keep the host's anchored position and only add `offset`.
    pub use_current_anchors: bool,
    pub anchor: ScreenAnchor,
    /// Pixel offset from the anchor (or from the current position).
    pub offset: Vec2,
}

impl Default for ScreenPlacement {
    fn default() -> Self {
        Self {
            use_current_anchors: true,
            anchor: ScreenAnchor::Center,
            offset: Vec2::ZERO,
        }
    }
}

impl ScreenPlacement {
    pub fn anchored(anchor: ScreenAnchor, offset: Vec2) -> Self {
        Self {
            use_current_anchors: false,
            anchor,
            offset,
        }
    }
}

/// Confirm button attached to a marker. Its presence at initialization
/// blocks the step until the button is pressed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfirmButton {
    /// Pressable only once the dwell interlock has cleared.
    pub interactable: bool,
}

#[derive(Debug)]
struct ScreenBinding {
    step: StepHandle,
    scene: Arc<SceneReferences>,
    settings: Arc<GraphicSettings>,
}

#[derive(Debug)]
struct ScreenTransition {
    clock: TransitionClock,
    kind: ScreenAnimation,
    scale: Option<PropertyTrack<ScreenNode, Vec3>>,
    position: Option<PropertyTrack<ScreenNode, Vec2>>,
    alpha: Option<AlphaTrack>,
    slide_tolerance: f32,
}

impl ScreenTransition {
    fn new(kind: ScreenAnimation, duration: f32, reversing: bool) -> Self {
        Self {
            clock: TransitionClock::new(duration, reversing),
            kind,
            scale: None,
            position: None,
            alpha: None,
            slide_tolerance: 0.0,
        }
    }

    fn apply(&self, node: &mut ScreenNode, t: f32) {
        if let Some(track) = &self.scale {
            track.apply(node, t);
        }
        if let Some(track) = &self.position {
            track.apply(node, t);
        }
        if let Some(track) = &self.alpha {
            track.apply(node, t);
        }
    }

    fn write_start(&self, node: &mut ScreenNode) {
        self.apply(node, 0.0);
    }

    fn snap(&self, node: &mut ScreenNode) {
        if let Some(track) = &self.scale {
            track.snap(node);
        }
        if let Some(track) = &self.position {
            track.snap(node);
        }
        if let Some(track) = &self.alpha {
            track.snap(node);
        }
    }

    fn reached(&self, node: &ScreenNode) -> bool {
        match self.kind {
            ScreenAnimation::None => true,
            ScreenAnimation::Zoom => self
                .scale
                .as_ref()
                .map_or(true, |s| s.distance_to_target(node) < ZOOM_REACHED_EPSILON),
            // Several independently colored layers: judged on time, not distance.
            ScreenAnimation::Fade => self.clock.duration_elapsed(),
            ScreenAnimation::Slide => self
                .position
                .as_ref()
                .map_or(true, |p| p.distance_to_target(node) < self.slide_tolerance),
        }
    }
}

enum TransitionOutcome {
    Running,
    Appeared { forced: bool },
    Vanished,
}

/// Controller for one overlay marker.
#[derive(Debug)]
pub struct ScreenGraphicController {
    id: MarkerId,
    settings: Option<Arc<GraphicSettings>>,
    placement: ScreenPlacement,
    confirm_button: Option<ConfirmButton>,
    node: Option<ScreenNode>,
    binding: Option<ScreenBinding>,
    state: MarkerVisualState,
    baseline_position: Vec2,
    idle_base_position: Option<Vec2>,
    transition: Option<ScreenTransition>,
    disabled: bool,
    events: MarkerEvents,
}

impl ScreenGraphicController {
    /// `settings = None` resolves to the scene default at initialization.
    pub fn new(
        id: MarkerId,
        settings: Option<Arc<GraphicSettings>>,
        placement: ScreenPlacement,
        node: ScreenNode,
    ) -> Self {
        Self {
            id,
            settings,
            placement,
            confirm_button: None,
            node: Some(node),
            binding: None,
            state: MarkerVisualState::default(),
            baseline_position: Vec2::ZERO,
            idle_base_position: None,
            transition: None,
            disabled: false,
            events: MarkerEvents::default(),
        }
    }

    pub fn with_confirm_button(mut self, button: ConfirmButton) -> Self {
        self.confirm_button = Some(button);
        self
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn phase(&self) -> MarkerPhase {
        self.state.phase
    }

    /// Appear transition has reached its target.
    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.node.is_none()
    }

    pub fn node(&self) -> Option<&ScreenNode> {
        self.node.as_ref()
    }

    /// Resolved settings, available after initialization.
    pub fn settings(&self) -> Option<&Arc<GraphicSettings>> {
        self.binding.as_ref().map(|b| &b.settings)
    }

    pub fn step(&self) -> Option<&StepHandle> {
        self.binding.as_ref().map(|b| &b.step)
    }

    pub fn confirm_button(&self) -> Option<&ConfirmButton> {
        self.confirm_button.as_ref()
    }

    /// Progress of the running transition.
    pub fn transition_progress(&self) -> Option<f32> {
        self.transition.as_ref().map(|t| t.clock.progress())
    }

    /// Position the appear transition lands on (placement result).
    pub fn baseline_position(&self) -> Vec2 {
        self.baseline_position
    }

    pub fn drain_events(&mut self) -> Vec<MarkerEvent> {
        self.events.drain()
    }

    /// Bind to a step and scene, capture the baseline and apply placement.
    ///
    /// A missing step or scene permanently disables the controller.
    pub fn initialize(
        &mut self,
        step: Option<StepHandle>,
        scene: Option<Arc<SceneReferences>>,
    ) -> Result<(), GraphicError> {
        if self.disabled {
            return Err(GraphicError::Disabled(self.id));
        }
        let Some(step) = step else {
            error!("screen marker {}: initialize without a tutorial step; disabling", self.id);
            self.disabled = true;
            return Err(GraphicError::MissingStep(self.id));
        };
        let Some(scene) = scene else {
            error!("screen marker {}: initialize without scene references; disabling", self.id);
            self.disabled = true;
            return Err(GraphicError::MissingSceneReferences(self.id));
        };
        let Some(node) = self.node.as_mut() else {
            return Err(GraphicError::Released(self.id));
        };

        let settings = self
            .settings
            .clone()
            .unwrap_or_else(|| scene.default_screen_settings.clone());

        let decorative_step = step.interaction_type == InteractionType::None;
        for layer in node.layers.iter_mut() {
            if layer.decorative || decorative_step {
                layer.hit_testable = false;
            }
        }

        if self.placement.use_current_anchors {
            node.anchored_position += self.placement.offset;
        } else {
            node.anchored_position = self
                .placement
                .anchor
                .position(scene.canvas_size, self.placement.offset);
        }
        node.active = false;

        self.baseline_position = node.anchored_position;
        if let Some(previous) = self.binding.as_ref() {
            self.state.dwell.release(&previous.step);
        }
        self.state = MarkerVisualState {
            initial_scale: node.scale,
            initial_colors: node.capture_colors(),
            ..MarkerVisualState::default()
        };
        self.state.dwell.arm(&step);

        if let Some(button) = self.confirm_button.as_mut() {
            step.set_blocked_by_button(true);
            button.interactable = self.state.dwell.is_cleared();
        }

        let text = step.text.get(&scene.locale).map(str::to_owned);
        self.binding = Some(ScreenBinding {
            step,
            scene,
            settings,
        });
        if let Some(text) = text {
            // Soft misconfiguration: logged inside, animation unaffected.
            let _ = self.set_text(&text);
        }
        debug!("screen marker {}: initialized", self.id);
        Ok(())
    }

    /// Start (or restart) the appear transition for `step`.
    pub fn show(&mut self, step: StepHandle) {
        if self.disabled {
            return;
        }
        let (Some(binding), Some(node)) = (self.binding.as_mut(), self.node.as_mut()) else {
            warn!(
                "screen marker {}: show ignored (not initialized or already destroyed)",
                self.id
            );
            return;
        };
        if !Arc::ptr_eq(&binding.step, &step) {
            self.state.dwell.release(&binding.step);
            self.state.dwell.arm(&step);
            if self.confirm_button.is_some() {
                step.set_blocked_by_button(true);
            }
            binding.step = step;
        }
        if let Some(button) = self.confirm_button.as_mut() {
            button.interactable = self.state.dwell.is_cleared();
        }

        // Restore the baseline before posing for the appear kind.
        node.scale = self.state.initial_scale;
        node.anchored_position = self.baseline_position;
        for (i, c) in self.state.initial_colors.iter().enumerate() {
            node.set_slot_alpha(i, *c, c.w);
        }
        node.set_layers_visible(true);

        let settings = &binding.settings;
        let mut tr = ScreenTransition::new(
            settings.appear_animation,
            settings.appear_duration,
            false,
        );
        match settings.appear_animation {
            ScreenAnimation::None => {}
            ScreenAnimation::Zoom => {
                tr.scale = Some(PropertyTrack::new(
                    SCALE,
                    Vec3::ZERO,
                    self.state.initial_scale,
                ));
            }
            ScreenAnimation::Fade => {
                tr.alpha = Some(AlphaTrack::fade_in(&self.state.initial_colors));
            }
            ScreenAnimation::Slide => {
                let start = settings
                    .slide_start_corner
                    .position(binding.scene.canvas_size, settings.screen_edge_offset);
                tr.position = Some(PropertyTrack::new(POSITION, start, self.baseline_position));
                tr.slide_tolerance = settings.screen_edge_offset * SLIDE_REACHED_FRACTION;
            }
        }
        tr.write_start(node);
        node.active = true;

        self.transition = Some(tr);
        self.idle_base_position = None;
        self.state.begin_appear();
        self.events.push(MarkerEvent::Shown { marker: self.id });
        debug!("screen marker {}: appearing", self.id);
    }

    /// Switch to the disappear transition; `None` destroys immediately.
    pub fn hide(&mut self) {
        if !matches!(self.state.phase, MarkerPhase::Appearing | MarkerPhase::Idle) {
            return;
        }
        let (Some(binding), Some(node)) = (self.binding.as_ref(), self.node.as_mut()) else {
            return;
        };
        let settings = &binding.settings;
        if settings.disappear_animation == ScreenAnimation::None {
            self.destroy();
            return;
        }

        node.set_layers_visible(true);
        let mut tr = ScreenTransition::new(
            settings.disappear_animation,
            settings.disappear_duration,
            true,
        );
        match settings.disappear_animation {
            ScreenAnimation::None => {}
            ScreenAnimation::Zoom => {
                tr.scale = Some(PropertyTrack::from_current(SCALE, node, Vec3::ZERO));
            }
            ScreenAnimation::Fade => {
                tr.alpha = Some(AlphaTrack::fade_out(&self.state.initial_colors, node));
            }
            ScreenAnimation::Slide => {
                let end = settings
                    .slide_end_corner
                    .position(binding.scene.canvas_size, settings.screen_edge_offset);
                tr.position = Some(PropertyTrack::from_current(POSITION, node, end));
                tr.slide_tolerance = settings.screen_edge_offset * SLIDE_REACHED_FRACTION;
            }
        }
        self.transition = Some(tr);
        self.state.begin_disappear();
        self.events.push(MarkerEvent::DisappearStarted { marker: self.id });
        debug!("screen marker {}: disappearing", self.id);
    }

    /// Advance one frame: transition, then idle, then the dwell interlock.
    pub fn tick(&mut self, dt: f32) {
        if self.disabled || self.node.is_none() {
            return;
        }
        let dt = sanitize_dt(dt);
        match self.state.phase {
            MarkerPhase::Uninitialized | MarkerPhase::Destroyed => {}
            MarkerPhase::Appearing | MarkerPhase::Disappearing => self.advance_transition(dt),
            MarkerPhase::Idle => {
                self.advance_idle(dt);
                self.advance_dwell(dt);
            }
        }
    }

    /// Release the scene node. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.node.take().is_some() {
            self.transition = None;
            self.state.phase = MarkerPhase::Destroyed;
            self.state.ready = false;
            self.events.push(MarkerEvent::Destroyed { marker: self.id });
            debug!("screen marker {}: destroyed", self.id);
        }
    }

    /// Replace the text content. Without a text layer this is logged and
    /// reported, and the marker keeps animating.
    pub fn set_text(&mut self, text: &str) -> Result<(), GraphicError> {
        let Some(node) = self.node.as_mut() else {
            return Err(GraphicError::Released(self.id));
        };
        match node.text.as_mut() {
            Some(layer) => {
                layer.content = text.to_owned();
                Ok(())
            }
            None => {
                error!(
                    "screen marker {}: text {:?} supplied but the marker has no text layer",
                    self.id, text
                );
                Err(GraphicError::MissingTextLayer(self.id))
            }
        }
    }

    /// Press the confirm button. Clears `blocked_by_button` when the button
    /// exists and is interactable.
    pub fn confirm(&mut self) -> bool {
        let (Some(button), Some(binding)) = (self.confirm_button.as_ref(), self.binding.as_ref())
        else {
            return false;
        };
        if !button.interactable {
            return false;
        }
        binding.step.set_blocked_by_button(false);
        true
    }

    fn advance_transition(&mut self, dt: f32) {
        let outcome = {
            let (Some(tr), Some(node)) = (self.transition.as_mut(), self.node.as_mut()) else {
                return;
            };
            tr.clock.advance(dt);
            tr.apply(node, tr.clock.progress());
            let reached = tr.reached(node);
            let forced = tr.clock.is_forced();
            if !(reached || forced) {
                TransitionOutcome::Running
            } else if tr.clock.reversing {
                TransitionOutcome::Vanished
            } else {
                // Drop accumulated interpolation drift.
                tr.snap(node);
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
                    trace!("screen marker {}: appear force-completed", self.id);
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

    fn advance_idle(&mut self, dt: f32) {
        let (Some(binding), Some(node)) = (self.binding.as_ref(), self.node.as_mut()) else {
            return;
        };
        let idle = &binding.settings.idle;
        self.state.idle_time += dt;
        let t = self.state.idle_time;
        match idle.animation {
            IdleAnimation::None | IdleAnimation::RotateSpin => {}
            IdleAnimation::Levitate => {
                let base = *self
                    .idle_base_position
                    .get_or_insert(node.anchored_position);
                node.anchored_position = base + levitation_offset(idle, t).truncate();
            }
            IdleAnimation::Pulse => {
                node.scale = pulse_step(node.scale, self.state.initial_scale, idle, t, dt);
            }
            IdleAnimation::Fade => {
                let m = breathing_multiplier(t, idle.fade_duration);
                apply_breathing(node, &self.state.initial_colors, m);
            }
            IdleAnimation::Blink => {
                if let Some(visible) = self.state.blink.advance(dt, idle) {
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
            if let Some(button) = self.confirm_button.as_mut() {
                button.interactable = true;
            }
            self.events.push(MarkerEvent::DwellSatisfied {
                marker: self.id,
                step: binding.step.id.clone(),
            });
            debug!("screen marker {}: dwell satisfied", self.id);
        }
    }
}
