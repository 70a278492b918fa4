//! Step sequencer composing marker controllers.
//!
//! Owns an ordered list of step definitions. Beginning a step validates explicit settings, creates,
//! initializes and shows its markers; advancing hides them (they keep ticking
//! while they disappear) and begins the next step. The sequencer never decides
//! when a step is done on its own: hosts poll [`TutorialSequencer::can_advance`].

use std::sync::Arc;

use log::{debug, info};

use crate::error::GraphicError;
use crate::ids::{IdAllocator, MarkerId};
use crate::node::{ScreenNode, WorldNode};
use crate::outputs::MarkerEvent;
use crate::scene::SceneReferences;
use crate::screen::{ConfirmButton, ScreenGraphicController, ScreenPlacement};
use crate::settings::{EdgeBehaviour, GraphicSettings, WorldGraphicSettings};
use crate::state::MarkerPhase;
use crate::step::StepHandle;
use crate::world::WorldGraphicController;

/// Template for one marker of a step.
#[derive(Clone, Debug)]
pub enum MarkerSpec {
    Screen {
        settings: Option<Arc<GraphicSettings>>,
        placement: ScreenPlacement,
        node: ScreenNode,
        confirm_button: bool,
    },
    World {
        settings: Option<Arc<WorldGraphicSettings>>,
        node: WorldNode,
        edge_behaviour: Option<EdgeBehaviour>,
    },
}

#[derive(Clone, Debug)]
pub struct StepDefinition {
    pub step: StepHandle,
    pub markers: Vec<MarkerSpec>,
}

impl StepDefinition {
    pub fn new(step: StepHandle) -> Self {
        Self {
            step,
            markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: MarkerSpec) -> Self {
        self.markers.push(marker);
        self
    }
}

/// A live marker of either kind.
#[derive(Debug)]
pub enum Marker {
    Screen(ScreenGraphicController),
    World(WorldGraphicController),
}

impl Marker {
    pub fn id(&self) -> MarkerId {
        match self {
            Marker::Screen(m) => m.id(),
            Marker::World(m) => m.id(),
        }
    }

    pub fn phase(&self) -> MarkerPhase {
        match self {
            Marker::Screen(m) => m.phase(),
            Marker::World(m) => m.phase(),
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            Marker::Screen(m) => m.is_ready(),
            Marker::World(m) => m.is_ready(),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        match self {
            Marker::Screen(m) => m.is_destroyed(),
            Marker::World(m) => m.is_destroyed(),
        }
    }

    pub fn tick(&mut self, dt: f32) {
        match self {
            Marker::Screen(m) => m.tick(dt),
            Marker::World(m) => m.tick(dt),
        }
    }

    pub fn hide(&mut self) {
        match self {
            Marker::Screen(m) => m.hide(),
            Marker::World(m) => m.hide(),
        }
    }

    pub fn destroy(&mut self) {
        match self {
            Marker::Screen(m) => m.destroy(),
            Marker::World(m) => m.destroy(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<MarkerEvent> {
        match self {
            Marker::Screen(m) => m.drain_events(),
            Marker::World(m) => m.drain_events(),
        }
    }

    fn build(
        id: MarkerId,
        spec: &MarkerSpec,
        step: &StepHandle,
        scene: &Arc<SceneReferences>,
    ) -> Result<Self, GraphicError> {
        let mut marker = match spec {
            MarkerSpec::Screen {
                settings,
                placement,
                node,
                confirm_button,
            } => {
                if let Some(settings) = settings {
                    settings.validate()?;
                }
                let mut c =
                    ScreenGraphicController::new(id, settings.clone(), *placement, node.clone());
                if *confirm_button {
                    c = c.with_confirm_button(ConfirmButton::default());
                }
                c.initialize(Some(step.clone()), Some(scene.clone()))?;
                Marker::Screen(c)
            }
            MarkerSpec::World {
                settings,
                node,
                edge_behaviour,
            } => {
                if let Some(settings) = settings {
                    settings.validate()?;
                }
                let mut c = WorldGraphicController::new(id, settings.clone(), node.clone());
                if let Some(behaviour) = edge_behaviour {
                    c = c.with_edge_behaviour(*behaviour);
                }
                c.initialize(Some(step.clone()), Some(scene.clone()))?;
                Marker::World(c)
            }
        };
        match &mut marker {
            Marker::Screen(m) => m.show(step.clone()),
            Marker::World(m) => m.show(step.clone()),
        }
        Ok(marker)
    }
}

/// Events gathered from every marker during one sequencer tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequencerFrame {
    pub step_index: Option<usize>,
    pub events: Vec<MarkerEvent>,
}

#[derive(Debug)]
pub struct TutorialSequencer {
    scene: Arc<SceneReferences>,
    steps: Vec<StepDefinition>,
    current: Option<usize>,
    active: Vec<Marker>,
    retiring: Vec<Marker>,
    ids: IdAllocator,
    finished: bool,
}

impl TutorialSequencer {
    pub fn new(scene: Arc<SceneReferences>, steps: Vec<StepDefinition>) -> Self {
        Self {
            scene,
            steps,
            current: None,
            active: Vec::new(),
            retiring: Vec::new(),
            ids: IdAllocator::new(),
            finished: false,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&StepHandle> {
        self.current
            .and_then(|i| self.steps.get(i))
            .map(|def| &def.step)
    }

    pub fn active_markers(&self) -> &[Marker] {
        &self.active
    }

    pub fn retiring_markers(&self) -> &[Marker] {
        &self.retiring
    }

    /// All steps have been advanced past.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Begin the first step. Restarts from the top when already running.
    pub fn begin(&mut self) -> Result<(), GraphicError> {
        for mut marker in self.active.drain(..).chain(self.retiring.drain(..)) {
            marker.destroy();
        }
        self.current = None;
        self.finished = false;
        self.ids.reset();
        if self.steps.is_empty() {
            self.finished = true;
            return Ok(());
        }
        self.begin_step(0)
    }

    /// The current step's time and button blocks have both cleared.
    pub fn can_advance(&self) -> bool {
        self.current_step().map_or(false, |s| s.is_unblocked())
    }

    /// Hide the current step's markers and begin the next step. Returns
    /// false once there is no next step. When the next step fails to build
    /// there is no current step afterwards.
    pub fn advance(&mut self) -> Result<bool, GraphicError> {
        let Some(index) = self.current else {
            return Ok(false);
        };
        for mut marker in self.active.drain(..) {
            marker.hide();
            self.retiring.push(marker);
        }
        let next = index + 1;
        if next >= self.steps.len() {
            info!("tutorial finished after {} steps", self.steps.len());
            self.current = None;
            self.finished = true;
            return Ok(false);
        }
        if let Err(err) = self.begin_step(next) {
            self.current = None;
            return Err(err);
        }
        Ok(true)
    }

    /// Press the confirm button on every screen marker of the current step.
    pub fn confirm(&mut self) -> bool {
        let mut pressed = false;
        for marker in self.active.iter_mut() {
            if let Marker::Screen(m) = marker {
                pressed |= m.confirm();
            }
        }
        pressed
    }

    pub fn tick(&mut self, dt: f32) -> SequencerFrame {
        let mut events = Vec::new();
        for marker in self.active.iter_mut().chain(self.retiring.iter_mut()) {
            marker.tick(dt);
            events.extend(marker.drain_events());
        }
        self.retiring.retain(|m| !m.is_destroyed());
        SequencerFrame {
            step_index: self.current,
            events,
        }
    }

    fn begin_step(&mut self, index: usize) -> Result<(), GraphicError> {
        let Some(def) = self.steps.get(index) else {
            return Ok(());
        };
        let mut built = Vec::with_capacity(def.markers.len());
        for spec in &def.markers {
            let id = self.ids.alloc_marker();
            built.push(Marker::build(id, spec, &def.step, &self.scene)?);
        }
        debug!(
            "beginning tutorial step {:?} with {} markers",
            def.step.id,
            built.len()
        );
        self.active = built;
        self.current = Some(index);
        Ok(())
    }
}
