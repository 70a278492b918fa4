use std::sync::Arc;

use bevy::prelude::*;
use tutorial_graphic_core::{CameraView, MarkerEvent, SceneReferences};

/// Scene references shared by every marker spawned through this plugin.
#[derive(Resource, Clone, Debug)]
pub struct TutorialScene(pub Arc<SceneReferences>);

impl Default for TutorialScene {
    fn default() -> Self {
        Self(Arc::new(SceneReferences::new(
            CameraView::default(),
            Vec2::new(1920.0, 1080.0),
        )))
    }
}

/// Seconds advanced per `FixedUpdate` tick.
#[derive(Resource)]
pub struct TickDt(pub f32);

impl Default for TickDt {
    fn default() -> Self {
        Self(1.0 / 60.0)
    }
}

/// A core marker event tagged with the entity that produced it.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MarkerEventMessage {
    pub entity: Entity,
    pub event: MarkerEvent,
}
