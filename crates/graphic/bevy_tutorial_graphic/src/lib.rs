//! Bevy adapter for the tutorial graphic core.
//!
//! Markers live on entities as [`ScreenMarker`]/[`WorldMarker`] components.
//! `FixedUpdate` syncs the camera, ticks every controller and despawns the
//! ones that finished disappearing; `Update` copies node state onto
//! `Transform`, `Visibility`, `Sprite` and `Text`.

use std::sync::Arc;

use bevy::prelude::*;
use tutorial_graphic_core::{
    GraphicError, ScreenGraphicController, StepHandle, WorldGraphicController,
};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{MarkerLayer, MarkerText, ScreenMarker, TutorialCamera, WorldMarker};
pub use resources::{MarkerEventMessage, TickDt, TutorialScene};

pub struct TutorialGraphicPlugin;

impl Plugin for TutorialGraphicPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TutorialScene>()
            .init_resource::<TickDt>()
            .add_event::<MarkerEventMessage>()
            .add_systems(
                FixedUpdate,
                (
                    systems::sync_camera_system,
                    systems::tick_markers_system,
                    systems::despawn_destroyed_system,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    systems::apply_screen_nodes_system,
                    systems::apply_world_nodes_system,
                    systems::apply_layers_system,
                    systems::apply_text_system,
                ),
            );
    }
}

/// Initialize and show a screen marker, then spawn it. Layer and text child
/// entities can be added to the returned entity afterwards.
pub fn spawn_screen_marker(
    commands: &mut Commands,
    scene: &TutorialScene,
    mut controller: ScreenGraphicController,
    step: StepHandle,
) -> Result<Entity, GraphicError> {
    controller.initialize(Some(step.clone()), Some(Arc::clone(&scene.0)))?;
    controller.show(step);
    Ok(commands
        .spawn((SpatialBundle::default(), ScreenMarker(controller)))
        .id())
}

/// World-marker counterpart of [`spawn_screen_marker`].
pub fn spawn_world_marker(
    commands: &mut Commands,
    scene: &TutorialScene,
    mut controller: WorldGraphicController,
    step: StepHandle,
) -> Result<Entity, GraphicError> {
    controller.initialize(Some(step.clone()), Some(Arc::clone(&scene.0)))?;
    controller.show(step);
    Ok(commands
        .spawn((SpatialBundle::default(), WorldMarker(controller)))
        .id())
}
