use bevy::prelude::*;
use tutorial_graphic_core::{ScreenGraphicController, WorldGraphicController};

/// Overlay marker. Its `Transform` mirrors the node's anchored position
/// (canvas-centered, +Y up, matching a default 2D camera).
#[derive(Component, Debug)]
pub struct ScreenMarker(pub ScreenGraphicController);

#[derive(Component, Debug)]
pub struct WorldMarker(pub WorldGraphicController);

/// Camera whose pose and projection feed the shared tutorial camera.
#[derive(Component, Debug, Default)]
pub struct TutorialCamera;

/// Child entity rendering one layer (by index) of its parent marker's node.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerLayer(pub usize);

/// Child entity rendering the parent screen marker's text layer.
#[derive(Component, Debug, Default)]
pub struct MarkerText;
