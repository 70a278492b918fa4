use bevy::prelude::*;
use tutorial_graphic_core::{CameraView, ColorLayers, VisualLayer};

use crate::components::{MarkerLayer, MarkerText, ScreenMarker, TutorialCamera, WorldMarker};
use crate::resources::{MarkerEventMessage, TickDt, TutorialScene};

fn to_color(c: Vec4) -> Color {
    Color::linear_rgba(c.x, c.y, c.z, c.w)
}

fn layer_state(layer: &VisualLayer) -> (Vec4, bool) {
    (layer.color, layer.visible)
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Copy the first `TutorialCamera`'s pose and projection into the shared
/// camera handle. The viewport keeps its previous size until the render
/// target reports one.
pub fn sync_camera_system(
    scene: Res<TutorialScene>,
    cameras: Query<(&GlobalTransform, Option<&Camera>, Option<&Projection>), With<TutorialCamera>>,
) {
    let Some((transform, camera, projection)) = cameras.iter().next() else {
        return;
    };
    let previous = scene.0.camera.get();
    let (_, rotation, position) = transform.to_scale_rotation_translation();
    let fov_y = match projection {
        Some(Projection::Perspective(p)) => p.fov,
        _ => previous.fov_y,
    };
    let viewport_px = camera
        .and_then(Camera::logical_viewport_size)
        .unwrap_or(previous.viewport_px);
    scene.0.camera.set(CameraView {
        position,
        rotation,
        fov_y,
        viewport_px,
    });
}

/// Advance every marker by one fixed step and forward its events.
pub fn tick_markers_system(
    dt: Res<TickDt>,
    mut screens: Query<(Entity, &mut ScreenMarker)>,
    mut worlds: Query<(Entity, &mut WorldMarker)>,
    mut events: EventWriter<MarkerEventMessage>,
) {
    for (entity, mut marker) in screens.iter_mut() {
        marker.0.tick(dt.0);
        for event in marker.0.drain_events() {
            events.send(MarkerEventMessage { entity, event });
        }
    }
    for (entity, mut marker) in worlds.iter_mut() {
        marker.0.tick(dt.0);
        for event in marker.0.drain_events() {
            events.send(MarkerEventMessage { entity, event });
        }
    }
}

/// Markers that released their node leave the world with their children.
pub fn despawn_destroyed_system(
    mut commands: Commands,
    screens: Query<(Entity, &ScreenMarker)>,
    worlds: Query<(Entity, &WorldMarker)>,
) {
    for (entity, marker) in screens.iter() {
        if marker.0.is_destroyed() {
            commands.entity(entity).despawn_recursive();
        }
    }
    for (entity, marker) in worlds.iter() {
        if marker.0.is_destroyed() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

pub fn apply_screen_nodes_system(
    mut markers: Query<(&ScreenMarker, &mut Transform, &mut Visibility)>,
) {
    for (marker, mut transform, mut vis) in markers.iter_mut() {
        let Some(node) = marker.0.node() else {
            continue;
        };
        transform.translation = node.anchored_position.extend(transform.translation.z);
        transform.scale = node.scale;
        *vis = visibility(node.active);
    }
}

pub fn apply_world_nodes_system(
    mut markers: Query<(&WorldMarker, &mut Transform, &mut Visibility)>,
) {
    for (marker, mut transform, mut vis) in markers.iter_mut() {
        let Some(node) = marker.0.node() else {
            continue;
        };
        transform.translation = node.pose.translation;
        transform.rotation = node.pose.rotation;
        transform.scale = node.pose.scale;
        *vis = visibility(node.active && node.visible);
    }
}

/// Push per-layer color and visibility onto `MarkerLayer` children.
pub fn apply_layers_system(
    mut layers: Query<(&MarkerLayer, &Parent, Option<&mut Sprite>, &mut Visibility)>,
    screens: Query<&ScreenMarker>,
    worlds: Query<&WorldMarker>,
) {
    for (layer, parent, sprite, mut vis) in layers.iter_mut() {
        let source = if let Ok(m) = screens.get(parent.get()) {
            m.0.node().and_then(|n| n.layers().get(layer.0).map(layer_state))
        } else if let Ok(m) = worlds.get(parent.get()) {
            m.0.node().and_then(|n| n.layers().get(layer.0).map(layer_state))
        } else {
            None
        };
        let Some((color, visible)) = source else {
            continue;
        };
        if let Some(mut sprite) = sprite {
            sprite.color = to_color(color);
        }
        *vis = visibility(visible);
    }
}

pub fn apply_text_system(
    mut texts: Query<(&Parent, &mut Text, &mut Visibility), (With<MarkerText>, Without<MarkerLayer>)>,
    screens: Query<&ScreenMarker>,
) {
    for (parent, mut text, mut vis) in texts.iter_mut() {
        let Some(layer) = screens
            .get(parent.get())
            .ok()
            .and_then(|m| m.0.node())
            .and_then(|n| n.text.as_ref())
        else {
            continue;
        };
        if let Some(section) = text.sections.first_mut() {
            if section.value != layer.content {
                section.value.clone_from(&layer.content);
            }
            section.style.color = to_color(layer.color);
        }
        *vis = visibility(layer.visible);
    }
}
