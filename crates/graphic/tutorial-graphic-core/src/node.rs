//! Scene-node state owned by a marker controller.
//!
//! The host builds a node describing the marker's visuals, hands it to a
//! controller, and reads it back every frame to render. Releasing the node
//! (`destroy`) is how a marker leaves the scene.

use glam::{Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// One color-bearing visual (image, sprite, mesh material).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualLayer {
    pub name: String,
    /// Linear RGBA.
    pub color: Vec4,
    pub visible: bool,
    /// Purely decorative layers never take pointer hits or collisions.
    pub decorative: bool,
    /// Raycast target (screen) / collider enabled (world).
    pub hit_testable: bool,
}

impl VisualLayer {
    pub fn new(name: impl Into<String>, color: Vec4) -> Self {
        Self {
            name: name.into(),
            color,
            visible: true,
            decorative: false,
            hit_testable: true,
        }
    }

    pub fn decorative(mut self) -> Self {
        self.decorative = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub content: String,
    pub color: Vec4,
    pub visible: bool,
    /// Blink also toggles the text when enabled.
    pub enabled: bool,
}

impl TextLayer {
    pub fn new(color: Vec4) -> Self {
        Self {
            content: String::new(),
            color,
            visible: true,
            enabled: true,
        }
    }
}

/// Operations shared by both node kinds so the animator and idle engine can
/// stay generic over them.
pub trait ColorLayers {
    fn layers(&self) -> &[VisualLayer];
    fn layers_mut(&mut self) -> &mut [VisualLayer];
    fn text(&self) -> Option<&TextLayer> {
        None
    }
    fn text_mut(&mut self) -> Option<&mut TextLayer> {
        None
    }

    /// Colors of every layer followed by the text color, if any.
    fn capture_colors(&self) -> Vec<Vec4> {
        let mut out: Vec<Vec4> = self.layers().iter().map(|l| l.color).collect();
        if let Some(text) = self.text() {
            out.push(text.color);
        }
        out
    }

    /// Set the alpha of color slot `index` (layers first, then text).
    fn set_slot_alpha(&mut self, index: usize, rgb_from: Vec4, alpha: f32) {
        let n = self.layers().len();
        let color = rgb_from.truncate().extend(alpha);
        if index < n {
            self.layers_mut()[index].color = color;
        } else if let Some(text) = self.text_mut() {
            text.color = color;
        }
    }

    fn slot_alpha(&self, index: usize) -> f32 {
        let n = self.layers().len();
        if index < n {
            self.layers()[index].color.w
        } else {
            self.text().map(|t| t.color.w).unwrap_or(0.0)
        }
    }

    /// Show or hide every layer, and the text when it is enabled.
    fn set_layers_visible(&mut self, visible: bool) {
        for layer in self.layers_mut() {
            layer.visible = visible;
        }
        if let Some(text) = self.text_mut() {
            if text.enabled {
                text.visible = visible;
            }
        }
    }
}

/// A 2D overlay node on the tutorial canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenNode {
    /// Position relative to the canvas center, pixels, +Y up.
    pub anchored_position: Vec2,
    pub scale: Vec3,
    pub active: bool,
    pub layers: Vec<VisualLayer>,
    pub text: Option<TextLayer>,
}

impl ScreenNode {
    pub fn new(layers: Vec<VisualLayer>) -> Self {
        Self {
            anchored_position: Vec2::ZERO,
            scale: Vec3::ONE,
            active: false,
            layers,
            text: None,
        }
    }

    pub fn with_text(mut self, text: TextLayer) -> Self {
        self.text = Some(text);
        self
    }

    pub fn at(mut self, anchored_position: Vec2) -> Self {
        self.anchored_position = anchored_position;
        self
    }
}

impl ColorLayers for ScreenNode {
    fn layers(&self) -> &[VisualLayer] {
        &self.layers
    }
    fn layers_mut(&mut self) -> &mut [VisualLayer] {
        &mut self.layers
    }
    fn text(&self) -> Option<&TextLayer> {
        self.text.as_ref()
    }
    fn text_mut(&mut self) -> Option<&mut TextLayer> {
        self.text.as_mut()
    }
}

/// Translation/rotation/scale of a world node.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A 3D marker node placed in world space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldNode {
    pub pose: Pose,
    pub active: bool,
    /// Cleared while the marker is off-screen under `DisableOnExit`.
    pub visible: bool,
    pub layers: Vec<VisualLayer>,
}

impl WorldNode {
    pub fn new(pose: Pose, layers: Vec<VisualLayer>) -> Self {
        Self {
            pose,
            active: false,
            visible: true,
            layers,
        }
    }
}

impl ColorLayers for WorldNode {
    fn layers(&self) -> &[VisualLayer] {
        &self.layers
    }
    fn layers_mut(&mut self) -> &mut [VisualLayer] {
        &mut self.layers
    }
}
