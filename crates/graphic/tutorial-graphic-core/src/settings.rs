//! Marker configuration records.
//!
//! Settings are authored by tooling, loaded once (usually from JSON) and then
//! shared read-only between any number of markers through `Arc`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::anchor::{ScreenCorner, ViewportAnchor};
use crate::error::GraphicError;
use crate::tolerances::DIRECTION_EPSILON_SQ;

/// Appear/disappear transition kinds for screen markers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenAnimation {
    None,
    #[default]
    Zoom,
    Fade,
    Slide,
}

/// Appear/disappear transition kinds for world markers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldAnimation {
    None,
    #[default]
    Zoom,
    ZoomAndRotate,
    Fade,
}

/// Ambient motion played once the appear transition has reached its target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdleAnimation {
    #[default]
    None,
    Levitate,
    Pulse,
    Fade,
    Blink,
    /// World markers only; screen markers treat it as `None`.
    RotateSpin,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementBehaviour {
    /// Stay where the host placed the node.
    #[default]
    WorldSpace,
    /// Re-pin every tick at a fixed distance in front of the camera.
    FrontOfCamera,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeBehaviour {
    /// Ignore screen bounds entirely.
    #[default]
    None,
    /// Hide while projected off-screen, show again on re-entry.
    DisableOnExit,
}

/// Idle parameters shared by both marker variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleSettings {
    pub animation: IdleAnimation,
    pub levitation_range: f32,
    pub levitation_speed: f32,
    pub levitation_direction: Vec3,
    pub pulse_delta: f32,
    pub pulse_speed: f32,
    pub fade_duration: f32,
    pub blink_interval: f32,
    pub blink_duration: f32,
    /// Degrees per second (world RotateSpin).
    pub spin_speed: f32,
    pub spin_axis: Vec3,
}

impl Default for IdleSettings {
    fn default() -> Self {
        Self {
            animation: IdleAnimation::None,
            levitation_range: 10.0,
            levitation_speed: 2.0,
            levitation_direction: Vec3::Y,
            pulse_delta: 0.1,
            pulse_speed: 4.0,
            fade_duration: 1.5,
            blink_interval: 0.5,
            blink_duration: 0.0,
            spin_speed: 90.0,
            spin_axis: Vec3::Y,
        }
    }
}

impl IdleSettings {
    fn validate(&self, allow_spin: bool) -> Result<(), GraphicError> {
        let non_negative = [
            ("levitation_range", self.levitation_range),
            ("levitation_speed", self.levitation_speed),
            ("pulse_delta", self.pulse_delta),
            ("pulse_speed", self.pulse_speed),
            ("blink_duration", self.blink_duration),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(GraphicError::InvalidSettings(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        match self.animation {
            IdleAnimation::Fade if !(self.fade_duration > 0.0) => Err(
                GraphicError::InvalidSettings("fade_duration must be > 0".into()),
            ),
            IdleAnimation::Blink if !(self.blink_interval > 0.0) => Err(
                GraphicError::InvalidSettings("blink_interval must be > 0".into()),
            ),
            IdleAnimation::RotateSpin if !allow_spin => Err(GraphicError::InvalidSettings(
                "RotateSpin idle is only available on world markers".into(),
            )),
            IdleAnimation::RotateSpin if self.spin_axis.length_squared() < DIRECTION_EPSILON_SQ => {
                Err(GraphicError::InvalidSettings(
                    "spin_axis must be non-zero".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

fn validate_duration(name: &str, v: f32) -> Result<(), GraphicError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(GraphicError::InvalidSettings(format!(
            "{name} must be > 0 seconds (got {v})"
        )))
    }
}

/// Settings for a screen-space (overlay) marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicSettings {
    pub appear_animation: ScreenAnimation,
    pub appear_duration: f32,
    pub disappear_animation: ScreenAnimation,
    pub disappear_duration: f32,
    pub slide_start_corner: ScreenCorner,
    pub slide_end_corner: ScreenCorner,
    /// Outward margin (pixels) past the canvas edge for slide corners.
    pub screen_edge_offset: f32,
    pub idle: IdleSettings,
}

impl Default for GraphicSettings {
    fn default() -> Self {
        Self {
            appear_animation: ScreenAnimation::Zoom,
            appear_duration: 0.3,
            disappear_animation: ScreenAnimation::Zoom,
            disappear_duration: 0.3,
            slide_start_corner: ScreenCorner::TopRight,
            slide_end_corner: ScreenCorner::TopRight,
            screen_edge_offset: 100.0,
            idle: IdleSettings::default(),
        }
    }
}

impl GraphicSettings {
    pub fn validate(&self) -> Result<(), GraphicError> {
        validate_duration("appear_duration", self.appear_duration)?;
        validate_duration("disappear_duration", self.disappear_duration)?;
        if !self.screen_edge_offset.is_finite() || self.screen_edge_offset < 0.0 {
            return Err(GraphicError::InvalidSettings(
                "screen_edge_offset must be >= 0".into(),
            ));
        }
        self.idle.validate(false)
    }
}

/// Settings for a world-space marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGraphicSettings {
    pub appear_animation: WorldAnimation,
    pub appear_duration: f32,
    pub disappear_animation: WorldAnimation,
    pub disappear_duration: f32,
    pub spin_revolutions: u32,
    pub placement_behaviour: PlacementBehaviour,
    pub front_camera_distance: f32,
    pub front_anchor_position: ViewportAnchor,
    pub margin_pixels: f32,
    pub face_to_camera: bool,
    pub screen_edge_padding: f32,
    pub default_edge_behaviour: EdgeBehaviour,
    pub idle: IdleSettings,
}

impl Default for WorldGraphicSettings {
    fn default() -> Self {
        Self {
            appear_animation: WorldAnimation::Zoom,
            appear_duration: 0.3,
            disappear_animation: WorldAnimation::Zoom,
            disappear_duration: 0.3,
            spin_revolutions: 1,
            placement_behaviour: PlacementBehaviour::WorldSpace,
            front_camera_distance: 2.0,
            front_anchor_position: ViewportAnchor::Center,
            margin_pixels: 0.0,
            face_to_camera: true,
            screen_edge_padding: 0.0,
            default_edge_behaviour: EdgeBehaviour::None,
            idle: IdleSettings {
                levitation_range: 0.1,
                ..IdleSettings::default()
            },
        }
    }
}

impl WorldGraphicSettings {
    pub fn validate(&self) -> Result<(), GraphicError> {
        validate_duration("appear_duration", self.appear_duration)?;
        validate_duration("disappear_duration", self.disappear_duration)?;
        if self.placement_behaviour == PlacementBehaviour::FrontOfCamera
            && !(self.front_camera_distance > 0.0)
        {
            return Err(GraphicError::InvalidSettings(
                "front_camera_distance must be > 0 for FrontOfCamera".into(),
            ));
        }
        if !self.margin_pixels.is_finite() || self.margin_pixels < 0.0 {
            return Err(GraphicError::InvalidSettings(
                "margin_pixels must be >= 0".into(),
            ));
        }
        self.idle.validate(true)
    }

    /// RotateSpin idle owns orientation, so billboarding is skipped for it.
    pub fn billboards(&self) -> bool {
        self.face_to_camera && self.idle.animation != IdleAnimation::RotateSpin
    }
}

/// Parse and validate screen marker settings from JSON.
pub fn parse_graphic_settings_json(json: &str) -> Result<GraphicSettings, GraphicError> {
    let settings: GraphicSettings = serde_json::from_str(json)?;
    settings.validate()?;
    Ok(settings)
}

/// Parse and validate world marker settings from JSON.
pub fn parse_world_graphic_settings_json(
    json: &str,
) -> Result<WorldGraphicSettings, GraphicError> {
    let settings: WorldGraphicSettings = serde_json::from_str(json)?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GraphicSettings::default().validate().unwrap();
        WorldGraphicSettings::default().validate().unwrap();
    }

    #[test]
    fn zero_duration_is_rejected() {
        let s = GraphicSettings {
            appear_duration: 0.0,
            ..GraphicSettings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(GraphicError::InvalidSettings(_))
        ));
    }

    #[test]
    fn rotate_spin_rejected_on_screen() {
        let mut s = GraphicSettings::default();
        s.idle.animation = IdleAnimation::RotateSpin;
        assert!(s.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = parse_graphic_settings_json(
            r#"{ "appear_animation": "Slide", "idle": { "animation": "Pulse", "pulse_delta": 0.2 } }"#,
        )
        .unwrap();
        assert_eq!(s.appear_animation, ScreenAnimation::Slide);
        assert_eq!(s.disappear_animation, ScreenAnimation::Zoom);
        assert_eq!(s.idle.animation, IdleAnimation::Pulse);
        assert_eq!(s.idle.pulse_delta, 0.2);
        assert_eq!(s.idle.pulse_speed, 4.0);
    }

    #[test]
    fn billboard_yields_to_rotate_spin() {
        let mut s = WorldGraphicSettings::default();
        assert!(s.billboards());
        s.idle.animation = IdleAnimation::RotateSpin;
        assert!(!s.billboards());
    }
}
