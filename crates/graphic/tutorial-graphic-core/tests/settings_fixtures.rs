use glam::Vec3;
use tutorial_graphic_core::{
    parse_graphic_settings_json, parse_world_graphic_settings_json, EdgeBehaviour, GraphicError,
    GraphicSettings, IdleAnimation, PlacementBehaviour, ScreenAnimation, ScreenCorner,
    ViewportAnchor, WorldAnimation,
};
use tutorial_test_fixtures as fixtures;

/// it should treat an empty document as all defaults
#[test]
fn empty_screen_fixture_is_default() {
    let json = fixtures::screen::json("zoom-default").unwrap();
    let parsed = parse_graphic_settings_json(&json).unwrap();
    assert_eq!(parsed, GraphicSettings::default());
}

#[test]
fn slide_fixture_parses_corners_and_idle() {
    let json = fixtures::screen::json("slide-top-right").unwrap();
    let s = parse_graphic_settings_json(&json).unwrap();
    assert_eq!(s.appear_animation, ScreenAnimation::Slide);
    assert_eq!(s.slide_start_corner, ScreenCorner::TopRight);
    assert_eq!(s.slide_end_corner, ScreenCorner::BottomLeft);
    assert_eq!(s.idle.animation, IdleAnimation::Levitate);
    assert_eq!(s.idle.levitation_range, 12.0);
    // Unlisted idle fields keep their defaults.
    assert_eq!(s.idle.levitation_direction, Vec3::Y);
}

#[test]
fn every_valid_fixture_parses() {
    for name in ["zoom-default", "slide-top-right", "fade-blink", "pulse"] {
        let json = fixtures::screen::json(name).unwrap();
        parse_graphic_settings_json(&json)
            .unwrap_or_else(|e| panic!("screen fixture {name} failed: {e}"));
    }
    for name in ["billboard-levitate", "front-of-camera", "spin-showcase"] {
        let json = fixtures::world::json(name).unwrap();
        parse_world_graphic_settings_json(&json)
            .unwrap_or_else(|e| panic!("world fixture {name} failed: {e}"));
    }
}

#[test]
fn world_fixture_fields() {
    let s = parse_world_graphic_settings_json(&fixtures::world::json("front-of-camera").unwrap())
        .unwrap();
    assert_eq!(s.placement_behaviour, PlacementBehaviour::FrontOfCamera);
    assert_eq!(s.front_anchor_position, ViewportAnchor::BottomRight);
    assert_eq!(s.margin_pixels, 64.0);
    assert_eq!(s.appear_animation, WorldAnimation::Fade);
    assert_eq!(s.default_edge_behaviour, EdgeBehaviour::None);

    let spin = parse_world_graphic_settings_json(&fixtures::world::json("spin-showcase").unwrap())
        .unwrap();
    assert_eq!(spin.spin_revolutions, 2);
    assert!(!spin.billboards());
}

/// it should reject settings that fail validation
#[test]
fn invalid_fixtures_are_rejected() {
    let err = parse_graphic_settings_json(&fixtures::screen::json("invalid-duration").unwrap())
        .unwrap_err();
    assert!(matches!(err, GraphicError::InvalidSettings(_)), "{err}");

    let err = parse_world_graphic_settings_json(&fixtures::world::json("invalid-spin-axis").unwrap())
        .unwrap_err();
    assert!(matches!(err, GraphicError::InvalidSettings(_)), "{err}");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = parse_graphic_settings_json("{ \"appear_animation\": \"Wobble\" }").unwrap_err();
    assert!(matches!(err, GraphicError::SettingsParse(_)));
}

/// it should refuse RotateSpin on a screen marker
#[test]
fn screen_rotate_spin_is_invalid() {
    let err = parse_graphic_settings_json(r#"{ "idle": { "animation": "RotateSpin" } }"#)
        .unwrap_err();
    assert!(matches!(err, GraphicError::InvalidSettings(_)));
}
