//! Runs a two-step tutorial headless and prints marker events as JSON.
//!
//! `RUST_LOG=debug cargo run -p tutorial-graphic-core --example walkthrough`

use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use serde_json::to_string;
use tutorial_graphic_core::{
    parse_graphic_settings_json, parse_world_graphic_settings_json, CameraView, InteractionType,
    LocalizedText, MarkerSpec, Pose, SceneReferences, ScreenAnchor, ScreenNode, ScreenPlacement,
    StepDefinition, TextLayer, TutorialSequencer, TutorialStep, VisualLayer, WorldNode,
};
use tutorial_test_fixtures as fixtures;

const FRAME: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let slide = Arc::new(parse_graphic_settings_json(&fixtures::screen::json(
        "slide-top-right",
    )?)?);
    let billboard = Arc::new(parse_world_graphic_settings_json(&fixtures::world::json(
        "billboard-levitate",
    )?)?);

    let scene = Arc::new(
        SceneReferences::new(CameraView::default(), Vec2::new(1920.0, 1080.0)).with_locale("de"),
    );

    let rotate = TutorialStep::new("rotate-piece", InteractionType::Swipe)
        .with_min_time(1.0)
        .with_text(
            LocalizedText::new("en")
                .with("en", "Swipe to rotate")
                .with("de", "Wischen zum Drehen"),
        )
        .into_handle();
    let drop = TutorialStep::new("drop-piece", InteractionType::Confirm)
        .with_min_time(0.5)
        .into_handle();

    let steps = vec![
        StepDefinition::new(rotate).with_marker(MarkerSpec::Screen {
            settings: Some(slide),
            placement: ScreenPlacement::anchored(ScreenAnchor::BottomCenter, Vec2::new(0.0, 120.0)),
            node: ScreenNode::new(vec![
                VisualLayer::new("panel", Vec4::new(0.1, 0.1, 0.1, 0.85)),
                VisualLayer::new("glow", Vec4::new(1.0, 0.9, 0.3, 0.6)).decorative(),
            ])
            .with_text(TextLayer::new(Vec4::ONE)),
            confirm_button: false,
        }),
        StepDefinition::new(drop)
            .with_marker(MarkerSpec::World {
                settings: Some(billboard),
                node: WorldNode::new(
                    Pose {
                        translation: Vec3::new(0.5, -0.5, -4.0),
                        ..Pose::default()
                    },
                    vec![VisualLayer::new("arrow", Vec4::new(0.2, 0.7, 1.0, 1.0))],
                ),
                edge_behaviour: None,
            })
            .with_marker(MarkerSpec::Screen {
                settings: None,
                placement: ScreenPlacement::anchored(ScreenAnchor::BottomRight, Vec2::new(-160.0, 90.0)),
                node: ScreenNode::new(vec![VisualLayer::new("button", Vec4::ONE)]),
                confirm_button: true,
            }),
    ];

    let mut seq = TutorialSequencer::new(scene, steps);
    seq.begin()?;

    let mut time = 0.0f32;
    while !seq.is_finished() && time < 10.0 {
        let frame = seq.tick(FRAME);
        time += FRAME;
        for event in &frame.events {
            println!("{time:6.3}s {}", to_string(event)?);
        }
        if seq.current_step().map_or(false, |s| s.interaction_type == InteractionType::Confirm) {
            // Simulated player pressing the button as soon as it can be pressed.
            seq.confirm();
        }
        if seq.can_advance() {
            seq.advance()?;
        }
    }
    // Let the last markers finish disappearing.
    for _ in 0..60 {
        for event in seq.tick(FRAME).events {
            println!("{}", to_string(&event)?);
        }
    }
    Ok(())
}
