use std::sync::Arc;

use approx::assert_abs_diff_eq;
use glam::{Quat, Vec2, Vec3, Vec4};
use tutorial_graphic_core::{
    CameraView, EdgeBehaviour, IdleAnimation, IdleSettings, InteractionType, MarkerEvent,
    MarkerId, MarkerPhase, PlacementBehaviour, Pose, SceneReferences, TutorialStep,
    ViewportAnchor, VisualLayer, WorldAnimation, WorldGraphicController, WorldGraphicSettings,
    WorldNode,
};

const FRAME: f32 = 1.0 / 60.0;

fn scene() -> Arc<SceneReferences> {
    Arc::new(SceneReferences::new(
        CameraView::default(),
        Vec2::new(1920.0, 1080.0),
    ))
}

fn node_at(translation: Vec3) -> WorldNode {
    WorldNode::new(
        Pose {
            translation,
            ..Pose::default()
        },
        vec![
            VisualLayer::new("arrow", Vec4::new(0.2, 0.6, 1.0, 1.0)),
            VisualLayer::new("shadow", Vec4::new(0.0, 0.0, 0.0, 0.5)).decorative(),
        ],
    )
}

fn shown(
    settings: WorldGraphicSettings,
    translation: Vec3,
    scene: &Arc<SceneReferences>,
) -> WorldGraphicController {
    let step = TutorialStep::new("look-here", InteractionType::Tap).into_handle();
    let mut c = WorldGraphicController::new(MarkerId(2), Some(Arc::new(settings)), node_at(translation));
    c.initialize(Some(step.clone()), Some(scene.clone())).unwrap();
    c.show(step);
    c
}

fn same_rotation(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 0.9999
}

fn idle_now(settings: WorldGraphicSettings) -> WorldGraphicSettings {
    WorldGraphicSettings {
        appear_animation: WorldAnimation::None,
        disappear_animation: WorldAnimation::None,
        ..settings
    }
}

/// it should face the camera while billboarding
#[test]
fn billboard_matches_camera_orientation() {
    let scene = scene();
    let cam = CameraView {
        rotation: Quat::from_rotation_y(0.7),
        ..CameraView::default()
    };
    scene.camera.set(cam);
    let mut c = shown(
        WorldGraphicSettings::default(),
        cam.viewport_to_world(Vec2::splat(0.5), 4.0),
        &scene,
    );
    c.tick(FRAME);
    assert!(same_rotation(c.node().unwrap().pose.rotation, cam.rotation));

    let moved = CameraView {
        rotation: Quat::from_rotation_x(-0.3) * Quat::from_rotation_y(-0.4),
        ..CameraView::default()
    };
    scene.camera.set(moved);
    c.tick(FRAME);
    assert!(same_rotation(c.node().unwrap().pose.rotation, moved.rotation));
}

/// it should keep the baseline rotation when not billboarding
#[test]
fn non_billboard_keeps_baseline_rotation() {
    let scene = scene();
    scene.camera.set(CameraView {
        rotation: Quat::from_rotation_y(1.0),
        ..CameraView::default()
    });
    let settings = WorldGraphicSettings {
        face_to_camera: false,
        ..WorldGraphicSettings::default()
    };
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    c.tick(FRAME);
    assert!(same_rotation(c.node().unwrap().pose.rotation, Quat::IDENTITY));
}

/// it should spin whole revolutions during a zoom-and-rotate appear
#[test]
fn zoom_and_rotate_spins_then_settles() {
    let scene = scene();
    let settings = WorldGraphicSettings {
        appear_animation: WorldAnimation::ZoomAndRotate,
        appear_duration: 0.3,
        spin_revolutions: 1,
        face_to_camera: false,
        ..WorldGraphicSettings::default()
    };
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    c.tick(0.15);
    assert_abs_diff_eq!(c.spin_degrees(), 180.0, epsilon = 1e-3);
    assert!(same_rotation(
        c.node().unwrap().pose.rotation,
        Quat::from_rotation_y(std::f32::consts::PI)
    ));

    let mut frames = 0;
    while c.phase() == MarkerPhase::Appearing {
        c.tick(FRAME);
        frames += 1;
        assert!(frames < 60);
    }
    assert_eq!(c.spin_degrees(), 0.0);
    assert_eq!(c.node().unwrap().pose.scale, Vec3::ONE);
    assert!(same_rotation(c.node().unwrap().pose.rotation, Quat::IDENTITY));
    assert!(c.drain_events().contains(&MarkerEvent::AppearCompleted {
        marker: MarkerId(2),
        forced: false
    }));
}

/// it should follow the camera when placed in front of it
#[test]
fn front_of_camera_tracks_camera() {
    let scene = scene();
    let settings = WorldGraphicSettings {
        placement_behaviour: PlacementBehaviour::FrontOfCamera,
        front_camera_distance: 3.0,
        front_anchor_position: ViewportAnchor::Center,
        ..WorldGraphicSettings::default()
    };
    let mut c = shown(settings, Vec3::ZERO, &scene);
    c.tick(FRAME);
    assert!((c.node().unwrap().pose.translation - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-4);

    scene.camera.set(CameraView {
        position: Vec3::new(0.0, 1.0, 10.0),
        ..CameraView::default()
    });
    c.tick(FRAME);
    assert!((c.node().unwrap().pose.translation - Vec3::new(0.0, 1.0, 7.0)).length() < 1e-4);
}

/// it should inset a corner anchor by the pixel margin on both axes
#[test]
fn front_of_camera_corner_respects_margin() {
    let scene = scene();
    let settings = WorldGraphicSettings {
        placement_behaviour: PlacementBehaviour::FrontOfCamera,
        front_camera_distance: 2.0,
        front_anchor_position: ViewportAnchor::TopRight,
        margin_pixels: 96.0,
        ..WorldGraphicSettings::default()
    };
    let mut c = shown(settings, Vec3::ZERO, &scene);
    c.tick(FRAME);
    let cam = scene.camera.get();
    let px = cam
        .world_to_screen(c.node().unwrap().pose.translation)
        .unwrap();
    assert!((px - Vec2::new(1920.0 - 96.0, 1080.0 - 96.0)).length() < 0.5, "px {px:?}");
}

/// it should hide while off-screen and reappear on re-entry
#[test]
fn disable_on_exit_tracks_visibility() {
    let scene = scene();
    let settings = WorldGraphicSettings {
        default_edge_behaviour: EdgeBehaviour::DisableOnExit,
        ..WorldGraphicSettings::default()
    };
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    c.tick(FRAME);
    assert!(c.node().unwrap().visible);

    scene.camera.set(CameraView {
        rotation: Quat::from_rotation_y(std::f32::consts::PI),
        ..CameraView::default()
    });
    c.tick(FRAME);
    assert!(c.is_off_screen());
    assert!(!c.node().unwrap().visible);

    scene.camera.set(CameraView::default());
    c.tick(FRAME);
    assert!(!c.is_off_screen());
    assert!(c.node().unwrap().visible);
}

/// it should shrink the on-screen frame by the edge padding
#[test]
fn edge_padding_counts_near_edge_as_off_screen() {
    // Projects to roughly x = 1898px on a 1920px-wide viewport.
    let near_edge = Vec3::new(3.6, 0.0, -5.0);
    let scene = scene();

    let mut unpadded = shown(
        WorldGraphicSettings {
            default_edge_behaviour: EdgeBehaviour::DisableOnExit,
            ..WorldGraphicSettings::default()
        },
        near_edge,
        &scene,
    );
    unpadded.tick(FRAME);
    assert!(!unpadded.is_off_screen());

    let mut padded = shown(
        WorldGraphicSettings {
            default_edge_behaviour: EdgeBehaviour::DisableOnExit,
            screen_edge_padding: 50.0,
            ..WorldGraphicSettings::default()
        },
        near_edge,
        &scene,
    );
    padded.tick(FRAME);
    assert!(padded.is_off_screen());
}

/// it should let a per-marker edge behaviour override the settings default
#[test]
fn edge_behaviour_override() {
    let scene = scene();
    let step = TutorialStep::new("s", InteractionType::Tap).into_handle();
    let mut c = WorldGraphicController::new(
        MarkerId(5),
        Some(Arc::new(WorldGraphicSettings::default())),
        node_at(Vec3::new(0.0, 0.0, 5.0)),
    )
    .with_edge_behaviour(EdgeBehaviour::DisableOnExit);
    c.initialize(Some(step.clone()), Some(scene)).unwrap();
    c.show(step);
    c.tick(FRAME);
    assert!(c.is_off_screen());
}

/// it should spin about the configured axis from the idle-entry rotation
#[test]
fn rotate_spin_overrides_billboard() {
    let scene = scene();
    scene.camera.set(CameraView {
        rotation: Quat::from_rotation_y(0.5),
        ..CameraView::default()
    });
    let settings = idle_now(WorldGraphicSettings {
        face_to_camera: true,
        idle: IdleSettings {
            animation: IdleAnimation::RotateSpin,
            spin_speed: 90.0,
            spin_axis: Vec3::Y,
            ..IdleSettings::default()
        },
        ..WorldGraphicSettings::default()
    });
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    c.tick(FRAME);
    assert_eq!(c.phase(), MarkerPhase::Idle);
    assert!(same_rotation(c.node().unwrap().pose.rotation, Quat::IDENTITY));

    c.tick(1.0);
    assert!(same_rotation(
        c.node().unwrap().pose.rotation,
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
    ));
}

/// it should disappear from the spun orientation instead of snapping back
#[test]
fn hide_keeps_rotate_spin_orientation() {
    use std::f32::consts::{FRAC_PI_2, PI};

    let scene = scene();
    let spinning = |disappear_animation| WorldGraphicSettings {
        appear_animation: WorldAnimation::None,
        disappear_animation,
        disappear_duration: 0.3,
        spin_revolutions: 1,
        face_to_camera: false,
        idle: IdleSettings {
            animation: IdleAnimation::RotateSpin,
            spin_speed: 90.0,
            spin_axis: Vec3::Y,
            ..IdleSettings::default()
        },
        ..WorldGraphicSettings::default()
    };

    let mut zoom = shown(spinning(WorldAnimation::Zoom), Vec3::new(0.0, 0.0, -5.0), &scene);
    zoom.tick(FRAME);
    zoom.tick(1.0);
    let spun = zoom.node().unwrap().pose.rotation;
    assert!(same_rotation(spun, Quat::from_rotation_y(FRAC_PI_2)));
    zoom.hide();
    zoom.tick(FRAME);
    assert_eq!(zoom.phase(), MarkerPhase::Disappearing);
    assert!(same_rotation(zoom.node().unwrap().pose.rotation, spun));

    let mut twirl = shown(
        spinning(WorldAnimation::ZoomAndRotate),
        Vec3::new(0.0, 0.0, -5.0),
        &scene,
    );
    twirl.tick(FRAME);
    twirl.tick(1.0);
    twirl.hide();
    twirl.tick(0.15);
    assert_abs_diff_eq!(twirl.spin_degrees(), 180.0, epsilon = 1e-3);
    assert!(same_rotation(
        twirl.node().unwrap().pose.rotation,
        Quat::from_rotation_y(FRAC_PI_2 + PI)
    ));
}

/// it should suppress blinking while off-screen
#[test]
fn blink_is_force_shown_off_screen() {
    let scene = scene();
    let settings = idle_now(WorldGraphicSettings {
        default_edge_behaviour: EdgeBehaviour::DisableOnExit,
        idle: IdleSettings {
            animation: IdleAnimation::Blink,
            blink_interval: 0.5,
            ..IdleSettings::default()
        },
        ..WorldGraphicSettings::default()
    });
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    c.tick(FRAME);
    c.tick(0.5);
    assert!(c.node().unwrap().layers.iter().all(|l| !l.visible));

    scene.camera.set(CameraView {
        rotation: Quat::from_rotation_y(std::f32::consts::PI),
        ..CameraView::default()
    });
    c.tick(FRAME);
    let n = c.node().unwrap();
    assert!(!n.visible);
    assert!(n.layers.iter().all(|l| l.visible));

    // Still off-screen: the blink clock does not run.
    c.tick(2.0);
    assert!(c.node().unwrap().layers.iter().all(|l| l.visible));
}

/// it should levitate relative to the camera-placed position
#[test]
fn levitate_follows_front_of_camera_base() {
    let scene = scene();
    let settings = idle_now(WorldGraphicSettings {
        placement_behaviour: PlacementBehaviour::FrontOfCamera,
        front_camera_distance: 2.0,
        idle: IdleSettings {
            animation: IdleAnimation::Levitate,
            levitation_range: 0.1,
            levitation_speed: 2.0,
            ..IdleSettings::default()
        },
        ..WorldGraphicSettings::default()
    });
    let mut c = shown(settings, Vec3::ZERO, &scene);
    c.tick(FRAME);
    scene.camera.set(CameraView {
        position: Vec3::new(5.0, 0.0, 0.0),
        ..CameraView::default()
    });
    for _ in 0..30 {
        c.tick(FRAME);
        let t = c.node().unwrap().pose.translation;
        assert_abs_diff_eq!(t.x, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(t.z, -2.0, epsilon = 1e-4);
        assert!(t.y >= -1e-4 && t.y <= 0.1 + 1e-4);
    }
}

/// it should keep a world pulse centred on the baseline scale
#[test]
fn world_pulse_stays_centred() {
    let scene = scene();
    let settings = idle_now(WorldGraphicSettings {
        idle: IdleSettings {
            animation: IdleAnimation::Pulse,
            pulse_delta: 0.2,
            pulse_speed: 3.0,
            ..IdleSettings::default()
        },
        ..WorldGraphicSettings::default()
    });
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    let (mut lo, mut hi) = (f32::MAX, f32::MIN);
    for _ in 0..600 {
        c.tick(FRAME);
        let s = c.node().unwrap().pose.scale.x;
        lo = lo.min(s);
        hi = hi.max(s);
    }
    assert!(lo >= 0.8 - 1e-4 && hi <= 1.2 + 1e-4);
    assert!(hi > 1.05 && lo < 0.95, "pulse barely moved: {lo}..{hi}");
}

/// it should breathe alpha without exceeding the captured value
#[test]
fn world_fade_idle_breathes() {
    let scene = scene();
    let settings = idle_now(WorldGraphicSettings {
        idle: IdleSettings {
            animation: IdleAnimation::Fade,
            fade_duration: 1.0,
            ..IdleSettings::default()
        },
        ..WorldGraphicSettings::default()
    });
    let mut c = shown(settings, Vec3::new(0.0, 0.0, -5.0), &scene);
    for _ in 0..120 {
        c.tick(FRAME);
        let a = c.node().unwrap().layers[0].color.w;
        assert!((0.5 - 1e-4..=1.0 + 1e-4).contains(&a), "alpha {a}");
    }
}

/// it should zoom out from the current scale and then release the node
#[test]
fn world_hide_destroys_after_zoom_out() {
    let scene = scene();
    let mut c = shown(
        WorldGraphicSettings::default(),
        Vec3::new(0.0, 0.0, -5.0),
        &scene,
    );
    for _ in 0..30 {
        c.tick(FRAME);
    }
    assert_eq!(c.phase(), MarkerPhase::Idle);
    c.hide();
    assert_eq!(c.phase(), MarkerPhase::Disappearing);
    for _ in 0..30 {
        c.tick(FRAME);
    }
    assert!(c.is_destroyed());
    assert_eq!(c.phase(), MarkerPhase::Destroyed);
}

/// it should never let decorative layers take hits
#[test]
fn decorative_world_layers_are_not_hit_testable() {
    let scene = scene();
    let c = shown(
        WorldGraphicSettings::default(),
        Vec3::new(0.0, 0.0, -5.0),
        &scene,
    );
    let n = c.node().unwrap();
    assert!(n.layers[0].hit_testable);
    assert!(!n.layers[1].hit_testable);
}
