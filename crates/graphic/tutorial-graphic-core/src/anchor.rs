//! Nine-way anchors for canvas placement, slide corners and viewport pinning.
//!
//! Canvas coordinates are centered with +Y up; viewport coordinates span
//! `[0,1] x [0,1]` with the origin at the bottom-left.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unit direction of a nine-way position: each axis in {-1, 0, 1}.
fn nine_way_direction(column: i8, row: i8) -> Vec2 {
    Vec2::new(column as f32, row as f32)
}

macro_rules! nine_way {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            TopLeft,
            TopCenter,
            TopRight,
            MiddleLeft,
            #[default]
            Center,
            MiddleRight,
            BottomLeft,
            BottomCenter,
            BottomRight,
        }

        impl $name {
            /// Axis signs: x in {-1 left, 0, 1 right}, y in {-1 bottom, 0, 1 top}.
            pub fn direction(self) -> Vec2 {
                match self {
                    $name::TopLeft => nine_way_direction(-1, 1),
                    $name::TopCenter => nine_way_direction(0, 1),
                    $name::TopRight => nine_way_direction(1, 1),
                    $name::MiddleLeft => nine_way_direction(-1, 0),
                    $name::Center => nine_way_direction(0, 0),
                    $name::MiddleRight => nine_way_direction(1, 0),
                    $name::BottomLeft => nine_way_direction(-1, -1),
                    $name::BottomCenter => nine_way_direction(0, -1),
                    $name::BottomRight => nine_way_direction(1, -1),
                }
            }
        }
    };
}

nine_way!(
    /// Where a screen marker sits on the canvas when not using current anchors.
    ScreenAnchor
);

nine_way!(
    /// Off-canvas corner a slide transition starts from or ends at.
    ScreenCorner
);

nine_way!(
    /// Viewport pin for front-of-camera world markers.
    ViewportAnchor
);

impl ScreenAnchor {
    /// Centered canvas position for this anchor plus a pixel offset.
    pub fn position(self, canvas_size: Vec2, offset: Vec2) -> Vec2 {
        self.direction() * canvas_size * 0.5 + offset
    }
}

impl ScreenCorner {
    /// Canvas position pushed outward past the canvas edge by `edge_offset` px.
    pub fn position(self, canvas_size: Vec2, edge_offset: f32) -> Vec2 {
        let dir = self.direction();
        dir * (canvas_size * 0.5 + Vec2::splat(edge_offset))
    }
}

impl ViewportAnchor {
    /// Viewport point for this anchor, inset by `margin_px` on every pinned axis.
    ///
    /// Corners are inset on both axes, edge anchors only on the axis they pin,
    /// the center not at all.
    pub fn viewport_point(self, viewport_px: Vec2, margin_px: f32) -> Vec2 {
        let dir = self.direction();
        let margin = Vec2::new(
            if viewport_px.x > 0.0 { margin_px / viewport_px.x } else { 0.0 },
            if viewport_px.y > 0.0 { margin_px / viewport_px.y } else { 0.0 },
        );
        // -1 -> 0 + m, 0 -> 0.5, 1 -> 1 - m
        let base = (dir + Vec2::ONE) * 0.5;
        base - dir * margin
    }
}
