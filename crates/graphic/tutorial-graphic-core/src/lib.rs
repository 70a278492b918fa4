//! Tutorial Graphic Core (engine-agnostic)
//!
//! Per-marker state machines that animate transient tutorial markers: a
//! screen-space overlay controller and a world-space controller. Both share
//! one lifecycle (`initialize`, `show`, `hide`, `tick`, `destroy`), one
//! interpolated-property animator and one idle engine. Hosts drive them with
//! a per-frame `dt` and read node state back to render.

pub mod anchor;
pub mod animator;
pub mod dwell;
pub mod error;
pub mod idle;
pub mod ids;
pub mod interp;
pub mod node;
pub mod outputs;
pub mod scene;
pub mod screen;
pub mod sequencer;
pub mod settings;
pub mod state;
pub mod step;
pub mod tolerances;
pub mod world;

// Re-exports for consumers (adapters)
pub use anchor::{ScreenAnchor, ScreenCorner, ViewportAnchor};
pub use animator::{Accessor, AlphaTrack, PropertyTrack, TransitionClock};
pub use error::GraphicError;
pub use ids::{IdAllocator, MarkerId};
pub use node::{ColorLayers, Pose, ScreenNode, TextLayer, VisualLayer, WorldNode};
pub use outputs::{MarkerEvent, MarkerEvents};
pub use scene::{CameraHandle, CameraView, SceneReferences};
pub use screen::{ConfirmButton, ScreenGraphicController, ScreenPlacement};
pub use sequencer::{Marker, MarkerSpec, SequencerFrame, StepDefinition, TutorialSequencer};
pub use settings::{
    parse_graphic_settings_json, parse_world_graphic_settings_json, EdgeBehaviour,
    GraphicSettings, IdleAnimation, IdleSettings, PlacementBehaviour, ScreenAnimation,
    WorldAnimation, WorldGraphicSettings,
};
pub use state::{MarkerPhase, MarkerVisualState};
pub use step::{InteractionType, LocalizedText, StepHandle, TutorialStep};
pub use world::WorldGraphicController;
