pub mod anim;
pub mod app;
pub mod content;

pub use anim::{advance_clock, AnimationClock, OverrunPolicy};
pub use app::{
    compose, render_world, run_sim, DrawCommand, Entity, EntityId, EntitySeed, Job, LineMesh,
    RecordingRenderer, Renderer, ResourceKind, Scene, SceneCommand, SceneWorld, SimConfig,
    SimError, SimMetricsSnapshot, SimReport, TreeBehavior, TreeState, WalkError,
};
pub use content::{
    AnimationDef, Attach, Color, CubicPath, MeshRef, ModelDef, ModelError, ModelLibrary, PartDef,
    PathTransform,
};
