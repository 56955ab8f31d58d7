mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use loop_runner::{run_sim, SimConfig, SimError, SimReport};
pub use metrics::SimMetricsSnapshot;
pub use rendering::{
    compose, render_world, DrawCommand, LineMesh, RecordingRenderer, Renderer, WalkError,
};
pub use scene::{
    Entity, EntityId, EntitySeed, Job, ResourceKind, Scene, SceneCommand, SceneWorld,
    TreeBehavior, TreeState,
};
