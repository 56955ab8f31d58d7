mod renderer;
mod scene_graph;
mod transform;

pub use renderer::{DrawCommand, LineMesh, RecordingRenderer, Renderer};
pub use scene_graph::{render_world, WalkError};
pub use transform::compose;
