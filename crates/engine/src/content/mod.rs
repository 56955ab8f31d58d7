mod library;
mod model;

pub use library::{ModelError, ModelLibrary};
pub use model::{
    AnimationDef, Attach, Color, CubicPath, MeshRef, ModelDef, PartDef, PathTransform,
};
