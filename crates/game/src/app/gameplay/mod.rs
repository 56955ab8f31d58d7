use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fs;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use hamlet_engine::{
    render_world, AnimationClock, Attach, Color, CubicPath, Entity, EntityId, EntitySeed, Job,
    LineMesh, MeshRef, ModelDef, ModelError, ModelLibrary, PartDef, PathTransform, Renderer,
    ResourceKind, Scene, SceneCommand, SceneWorld, TreeBehavior, TreeState,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, error, info};

const WORKER_KIND: &str = "Worker";
const TREE_KIND: &str = "Tree";
const STOCKPILE_KIND: &str = "Stockpile";
const BUSH_KIND: &str = "Bush";
const ROCK_KIND: &str = "Rock";
const GROUND_KIND: &str = "Ground";
const WALK_ANIMATION: &str = "walk";
const CARRY_ANIMATION: &str = "carry";
const IDLE_ANIMATION: &str = "idle";
const GATHER_ANIMATION: &str = "gather";
const SWING_ANIMATION: &str = "swing";
const IMPACT_ANIMATION: &str = "impact";
const FELL_ANIMATION: &str = "fell";
const SINK_ANIMATION: &str = "sink";
const WALK_SPEED_UNITS_PER_MS: f32 = 0.001;
const TURN_SPEED_RADIANS_PER_MS: f32 = 0.004;
const RAMP_SHARPNESS: f32 = 10.0;
const SEPARATION_STRENGTH: f32 = 10.0;
const STOCKPILE_MAX_ITEMS: usize = 9;
const CARRY_STACK_GAP: f32 = 0.05;
const PICKUP_DELAY_MS: f32 = 500.0;
const UNLOAD_DELAY_MS: f32 = 500.0;
const TREE_IMPACT_DELAY_MS: f32 = 500.0;
const TREE_FELL_DELAY_MS: f32 = 2000.0;
const TREE_SINK_DELAY_MS: f32 = 2000.0;
const FELLED_WOOD_COUNT: usize = 8;
const FELLED_WOOD_RING_RADIUS: f32 = 1.5;
const PILE_YAW_JITTER_RANGE: f32 = 0.15;
const GRID_HALF_CELLS: u32 = 10;
const DEFAULT_SCENARIO_SEED: u64 = 7;
const WORKER_STEP_ORDER_TEXT: &str =
    "DelayCountdown>HarvestReevaluation>DropOffBookkeeping>IdlePromotion>MoveOrAct";

include!("types.rs");
include!("models.rs");
include!("stockpile.rs");
include!("systems.rs");
include!("scene_impl.rs");
include!("util.rs");

pub(crate) fn build_game(
    scenario_path: Option<PathBuf>,
) -> Result<(Box<dyn Scene>, SceneWorld), String> {
    let scenario = match scenario_path {
        Some(path) => load_scenario_file(&path)?,
        None => default_scenario(),
    };
    let library =
        build_model_library().map_err(|error| format!("build model library: {error}"))?;
    validate_scenario(&scenario, &library)?;
    let world = SceneWorld::new(library);
    let scene = GameplayScene::new(scenario);
    Ok((Box::new(scene), world))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
