use std::path::PathBuf;

use hamlet_engine::{RecordingRenderer, Scene, SceneWorld, SimConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay;

const SCENARIO_ENV_VAR: &str = "HAMLET_SCENARIO";
const DEMO_MAX_TICKS: u64 = 3600;

pub(crate) struct AppWiring {
    pub(crate) config: SimConfig,
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) world: SceneWorld,
    pub(crate) renderer: RecordingRenderer,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Hamlet Startup ===");

    let scenario_path = scenario_path_from_env();
    if let Some(path) = &scenario_path {
        info!(path = %path.display(), "scenario_override");
    }
    let (scene, world) = gameplay::build_game(scenario_path)?;
    let config = SimConfig {
        max_ticks: DEMO_MAX_TICKS,
        ..SimConfig::default()
    };

    Ok(AppWiring {
        config,
        scene,
        world,
        renderer: RecordingRenderer::new(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn scenario_path_from_env() -> Option<PathBuf> {
    std::env::var_os(SCENARIO_ENV_VAR)
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
