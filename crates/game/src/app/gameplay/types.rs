#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ScenarioConfig {
    #[serde(default = "default_scenario_seed")]
    seed: u64,
    #[serde(default)]
    desired: BTreeMap<ResourceKind, u32>,
    entities: Vec<EntityPlacement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct EntityPlacement {
    kind: String,
    position: [f32; 3],
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default)]
    resources: BTreeMap<ResourceKind, u32>,
    #[serde(default)]
    health: Option<u32>,
}

impl EntityPlacement {
    fn at(kind: &str, position: [f32; 3]) -> Self {
        Self {
            kind: kind.to_string(),
            position,
            rotation: [0.0; 3],
            resources: BTreeMap::new(),
            health: None,
        }
    }

    fn with_resource(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.resources.insert(kind, amount);
        self
    }

    fn with_health(mut self, health: u32) -> Self {
        self.health = Some(health);
        self
    }

    fn to_seed(&self) -> EntitySeed {
        let mut seed = EntitySeed::new(&self.kind, Vec3::from_array(self.position))
            .with_rotation(Vec3::from_array(self.rotation));
        for (&kind, &amount) in &self.resources {
            seed = seed.with_resource(kind, amount);
        }
        if let Some(health) = self.health {
            seed = seed.with_tree_health(health);
        }
        seed
    }
}

fn default_scenario_seed() -> u64 {
    DEFAULT_SCENARIO_SEED
}

/// The settlement used when no scenario file is given: three workers, three
/// empty stockpiles, and one source of each raw good.
fn default_scenario() -> ScenarioConfig {
    ScenarioConfig {
        seed: DEFAULT_SCENARIO_SEED,
        desired: BTreeMap::from([
            (ResourceKind::Berry, 1),
            (ResourceKind::Stone, 1),
            (ResourceKind::Wood, 1),
        ]),
        entities: vec![
            EntityPlacement::at(WORKER_KIND, [4.0, 0.0, 2.0]),
            EntityPlacement::at(WORKER_KIND, [4.0, 0.0, 3.0]),
            EntityPlacement::at(WORKER_KIND, [4.0, 0.0, 4.0]),
            EntityPlacement::at(STOCKPILE_KIND, [-1.0, 0.0, 3.0]),
            EntityPlacement::at(STOCKPILE_KIND, [0.0, 0.0, 3.0]),
            EntityPlacement::at(STOCKPILE_KIND, [1.0, 0.0, 3.0]),
            EntityPlacement::at(GROUND_KIND, [0.0, 0.0, 0.0]),
            EntityPlacement::at(BUSH_KIND, [2.0, 0.0, -2.0]).with_resource(ResourceKind::Berry, 10),
            EntityPlacement::at(ROCK_KIND, [0.0, 0.0, -2.0]).with_resource(ResourceKind::Stone, 10),
            EntityPlacement::at(TREE_KIND, [-2.0, 0.0, -2.0])
                .with_resource(ResourceKind::Wood, 10)
                .with_health(2),
        ],
    }
}

fn load_scenario_file(path: &Path) -> Result<ScenarioConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read scenario '{}': {error}", path.display()))?;
    parse_scenario_json(&raw)
}

fn parse_scenario_json(raw: &str) -> Result<ScenarioConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, ScenarioConfig>(&mut deserializer) {
        Ok(scenario) => Ok(scenario),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse scenario json: {source}"))
            } else {
                Err(format!("parse scenario json at {path}: {source}"))
            }
        }
    }
}

fn validate_scenario(scenario: &ScenarioConfig, library: &ModelLibrary) -> Result<(), String> {
    for placement in &scenario.entities {
        if !library.contains(&placement.kind) {
            return Err(format!(
                "scenario entity kind '{}' has no model",
                placement.kind
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WorkEvent {
    JobStarted {
        worker: EntityId,
        job: Job,
    },
    ResourceHarvested {
        worker: EntityId,
        source: EntityId,
        resource: ResourceKind,
    },
    ItemPickedUp {
        worker: EntityId,
        item: EntityId,
    },
    ItemDroppedOff {
        worker: EntityId,
        stockpile: EntityId,
        resource: ResourceKind,
    },
    TreeImpacted {
        tree: EntityId,
        health_left: u32,
    },
    TreeFelled {
        tree: EntityId,
    },
    WoodScattered {
        tree: EntityId,
        count: usize,
    },
    TreeVanished {
        tree: EntityId,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WorkEventCounts {
    jobs_started: u32,
    resources_harvested: u32,
    items_picked_up: u32,
    items_dropped_off: u32,
    trees_impacted: u32,
    trees_felled: u32,
    wood_scattered: u32,
    trees_vanished: u32,
}

impl WorkEventCounts {
    fn record(&mut self, event: &WorkEvent) {
        let slot = match event {
            WorkEvent::JobStarted { .. } => &mut self.jobs_started,
            WorkEvent::ResourceHarvested { .. } => &mut self.resources_harvested,
            WorkEvent::ItemPickedUp { .. } => &mut self.items_picked_up,
            WorkEvent::ItemDroppedOff { .. } => &mut self.items_dropped_off,
            WorkEvent::TreeImpacted { .. } => &mut self.trees_impacted,
            WorkEvent::TreeFelled { .. } => &mut self.trees_felled,
            WorkEvent::WoodScattered { .. } => &mut self.wood_scattered,
            WorkEvent::TreeVanished { .. } => &mut self.trees_vanished,
        };
        *slot = slot.saturating_add(1);
    }

    fn total(&self) -> u32 {
        self.jobs_started
            .saturating_add(self.resources_harvested)
            .saturating_add(self.items_picked_up)
            .saturating_add(self.items_dropped_off)
            .saturating_add(self.trees_impacted)
            .saturating_add(self.trees_felled)
            .saturating_add(self.wood_scattered)
            .saturating_add(self.trees_vanished)
    }
}

/// Per-tick buffer of scheduler events. Events accumulate during the tick and
/// roll into `last_tick_counts` at the end of it.
#[derive(Debug, Default)]
struct WorkEventLog {
    current_tick: Vec<WorkEvent>,
    last_tick_counts: WorkEventCounts,
}

impl WorkEventLog {
    fn emit(&mut self, event: WorkEvent) {
        self.current_tick.push(event);
    }

    fn current_tick_events(&self) -> &[WorkEvent] {
        &self.current_tick
    }

    fn last_tick_counts(&self) -> WorkEventCounts {
        self.last_tick_counts
    }

    fn finish_tick_rollover(&mut self) {
        let mut counts = WorkEventCounts::default();
        for event in &self.current_tick {
            counts.record(event);
        }
        self.last_tick_counts = counts;
        self.current_tick.clear();
    }
}
