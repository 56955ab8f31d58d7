/// Scene driving the worker settlement: job scheduling, tree felling, and
/// the per-tick work-event log.
struct GameplayScene {
    scenario: ScenarioConfig,
    rng: StdRng,
    events: WorkEventLog,
    pending_impacts: Vec<EntityId>,
}

impl GameplayScene {
    fn new(scenario: ScenarioConfig) -> Self {
        let rng = StdRng::seed_from_u64(scenario.seed);
        Self {
            scenario,
            rng,
            events: WorkEventLog::default(),
            pending_impacts: Vec::new(),
        }
    }

    /// External chop input. The hit lands when the scheduler next runs.
    #[allow(dead_code)]
    fn queue_impact(&mut self, tree: EntityId) {
        self.pending_impacts.push(tree);
    }

    fn goals_met(&self, world: &SceneWorld) -> bool {
        if self.scenario.desired.is_empty() {
            return false;
        }
        let stored = count_stored_goods(world);
        self.scenario
            .desired
            .iter()
            .all(|(kind, &wanted)| stored.get(kind).copied().unwrap_or(0) >= wanted)
    }
}

impl Scene for GameplayScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.rng = StdRng::seed_from_u64(self.scenario.seed);
        self.events = WorkEventLog::default();
        self.pending_impacts.clear();
        for placement in &self.scenario.entities {
            world.spawn(placement.to_seed());
        }
        world.apply_pending();
        info!(
            entity_count = world.entity_count(),
            desired_kinds = self.scenario.desired.len(),
            step_order = WORKER_STEP_ORDER_TEXT,
            "scene_loaded"
        );
    }

    fn update(&mut self, dt_ms: f32, world: &mut SceneWorld) -> SceneCommand {
        apply_queued_impacts(&mut self.pending_impacts, world);
        let mut ctx = SchedulerContext {
            dt_ms,
            world: &mut *world,
            desired: &self.scenario.desired,
            rng: &mut self.rng,
            events: &mut self.events,
            pending_impacts: &mut self.pending_impacts,
        };
        run_scheduler(&mut ctx);
        world.advance_clocks(dt_ms);
        self.events.finish_tick_rollover();

        let counts = self.events.last_tick_counts();
        if counts.total() > 0 {
            debug!(
                jobs_started = counts.jobs_started,
                harvested = counts.resources_harvested,
                picked_up = counts.items_picked_up,
                dropped_off = counts.items_dropped_off,
                trees_impacted = counts.trees_impacted,
                trees_felled = counts.trees_felled,
                "work_events"
            );
        }
        if self.goals_met(world) {
            info!("scenario_complete");
            return SceneCommand::Stop;
        }
        SceneCommand::None
    }

    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn Renderer) {
        renderer.draw_lines(
            LineMesh::Grid {
                half_cells: GRID_HALF_CELLS,
            },
            Color::rgb(0.5, 0.5, 0.5),
            Mat4::IDENTITY,
        );
        if let Err(error) = render_world(world, renderer) {
            error!(error = %error, "render_failed");
        }
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        world.clear();
        self.events = WorkEventLog::default();
        self.pending_impacts.clear();
        info!("scene_unloaded");
    }
}
