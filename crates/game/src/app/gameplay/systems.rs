#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerStep {
    DelayCountdown,
    HarvestReevaluation,
    DropOffBookkeeping,
    IdlePromotion,
    MoveOrAct,
}

impl WorkerStep {
    #[cfg(test)]
    fn name(self) -> &'static str {
        match self {
            Self::DelayCountdown => "DelayCountdown",
            Self::HarvestReevaluation => "HarvestReevaluation",
            Self::DropOffBookkeeping => "DropOffBookkeeping",
            Self::IdlePromotion => "IdlePromotion",
            Self::MoveOrAct => "MoveOrAct",
        }
    }
}

const WORKER_STEP_ORDER: [WorkerStep; 5] = [
    WorkerStep::DelayCountdown,
    WorkerStep::HarvestReevaluation,
    WorkerStep::DropOffBookkeeping,
    WorkerStep::IdlePromotion,
    WorkerStep::MoveOrAct,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Continue,
    Halt,
}

struct SchedulerContext<'a> {
    dt_ms: f32,
    world: &'a mut SceneWorld,
    desired: &'a BTreeMap<ResourceKind, u32>,
    rng: &'a mut StdRng,
    events: &'a mut WorkEventLog,
    pending_impacts: &'a mut Vec<EntityId>,
}

/// One scheduler pass: steering first, then each entity in id order. A
/// worker runs its steps until one halts; a tree advances its felling state.
fn run_scheduler(ctx: &mut SchedulerContext<'_>) {
    apply_separation_steering(ctx.world);

    let mut ids: Vec<EntityId> = ctx.world.entities().iter().map(|entity| entity.id).collect();
    ids.sort_by_key(|id| id.0);

    for id in ids {
        let Some(entity) = ctx.world.find_entity(id) else {
            continue;
        };
        let is_worker = entity.kind == WORKER_KIND;
        let is_tree = entity.tree.is_some();
        if is_worker {
            for step in WORKER_STEP_ORDER {
                if run_worker_step(step, id, ctx) == StepOutcome::Halt {
                    break;
                }
            }
        } else if is_tree {
            run_tree_step(id, ctx);
        }
    }
}

fn run_worker_step(step: WorkerStep, id: EntityId, ctx: &mut SchedulerContext<'_>) -> StepOutcome {
    match step {
        WorkerStep::DelayCountdown => delay_countdown_step(id, ctx),
        WorkerStep::HarvestReevaluation => harvest_reevaluation_step(id, ctx),
        WorkerStep::DropOffBookkeeping => drop_off_bookkeeping_step(id, ctx),
        WorkerStep::IdlePromotion => idle_promotion_step(id, ctx),
        WorkerStep::MoveOrAct => move_or_act_step(id, ctx),
    }
}

fn set_job(worker: &mut Entity, job: Job, events: &mut WorkEventLog) {
    if worker.job == job {
        return;
    }
    debug!(worker_id = worker.id.0, job = job.label(), "job_started");
    worker.job = job;
    events.emit(WorkEvent::JobStarted {
        worker: worker.id,
        job,
    });
}

/// Pairwise push-apart between workers. Weights are computed against the
/// positions captured before any worker moves this tick.
fn apply_separation_steering(world: &mut SceneWorld) {
    let workers: Vec<(EntityId, Vec3)> = world
        .entities()
        .iter()
        .filter(|entity| entity.kind == WORKER_KIND)
        .map(|entity| (entity.id, entity.position))
        .collect();

    for &(id, position) in &workers {
        let mut avoid = Vec3::ZERO;
        for &(other_id, other_position) in &workers {
            if other_id == id {
                continue;
            }
            let apart = Vec3::new(
                position.x - other_position.x,
                0.0,
                position.z - other_position.z,
            );
            let distance = apart.length();
            if distance <= f32::EPSILON {
                continue;
            }
            avoid += apart / distance * SEPARATION_STRENGTH * (1.0 - distance.tanh());
        }
        if let Some(worker) = world.find_entity_mut(id) {
            worker.avoid = avoid;
        }
    }
}

fn delay_countdown_step(id: EntityId, ctx: &mut SchedulerContext<'_>) -> StepOutcome {
    let Some(worker) = ctx.world.find_entity_mut(id) else {
        return StepOutcome::Halt;
    };
    if worker.delay_ms > 0.0 {
        worker.delay_ms = (worker.delay_ms - ctx.dt_ms).max(0.0);
        return StepOutcome::Halt;
    }
    StepOutcome::Continue
}

fn harvest_reevaluation_step(id: EntityId, ctx: &mut SchedulerContext<'_>) -> StepOutcome {
    let Some(worker) = ctx.world.find_entity(id) else {
        return StepOutcome::Halt;
    };
    if !matches!(worker.job, Job::Harvest { .. }) {
        return StepOutcome::Continue;
    }

    let claimed = count_claimed_goods(ctx.world);
    let next_short = ctx
        .desired
        .iter()
        .find(|&(kind, &wanted)| wanted > claimed.get(kind).copied().unwrap_or(0))
        .map(|(&kind, _)| kind);

    let job = match next_short {
        Some(resource) if arena_supply(ctx.world, resource) > 0 => Job::Harvest {
            resource: Some(resource),
        },
        _ => Job::DropOff,
    };
    if let Some(worker) = ctx.world.find_entity_mut(id) {
        set_job(worker, job, ctx.events);
    }
    StepOutcome::Continue
}

fn drop_off_bookkeeping_step(id: EntityId, ctx: &mut SchedulerContext<'_>) -> StepOutcome {
    let Some(worker) = ctx.world.find_entity_mut(id) else {
        return StepOutcome::Halt;
    };
    if worker.job != Job::DropOff {
        return StepOutcome::Continue;
    }
    let carrying_clock = worker
        .animation
        .as_ref()
        .is_some_and(|clock| clock.name == CARRY_ANIMATION);
    if !carrying_clock {
        worker.animation = Some(AnimationClock::start(CARRY_ANIMATION));
    }
    if worker.carry.is_empty() {
        set_job(worker, Job::Idle, ctx.events);
        worker.animation = Some(AnimationClock::start(IDLE_ANIMATION));
    }
    StepOutcome::Continue
}

fn idle_promotion_step(id: EntityId, ctx: &mut SchedulerContext<'_>) -> StepOutcome {
    let Some(worker) = ctx.world.find_entity_mut(id) else {
        return StepOutcome::Halt;
    };
    if worker.job == Job::Idle {
        set_job(worker, Job::Harvest { resource: None }, ctx.events);
    }
    StepOutcome::Continue
}

fn move_or_act_step(id: EntityId, ctx: &mut SchedulerContext<'_>) -> StepOutcome {
    let world = &*ctx.world;
    let Some(worker) = world.find_entity(id) else {
        return StepOutcome::Halt;
    };
    let Some(target_id) = select_target(worker, world) else {
        return StepOutcome::Continue;
    };
    let Some(target) = world.find_entity(target_id) else {
        return StepOutcome::Continue;
    };
    let Ok(worker_model) = world.library().get(&worker.kind) else {
        return StepOutcome::Continue;
    };
    let Ok(target_model) = world.library().get(&target.kind) else {
        return StepOutcome::Continue;
    };
    let arrival_radius = worker_model.bounds.x + target_model.bounds.x;
    let to_target = Vec3::new(
        target.position.x - worker.position.x,
        0.0,
        target.position.z - worker.position.z,
    );
    let distance = to_target.length();
    let goal = to_target.normalize_or_zero() + worker.avoid;

    turn_toward(id, goal, ctx);
    if distance > arrival_radius {
        step_forward(id, distance, ctx);
        StepOutcome::Continue
    } else {
        perform_job_action(id, target_id, ctx)
    }
}

fn select_target(worker: &Entity, world: &SceneWorld) -> Option<EntityId> {
    match worker.job {
        Job::Idle | Job::Harvest { resource: None } => None,
        Job::Harvest {
            resource: Some(resource),
        } => closest_to(worker, world, |candidate| {
            candidate.resource_count(resource) > 0
        }),
        Job::PickUp => match worker.carry.first() {
            Some(first) => {
                let wanted = first.kind.clone();
                closest_to(worker, world, move |candidate| candidate.kind == wanted)
            }
            None => closest_to(worker, world, |candidate| {
                candidate.kind == ResourceKind::Wood.as_str()
                    || candidate.kind == ResourceKind::Stone.as_str()
            }),
        },
        Job::DropOff => {
            let wanted = worker.carry.first().map(|item| item.kind.clone())?;
            let matching = closest_to(worker, world, |candidate| {
                candidate.kind == STOCKPILE_KIND
                    && candidate.pile.len() < STOCKPILE_MAX_ITEMS
                    && candidate
                        .pile
                        .first()
                        .is_some_and(|head| head.kind == wanted)
            });
            matching.or_else(|| {
                closest_to(worker, world, |candidate| {
                    candidate.kind == STOCKPILE_KIND && candidate.pile.is_empty()
                })
            })
        }
    }
}

fn turn_toward(id: EntityId, goal: Vec3, ctx: &mut SchedulerContext<'_>) {
    let Some(worker) = ctx.world.find_entity_mut(id) else {
        return;
    };
    let desired_yaw = (-goal.z).atan2(goal.x);
    let turn = delta_angle(worker.rotation.y, desired_yaw);
    worker.rotation.y += tanh_ramp(turn) * TURN_SPEED_RADIANS_PER_MS * ctx.dt_ms;
}

fn step_forward(id: EntityId, distance: f32, ctx: &mut SchedulerContext<'_>) {
    let Some(worker) = ctx.world.find_entity_mut(id) else {
        return;
    };
    let step = tanh_ramp(distance) * WALK_SPEED_UNITS_PER_MS * ctx.dt_ms;
    let yaw = worker.rotation.y;
    worker.position.x += yaw.cos() * step;
    worker.position.z -= yaw.sin() * step;

    let resting = worker
        .animation
        .as_ref()
        .map_or(true, |clock| clock.name == IDLE_ANIMATION);
    if resting {
        worker.animation = Some(AnimationClock::start(WALK_ANIMATION));
    }
}

fn perform_job_action(
    worker_id: EntityId,
    target_id: EntityId,
    ctx: &mut SchedulerContext<'_>,
) -> StepOutcome {
    let Some(worker) = ctx.world.find_entity(worker_id) else {
        return StepOutcome::Halt;
    };
    match worker.job {
        Job::Harvest {
            resource: Some(resource),
        } => harvest_action(worker_id, target_id, resource, ctx),
        Job::PickUp => pick_up_action(worker_id, target_id, ctx),
        Job::DropOff => drop_off_action(worker_id, target_id, ctx),
        Job::Idle | Job::Harvest { resource: None } => StepOutcome::Continue,
    }
}

fn harvest_animation(resource: ResourceKind) -> &'static str {
    match resource {
        ResourceKind::Berry => GATHER_ANIMATION,
        ResourceKind::Stone | ResourceKind::Wood => SWING_ANIMATION,
    }
}

/// Take one unit from the source, start the harvest swing, and turn for the
/// drop-off. The worker stands delayed for the length of the swing.
fn harvest_action(
    worker_id: EntityId,
    source_id: EntityId,
    resource: ResourceKind,
    ctx: &mut SchedulerContext<'_>,
) -> StepOutcome {
    let Some(source) = ctx.world.find_entity_mut(source_id) else {
        return StepOutcome::Continue;
    };
    let available = source.resource_count(resource);
    if available == 0 {
        return StepOutcome::Continue;
    }
    source.resources.insert(resource, available - 1);
    if source.tree.is_some() {
        ctx.pending_impacts.push(source_id);
    }

    let animation = harvest_animation(resource);
    let delay_ms = ctx
        .world
        .library()
        .get(WORKER_KIND)
        .ok()
        .and_then(|model| model.animation(animation))
        .map_or(0.0, |def| def.duration_ms);
    let item = ctx
        .world
        .create_detached(EntitySeed::new(resource.as_str(), Vec3::ZERO));

    let Some(worker) = ctx.world.find_entity_mut(worker_id) else {
        return StepOutcome::Halt;
    };
    worker.animation = Some(AnimationClock::start(animation));
    worker.delay_ms = delay_ms;
    worker.carry.push(item);
    set_job(worker, Job::DropOff, ctx.events);
    ctx.events.emit(WorkEvent::ResourceHarvested {
        worker: worker_id,
        source: source_id,
        resource,
    });
    StepOutcome::Continue
}

fn pick_up_action(
    worker_id: EntityId,
    item_id: EntityId,
    ctx: &mut SchedulerContext<'_>,
) -> StepOutcome {
    let item_bounds = {
        let Some(item) = ctx.world.find_entity(item_id) else {
            return StepOutcome::Continue;
        };
        match ctx.world.library().get(&item.kind) {
            Ok(model) => model.bounds,
            Err(_) => return StepOutcome::Continue,
        }
    };
    let carried_already = match ctx.world.find_entity(worker_id) {
        Some(worker) => worker.carry.len(),
        None => return StepOutcome::Halt,
    };
    let Some(mut item) = ctx.world.take_entity(item_id) else {
        return StepOutcome::Continue;
    };
    item.position = Vec3::new(
        0.0,
        carried_already as f32 * (item_bounds.y * 2.0 + CARRY_STACK_GAP),
        0.0,
    );
    item.rotation = Vec3::ZERO;
    let item_handle = item.id;

    let Some(worker) = ctx.world.find_entity_mut(worker_id) else {
        return StepOutcome::Halt;
    };
    worker.carry.push(item);
    worker.delay_ms += PICKUP_DELAY_MS;
    let carrying_clock = worker
        .animation
        .as_ref()
        .is_some_and(|clock| clock.name == CARRY_ANIMATION);
    if !carrying_clock {
        worker.animation = Some(AnimationClock::start(CARRY_ANIMATION));
    }
    ctx.events.emit(WorkEvent::ItemPickedUp {
        worker: worker_id,
        item: item_handle,
    });
    StepOutcome::Continue
}

fn drop_off_action(
    worker_id: EntityId,
    stockpile_id: EntityId,
    ctx: &mut SchedulerContext<'_>,
) -> StepOutcome {
    let stockpile_bounds = {
        let Some(stockpile) = ctx.world.find_entity(stockpile_id) else {
            return StepOutcome::Continue;
        };
        match ctx.world.library().get(&stockpile.kind) {
            Ok(model) => model.bounds,
            Err(_) => return StepOutcome::Continue,
        }
    };
    let item_bounds = {
        let Some(worker) = ctx.world.find_entity(worker_id) else {
            return StepOutcome::Halt;
        };
        let Some(item) = worker.carry.last() else {
            return StepOutcome::Continue;
        };
        match ctx.world.library().get(&item.kind) {
            Ok(model) => model.bounds,
            Err(_) => return StepOutcome::Continue,
        }
    };

    let Some(worker) = ctx.world.find_entity_mut(worker_id) else {
        return StepOutcome::Halt;
    };
    let Some(item) = worker.carry.pop() else {
        return StepOutcome::Continue;
    };
    worker.delay_ms += UNLOAD_DELAY_MS;
    let resource = ResourceKind::from_name(&item.kind);

    let refused = match ctx.world.find_entity_mut(stockpile_id) {
        Some(stockpile) => {
            add_item_to_stockpile(stockpile, item, stockpile_bounds, item_bounds, ctx.rng)
        }
        None => Some(item),
    };
    if let Some(item) = refused {
        if let Some(worker) = ctx.world.find_entity_mut(worker_id) {
            worker.carry.push(item);
        }
        return StepOutcome::Continue;
    }
    if let Some(resource) = resource {
        ctx.events.emit(WorkEvent::ItemDroppedOff {
            worker: worker_id,
            stockpile: stockpile_id,
            resource,
        });
    }
    StepOutcome::Continue
}

/// Flip queued impacts into the Impact state. Only a standing idle tree
/// takes the hit; anything else ignores it.
fn apply_queued_impacts(pending: &mut Vec<EntityId>, world: &mut SceneWorld) {
    for id in pending.drain(..) {
        let Some(entity) = world.find_entity_mut(id) else {
            continue;
        };
        let Some(tree) = entity.tree else {
            continue;
        };
        if tree.state == TreeState::Idle {
            entity.tree = Some(TreeBehavior {
                state: TreeState::Impact,
                health: tree.health,
            });
        }
    }
}

fn run_tree_step(id: EntityId, ctx: &mut SchedulerContext<'_>) {
    let Some(entity) = ctx.world.find_entity_mut(id) else {
        return;
    };
    if entity.delay_ms > 0.0 {
        entity.delay_ms = (entity.delay_ms - ctx.dt_ms).max(0.0);
        return;
    }
    let Some(tree) = entity.tree else {
        return;
    };
    match tree.state {
        TreeState::Idle | TreeState::Dead => {}
        TreeState::Impact => {
            let health_left = tree.health.saturating_sub(1);
            if health_left > 0 {
                entity.animation = Some(AnimationClock::start(IMPACT_ANIMATION));
                entity.delay_ms = TREE_IMPACT_DELAY_MS;
                entity.tree = Some(TreeBehavior {
                    state: TreeState::Idle,
                    health: health_left,
                });
                ctx.events.emit(WorkEvent::TreeImpacted {
                    tree: id,
                    health_left,
                });
            } else {
                entity.animation = Some(AnimationClock::start(FELL_ANIMATION));
                entity.delay_ms = TREE_FELL_DELAY_MS;
                entity.tree = Some(TreeBehavior {
                    state: TreeState::Fell,
                    health: 0,
                });
                ctx.events.emit(WorkEvent::TreeFelled { tree: id });
            }
        }
        TreeState::Fell => {
            let origin = entity.position;
            entity.animation = Some(AnimationClock::start(SINK_ANIMATION));
            entity.delay_ms = TREE_SINK_DELAY_MS;
            entity.tree = Some(TreeBehavior {
                state: TreeState::Sink,
                health: 0,
            });
            scatter_felled_wood(origin, id, ctx);
        }
        TreeState::Sink => {
            entity.tree = Some(TreeBehavior {
                state: TreeState::Dead,
                health: 0,
            });
            ctx.events.emit(WorkEvent::TreeVanished { tree: id });
        }
    }
}

fn scatter_felled_wood(origin: Vec3, tree: EntityId, ctx: &mut SchedulerContext<'_>) {
    for index in 0..FELLED_WOOD_COUNT {
        let angle = index as f32 / FELLED_WOOD_COUNT as f32 * TAU;
        let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * FELLED_WOOD_RING_RADIUS;
        ctx.world.spawn(
            EntitySeed::new(ResourceKind::Wood.as_str(), origin + offset)
                .with_rotation(Vec3::new(0.0, -angle, 0.0)),
        );
    }
    ctx.events.emit(WorkEvent::WoodScattered {
        tree,
        count: FELLED_WOOD_COUNT,
    });
}

/// Goods banked in stockpiles. Carried items are not yet stored.
fn count_stored_goods(world: &SceneWorld) -> BTreeMap<ResourceKind, u32> {
    let mut stored = BTreeMap::new();
    for entity in world.entities() {
        for item in &entity.pile {
            if let Some(kind) = ResourceKind::from_name(&item.kind) {
                *stored.entry(kind).or_insert(0u32) += 1;
            }
        }
    }
    stored
}

/// Goods already spoken for, banked or in a worker's hands. Keeps a second
/// worker from harvesting toward a count the first is about to deliver.
fn count_claimed_goods(world: &SceneWorld) -> BTreeMap<ResourceKind, u32> {
    let mut claimed = count_stored_goods(world);
    for entity in world.entities() {
        for item in &entity.carry {
            if let Some(kind) = ResourceKind::from_name(&item.kind) {
                *claimed.entry(kind).or_insert(0u32) += 1;
            }
        }
    }
    claimed
}

fn arena_supply(world: &SceneWorld, resource: ResourceKind) -> u32 {
    world
        .entities()
        .iter()
        .map(|entity| entity.resource_count(resource))
        .sum()
}
