use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::anim::{advance_clock, AnimationClock, OverrunPolicy};
use crate::content::ModelLibrary;

use super::rendering::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
struct EntityIdAllocator {
    next_raw: u64,
}

impl EntityIdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_raw);
        self.next_raw = self.next_raw.saturating_add(1);
        id
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ResourceKind {
    Berry,
    Stone,
    Wood,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Berry,
        ResourceKind::Stone,
        ResourceKind::Wood,
    ];

    /// Also the model name of the kind's raw good.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Berry => "Berry",
            ResourceKind::Stone => "Stone",
            ResourceKind::Wood => "Wood",
        }
    }

    pub fn from_name(name: &str) -> Option<ResourceKind> {
        match name {
            "Berry" => Some(ResourceKind::Berry),
            "Stone" => Some(ResourceKind::Stone),
            "Wood" => Some(ResourceKind::Wood),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Idle,
    Harvest { resource: Option<ResourceKind> },
    PickUp,
    DropOff,
}

impl Job {
    pub fn label(&self) -> &'static str {
        match self {
            Job::Idle => "idle",
            Job::Harvest { .. } => "harvest",
            Job::PickUp => "pick_up",
            Job::DropOff => "drop_off",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Idle,
    Impact,
    Fell,
    Sink,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeBehavior {
    pub state: TreeState,
    pub health: u32,
}

/// A live thing in the world. Entities in `carry` and `pile` are owned
/// children: they are not in the arena and only render through their
/// parent's attachment slots.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub animation: Option<AnimationClock>,
    pub job: Job,
    pub carry: Vec<Entity>,
    pub pile: Vec<Entity>,
    pub resources: BTreeMap<ResourceKind, u32>,
    pub delay_ms: f32,
    pub avoid: Vec3,
    pub tree: Option<TreeBehavior>,
}

impl Entity {
    pub fn resource_count(&self, kind: ResourceKind) -> u32 {
        self.resources.get(&kind).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct EntitySeed {
    kind: String,
    position: Vec3,
    rotation: Vec3,
    resources: BTreeMap<ResourceKind, u32>,
    tree_health: Option<u32>,
    animation: Option<String>,
}

impl EntitySeed {
    pub fn new(kind: impl Into<String>, position: Vec3) -> Self {
        Self {
            kind: kind.into(),
            position,
            rotation: Vec3::ZERO,
            resources: BTreeMap::new(),
            tree_health: None,
            animation: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_resource(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.resources.insert(kind, amount);
        self
    }

    pub fn with_tree_health(mut self, health: u32) -> Self {
        self.tree_health = Some(health);
        self
    }

    pub fn with_animation(mut self, name: impl Into<String>) -> Self {
        self.animation = Some(name.into());
        self
    }

    fn into_entity(self, id: EntityId) -> Entity {
        Entity {
            id,
            kind: self.kind,
            position: self.position,
            rotation: self.rotation,
            animation: self.animation.map(AnimationClock::start),
            job: Job::Idle,
            carry: Vec::new(),
            pile: Vec::new(),
            resources: self.resources,
            delay_ms: 0.0,
            avoid: Vec3::ZERO,
            tree: self.tree_health.map(|health| TreeBehavior {
                state: TreeState::Idle,
                health,
            }),
        }
    }
}

/// Flat entity arena plus the content library driving it. Spawns and
/// despawns requested mid-update are queued and land in `apply_pending`.
#[derive(Debug)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    library: ModelLibrary,
    overrun_policy: OverrunPolicy,
}

impl SceneWorld {
    pub fn new(library: ModelLibrary) -> Self {
        Self {
            allocator: EntityIdAllocator::default(),
            entities: Vec::new(),
            pending_spawns: Vec::new(),
            pending_despawns: Vec::new(),
            library,
            overrun_policy: OverrunPolicy::default(),
        }
    }

    pub fn with_overrun_policy(mut self, policy: OverrunPolicy) -> Self {
        self.overrun_policy = policy;
        self
    }

    pub fn library(&self) -> &ModelLibrary {
        &self.library
    }

    pub fn overrun_policy(&self) -> OverrunPolicy {
        self.overrun_policy
    }

    pub fn spawn(&mut self, seed: EntitySeed) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(seed.into_entity(id));
        id
    }

    /// Build an entity that never enters the arena. The caller owns it,
    /// typically to push onto a carry or pile list.
    pub fn create_detached(&mut self, seed: EntitySeed) -> Entity {
        let id = self.allocator.allocate();
        seed.into_entity(id)
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_spawns.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_despawns.clear();
        }

        if !self.pending_spawns.is_empty() {
            self.entities.append(&mut self.pending_spawns);
        }
    }

    /// Remove an entity from the arena right now and hand it to the
    /// caller. Mid-tick use is safe as long as iteration runs over an id
    /// snapshot and re-finds entities by id.
    pub fn take_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Advance every arena entity's clock. Carried and piled children
    /// stay frozen until they re-enter the arena.
    pub fn advance_clocks(&mut self, dt_ms: f32) {
        let Self {
            entities,
            library,
            overrun_policy,
            ..
        } = self;
        for entity in entities.iter_mut() {
            let Ok(model) = library.get(&entity.kind) else {
                continue;
            };
            advance_clock(&mut entity.animation, dt_ms, model, *overrun_policy);
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Stop,
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(&mut self, dt_ms: f32, world: &mut SceneWorld) -> SceneCommand;
    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn Renderer);
    fn unload(&mut self, world: &mut SceneWorld);
}

#[cfg(test)]
mod tests {
    use crate::content::{Color, MeshRef, ModelDef, PartDef};

    use super::*;

    fn test_library() -> ModelLibrary {
        let mut library = ModelLibrary::new();
        library
            .insert(
                ModelDef::new("Worker", Vec3::new(0.5, 1.0, 0.5))
                    .with_animation("walk", 1000.0, true)
                    .with_part("Body", PartDef::mesh(MeshRef::Dome, Color::default())),
            )
            .expect("worker model");
        library
            .insert(ModelDef::new("Wood", Vec3::new(0.1, 0.05, 0.5)).with_part(
                "Plank",
                PartDef::mesh(MeshRef::Cube, Color::rgb(0.5, 0.2, 0.0)),
            ))
            .expect("wood model");
        library
    }

    fn test_world() -> SceneWorld {
        SceneWorld::new(test_library())
    }

    #[test]
    fn spawned_entities_become_visible_only_after_apply_pending() {
        let mut world = test_world();
        let id = world.spawn(EntitySeed::new("Worker", Vec3::ZERO));
        assert_eq!(world.entity_count(), 0);
        assert!(world.find_entity(id).is_none());

        world.apply_pending();
        assert_eq!(world.entity_count(), 1);
        assert!(world.find_entity(id).is_some());
    }

    #[test]
    fn despawns_are_deferred_and_deduplicated() {
        let mut world = test_world();
        let keep = world.spawn(EntitySeed::new("Worker", Vec3::ZERO));
        let gone = world.spawn(EntitySeed::new("Worker", Vec3::ONE));
        world.apply_pending();

        assert!(world.despawn(gone));
        assert!(world.despawn(gone));
        assert_eq!(world.entity_count(), 2, "despawn waits for apply_pending");

        world.apply_pending();
        assert_eq!(world.entity_count(), 1);
        assert!(world.find_entity(keep).is_some());
        assert!(world.find_entity(gone).is_none());
    }

    #[test]
    fn despawn_of_a_pending_spawn_prevents_it_from_landing() {
        let mut world = test_world();
        let id = world.spawn(EntitySeed::new("Worker", Vec3::ZERO));
        assert!(world.despawn(id));
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn despawn_of_an_unknown_id_is_rejected() {
        let mut world = test_world();
        assert!(!world.despawn(EntityId(99)));
    }

    #[test]
    fn take_entity_removes_immediately_and_preserves_the_id() {
        let mut world = test_world();
        let id = world.spawn(EntitySeed::new("Wood", Vec3::new(1.0, 0.0, 2.0)));
        world.apply_pending();

        let taken = world.take_entity(id).expect("take");
        assert_eq!(taken.id, id);
        assert_eq!(world.entity_count(), 0);
        assert!(world.take_entity(id).is_none());
    }

    #[test]
    fn create_detached_allocates_fresh_ids_without_touching_the_arena() {
        let mut world = test_world();
        let first = world.create_detached(EntitySeed::new("Wood", Vec3::ZERO));
        let second = world.create_detached(EntitySeed::new("Wood", Vec3::ZERO));
        assert_ne!(first.id, second.id);
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn entity_seed_populates_rotation_resources_health_and_clock() {
        let mut world = test_world();
        let id = world.spawn(
            EntitySeed::new("Worker", Vec3::new(1.0, 0.0, 2.0))
                .with_rotation(Vec3::new(0.0, 1.5, 0.0))
                .with_resource(ResourceKind::Wood, 10)
                .with_tree_health(2)
                .with_animation("walk"),
        );
        world.apply_pending();

        let entity = world.find_entity(id).expect("entity");
        assert_eq!(entity.rotation.y, 1.5);
        assert_eq!(entity.resource_count(ResourceKind::Wood), 10);
        assert_eq!(entity.resource_count(ResourceKind::Berry), 0);
        let tree = entity.tree.expect("tree behavior");
        assert_eq!(tree.state, TreeState::Idle);
        assert_eq!(tree.health, 2);
        let clock = entity.animation.as_ref().expect("clock");
        assert_eq!(clock.name, "walk");
        assert_eq!(entity.job, Job::Idle);
    }

    #[test]
    fn advance_clocks_ticks_arena_entities_but_not_carried_children() {
        let mut world = test_world();
        let id = world.spawn(EntitySeed::new("Worker", Vec3::ZERO).with_animation("walk"));
        world.apply_pending();

        let carried =
            world.create_detached(EntitySeed::new("Wood", Vec3::ZERO).with_animation("walk"));
        let worker = world.find_entity_mut(id).expect("worker");
        worker.carry.push(carried);

        world.advance_clocks(250.0);

        let worker = world.find_entity(id).expect("worker");
        let clock = worker.animation.as_ref().expect("worker clock");
        assert_eq!(clock.time_ms, 250.0);
        let child_clock = worker.carry[0].animation.as_ref().expect("child clock");
        assert_eq!(child_clock.time_ms, 0.0);
    }

    #[test]
    fn resource_kind_order_is_berry_stone_wood() {
        assert_eq!(
            ResourceKind::ALL,
            [ResourceKind::Berry, ResourceKind::Stone, ResourceKind::Wood]
        );
        assert!(ResourceKind::Berry < ResourceKind::Stone);
        assert!(ResourceKind::Stone < ResourceKind::Wood);
        assert_eq!(ResourceKind::from_name("Wood"), Some(ResourceKind::Wood));
        assert_eq!(ResourceKind::from_name("Iron"), None);
    }
}
