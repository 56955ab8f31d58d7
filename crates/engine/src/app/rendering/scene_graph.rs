use glam::Mat4;
use thiserror::Error;

use crate::content::{Attach, ModelError, PathTransform};

use super::super::scene::{Entity, EntityId, SceneWorld};
use super::renderer::Renderer;
use super::transform::compose;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("entity {entity_id:?} ('{kind}') references an unknown model")]
    UnknownModel {
        entity_id: EntityId,
        kind: String,
        #[source]
        source: ModelError,
    },
}

/// Walk the arena and emit one draw command per meshed part. Emission
/// order is arena order, then model part order, then attachment-list
/// order, so a frame is fully reproducible.
pub fn render_world(world: &SceneWorld, renderer: &mut dyn Renderer) -> Result<(), WalkError> {
    for entity in world.entities() {
        render_entity(world, entity, Mat4::IDENTITY, renderer)?;
    }
    Ok(())
}

fn render_entity(
    world: &SceneWorld,
    entity: &Entity,
    parent: Mat4,
    renderer: &mut dyn Renderer,
) -> Result<(), WalkError> {
    let model = world
        .library()
        .get(&entity.kind)
        .map_err(|source| WalkError::UnknownModel {
            entity_id: entity.id,
            kind: entity.kind.clone(),
            source,
        })?;

    let root = compose(
        parent,
        &PathTransform::empty()
            .with_pos(entity.position)
            .with_rot(entity.rotation),
    );

    for (_, part) in &model.parts {
        // Static part transform first, the animated path on top of it.
        let mut matrix = compose(root, &part.transform);
        if let Some(clock) = &entity.animation {
            if let (Some(animation), Some(path)) =
                (model.animation(&clock.name), part.paths.get(&clock.name))
            {
                let t = clock.time_ms / animation.duration_ms;
                matrix = compose(matrix, &path.blend(t));
            }
        }

        if let Some(mesh) = part.mesh {
            renderer.draw_mesh(mesh, part.color, matrix);
        }

        match part.attach {
            Some(Attach::Carry) => {
                for child in &entity.carry {
                    render_entity(world, child, matrix, renderer)?;
                }
            }
            Some(Attach::Pile) => {
                for child in &entity.pile {
                    render_entity(world, child, matrix, renderer)?;
                }
            }
            None => {}
        }
    }

    Ok(())
}
