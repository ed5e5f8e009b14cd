use crate::entities::{components::TransformComponent, Entity};
use crate::system::{Context, FilterItem, System};

/// Recomputes every entity's local matrix from its translation, rotation and scale.
///
/// Also resets the world matrix to the local one, which is the final result for entities
/// outside of the hierarchy. [`LinkSystem`](super::LinkSystem) overwrites it for linked ones.
#[derive(Debug, Default)]
pub struct TransformSystem;

impl System for TransformSystem {
    type Filter = (TransformComponent,);

    fn label(&self) -> &'static str {
        "Transform System"
    }

    fn on_create<'a>(
        &mut self,
        _ctx: &mut Context<'a>,
        _entity: Entity,
        mut transform: FilterItem<'a, Self>,
    ) {
        transform.local_matrix = transform.compose_local();
    }

    fn on_update<'a>(
        &mut self,
        _ts: f32,
        _ctx: &mut Context<'a>,
        _entity: Entity,
        mut transform: FilterItem<'a, Self>,
    ) {
        let previous = transform.local_matrix;

        transform.local_matrix = transform.compose_local();
        transform.world_matrix = transform.local_matrix;

        // Exact comparison, any change at all counts
        transform.is_dirty = previous != transform.local_matrix;
    }
}
