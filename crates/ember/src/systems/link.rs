use crate::entities::components::{LinkComponent, TransformComponent};
use crate::entities::Entity;
use crate::system::{Context, FilterItem, System};
use ahash::AHashSet;
use glam::Mat4;
use log::*;
use smallvec::SmallVec;

/// Composes local matrices along the parent chain into world matrices, as
/// `world(e) = world(parent(e)) · local(e)`.
///
/// Must run after [`TransformSystem`](super::TransformSystem), as it consumes the local matrices
/// computed in the same frame. Ancestors without a transform contribute an identity matrix,
/// ancestors without a link end the chain.
#[derive(Debug, Default)]
pub struct LinkSystem {
    visited: AHashSet<Entity>,
    reported_cycles: AHashSet<Entity>,
}

impl LinkSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Product of the local matrices of all ancestors of `entity`, root first.
    ///
    /// The chain is walked iteratively. If it loops back onto an entity that was already visited,
    /// the walk stops there, as if that link was missing.
    fn ancestor_matrix(
        &mut self,
        ctx: &Context<'_>,
        entity: Entity,
        parent: Option<Entity>,
    ) -> Mat4 {
        let mut locals = SmallVec::<[Mat4; 8]>::new();

        self.visited.clear();
        self.visited.insert(entity);

        let mut next = parent;
        while let Some(current) = next {
            if !self.visited.insert(current) {
                if self.reported_cycles.insert(entity) {
                    warn!("Parent chain of entity {entity} loops back onto {current}, cutting it");
                }
                break;
            }

            locals.push(
                ctx.get_component::<TransformComponent>(current)
                    .map(|transform| transform.local_matrix)
                    .unwrap_or(Mat4::IDENTITY),
            );
            next = ctx
                .get_component::<LinkComponent>(current)
                .and_then(|link| link.parent);
        }

        locals
            .iter()
            .rev()
            .fold(Mat4::IDENTITY, |world, local| world * *local)
    }

    fn update_world(
        &mut self,
        ctx: &Context<'_>,
        entity: Entity,
        link: &LinkComponent,
        transform: &mut TransformComponent,
    ) {
        let ancestors = self.ancestor_matrix(ctx, entity, link.parent);
        transform.world_matrix = ancestors * transform.local_matrix;
    }
}

impl System for LinkSystem {
    type Filter = (LinkComponent, TransformComponent);

    fn label(&self) -> &'static str {
        "Link System"
    }

    fn on_create<'a>(
        &mut self,
        ctx: &mut Context<'a>,
        entity: Entity,
        (link, mut transform): FilterItem<'a, Self>,
    ) {
        self.update_world(ctx, entity, &link, &mut transform);
    }

    fn on_update<'a>(
        &mut self,
        _ts: f32,
        ctx: &mut Context<'a>,
        entity: Entity,
        (link, mut transform): FilterItem<'a, Self>,
    ) {
        self.update_world(ctx, entity, &link, &mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::LinkSystem;
    use crate::entities::components::{LinkComponent, TransformComponent};
    use crate::entities::Entity;
    use crate::registry::Registry;
    use crate::systems::TransformSystem;
    use glam::{Mat4, Vec3};

    fn spawn(
        registry: &mut Registry,
        translation: Vec3,
        rotation: Vec3,
        parent: Option<Entity>,
    ) -> Entity {
        registry
            .build_entity()
            .with_component(TransformComponent::new(translation, rotation, Vec3::ONE))
            .with_component(LinkComponent { parent })
            .finish()
    }

    fn world(registry: &Registry, entity: Entity) -> Mat4 {
        registry
            .get_component::<TransformComponent>(entity)
            .unwrap()
            .world_matrix
    }

    fn local(registry: &Registry, entity: Entity) -> Mat4 {
        registry
            .get_component::<TransformComponent>(entity)
            .unwrap()
            .local_matrix
    }

    #[test]
    fn three_level_chain() {
        let _ = pretty_env_logger::try_init();
        let mut registry = Registry::new();

        let root = spawn(&mut registry, Vec3::X, Vec3::new(0.0, 0.0, 0.4), None);
        let mid = spawn(&mut registry, 2.0 * Vec3::Y, Vec3::new(0.2, 0.0, 0.0), Some(root));
        let leaf = spawn(&mut registry, -3.0 * Vec3::Z, Vec3::ZERO, Some(mid));

        registry.register_system(TransformSystem);
        registry.register_system(LinkSystem::new());
        registry.start();
        registry.update(0.016);

        let l0 = local(&registry, root);
        let l1 = local(&registry, mid);
        let l2 = local(&registry, leaf);
        assert!(world(&registry, root).abs_diff_eq(l0, 1e-5));
        assert!(world(&registry, mid).abs_diff_eq(l0 * l1, 1e-5));
        assert!(world(&registry, leaf).abs_diff_eq(l0 * l1 * l2, 1e-5));
    }

    #[test]
    fn moving_the_parent_moves_the_child_in_the_same_frame() {
        let mut registry = Registry::new();
        let parent = spawn(&mut registry, Vec3::ZERO, Vec3::ZERO, None);
        let child = spawn(&mut registry, Vec3::new(-1.5, 0.0, 0.0), Vec3::ZERO, Some(parent));

        registry.register_system(TransformSystem);
        registry.register_system(LinkSystem::new());
        registry.start();

        registry
            .get_component_mut::<TransformComponent>(parent)
            .unwrap()
            .translate(Vec3::new(0.0, 4.0, 0.0));
        registry.update(0.016);

        let position = registry
            .get_component::<TransformComponent>(child)
            .unwrap()
            .world_position();
        assert!(position.abs_diff_eq(Vec3::new(-1.5, 4.0, 0.0), 1e-6));
    }

    #[test]
    fn cycles_are_cut_instead_of_recursing() {
        let _ = pretty_env_logger::try_init();
        let mut registry = Registry::new();
        let a = spawn(&mut registry, Vec3::X, Vec3::ZERO, None);
        let b = spawn(&mut registry, Vec3::Y, Vec3::ZERO, Some(a));
        registry.add_component(a, LinkComponent::child_of(b));

        let lonely = spawn(&mut registry, Vec3::Z, Vec3::ZERO, None);
        registry.add_component(lonely, LinkComponent::child_of(lonely));

        registry.register_system(TransformSystem);
        registry.register_system(LinkSystem::new());
        registry.start();
        registry.update(0.016);
        registry.update(0.016);

        let (la, lb) = (local(&registry, a), local(&registry, b));
        assert!(world(&registry, a).abs_diff_eq(lb * la, 1e-6));
        assert!(world(&registry, b).abs_diff_eq(la * lb, 1e-6));
        assert!(world(&registry, lonely).abs_diff_eq(local(&registry, lonely), 1e-6));
    }
}
