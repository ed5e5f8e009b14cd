use crate::entities::components::{MaterialComponent, RenderComponent, TransformComponent};
use crate::entities::Entity;
use crate::system::{Context, FilterItem, System};
use glam::{Mat4, Vec4};
use std::cell::RefCell;
use std::rc::Rc;

/// What an entity is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialBinding {
    /// Flat RGBA color.
    Color(Vec4),
    /// A named material, resolved by the renderer.
    Material(String),
}

/// Interface of whatever actually puts pixels on the screen.
///
/// GPU resources, shaders and materials are entirely the implementor's business. The frame
/// hooks are called by the [`Application`](crate::app::Application) around each frame.
pub trait Renderer {
    fn begin_frame(&mut self) {}

    /// Draws one entity with the given model matrix.
    fn draw(&mut self, world_matrix: &Mat4, binding: &MaterialBinding);

    fn end_frame(&mut self) {}
}

/// Lets the application and the rendering system share a single renderer.
impl<R: Renderer> Renderer for Rc<RefCell<R>> {
    fn begin_frame(&mut self) {
        self.borrow_mut().begin_frame();
    }

    fn draw(&mut self, world_matrix: &Mat4, binding: &MaterialBinding) {
        self.borrow_mut().draw(world_matrix, binding);
    }

    fn end_frame(&mut self) {
        self.borrow_mut().end_frame();
    }
}

/// Issues one draw call per drawable entity per frame, in the order the entities became drawable.
///
/// Entities with a [`MaterialComponent`] are drawn with that material, others with the color of
/// their [`RenderComponent`].
pub struct RenderingSystem<R: Renderer> {
    renderer: R,
}

impl<R: Renderer> RenderingSystem<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: Renderer + 'static> System for RenderingSystem<R> {
    type Filter = (RenderComponent, TransformComponent);

    fn label(&self) -> &'static str {
        "Rendering System"
    }

    fn on_update<'a>(
        &mut self,
        _ts: f32,
        ctx: &mut Context<'a>,
        entity: Entity,
        (render, transform): FilterItem<'a, Self>,
    ) {
        let binding = match ctx.get_component::<MaterialComponent>(entity) {
            Some(material) => MaterialBinding::Material(material.material.clone()),
            None => MaterialBinding::Color(render.color),
        };

        self.renderer.draw(&transform.world_matrix, &binding);
    }
}
