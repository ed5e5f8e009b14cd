use super::{Scene, SceneError, SceneId};
use log::*;

/// Holds all scenes of an application, exactly one of which is active once any was added.
#[derive(Debug, Default)]
pub struct SceneManager {
    scenes: Vec<Scene>,
    active: Option<SceneId>,
    created: bool,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scene. The first scene added becomes the active one.
    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        let id = SceneId(u32::try_from(self.scenes.len()).expect("scene id overflow"));
        debug!("Added {id} ({:?})", scene.name().unwrap_or("unnamed"));
        self.scenes.push(scene);

        if self.active.is_none() {
            // Goes through the regular path, so it's started if the manager already is
            self.activate(id);
        }

        id
    }

    /// Makes another scene the active one. The previously active scene keeps its state and
    /// simply stops receiving frames.
    ///
    /// If the manager was already created, a scene activated for the first time is started
    /// right away.
    pub fn set_active_scene(&mut self, id: SceneId) -> Result<(), SceneError> {
        if id.index() >= self.scenes.len() {
            return Err(SceneError::UnknownScene(id));
        }

        self.activate(id);
        Ok(())
    }

    fn activate(&mut self, id: SceneId) {
        debug!("Activating {id}");
        self.active = Some(id);

        let created = self.created;
        let scene = &mut self.scenes[id.index()];
        if created && !scene.is_running() {
            scene.on_create();
        }
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.active
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.map(|id| &self.scenes[id.index()])
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.active.map(|id| &mut self.scenes[id.index()])
    }

    pub fn scene(&self, id: SceneId) -> Result<&Scene, SceneError> {
        self.scenes
            .get(id.index())
            .ok_or(SceneError::UnknownScene(id))
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Result<&mut Scene, SceneError> {
        self.scenes
            .get_mut(id.index())
            .ok_or(SceneError::UnknownScene(id))
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Starts the active scene. Does nothing the second time.
    pub fn on_create(&mut self) {
        if self.created {
            warn!("Scene manager already created");
            return;
        }

        self.created = true;
        match self.active_scene_mut() {
            Some(scene) => scene.on_create(),
            None => warn!("Creating a scene manager with no scenes"),
        }
    }

    /// Runs a single frame of the active scene.
    pub fn on_update(&mut self, ts: f32) {
        if let Some(scene) = self.active_scene_mut() {
            scene.on_update(ts);
        }
    }

    /// Whether any system of the active scene asked to quit since the last call.
    pub fn take_quit_request(&mut self) -> bool {
        self.active_scene_mut()
            .map(Scene::take_quit_request)
            .unwrap_or(false)
    }
}
