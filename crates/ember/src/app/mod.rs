//! The application frame loop
//!
//! An [`Application`] drives a [`SceneManager`] from a [`Window`]'s clock. Every frame it:
//!  1. computes the timestep since the previous frame
//!  2. polls window events
//!  3. opens a renderer frame, updates the active scene, closes the renderer frame
//!  4. swaps buffers and counts the frame for the FPS display
//!
//! The loop ends once the window closes, the application is told to [`Application::quit`], or a
//! system of the active scene requests a quit. Each of these is only observed between frames.

use crate::scene::SceneManager;
use crate::systems::Renderer;
use log::*;

#[doc(inline)]
pub use config::*;
mod config;

#[doc(inline)]
pub use frame::*;
mod frame;

/// Interface of the platform window the application runs in.
pub trait Window {
    /// Whether the window is still open.
    fn is_running(&self) -> bool;

    /// Seconds elapsed since some fixed point in the past.
    fn time(&self) -> f64;

    fn poll_events(&mut self);
    fn swap_buffers(&mut self);
    fn set_title(&mut self, title: &str);
    fn close(&mut self);
}

pub struct Application<W: Window> {
    window: W,
    scenes: SceneManager,
    renderer: Option<Box<dyn Renderer>>,
    config: AppConfig,
    frame_counter: FrameCounter,

    is_running: bool,
    last_time: f64,
    delta_time: f32,
}

impl<W: Window> Application<W> {
    /// Creates the application. Configs that fail [`AppConfig::validate`] fall back to the
    /// default values of the offending fields.
    pub fn new(mut window: W, mut config: AppConfig) -> Self {
        if let Err(error) = config.validate() {
            warn!("Invalid application config ({error}), using defaults where needed");
            let defaults = AppConfig::default();
            if config.fps_report_interval.is_nan() || config.fps_report_interval <= 0.0 {
                config.fps_report_interval = defaults.fps_report_interval;
            }
            if config.max_timestep.is_some_and(|max| max.is_nan() || max <= 0.0) {
                config.max_timestep = defaults.max_timestep;
            }
        }

        window.set_title(&config.title);

        Self {
            window,
            scenes: SceneManager::new(),
            renderer: None,
            frame_counter: FrameCounter::new(config.fps_report_interval),
            config,
            is_running: false,
            last_time: 0.0,
            delta_time: 0.0,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Sets the renderer whose frame hooks surround every scene update. To share it with a
    /// [`RenderingSystem`](crate::systems::RenderingSystem), wrap it in an `Rc<RefCell<_>>`.
    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.renderer = Some(Box::new(renderer));
    }

    /// Whether the application was started and not told to quit since.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Timestep of the most recent frame, in seconds.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn frame_counter(&self) -> &FrameCounter {
        &self.frame_counter
    }

    /// Creates the scenes and starts the clock, without running any frames.
    pub fn start(&mut self) {
        info!("Starting `{}`", self.config.title);

        self.is_running = true;
        self.scenes.on_create();

        self.last_time = self.window.time();
        self.frame_counter.reset(self.last_time);
    }

    /// Starts the application and runs frames until it's told to stop.
    pub fn run(&mut self) {
        self.start();

        while self.is_running && self.window.is_running() {
            self.frame();

            if self.scenes.take_quit_request() {
                self.quit();
            }
        }

        self.is_running = false;
        info!("Application loop finished");
    }

    /// Runs exactly one frame.
    pub fn frame(&mut self) {
        self.begin_frame();
        self.window.poll_events();

        if let Some(renderer) = &mut self.renderer {
            renderer.begin_frame();
        }
        self.scenes.on_update(self.delta_time);
        if let Some(renderer) = &mut self.renderer {
            renderer.end_frame();
        }

        self.window.swap_buffers();
        self.end_frame();
    }

    /// Stops the loop after the current frame, and closes the window.
    pub fn quit(&mut self) {
        debug!("Quitting");
        self.is_running = false;
        self.window.close();
    }

    fn begin_frame(&mut self) {
        let time = self.window.time();
        let mut delta_time = (time - self.last_time) as f32;
        self.last_time = time;

        if let Some(max) = self.config.max_timestep {
            if delta_time > max {
                trace!("Clamping timestep of {delta_time}s to {max}s");
                delta_time = max;
            }
        }

        self.delta_time = delta_time;
    }

    fn end_frame(&mut self) {
        if let Some(fps) = self.frame_counter.end_frame(self.window.time()) {
            debug!("FPS: {fps}");
            let title = format!("{} [FPS: {fps}]", self.config.title);
            self.window.set_title(&title);
        }
    }
}
