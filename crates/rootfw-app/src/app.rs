//! The application object: owns the scenes, timers, resources and frame
//! buffer, and drives them from a [`Platform`].

use std::fmt;

use rootfw_animation::AnimatedSprite;
use rootfw_assets::{Canvas, ResourceCache};
use rootfw_config::Config;
use rootfw_physics::PhysicsBody;
use rootfw_scene::{Camera, Event, Scene, SceneManager};
use rootfw_time::{Clock, SystemClock, TimeRegistry};
use tracing::{debug, info};

use crate::controller::PlatformerController;
use crate::error::AppError;
use crate::frame_clock::FrameClock;
use crate::platform::{Platform, StopHandle};

/// Color the frame buffer is cleared to before drawing.
pub const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

pub struct App {
    config: Config,
    scenes: SceneManager,
    time: TimeRegistry,
    resources: ResourceCache,
    canvas: Canvas,
    running: bool,
    stop: StopHandle,
    frame_count: u64,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("scenes", &self.scenes.scene_names())
            .field("timers", &self.time.len())
            .field("canvas", &self.canvas.size())
            .field("running", &self.running)
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock::new())
    }

    /// App whose timers run on `clock`.
    pub fn with_clock(config: Config, clock: impl Clock + 'static) -> Self {
        let canvas = Canvas::new(config.window.width, config.window.height);
        let resources = ResourceCache::new(&config.resources.resource_path);
        Self {
            config,
            scenes: SceneManager::new(),
            time: TimeRegistry::new(clock),
            resources,
            canvas,
            running: false,
            stop: StopHandle::default(),
            frame_count: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn time(&self) -> &TimeRegistry {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut TimeRegistry {
        &mut self.time
    }

    pub fn resources(&self) -> &ResourceCache {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceCache {
        &mut self.resources
    }

    /// The last drawn frame.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed by the current or last run.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Handle that ends the run after the frame in progress. Clone it into
    /// timer callbacks or scene logic.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Register `scenes`, sizing each camera to the window and applying the
    /// debug settings. The first scene becomes current.
    pub fn init_scenes(&mut self, scenes: Vec<Scene>) -> Result<(), AppError> {
        let (width, height) = self.canvas.size();
        let scenes = scenes
            .into_iter()
            .map(|mut scene| {
                scene
                    .camera_mut()
                    .set_screen_size(width as f32, height as f32);
                scene.set_show_colliders(self.config.debug.show_colliders);
                scene
            })
            .collect();
        self.scenes.init_scenes(scenes)?;
        Ok(())
    }

    /// Camera sized to the window with the configured smoothing and zoom.
    pub fn new_camera(&self) -> Camera {
        let camera = &self.config.camera;
        Camera::new(
            self.config.window.width as f32,
            self.config.window.height as f32,
        )
        .with_smoothness(camera.smoothness)
        .with_zoom(camera.zoom)
    }

    /// Physics body with the configured defaults.
    pub fn physics_body(&self) -> PhysicsBody {
        let physics = &self.config.physics;
        PhysicsBody::new()
            .with_mass(physics.mass)
            .with_gravity(physics.gravity)
            .with_friction(physics.friction_ground, physics.friction_air)
            .with_max_speed(physics.max_speed)
    }

    pub fn animated_sprite(&self) -> AnimatedSprite {
        AnimatedSprite::new().with_default_frame_duration(self.config.animation.default_frame_duration)
    }

    pub fn platformer_controller(&self) -> PlatformerController {
        PlatformerController::from_config(&self.config.physics)
    }

    /// Run until the platform sends [`Event::Quit`], a stop is requested, or
    /// `debug.max_frames` frames have been drawn. Frames are paced to
    /// `window.target_fps`.
    ///
    /// Scene changes queued through [`SceneManager::requests`] are applied
    /// after the frame's events and again after its updates and timers, so a
    /// transition asked for in a frame is drawn in that same frame.
    ///
    /// A stop requested before the run starts is honoured: the run returns
    /// without drawing a frame and the request is consumed.
    pub fn run(&mut self, platform: &mut impl Platform) -> Result<(), AppError> {
        let clock = FrameClock::new(self.config.window.target_fps);
        self.run_with_clock(platform, clock)
    }

    /// [`run`](Self::run) with an explicit frame clock.
    pub fn run_with_clock(
        &mut self,
        platform: &mut impl Platform,
        mut clock: FrameClock,
    ) -> Result<(), AppError> {
        if self.running {
            return Err(AppError::AlreadyRunning);
        }
        if self.scenes.is_empty() {
            return Err(AppError::NoScenes);
        }
        if self.stop.is_stop_requested() {
            info!("Stop requested before the main loop started");
            self.stop.reset();
            self.frame_count = 0;
            return Ok(());
        }

        info!(
            scenes = self.scenes.len(),
            width = self.canvas.width(),
            height = self.canvas.height(),
            "Starting main loop"
        );
        self.running = true;
        self.frame_count = 0;

        let result = self.run_frames(platform, &mut clock);
        self.running = false;
        self.stop.reset();
        info!(frames = self.frame_count, "Main loop stopped");
        result
    }

    fn run_frames(
        &mut self,
        platform: &mut impl Platform,
        clock: &mut FrameClock,
    ) -> Result<(), AppError> {
        let max_frames = self.config.debug.max_frames;

        while self.running {
            let dt = clock.tick();

            for event in platform.poll_events() {
                if matches!(event, Event::Quit) {
                    debug!("Quit requested");
                    self.running = false;
                }
                self.scenes.process_event(&event);
            }
            self.scenes.apply_requests()?;

            self.scenes.update(dt);
            for name in self.time.update() {
                debug!(timer = name.as_str(), "Timer ended");
            }
            self.scenes.apply_requests()?;

            self.canvas.fill(BACKGROUND);
            self.scenes.draw(&mut self.canvas);
            platform.present(&self.canvas)?;
            self.frame_count += 1;

            if self.stop.is_stop_requested() {
                debug!("Stop requested");
                self.running = false;
            }
            if max_frames.is_some_and(|max| self.frame_count >= max) {
                self.running = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use rootfw_math::Rect;
    use rootfw_scene::{Entity, EntityArena, Key, SceneError, SceneLogic};
    use rootfw_time::{ManualClock, Timer};

    use super::*;
    use crate::platform::HeadlessPlatform;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
        updates: Rc<RefCell<Vec<f32>>>,
    }

    impl SceneLogic for Recorder {
        fn update(&mut self, _scene: &mut Scene, _arena: &mut EntityArena, dt: f32) {
            self.updates.borrow_mut().push(dt);
        }

        fn handle_event(&mut self, _scene: &mut Scene, _arena: &mut EntityArena, event: &Event) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    fn small_config() -> Config {
        let mut config = Config::default();
        config.window.width = 64;
        config.window.height = 48;
        config
    }

    #[test]
    fn test_run_without_scenes_fails() {
        let mut app = App::new(small_config());
        let mut platform = HeadlessPlatform::new(Some(1));
        let err = app.run_with_clock(&mut platform, FrameClock::fixed(DT));
        assert!(matches!(err, Err(AppError::NoScenes)));
        assert_eq!(platform.frames_presented(), 0);
    }

    #[test]
    fn test_run_while_running_fails() {
        let mut app = App::new(small_config());
        app.init_scenes(vec![Scene::new("main")]).unwrap();
        app.running = true;
        let mut platform = HeadlessPlatform::new(Some(1));
        let err = app.run_with_clock(&mut platform, FrameClock::fixed(DT));
        assert!(matches!(err, Err(AppError::AlreadyRunning)));
    }

    #[test]
    fn test_quit_event_is_still_processed() {
        let recorder = Recorder::default();
        let events = recorder.events.clone();
        let updates = recorder.updates.clone();

        let mut app = App::new(small_config());
        app.init_scenes(vec![Scene::new("main").with_logic(recorder)])
            .unwrap();
        let mut platform = HeadlessPlatform::new(None)
            .with_event_at(0, Event::KeyDown(Key::Left))
            .with_event_at(2, Event::Quit);

        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();

        assert_eq!(
            *events.borrow(),
            vec![Event::KeyDown(Key::Left), Event::Quit]
        );
        // The quitting frame still updates and draws.
        assert_eq!(updates.borrow().len(), 3);
        assert!(updates.borrow().iter().all(|dt| *dt == DT));
        assert_eq!(platform.frames_presented(), 3);
        assert_eq!(app.frame_count(), 3);
        assert!(!app.is_running());
    }

    /// Hands over to the level when Enter is pressed.
    struct Menu;

    impl SceneLogic for Menu {
        fn handle_event(&mut self, scene: &mut Scene, _arena: &mut EntityArena, event: &Event) {
            if event.is_key_down(Key::Enter) {
                scene.requests().transition_to("level");
            }
        }
    }

    #[test]
    fn test_enter_moves_from_menu_to_level() {
        let recorder = Recorder::default();
        let level_updates = recorder.updates.clone();

        let mut app = App::new(small_config());
        app.init_scenes(vec![
            Scene::new("menu").with_logic(Menu),
            Scene::new("level").with_logic(recorder),
        ])
        .unwrap();
        let mut platform =
            HeadlessPlatform::new(Some(10)).with_event_at(1, Event::KeyDown(Key::Enter));

        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();

        let scenes = app.scenes();
        assert_eq!(scenes.current_scene_name().unwrap(), "level");
        assert!(scenes.scene("level").unwrap().is_active());
        assert!(!scenes.scene("menu").unwrap().is_active());
        // Entered during frame 1, so frames 1..10 update the level.
        assert_eq!(level_updates.borrow().len(), 9);
    }

    #[test]
    fn test_timer_can_queue_a_transition() {
        let clock = ManualClock::new();
        let mut app = App::with_clock(small_config(), clock.clone());
        app.init_scenes(vec![Scene::new("intro"), Scene::new("title")])
            .unwrap();

        let requests = app.scenes().requests();
        app.time_mut().start_timer(
            Timer::new("intro", Duration::from_secs(1))
                .on_end(move || requests.transition_to("title")),
        );
        clock.advance(Duration::from_secs(2));

        let mut platform = HeadlessPlatform::new(Some(2));
        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();
        assert_eq!(app.scenes().current_scene_name().unwrap(), "title");
    }

    #[test]
    fn test_bad_transition_request_fails_the_run() {
        let mut app = App::new(small_config());
        app.init_scenes(vec![Scene::new("main")]).unwrap();
        app.scenes().requests().transition_to("missing");

        let mut platform = HeadlessPlatform::new(Some(5));
        let result = app.run_with_clock(&mut platform, FrameClock::fixed(DT));
        assert!(matches!(
            result,
            Err(AppError::Scene(SceneError::SceneNotFound(_)))
        ));
        assert!(!app.is_running());
        assert_eq!(platform.frames_presented(), 0);
    }

    #[test]
    fn test_stop_before_run_is_honoured_once() {
        let mut app = App::new(small_config());
        app.init_scenes(vec![Scene::new("main")]).unwrap();
        app.stop_handle().stop();

        let mut platform = HeadlessPlatform::new(Some(3));
        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();
        assert_eq!(platform.frames_presented(), 0);
        assert_eq!(app.frame_count(), 0);

        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();
        assert_eq!(platform.frames_presented(), 3);
    }

    #[test]
    fn test_max_frames_stops_loop() {
        let mut config = small_config();
        config.debug.max_frames = Some(5);
        let mut app = App::new(config);
        app.init_scenes(vec![Scene::new("main")]).unwrap();
        let mut platform = HeadlessPlatform::new(None);
        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();
        assert_eq!(platform.frames_presented(), 5);
    }

    #[test]
    fn test_timer_callback_can_stop_the_app() {
        let clock = ManualClock::new();
        let mut app = App::with_clock(small_config(), clock.clone());
        app.init_scenes(vec![Scene::new("main")]).unwrap();

        let stop = app.stop_handle();
        app.time_mut()
            .start_timer(Timer::new("end", Duration::from_secs(1)).on_end(move || stop.stop()));

        struct Ticker(ManualClock);
        impl SceneLogic for Ticker {
            fn update(&mut self, _scene: &mut Scene, _arena: &mut EntityArena, _dt: f32) {
                self.0.advance(Duration::from_millis(250));
            }
        }
        app.scenes_mut()
            .add_scene(Scene::new("ticker").with_logic(Ticker(clock)))
            .unwrap();
        app.scenes_mut()
            .scene_mut("ticker")
            .unwrap()
            .set_active(true);

        let mut platform = HeadlessPlatform::new(Some(100));
        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();
        assert_eq!(app.frame_count(), 4);
        assert!(app.time().is_empty());
    }

    #[test]
    fn test_frame_is_cleared_and_drawn() {
        let mut app = App::new(small_config());
        app.init_scenes(vec![Scene::new("main")]).unwrap();
        let block = Entity::new()
            .with_rect(Rect::new(0.0, 0.0, 8.0, 8.0))
            .with_sprite(rootfw_scene::Sprite::solid(8, 8, [255, 0, 0, 255]));
        app.scenes_mut()
            .spawn_into("main", rootfw_scene::Layer::Hud, block)
            .unwrap();

        let mut platform = HeadlessPlatform::new(Some(1));
        app.run_with_clock(&mut platform, FrameClock::fixed(DT))
            .unwrap();
        assert_eq!(app.canvas().pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(app.canvas().pixel(40, 40), Some(BACKGROUND));
    }

    #[test]
    fn test_init_scenes_applies_window_and_debug_settings() {
        let mut config = small_config();
        config.debug.show_colliders = true;
        let mut app = App::new(config);
        app.init_scenes(vec![Scene::new("a"), Scene::new("b")])
            .unwrap();
        for scene in app.scenes().scenes() {
            assert_eq!(scene.camera().screen_size(), rootfw_math::Vec2::new(64.0, 48.0));
            assert!(scene.show_colliders());
        }
        assert_eq!(app.scenes().current_scene_name().unwrap(), "a");
    }

    #[test]
    fn test_resources_resolve_against_config_path() {
        let dir = tempfile::tempdir().unwrap();
        rootfw_assets::ImageHandle::solid(3, 2, [0, 0, 255, 255])
            .as_rgba()
            .save(dir.path().join("block.png"))
            .unwrap();

        let mut config = small_config();
        config.resources.resource_path = dir.path().to_path_buf();
        let mut app = App::new(config);
        let image = app.resources_mut().load_image("block.png");
        assert_eq!(image.size(), (3, 2));
        assert!(app.resources().get_image("block.png").is_some());
    }

    #[test]
    fn test_screenshot_error_converts() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(small_config());
        let missing = dir.path().join("no-such-dir").join("frame.png");
        let result: Result<(), AppError> = app.canvas().save_png(&missing).map_err(AppError::from);
        assert!(matches!(result, Err(AppError::Asset(_))));

        let target = dir.path().join("frame.png");
        app.canvas().save_png(&target).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn test_factories_use_config() {
        let mut config = small_config();
        config.physics.mass = 2.0;
        config.camera.zoom = 2.0;
        let app = App::new(config);
        let mut body = app.physics_body();
        body.apply_force(10.0, 0.0);
        assert_eq!(body.acceleration.x, 5.0);
        assert_eq!(app.new_camera().zoom(), 2.0);
        assert_eq!(app.new_camera().screen_size(), rootfw_math::Vec2::new(64.0, 48.0));
    }
}
