//! Demo runner: a small platformer level driven by scripted input.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p rootfw-app -- --frames 300 --screenshot last.png`.

use std::time::Duration;

use clap::Parser;
use rootfw_app::{App, AppError, HeadlessPlatform};
use rootfw_config::{CliArgs, Config, default_config_dir};
use rootfw_math::{Rect, Vec2};
use rootfw_scene::{Entity, EntityArena, Event, Key, Layer, Scene, SceneLogic, Sprite};
use rootfw_time::Timer;
use tracing::info;

const LEVEL: &str = "level";
const DEFAULT_DEMO_FRAMES: u64 = 240;
const WORLD_SIZE: (f32, f32) = (1600.0, 600.0);
const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 400.0);

/// Puts the player back at the spawn point when it falls out of the world,
/// and keeps the HUD marker in step with the player's progress.
struct LevelLogic;

impl SceneLogic for LevelLogic {
    fn on_enter(&mut self, scene: &mut Scene, _arena: &mut EntityArena) {
        info!(scene = scene.name(), "Level entered");
    }

    fn update(&mut self, scene: &mut Scene, arena: &mut EntityArena, _dt: f32) {
        let Some(player) = scene.get_by_tags(arena, &["player"]).first().copied() else {
            return;
        };
        let Some(entity) = arena.get_mut(player) else {
            return;
        };
        if entity.rect.top() > WORLD_SIZE.1 {
            info!("Player fell out of the world, respawning");
            entity.set_position(PLAYER_SPAWN.x, PLAYER_SPAWN.y);
            if let Some(body) = entity.body.as_mut() {
                body.velocity = Vec2::ZERO;
            }
        }
        let progress = (entity.rect.left() / WORLD_SIZE.0).clamp(0.0, 1.0);

        for marker in scene.get_by_tags(arena, &["progress"]) {
            if let Some(marker) = arena.get_mut(marker) {
                marker.rect.w = (200.0 * progress).max(1.0);
            }
        }
    }
}

fn build_level(app: &mut App) -> Result<(), AppError> {
    let camera = app
        .new_camera()
        .with_world_size(WORLD_SIZE.0, WORLD_SIZE.1);
    app.init_scenes(vec![
        Scene::new(LEVEL).with_logic(LevelLogic).with_camera(camera),
    ])?;

    let ground = [80, 160, 80, 255];
    let blocks = [
        Rect::new(0.0, 560.0, 700.0, 40.0),
        Rect::new(800.0, 560.0, 800.0, 40.0),
        Rect::new(300.0, 470.0, 120.0, 20.0),
        Rect::new(520.0, 400.0, 120.0, 20.0),
        Rect::new(1000.0, 480.0, 60.0, 80.0),
    ];
    for rect in blocks {
        let block = Entity::new()
            .with_sprite(Sprite::solid(rect.w as u32, rect.h as u32, ground))
            .with_rect(rect)
            .with_tags(&["solid"]);
        app.scenes_mut().spawn_into(LEVEL, Layer::World, block)?;
    }

    let player = Entity::new()
        .with_sprite(Sprite::solid(24, 32, [230, 200, 60, 255]))
        .with_tags(&["player"])
        .with_body(app.physics_body())
        .with_behavior(app.platformer_controller());
    let player_id = app.scenes_mut().spawn_into(LEVEL, Layer::World, player)?;
    if let Some(entity) = app.scenes_mut().entity_mut(player_id) {
        entity.set_position(PLAYER_SPAWN.x, PLAYER_SPAWN.y);
    }

    let progress = Entity::new()
        .with_sprite(Sprite::solid(1, 8, [240, 240, 240, 255]))
        .with_rect(Rect::new(10.0, 10.0, 1.0, 8.0))
        .with_tags(&["progress"]);
    app.scenes_mut().spawn_into(LEVEL, Layer::Hud, progress)?;

    if let Some(scene) = app.scenes_mut().scene_mut(LEVEL) {
        scene.camera_mut().follow(player_id, Vec2::new(0.0, -50.0));
    }

    app.time_mut().start_timer(
        Timer::new("heartbeat", Duration::from_secs(1))
            .looping(true)
            .on_end(|| info!("Heartbeat")),
    );
    Ok(())
}

/// Run right, hop onto the first platform, then come back.
fn scripted_input(frames: u64) -> HeadlessPlatform {
    HeadlessPlatform::new(Some(frames))
        .with_event_at(10, Event::KeyDown(Key::Right))
        .with_event_at(40, Event::KeyDown(Key::Space))
        .with_event_at(48, Event::KeyUp(Key::Space))
        .with_event_at(120, Event::KeyUp(Key::Right))
        .with_event_at(130, Event::KeyDown(Key::Left))
        .with_event_at(200, Event::KeyUp(Key::Left))
}

fn run() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args);

    rootfw_log::init_logging(Some(&config_dir.join("logs")), Some(&config));
    info!(
        "Starting {} ({}x{} @ {} fps)",
        config.window.title, config.window.width, config.window.height, config.window.target_fps
    );

    let frames = config.debug.max_frames.unwrap_or(DEFAULT_DEMO_FRAMES);
    let mut app = App::new(config);
    build_level(&mut app)?;

    let mut platform = scripted_input(frames);
    app.run(&mut platform)?;
    info!(frames = platform.frames_presented(), "Demo finished");

    if let Some(path) = args.screenshot.as_deref() {
        app.canvas().save_png(path)?;
        info!("Saved last frame to {}", path.display());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("rootfw: {e}");
        std::process::exit(1);
    }
}

