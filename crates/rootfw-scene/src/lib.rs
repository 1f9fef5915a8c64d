//! Scenes, entities, and cameras.
//!
//! A [`SceneManager`] owns an ordered list of [`Scene`]s and one
//! [`EntityArena`] shared by all of them. Scenes hold [`EntityId`] handles in
//! a world layer (camera-transformed, colliding) and a HUD layer (screen
//! space). Each frame the manager routes events to the current scene, updates
//! every active scene, and draws every visible one. Scene changes requested
//! from inside a frame are queued through [`SceneRequests`] and applied by
//! the manager's owner between phases.

mod arena;
mod behavior;
mod camera;
mod entity;
mod error;
mod event;
mod manager;
mod requests;
mod scene;
mod sprite;

pub use arena::{EntityArena, EntityId};
pub use behavior::Behavior;
pub use camera::{Camera, DEFAULT_SMOOTHNESS, MIN_ZOOM};
pub use entity::{DEFAULT_DEBUG_COLOR, Entity};
pub use error::SceneError;
pub use event::{Event, Key, MouseButton};
pub use manager::SceneManager;
pub use requests::{SceneRequest, SceneRequests};
pub use scene::{DEFAULT_SCREEN_SIZE, Layer, Scene, SceneLogic};
pub use sprite::Sprite;
