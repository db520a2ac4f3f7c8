//! Physics domain
//!
//! Rapier используется для shapes и ray queries (headless, без physics step
//! внутри симуляции). Физический шаг ragdoll: задача host приложения.
//!
//! - layers: collision layer маски
//! - query: `CollisionWorld` сервис + ECS backend `SceneQuery`
//! - motor: gravity + ground snap для vehicles

pub mod layers;
pub mod motor;
pub mod query;

pub use layers::*;
pub use motor::CharacterMotor;
pub use query::{CollisionWorld, EmptyWorld, RayHit, SceneQuery};
