//! Combat simulation core for an elemental bullet-hell shooter.
//!
//! The crate owns one explicit [`entities::GameState`] per run and advances it
//! with [`compute::step_frame`].  Rendering, audio and persistence live outside
//! and only ever read the state between steps.

pub mod affinity;
pub mod boss;
pub mod compute;
pub mod config;
pub mod difficulty;
pub mod entities;
pub mod error;
pub mod factory;
pub mod input;
pub mod patterns;
pub mod pool;

pub use compute::{hud, initialize_run, is_run_over, step_frame, Hud};
pub use config::GameConfig;
pub use entities::{Difficulty, Element, GameEvent, GameState, GameStatus};
pub use error::ConfigError;
pub use input::FrameInput;
