//! # bowl_core - Deterministic Cricket Bowling Environment
//!
//! Single-agent sequential-decision environment: the agent is the bowler,
//! picking a normalized 5-component action each ball; a scripted batsman
//! reacts; runs, wickets, and a shaped reward come back.
//!
//! ## Features
//! - 100% deterministic episodes (same seed = same trajectory)
//! - Pure delivery physics, probability-table batsman, shaped reward
//! - Plain `reset`/`step` surface in the usual RL environment shape
//!
//! Policy optimization, checkpointing, and rendering are the caller's
//! business; this crate only simulates the innings.

pub mod batsman;
pub mod config;
pub mod env;
pub mod error;
pub mod physics;

pub use batsman::{Batsman, ShotPlayed, ShotType, Weakness};
pub use config::EnvConfig;
pub use env::{BowlingEnv, MatchState, Observation, StepInfo, StepResult};
pub use error::{EnvError, Result};
pub use physics::{simulate_delivery, Action, DeliveryParams, SpinKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
