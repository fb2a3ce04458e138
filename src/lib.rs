//! Particula Rigid - 2D rigid-body physics in WASM
//!
//! Architecture:
//! - core/        - Vector math, errors, logging
//! - ecs/         - Entity/component store and queries
//! - domain/      - Component data types
//! - systems/     - Collision detection and the impulse solver
//! - simulation/  - World orchestration and the JS facade

pub mod core;
pub mod ecs;
pub mod domain;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Thread pool initialization for the parallel integration pass
#[cfg(all(feature = "parallel", target_arch = "wasm32", target_feature = "atomics"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    core::logging::install(log::LevelFilter::Info);
    log::info!("Particula rigid-body engine {} initialized", version());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::{ConfigError, StoreError, Vector};
pub use ecs::{ComponentKind, Entity, Store};
pub use simulation::{PerfStats, PhysicsWorld, World};
pub use systems::collision::{Boundary, BoundaryTag, Detector, DetectorConfig, WorldBounds};
pub use systems::solver::{CollisionEvent, Solver, SolverConfig, SolverPatch};
