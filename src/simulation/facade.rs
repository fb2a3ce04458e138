use wasm_bindgen::prelude::*;

use crate::core::Vector;

use super::perf_stats::PerfStats;
use super::PhysicsWorld;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct World {
    core: PhysicsWorld,
}

#[wasm_bindgen]
impl World {
    /// Create a new world with given dimensions
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            core: PhysicsWorld::new(width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn entity_count(&self) -> usize { self.core.store().len() }

    #[wasm_bindgen(getter)]
    pub fn contact_count(&self) -> usize { self.core.events().len() }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    pub fn configure_json(&mut self, json: String) -> Result<(), JsValue> {
        self.core.configure_json(&json).map_err(js_err)
    }

    pub fn configure_detector_json(&mut self, json: String) -> Result<(), JsValue> {
        self.core.configure_detector_json(&json).map_err(js_err)
    }

    pub fn set_gravity(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.core.set_gravity(x, y).map_err(js_err)
    }

    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.core.set_bounds(width, height);
    }

    /// Spawn from a `{ componentName: data }` JSON object; returns the entity id
    pub fn spawn_json(&mut self, json: String) -> Result<u32, JsValue> {
        self.core.spawn_json(&json).map_err(js_err)
    }

    pub fn spawn_circle(&mut self, x: f64, y: f64, radius: f64, inv_mass: f64) -> Result<u32, JsValue> {
        self.core.spawn_circle(x, y, radius, inv_mass).map_err(js_err)
    }

    pub fn spawn_box(
        &mut self,
        x: f64,
        y: f64,
        half_width: f64,
        half_height: f64,
        inv_mass: f64,
    ) -> Result<u32, JsValue> {
        self.core.spawn_box(x, y, half_width, half_height, inv_mass).map_err(js_err)
    }

    pub fn destroy(&mut self, id: u32) -> bool {
        self.core.destroy(id)
    }

    pub fn apply_force(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.core.apply_force(id, Vector::new(x, y))
    }

    pub fn apply_impulse(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.core.apply_impulse(id, Vector::new(x, y))
    }

    pub fn set_velocity(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.core.set_velocity(id, Vector::new(x, y))
    }

    /// NaN when the entity has no position
    pub fn position_x(&self, id: u32) -> f64 {
        self.core.position(id).map_or(f64::NAN, |p| p.x)
    }

    pub fn position_y(&self, id: u32) -> f64 {
        self.core.position(id).map_or(f64::NAN, |p| p.y)
    }

    /// NaN when the entity has no body
    pub fn velocity_x(&self, id: u32) -> f64 {
        self.core.velocity(id).map_or(f64::NAN, |v| v.x)
    }

    pub fn velocity_y(&self, id: u32) -> f64 {
        self.core.velocity(id).map_or(f64::NAN, |v| v.y)
    }

    pub fn is_sleeping(&self, id: u32) -> bool {
        self.core.is_sleeping(id)
    }

    /// Last step's contacts as a JSON array of
    /// `{ a, b, boundary, normal: { x, y }, penetration }`
    pub fn collisions_json(&self) -> String {
        self.core.collisions_json()
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Step the simulation forward by `dt` seconds
    pub fn step(&mut self, dt: f64) {
        self.core.step(dt);
    }
}
