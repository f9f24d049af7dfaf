//! WASM bindings for BFEM Core.
//!
//! Both analyses take the exported network as a JSON string and return their
//! report serialized as JSON.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { verify_topology, estimate_capacitance } from 'bfem_core';
//!
//! await init();
//!
//! const topo = JSON.parse(verify_topology(networkJson, 1e-3));
//! const cap = JSON.parse(estimate_capacitance(networkJson, 3.0, 50, 0.95, 0.35));
//! console.log(topo.violations, cap.c_eff_f);
//! ```

use wasm_bindgen::prelude::*;

use crate::capacitance::{estimate_network, EstimatorConfig};
use crate::error::BfemError;
use crate::network;
use crate::topology::{verify_network, TopologyConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: BfemError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js(BfemError::Wasm {
        message: e.to_string(),
    }))
}

/// Check whether the network forms a single series path.
///
/// # Arguments
/// * `network_json` - The exported conductor network document
/// * `tol_mm` - Endpoint match tolerance in millimeters (default: 1e-3)
#[wasm_bindgen]
pub fn verify_topology(network_json: &str, tol_mm: f64) -> Result<String, JsValue> {
    let net = network::parse(network_json).map_err(to_js)?;
    let config = TopologyConfig::new().with_tolerance_mm(tol_mm);
    let report = verify_network(&net, &config).map_err(to_js)?;
    to_json(&report)
}

/// Estimate the air-only effective capacitance of the network's first path.
///
/// # Arguments
/// * `network_json` - The exported conductor network document
/// * `search_mm` - Neighbor search radius in millimeters (default: 3.0)
/// * `min_index_sep` - Minimum segment index separation (default: 50)
/// * `parallel_cos` - Minimum |cos θ| for parallel segments (default: 0.95)
/// * `k` - Fudge factor (default: 0.35)
#[wasm_bindgen]
pub fn estimate_capacitance(
    network_json: &str,
    search_mm: f64,
    min_index_sep: usize,
    parallel_cos: f64,
    k: f64,
) -> Result<String, JsValue> {
    let net = network::parse(network_json).map_err(to_js)?;
    let config = EstimatorConfig::new()
        .with_search_radius_mm(search_mm)
        .with_min_index_sep(min_index_sep)
        .with_parallel_cos(parallel_cos)
        .with_k_factor(k);
    let report = estimate_network(&net, &config).map_err(to_js)?;
    to_json(&report)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
