//! WASM bindings for cascade-select.
//!
//! Exposes the filter core to JavaScript via wasm-bindgen: construct a
//! `CascadeFilter` from records + topology JSON, then drive selections
//! and read dropdown state from the page.

use wasm_bindgen::prelude::*;

use crate::error::CascadeError;
use crate::filter::Cascade;
use crate::loader::records_from_json;
use crate::topology::Topology;

#[wasm_bindgen]
pub struct CascadeFilter {
    inner: Cascade,
}

#[wasm_bindgen]
impl CascadeFilter {
    /// Build a cascade from a records document and a topology document
    /// (JSON array of `{field, parent?, label?, multi?}` objects).
    #[wasm_bindgen(constructor)]
    pub fn new(records_json: &str, topology_json: &str) -> Result<CascadeFilter, JsError> {
        let records = records_from_json(records_json).map_err(to_js)?;
        let topology = Topology::from_json(topology_json).map_err(to_js)?;
        let mut inner = Cascade::new();
        inner.load_topology(records, &topology).map_err(to_js)?;
        Ok(Self { inner })
    }

    /// Set a single value; the empty string or the placeholder clears.
    pub fn select(&mut self, field: &str, value: &str) -> Result<(), JsError> {
        self.inner.select(field, value).map_err(to_js)
    }

    /// Set a multi-select value set.
    #[wasm_bindgen(js_name = "selectMany")]
    pub fn select_many(&mut self, field: &str, values: Vec<String>) -> Result<(), JsError> {
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        self.inner.select_many(field, &refs).map_err(to_js)
    }

    pub fn clear(&mut self, field: &str) -> Result<(), JsError> {
        self.inner.clear(field).map_err(to_js)
    }

    #[wasm_bindgen(js_name = "resetAll")]
    pub fn reset_all(&mut self) {
        self.inner.reset_all();
    }

    /// Option list for one dropdown.
    pub fn options(&self, field: &str) -> Result<Vec<String>, JsError> {
        self.inner
            .available_values(field)
            .map(<[String]>::to_vec)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = "displayText")]
    pub fn display_text(&self, field: &str) -> Result<String, JsError> {
        self.inner.display_text(field).map_err(to_js)
    }

    #[wasm_bindgen(js_name = "activeFilters")]
    pub fn active_filters(&self) -> Vec<String> {
        self.inner.active_filters().to_vec()
    }

    #[wasm_bindgen(js_name = "matchedCount")]
    pub fn matched_count(&self) -> usize {
        self.inner.selected_records().len()
    }

    /// Matching records as a JSON array string.
    #[wasm_bindgen(js_name = "selectedRecords")]
    pub fn selected_records(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.inner.selected_records())
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

fn to_js(err: CascadeError) -> JsError {
    JsError::new(&err.to_string())
}
