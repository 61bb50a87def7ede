//! The filter coordinator: owns the record set and the node chain, and
//! runs the resolution pass that keeps them consistent.
//!
//! Nodes are registered in declaration order, which need not be
//! dependency order; a pass walks each node's parent chain first, so an
//! arbitrarily ordered registration list still resolves dependency-first.
//! Parent links are validated to be acyclic when records are loaded, so
//! the walk is bounded by construction.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::{debug, trace};

use crate::error::{CascadeError, CascadeResult};
use crate::filter::node::FilterNode;
use crate::filter::observer::{FilterEvent, FilterObserver};
use crate::record::{Record, matches_properties};
use crate::topology::{NodeSpec, Topology};

// ─── Cascade ─────────────────────────────────────────────────────────────────

/// Coordinator for a chain of cascading select filters.
pub struct Cascade {
    records: Vec<Record>,
    nodes: Vec<FilterNode>,
    /// Field name → slot in `nodes`. Duplicates are rejected at
    /// registration, so the mapping is unambiguous.
    index: HashMap<String, usize>,
    /// Indices of records matching the conjunction of all active filters.
    selected: Vec<usize>,
    /// Fields that contributed a constraint in the last pass.
    active: Vec<String>,
    /// Latch making `resolve_all` non-reentrant.
    resolving: bool,
    observers: Vec<Box<dyn FilterObserver>>,
    /// Events raised during a pass, dispatched once the pass completes.
    pending: Vec<FilterEvent>,
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
            selected: Vec::new(),
            active: Vec::new(),
            resolving: false,
            observers: Vec::new(),
            pending: Vec::new(),
        }
    }

    // ─── Construction ────────────────────────────────────────────────────────

    /// Register one filter node. Fails if a node already filters on the
    /// same field.
    pub fn register(&mut self, spec: NodeSpec) -> CascadeResult<()> {
        if self.index.contains_key(&spec.field) {
            return Err(CascadeError::DuplicateNode(spec.field));
        }
        self.index.insert(spec.field.clone(), self.nodes.len());
        self.nodes.push(FilterNode::from_spec(&spec));
        Ok(())
    }

    /// Subscribe to change events. Observers are never removed.
    pub fn subscribe(&mut self, observer: impl FilterObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Store the record set, run the node-construction callback, validate
    /// the parent topology, and perform the first resolution pass.
    ///
    /// The callback indirection lets the node chain be declared before
    /// any data exists; it runs exactly once per load.
    pub fn load_records<F>(&mut self, records: Vec<Record>, build_nodes: F) -> CascadeResult<()>
    where
        F: FnOnce(&mut Cascade) -> CascadeResult<()>,
    {
        self.records = records;
        build_nodes(self)?;
        self.link()?;
        debug!(
            records = self.records.len(),
            nodes = self.nodes.len(),
            "records loaded"
        );
        self.resolve_all();
        self.pending.push(FilterEvent::RecordsLoaded {
            count: self.records.len(),
        });
        self.dispatch();
        Ok(())
    }

    /// `load_records` with the node chain taken from a declarative
    /// topology.
    pub fn load_topology(&mut self, records: Vec<Record>, topology: &Topology) -> CascadeResult<()> {
        let specs = topology.nodes.clone();
        self.load_records(records, move |cascade| {
            for spec in specs {
                cascade.register(spec)?;
            }
            Ok(())
        })
    }

    /// Resolve declared parent names to node slots and reject cyclic
    /// parent links. A parent name no node was registered under is not an
    /// error: the node becomes a root over the full record set.
    fn link(&mut self) -> CascadeResult<()> {
        for i in 0..self.nodes.len() {
            let parent_index = self.nodes[i]
                .parent()
                .and_then(|p| self.index.get(p))
                .copied();
            self.nodes[i].parent_index = parent_index;
        }

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let ids: Vec<_> = (0..self.nodes.len()).map(|i| graph.add_node(i)).collect();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent_index {
                graph.add_edge(ids[parent], ids[i], ());
            }
        }
        match toposort(&graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => {
                let field = self.nodes[graph[cycle.node_id()]].field().to_string();
                Err(CascadeError::DependencyCycle(field))
            }
        }
    }

    // ─── Resolution ──────────────────────────────────────────────────────────

    /// One full resolution pass: every node's options and visible subset
    /// are recomputed dependency-first, then the global selection.
    ///
    /// A nested call while a pass is in progress is a silent no-op, not a
    /// queued retry. Buffered events are dispatched after the pass.
    pub fn resolve_all(&mut self) {
        if self.resolving {
            trace!("resolution already in progress, ignoring nested trigger");
            return;
        }
        self.resolving = true;
        let mut processed = vec![false; self.nodes.len()];
        for idx in 0..self.nodes.len() {
            self.resolve_node(idx, &mut processed);
        }
        self.recompute_selected();
        self.resolving = false;
        self.dispatch();
    }

    /// Resolve one node, its parent chain first. No-op when the node was
    /// already handled this pass.
    fn resolve_node(&mut self, idx: usize, processed: &mut [bool]) {
        if processed[idx] {
            return;
        }
        processed[idx] = true;
        if let Some(parent) = self.nodes[idx].parent_index {
            self.resolve_node(parent, processed);
        }

        // Source subset: the parent's visible records, or everything.
        let source: Vec<usize> = match self.nodes[idx].parent_index {
            Some(parent) => self.nodes[parent].visible.clone(),
            None => (0..self.records.len()).collect(),
        };

        let records = &self.records;
        let node = &mut self.nodes[idx];
        let before_options = node.available_values().to_vec();
        // Options derive from the parent's visible set, before this
        // node's own filter is applied.
        node.compute_available_values(source.iter().map(|&i| &records[i]));
        let filter = [node.property_filter()];
        let visible: Vec<usize> = source
            .into_iter()
            .filter(|&i| matches_properties(&records[i], &filter))
            .collect();
        let visible_changed = visible != node.visible;
        node.visible = visible;
        let options_changed = node.available_values() != before_options.as_slice();

        let field = self.nodes[idx].field().to_string();
        trace!(
            node = %field,
            options = self.nodes[idx].available_values().len(),
            visible = self.nodes[idx].visible.len(),
            "node resolved"
        );
        if options_changed {
            self.pending.push(FilterEvent::OptionsChanged {
                field: field.clone(),
                options: self.nodes[idx].available_values().to_vec(),
            });
        }
        if visible_changed {
            self.pending.push(FilterEvent::VisibleChanged {
                field,
                count: self.nodes[idx].visible.len(),
            });
        }
    }

    /// Recompute the global selection: the conjunction of every active
    /// node's constraint over the full record set.
    fn recompute_selected(&mut self) {
        let mut filters = Vec::new();
        let mut active = Vec::new();
        for node in &self.nodes {
            if node.is_active() {
                filters.push(node.property_filter());
                active.push(node.field().to_string());
            }
        }
        self.selected = (0..self.records.len())
            .filter(|&i| matches_properties(&self.records[i], &filters))
            .collect();
        self.active = active;
        debug!(
            active = ?self.active,
            selected = self.selected.len(),
            "selection resolved"
        );
        self.pending.push(FilterEvent::SelectionResolved {
            active: self.active.clone(),
            count: self.selected.len(),
        });
    }

    fn dispatch(&mut self) {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for observer in &mut self.observers {
                observer.on_event(event);
            }
        }
    }

    // ─── Selection surface ───────────────────────────────────────────────────

    /// Set a single value on `field`'s node and re-resolve.
    pub fn select(&mut self, field: &str, value: &str) -> CascadeResult<()> {
        self.select_many(field, &[value])
    }

    /// Set a value set on `field`'s node and re-resolve. A single-select
    /// node keeps only the first value.
    pub fn select_many(&mut self, field: &str, values: &[&str]) -> CascadeResult<()> {
        let idx = self.node_index(field)?;
        self.nodes[idx].set_selection(values.iter().copied());
        self.resolve_all();
        Ok(())
    }

    /// Clear one node's selection and re-resolve.
    pub fn clear(&mut self, field: &str) -> CascadeResult<()> {
        let idx = self.node_index(field)?;
        self.nodes[idx].reset();
        self.resolve_all();
        Ok(())
    }

    /// Clear every node's selection and re-resolve.
    pub fn reset_all(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.resolve_all();
    }

    /// Direct mutable access to one node, for callers that batch several
    /// selection changes before invoking `resolve_all` themselves.
    pub fn node_mut(&mut self, field: &str) -> CascadeResult<&mut FilterNode> {
        let idx = self.node_index(field)?;
        Ok(&mut self.nodes[idx])
    }

    // ─── Read surface ────────────────────────────────────────────────────────

    pub fn node(&self, field: &str) -> Option<&FilterNode> {
        self.index.get(field).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FilterNode> {
        self.nodes.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records matching the conjunction of all active filters.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.selected.iter().map(|&i| &self.records[i]).collect()
    }

    /// Fields that contributed a constraint in the last pass.
    pub fn active_filters(&self) -> &[String] {
        &self.active
    }

    pub fn available_values(&self, field: &str) -> CascadeResult<&[String]> {
        self.node(field)
            .map(|n| n.available_values())
            .ok_or_else(|| CascadeError::UnknownNode(field.to_string()))
    }

    /// The node's visible subset: its parent's visible records filtered
    /// by its own selection.
    pub fn visible_records(&self, field: &str) -> CascadeResult<Vec<&Record>> {
        let node = self
            .node(field)
            .ok_or_else(|| CascadeError::UnknownNode(field.to_string()))?;
        Ok(node.visible.iter().map(|&i| &self.records[i]).collect())
    }

    pub fn display_text(&self, field: &str) -> CascadeResult<String> {
        self.node(field)
            .map(|n| n.display_text())
            .ok_or_else(|| CascadeError::UnknownNode(field.to_string()))
    }

    fn node_index(&self, field: &str) -> CascadeResult<usize> {
        self.index
            .get(field)
            .copied()
            .ok_or_else(|| CascadeError::UnknownNode(field.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
