//! One cascading dropdown's state and pure operations.

use crate::record::{self, PropertyFilter, Record};
use crate::topology::NodeSpec;

// ─── FilterNode ──────────────────────────────────────────────────────────────

/// State of a single select filter.
///
/// The selection is kept as a normalized value list: empty strings and
/// the placeholder sentinel are never stored, and a single-select node
/// holds at most one entry. `visible` is the node's visible subset,
/// held as indices into the cascade's record store.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    field: String,
    label: String,
    parent: Option<String>,
    multi: bool,
    selection: Vec<String>,
    available_values: Vec<String>,
    pub(crate) visible: Vec<usize>,
    /// Slot of the parent node, resolved at link time. None for roots
    /// and for parent names no node was registered under.
    pub(crate) parent_index: Option<usize>,
}

impl FilterNode {
    pub fn from_spec(spec: &NodeSpec) -> Self {
        Self {
            field: spec.field.clone(),
            label: spec.label.clone().unwrap_or_else(|| spec.field.clone()),
            parent: spec.parent.clone(),
            multi: spec.multi,
            selection: Vec::new(),
            available_values: Vec::new(),
            visible: Vec::new(),
            parent_index: None,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Declared parent field name, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// The "nothing chosen" sentinel shown first in single-select lists.
    pub fn placeholder(&self) -> String {
        format!("Select a {}...", self.label)
    }

    /// Current selection as a value list: empty when nothing is chosen,
    /// one entry for single-select, the full chosen set for multi.
    pub fn selection_values(&self) -> &[String] {
        &self.selection
    }

    /// Option list computed by the last resolution pass.
    pub fn available_values(&self) -> &[String] {
        &self.available_values
    }

    /// Replace the selection. Empty strings and the placeholder sentinel
    /// clear rather than select; a single-select node keeps only the
    /// first meaningful value.
    pub fn set_selection<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let placeholder = self.placeholder();
        let mut cleaned: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.is_empty() && *v != placeholder)
            .collect();
        if !self.multi {
            cleaned.truncate(1);
        }
        self.selection = cleaned;
    }

    /// Clear the selection back to "nothing chosen".
    pub fn reset(&mut self) {
        self.selection.clear();
    }

    /// Joined selection text for display; empty when nothing is chosen.
    pub fn display_text(&self) -> String {
        self.selection.join(", ")
    }

    /// Whether this node currently contributes a constraint.
    pub fn is_active(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Recompute the option list from the parent-visible records:
    /// distinct values of this node's field, sorted, with the placeholder
    /// prepended for single-select nodes. Never looks at this node's own
    /// selection, so a selection can never narrow its own option list.
    pub fn compute_available_values<'r>(
        &mut self,
        source: impl IntoIterator<Item = &'r Record>,
    ) {
        let values = record::distinct_text_values(source, &self.field);
        self.available_values = if self.multi {
            values
        } else {
            let mut list = Vec::with_capacity(values.len() + 1);
            list.push(self.placeholder());
            list.extend(values);
            list
        };
    }

    /// This node's constraint over its own field, for the filtering
    /// primitive. Unselected nodes yield an unconstrained filter.
    pub(crate) fn property_filter(&self) -> PropertyFilter {
        PropertyFilter::new(self.field.clone(), self.selection.clone())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
