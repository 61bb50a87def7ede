//! Change events published by the cascade.
//!
//! Instead of implicit dependency tracking, every mutation a resolution
//! pass makes is announced explicitly: events raised during a pass are
//! buffered and dispatched only after the pass completes, so observer
//! reactions never interleave with in-progress resolution.

/// One observable state change.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    /// The record set was loaded and the first resolution pass ran;
    /// UI layers can bind now.
    RecordsLoaded { count: usize },
    /// A node's option list changed.
    OptionsChanged { field: String, options: Vec<String> },
    /// A node's visible record subset changed.
    VisibleChanged { field: String, count: usize },
    /// A resolution pass finished: the global selection was recomputed.
    SelectionResolved { active: Vec<String>, count: usize },
}

/// Receiver for cascade change events.
pub trait FilterObserver {
    fn on_event(&mut self, event: &FilterEvent);
}

impl<F: FnMut(&FilterEvent)> FilterObserver for F {
    fn on_event(&mut self, event: &FilterEvent) {
        self(event)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |event: &FilterEvent| seen.push(event.clone());
            observer.on_event(&FilterEvent::RecordsLoaded { count: 3 });
        }
        assert_eq!(seen, vec![FilterEvent::RecordsLoaded { count: 3 }]);
    }
}
