//! The cascading filter core: nodes, coordinator, and change events.

pub mod cascade;
pub mod node;
pub mod observer;

pub use cascade::Cascade;
pub use node::FilterNode;
pub use observer::{FilterEvent, FilterObserver};
