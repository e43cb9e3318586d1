//! Search coordinator for archon: a pool of isolated search workers fed by
//! message passing, with progress relay and an outer timeout.

pub mod coordinator;
pub mod error;
mod worker;

pub use coordinator::{Coordinator, CoordinatorConfig, SearchRequest, SearchTicket};
pub use error::CoordError;
