//! Application services - use case orchestration.

pub mod listing_workflow;
pub mod session_manager;

pub use listing_workflow::{ListingWorkflow, WorkflowConfig};
pub use session_manager::{SessionManager, SessionState};
