//! Export orchestration
//!
//! This module provides the concurrent export engine:
//! - [`job`]: one table streamed into one file
//! - [`container`]: a container file fanned out into table jobs
//! - [`coordinator`]: tables, containers and folders of containers
//! - [`scheduler`]: the bounded worker pool all jobs share
//! - [`summary`]: aggregated results and exit status

pub mod container;
pub mod coordinator;
pub mod job;
pub mod scheduler;
pub mod summary;

pub use container::{ContainerOutcome, ContainerResolver};
pub use coordinator::{list_containers, plan_exports, ExportCoordinator, ExportPlan, PlannedExport};
pub use job::{TableExportJob, CANCEL_CHECK_INTERVAL};
pub use scheduler::JobScheduler;
pub use summary::{ExportSummary, EXIT_INTERRUPTED};
