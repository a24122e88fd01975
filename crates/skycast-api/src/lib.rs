//! HTTP surface and periodic job of the Skycast service.
//!
//! Both entry points share one [`ReportDispatcher`]: the on-demand
//! `GET /users/{userId}/weather` handler and the [`Scheduler`] tick.

pub mod error;
pub mod extract;
pub mod report;
pub mod routes;
pub mod scheduler;
pub mod state;

pub use error::ApiError;
pub use report::{DispatchOutcome, ReportDispatcher};
pub use routes::{router, serve};
pub use scheduler::{Scheduler, TickSummary};
pub use state::AppState;
