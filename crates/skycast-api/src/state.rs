use std::sync::Arc;

use skycast_store::UserRepository;

use crate::report::ReportDispatcher;

/// Shared handler state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub reports: Arc<ReportDispatcher>,
}

impl AppState {
    pub fn new(users: UserRepository, reports: Arc<ReportDispatcher>) -> Self {
        Self { users, reports }
    }
}
