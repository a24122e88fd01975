use serde::{Deserialize, Serialize};

/// A registered user: where to send reports and what to look up.
///
/// `email` and `location` are stored as given, empty strings included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub location: String,
}
