use std::fmt;

use serde::{Deserialize, Serialize};

/// Who is driving the booking: a self-service client or a receptionist booking
/// on a patient's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    Client,
    Staff,
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallerRole::Client => write!(f, "client"),
            CallerRole::Staff => write!(f, "staff"),
        }
    }
}
