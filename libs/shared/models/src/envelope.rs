use serde::{Deserialize, Serialize};

/// `{ "data": [...] }` wrapper used by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

impl<T> DataEnvelope<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}
