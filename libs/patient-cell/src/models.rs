use serde::{Deserialize, Serialize};

use shared_models::RecordId;

/// Patient record as listed to reception staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
}

impl Patient {
    /// Typeahead option label, e.g. `Asha Kulkarni (#104)`.
    pub fn display_label(&self) -> String {
        format!("{} (#{})", self.name, self.id)
    }
}
