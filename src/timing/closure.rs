use serde::{Deserialize, Serialize};

/// The administrator-set emergency override. A single record, flipped out
/// of band (equipment failure and the like); while set it wins over the
/// weekly calendar entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryClosure {
    pub is_closed: bool,
    pub reason: Option<String>,
    pub last_updated: String,
}
