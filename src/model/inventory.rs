//! Inventory catalog entries: finite pools of physical gear.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pool of identical units shared by every booking.
///
/// Owned by the catalog collaborator; immutable for a computation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub total_owned: u32,
}
