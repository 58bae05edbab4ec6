//! Rentals: gear hired out to a client without a production attached.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::Interval;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: Uuid,

    /// Who is renting. Shown as the booking label in conflict lists.
    pub client: String,

    pub interval: Interval,
    pub status: RentalStatus,

    #[serde(default)]
    pub items: Vec<RentalLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RentalStatus {
    Reserved,
    /// Gear has left the warehouse.
    Out,
    /// Gear is back; the rental no longer holds units.
    Returned,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalLine {
    pub item_id: Uuid,
    pub quantity: u32,
}

impl Rental {
    /// Whether the rental still holds its units.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, RentalStatus::Cancelled | RentalStatus::Returned)
    }
}
