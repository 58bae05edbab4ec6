//! Commitment ledger: demand versus supply for shared inventory.
//!
//! Jobs and rentals are both bookings: a time window plus claims on
//! catalog items. Availability for an item over a window is its owned
//! count minus every claim from every active booking whose window
//! intersects the query. The result is advisory. Over-allocation is
//! reported, never prevented; admission is the caller's decision
//! (see `Storage::reserve_job` for the serialized commit step).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::Interval;
use crate::model::{InventoryItem, Job, MaterialSource, Rental, Snapshot};

/// Which kind of record a booking was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingKind {
    Job,
    Rental,
}

/// A claim on `quantity` units of one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub item_id: Uuid,
    pub quantity: u32,
}

/// A time-bounded set of claims, derived from a job or a rental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub kind: BookingKind,
    pub label: String,
    pub interval: Interval,
    pub active: bool,
    pub claims: Vec<Claim>,
}

impl Booking {
    /// Derives a booking from a job.
    ///
    /// Only internally sourced gear with a catalog id competes for the pool.
    /// Hired or bought lines are somebody else's stock.
    pub fn from_job(job: &Job) -> Self {
        let claims = job
            .materials
            .iter()
            .filter(|m| m.source == MaterialSource::Internal)
            .filter_map(|m| {
                m.item_id.map(|item_id| Claim {
                    item_id,
                    quantity: m.quantity,
                })
            })
            .collect();

        Self {
            id: job.id,
            kind: BookingKind::Job,
            label: job.name.clone(),
            interval: job.interval,
            active: job.is_active(),
            claims,
        }
    }

    pub fn from_rental(rental: &Rental) -> Self {
        Self {
            id: rental.id,
            kind: BookingKind::Rental,
            label: rental.client.clone(),
            interval: rental.interval,
            active: rental.is_active(),
            claims: rental
                .items
                .iter()
                .map(|l| Claim {
                    item_id: l.item_id,
                    quantity: l.quantity,
                })
                .collect(),
        }
    }

    /// Total units this booking claims of `item_id`, or `None` if it claims none.
    ///
    /// Repeated lines for the same item are summed.
    pub fn claim_for(&self, item_id: Uuid) -> Option<u32> {
        self.claims
            .iter()
            .filter(|c| c.item_id == item_id)
            .map(|c| c.quantity)
            .reduce(u32::saturating_add)
    }

    /// Claims merged per item, in first-seen order.
    pub fn merged_claims(&self) -> Vec<Claim> {
        let mut merged: Vec<Claim> = Vec::new();
        for claim in &self.claims {
            match merged.iter_mut().find(|c| c.item_id == claim.item_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(claim.quantity);
                }
                None => merged.push(*claim),
            }
        }
        merged
    }
}

/// One booking contributing to an item's demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub booking_id: Uuid,
    pub kind: BookingKind,
    pub label: String,
    pub quantity: u32,
}

/// What is left of an item over a window, and who holds the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub item_id: Uuid,

    /// Owned units still free. Never negative.
    pub available: u32,

    /// Every overlapping booking claiming the item, in enumeration order.
    pub conflicts: Vec<Conflict>,
}

impl Availability {
    /// Units claimed by the conflicting bookings.
    pub fn demand(&self) -> u64 {
        self.conflicts.iter().map(|c| u64::from(c.quantity)).sum()
    }

    /// How many of `requested` units cannot be covered.
    pub fn shortfall(&self, requested: u32) -> u32 {
        requested.saturating_sub(self.available)
    }
}

/// Per-item verdict when checking a whole booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCheck {
    pub requested: u32,
    pub shortfall: u32,
    pub availability: Availability,
}

/// Inventory plus every booking that may claim it, as of one snapshot.
pub struct Ledger<'a> {
    inventory: &'a [InventoryItem],
    bookings: Vec<Booking>,
}

impl<'a> Ledger<'a> {
    pub fn new(inventory: &'a [InventoryItem], bookings: Vec<Booking>) -> Self {
        Self {
            inventory,
            bookings,
        }
    }

    /// Builds a ledger over all jobs then all rentals in the snapshot.
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        let bookings = snapshot
            .jobs
            .iter()
            .map(Booking::from_job)
            .chain(snapshot.rentals.iter().map(Booking::from_rental))
            .collect();
        Self::new(&snapshot.inventory, bookings)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Free units of `item_id` over `interval`, ignoring `exclude` if given.
    ///
    /// Pass the id of a booking being edited as `exclude` so it doesn't
    /// compete with itself. Unknown items report nothing available.
    pub fn check_availability(
        &self,
        item_id: Uuid,
        interval: &Interval,
        exclude: Option<Uuid>,
    ) -> Availability {
        let Some(item) = self.inventory.iter().find(|i| i.id == item_id) else {
            tracing::debug!(%item_id, "availability check for unknown item");
            return Availability {
                item_id,
                available: 0,
                conflicts: Vec::new(),
            };
        };

        let mut remaining = i64::from(item.total_owned);
        let mut conflicts = Vec::new();

        for booking in &self.bookings {
            if !booking.active
                || Some(booking.id) == exclude
                || !booking.interval.overlaps(interval)
            {
                continue;
            }
            let Some(quantity) = booking.claim_for(item_id) else {
                continue;
            };
            remaining -= i64::from(quantity);
            conflicts.push(Conflict {
                booking_id: booking.id,
                kind: booking.kind,
                label: booking.label.clone(),
                quantity,
            });
        }

        if remaining < 0 {
            tracing::debug!(
                item = %item.name,
                over_by = -remaining,
                "item is oversubscribed"
            );
        }

        Availability {
            item_id,
            available: u32::try_from(remaining.max(0)).unwrap_or(u32::MAX),
            conflicts,
        }
    }

    /// Checks every item a booking claims against everyone else's claims.
    ///
    /// The booking's own id is excluded, so re-checking an edited booking
    /// against a ledger that already contains it behaves as expected.
    pub fn check_booking(&self, booking: &Booking) -> Vec<ClaimCheck> {
        booking
            .merged_claims()
            .into_iter()
            .map(|claim| {
                let availability =
                    self.check_availability(claim.item_id, &booking.interval, Some(booking.id));
                ClaimCheck {
                    requested: claim.quantity,
                    shortfall: availability.shortfall(claim.quantity),
                    availability,
                }
            })
            .collect()
    }
}
