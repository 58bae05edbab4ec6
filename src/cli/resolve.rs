//! Resolve a record reference (full UUID or unambiguous prefix) to a record.

use uuid::Uuid;

use crate::ledger::Booking;
use crate::model::{CrewMember, InventoryItem, Job};

/// Something the CLI can look up by id.
pub(super) trait Record {
    /// What to call it in error messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

impl Record for InventoryItem {
    const KIND: &'static str = "item";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Job {
    const KIND: &'static str = "job";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for CrewMember {
    const KIND: &'static str = "crew member";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Booking {
    const KIND: &'static str = "booking";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Finds the one record whose id is `reference` or starts with it.
pub(super) fn resolve<'a, T: Record>(records: &'a [T], reference: &str) -> Result<&'a T, String> {
    let kind = T::KIND;

    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| format!("{kind} not found: {id}"));
    }

    let reference = reference.to_ascii_lowercase();
    let matches: Vec<&T> = records
        .iter()
        .filter(|r| r.id().to_string().starts_with(&reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {kind} matching '{reference}'")),
        [one] => Ok(*one),
        many => {
            let ids: Vec<String> = many
                .iter()
                .map(|r| r.id().to_string()[..8].to_string())
                .collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} {kind}s: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> InventoryItem {
        InventoryItem {
            id: id.parse().unwrap(),
            name: "Hazer".into(),
            category: "effects".into(),
            total_owned: 2,
        }
    }

    fn items() -> Vec<InventoryItem> {
        vec![
            item("a3b0fc12-0000-4000-8000-000000000001"),
            item("a3b9aa00-0000-4000-8000-000000000002"),
            item("c0ffee00-0000-4000-8000-000000000003"),
        ]
    }

    #[test]
    fn full_uuid_resolves() {
        let items = items();
        let found = resolve(&items, "c0ffee00-0000-4000-8000-000000000003").unwrap();
        assert_eq!(found.id, items[2].id);
    }

    #[test]
    fn unique_prefix_resolves_case_insensitively() {
        let items = items();
        let found = resolve(&items, "A3B0").unwrap();
        assert_eq!(found.id, items[0].id);
    }

    #[test]
    fn ambiguous_prefix_lists_candidates() {
        let err = resolve(&items(), "a3b").unwrap_err();
        assert!(err.contains("ambiguous"));
        assert!(err.contains("a3b0fc12"));
        assert!(err.contains("a3b9aa00"));
    }

    #[test]
    fn unknown_references_fail() {
        assert!(resolve(&items(), "ffff").unwrap_err().contains("no item matching"));
        let err = resolve(&items(), "00000000-0000-4000-8000-000000000000").unwrap_err();
        assert!(err.contains("item not found"));
    }
}
