//! Grouping of a submitted batch by subject identifier

use std::collections::HashMap;

use crate::core::models::Attestation;

/// Partition attestations by `data.id`
///
/// Groups are returned in first-seen order and each group keeps the relative
/// input order of its attestations.
#[must_use]
pub fn group_by_id(attestations: Vec<Attestation>) -> Vec<(String, Vec<Attestation>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Attestation>)> = Vec::new();

    for attestation in attestations {
        if let Some(&slot) = index.get(attestation.id()) {
            groups[slot].1.push(attestation);
        } else {
            let id = attestation.id().to_string();
            index.insert(id.clone(), groups.len());
            groups.push((id, vec![attestation]));
        }
    }

    groups
}
