use std::collections::{HashMap, HashSet};

use crate::flow::entity::{FlowKey, FlowRecord};

/// Merge an incoming flow batch into the previous matrix snapshot.
///
/// The result is a brand-new row list; neither input is mutated. Row
/// order is: previous rows in their existing order (updated in place),
/// then genuinely new rows in batch order, then the rebuilt catch-all.
///
/// Steps:
/// 1. rows whose key already exists are overwritten field-by-field
///    (absent optional fields keep the prior value), new keys append;
/// 2. removal markers delete their key, winning over any update of the
///    same key in the same batch;
/// 3. transient per-run annotations (`next_hop`) are stripped;
/// 4. ids are renumbered as a dense 1-based sequence without re-sorting;
/// 5. any old catch-all is dropped and a fresh one appended last, its id
///    one past the surviving row count.
pub fn reconcile(previous: &[FlowRecord], incoming: &[FlowRecord]) -> Vec<FlowRecord> {
    let mut merged: Vec<FlowRecord> = previous.to_vec();
    let mut index: HashMap<FlowKey, usize> = merged
        .iter()
        .enumerate()
        .map(|(pos, rec)| (rec.key(), pos))
        .collect();

    for rec in incoming {
        match index.get(&rec.key()) {
            Some(&pos) => merged[pos].merge_from(rec),
            None => {
                index.insert(rec.key(), merged.len());
                merged.push(rec.clone());
            }
        }
    }

    let removals: HashSet<FlowKey> = incoming
        .iter()
        .filter(|rec| rec.is_remove_marker())
        .map(|rec| rec.key())
        .collect();
    if !removals.is_empty() {
        merged.retain(|rec| !removals.contains(&rec.key()));
    }

    merged.retain(|rec| !rec.is_catch_all());

    for (pos, rec) in merged.iter_mut().enumerate() {
        rec.next_hop = None;
        rec.id = Some(pos as u32 + 1);
    }

    let catch_all_id = merged.len() as u32 + 1;
    merged.push(FlowRecord::catch_all(catch_all_id));
    merged
}
