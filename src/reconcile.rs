//! Roster reconciliation engine.
//!
//! Merges per-image recognition results into one identification record per
//! distinct detected student and partitions the roster into present/absent.
//! Pure over its inputs; each processing cycle supersedes the previous one
//! entirely.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{DetectedStudent, RosterEntry};

/// One distinct detected student across all images of a processing cycle.
/// `total_detection_count` is the sum of that student's per-image counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentificationRecord {
    pub student_id: String,
    pub student_name: String,
    pub total_detection_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub present: Vec<IdentificationRecord>,
    pub absent: Vec<RosterEntry>,
}

/// Merge detection counts across images, rank `present` by descending total
/// count (first-seen order among ties), and take `absent` as the roster
/// members never detected, in original roster order.
///
/// A detected id that is not a roster member is still included in `present`,
/// so `present` can be a superset of the roster. Rejecting such ids is a
/// product decision nobody has made yet.
pub fn reconcile(
    roster: &[RosterEntry],
    per_image_results: &[Vec<DetectedStudent>],
) -> Reconciliation {
    let mut records: Vec<IdentificationRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for image in per_image_results {
        for det in image {
            match index.get(&det.id) {
                Some(&i) => records[i].total_detection_count += det.detection_count,
                None => {
                    index.insert(det.id.clone(), records.len());
                    records.push(IdentificationRecord {
                        student_id: det.id.clone(),
                        student_name: det.name.clone(),
                        total_detection_count: det.detection_count,
                    });
                }
            }
        }
    }

    // Stable sort: equal counts keep first-seen order.
    records.sort_by(|a, b| b.total_detection_count.cmp(&a.total_detection_count));

    let absent = roster
        .iter()
        .filter(|r| !index.contains_key(&r.student_id))
        .cloned()
        .collect();

    Reconciliation {
        present: records,
        absent,
    }
}
