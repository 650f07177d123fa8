// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Immutable diff between two snapshots of a node's neighbourhood matrix.
//!
//! A [`MatrixChange`] is built once per neighbourhood transition, queried
//! any number of times from any number of threads, then discarded. It never
//! mutates after construction, so it is freely `Send + Sync` without any
//! locking of its own.

use crate::node_id::{closer_to_target, NodeId};
use crate::parameters::Parameters;
use crate::types::{CheckHoldersResult, GroupRangeStatus, PmidNodeStatus};
use num_bigint::BigUint;
use std::collections::HashSet;

/// A diff between an old and a new neighbourhood-matrix snapshot, taken from
/// the point of view of `self_id`.
#[derive(Debug, Clone)]
pub struct MatrixChange {
    self_id: NodeId,
    old_sorted: Vec<NodeId>,
    new_sorted: Vec<NodeId>,
    lost: Vec<NodeId>,
    radius: BigUint,
    parameters: Parameters,
}

impl MatrixChange {
    /// Builds a `MatrixChange` from unsorted (possibly duplicated-free)
    /// snapshots of the local node's matrix, before and after a churn event.
    ///
    /// `old_matrix` and `new_matrix` must not contain `self_id` or
    /// duplicates; this is an input contract, not validated in release
    /// builds (see `spec.md` §7) beyond a `debug_assert!`.
    pub fn new(
        self_id: NodeId,
        old_matrix: Vec<NodeId>,
        new_matrix: Vec<NodeId>,
        parameters: Parameters,
    ) -> Self {
        debug_assert!(!old_matrix.contains(&self_id), "matrix must exclude self");
        debug_assert!(!new_matrix.contains(&self_id), "matrix must exclude self");
        debug_assert!(
            has_no_duplicates(&old_matrix),
            "old matrix must not contain duplicates"
        );
        debug_assert!(
            has_no_duplicates(&new_matrix),
            "new matrix must not contain duplicates"
        );

        let old_sorted = sorted_by_closeness(old_matrix, &self_id);
        let new_sorted = sorted_by_closeness(new_matrix, &self_id);
        let lost = lost_nodes(&old_sorted, &new_sorted);
        let radius = radius_for(&self_id, &new_sorted, &parameters);

        trace!(
            old_len = old_sorted.len(),
            new_len = new_sorted.len(),
            lost_len = lost.len(),
            "built MatrixChange"
        );

        Self {
            self_id,
            old_sorted,
            new_sorted,
            lost,
            radius,
            parameters,
        }
    }

    /// The previous snapshot, sorted by closeness to `self_id`.
    pub fn old_sorted(&self) -> &[NodeId] {
        &self.old_sorted
    }

    /// The current snapshot, sorted by closeness to `self_id`.
    pub fn new_sorted(&self) -> &[NodeId] {
        &self.new_sorted
    }

    /// `old_sorted \ new_sorted`, preserving order.
    pub fn lost(&self) -> &[NodeId] {
        &self.lost
    }

    /// The boundary of "proximal range": `proximity_factor` times the
    /// distance from `self_id` to its `closest_nodes_size`-th closest
    /// neighbour in `new_sorted` (or to the maximum id, if there are fewer
    /// than `closest_nodes_size` neighbours known).
    pub fn radius(&self) -> &BigUint {
        &self.radius
    }

    /// `true` iff the old and new snapshots are pointwise equal.
    pub fn old_equals_to_new(&self) -> bool {
        self.old_sorted == self.new_sorted
    }

    /// Computes which nodes hold `target`, and whether `self_id` is
    /// authoritative for it at all.
    ///
    /// See `spec.md` §4.B for the full algorithm; in short: if `self_id` is
    /// not itself among the `node_group_size` nodes closest to `target`,
    /// this node is not a holder and both result lists come back empty -
    /// the caller must not replicate on `target`'s behalf.
    pub fn check_holders(&self, target: NodeId) -> CheckHoldersResult {
        let group_plus_one = self.parameters.node_group_size() + 1;

        let mut old_close = closest_n_to(&self.old_sorted, &target, group_plus_one);
        let mut new_close = closest_n_to(&self.new_sorted, &target, group_plus_one);
        let mut lost_close = closest_n_to(&self.lost, &target, self.lost.len());

        old_close.retain(|id| *id != target);
        new_close.retain(|id| *id != target);
        lost_close.retain(|id| *id != target);

        old_close.truncate(self.parameters.node_group_size());
        new_close.truncate(self.parameters.node_group_size());

        let proximity_status = self.proximity_status(&target, &new_close);

        if proximity_status != GroupRangeStatus::InRange {
            return CheckHoldersResult {
                proximity_status,
                old_holders: Vec::new(),
                new_holders: Vec::new(),
            };
        }

        let old_close_set: HashSet<NodeId> = old_close.iter().copied().collect();
        let lost_close_set: HashSet<NodeId> = lost_close.iter().copied().collect();

        // old_holders = old_close ∩ lost_close, ordered by closeness to target.
        let old_holders: Vec<NodeId> = old_close
            .iter()
            .filter(|id| lost_close_set.contains(id))
            .copied()
            .collect();

        // new_holders = new_close \ old_close, ordered by closeness to target.
        let new_holders: Vec<NodeId> = new_close
            .iter()
            .filter(|id| !old_close_set.contains(id))
            .copied()
            .collect();

        CheckHoldersResult {
            proximity_status,
            old_holders,
            new_holders,
        }
    }

    /// Whether `self_id` is itself among the `node_group_size` ids closest
    /// to `target` (counting itself), or merely within `radius` of it.
    ///
    /// `new_close` is expected to already have `target` removed and be
    /// truncated to `node_group_size` entries, as `check_holders` does.
    fn proximity_status(&self, target: &NodeId, new_close: &[NodeId]) -> GroupRangeStatus {
        let mut candidates: Vec<NodeId> = new_close.to_vec();
        candidates.push(self.self_id);
        candidates.sort_by(|a, b| order_by_closeness(a, b, target));
        candidates.truncate(self.parameters.node_group_size());

        if candidates.contains(&self.self_id) {
            return GroupRangeStatus::InRange;
        }

        let distance_to_target = self.self_id.distance_as_bigint(target);
        if distance_to_target <= self.radius {
            GroupRangeStatus::InProximalRange
        } else {
            GroupRangeStatus::OutwithRange
        }
    }

    /// For each supplied id, reports whether it came up (present in the new
    /// matrix, absent from the old one) or went down (the reverse). Ids
    /// present in both, or absent from both, are ignored. Output order
    /// follows input order.
    pub fn check_pmid_node_status(&self, pmid_nodes: &[NodeId]) -> PmidNodeStatus {
        let old_set: HashSet<NodeId> = self.old_sorted.iter().copied().collect();
        let new_set: HashSet<NodeId> = self.new_sorted.iter().copied().collect();

        let mut status = PmidNodeStatus::default();
        for id in pmid_nodes {
            let in_new = new_set.contains(id);
            let in_old = old_set.contains(id);
            if in_new && !in_old {
                status.nodes_up.push(*id);
            } else if in_old && !in_new {
                status.nodes_down.push(*id);
            }
        }
        status
    }
}

fn has_no_duplicates(ids: &[NodeId]) -> bool {
    let set: HashSet<NodeId> = ids.iter().copied().collect();
    set.len() == ids.len()
}

fn order_by_closeness(a: &NodeId, b: &NodeId, target: &NodeId) -> std::cmp::Ordering {
    if closer_to_target(a, b, target) {
        std::cmp::Ordering::Less
    } else if closer_to_target(b, a, target) {
        std::cmp::Ordering::Greater
    } else {
        std::cmp::Ordering::Equal
    }
}

fn sorted_by_closeness(mut ids: Vec<NodeId>, target: &NodeId) -> Vec<NodeId> {
    ids.sort_by(|a, b| order_by_closeness(a, b, target));
    ids
}

/// `old_sorted \ new_sorted`, both already sorted by the same ordering, as
/// an ordered merge rather than an O(n*m) scan.
fn lost_nodes(old_sorted: &[NodeId], new_sorted: &[NodeId]) -> Vec<NodeId> {
    let new_set: HashSet<NodeId> = new_sorted.iter().copied().collect();
    old_sorted
        .iter()
        .filter(|id| !new_set.contains(id))
        .copied()
        .collect()
}

fn radius_for(self_id: &NodeId, new_sorted: &[NodeId], parameters: &Parameters) -> BigUint {
    let fcn_distance = if new_sorted.len() >= parameters.closest_nodes_size() {
        self_id.distance_as_bigint(&new_sorted[parameters.closest_nodes_size() - 1])
    } else {
        self_id.distance_as_bigint(&NodeId::max())
    };
    fcn_distance * parameters.proximity_factor()
}

/// The `n` ids in `ids` closest to `target`, partial-sorted (a full sort is
/// simplest here - matrix sizes are in the tens to low hundreds, per
/// `spec.md` §5).
fn closest_n_to(ids: &[NodeId], target: &NodeId, n: usize) -> Vec<NodeId> {
    let mut sorted = sorted_by_closeness(ids.to_vec(), target);
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> NodeId {
        let mut bytes = [0u8; crate::node_id::NODE_ID_LEN];
        bytes[crate::node_id::NODE_ID_LEN - 1] = byte;
        NodeId::from_bytes(bytes)
    }

    fn params(node_group_size: usize, closest_nodes_size: usize) -> Parameters {
        Parameters::new(closest_nodes_size, node_group_size, 2).unwrap()
    }

    // S1 - pure growth: the new arrivals (6, 7) are closer to `target` than
    // two of the five original neighbours, so they become new holders
    // without anything being lost.
    #[test]
    fn pure_growth_has_no_lost_holders() {
        let self_id = id(0);
        let old = vec![id(1), id(2), id(3), id(4), id(5)];
        let new = vec![id(1), id(2), id(3), id(4), id(5), id(6), id(7)];
        let target = id(3);

        let change = MatrixChange::new(self_id, old, new, params(4, 4));
        assert!(change.lost().is_empty());

        let result = change.check_holders(target);
        assert_eq!(result.proximity_status, GroupRangeStatus::InRange);
        assert!(result.old_holders.is_empty());
        assert!(!result.new_holders.is_empty());
        for new_holder in &result.new_holders {
            assert!(!result.old_holders.contains(new_holder));
        }
    }

    // S2 - churn replacing one holder. A, B, C, D sit far from the target;
    // E and F sit close to it, with E closer than F.
    #[test]
    fn churn_replaces_one_holder() {
        let self_id = id(0);
        let target = id(16);
        let a = id(100);
        let b = id(101);
        let c = id(102);
        let d = id(103);
        let e = id(17);
        let f = id(18);

        let old = vec![a, b, c, d, e];
        let new = vec![a, b, c, d, f];

        let change = MatrixChange::new(self_id, old, new, params(4, 4));
        assert_eq!(change.lost(), &[e]);

        let result = change.check_holders(target);
        assert_eq!(result.proximity_status, GroupRangeStatus::InRange);
        assert_eq!(result.old_holders, vec![e]);
        assert_eq!(result.new_holders, vec![f]);
    }

    // S3 - target equals a matrix member: never appears in either holder list.
    #[test]
    fn target_member_never_becomes_its_own_holder() {
        let self_id = id(0);
        let target = id(5);
        let old = vec![id(1), id(2), id(3), id(4), id(5)];
        let new = vec![id(1), id(2), id(3), id(4), id(5), id(6)];

        let change = MatrixChange::new(self_id, old, new, params(4, 4));
        let result = change.check_holders(target);
        assert!(!result.old_holders.contains(&target));
        assert!(!result.new_holders.contains(&target));
    }

    // S4 - OldEqualsToNew detects identical sets in different input order.
    #[test]
    fn old_equals_to_new_ignores_input_order() {
        let self_id = id(0);
        let old = vec![id(5), id(1), id(4), id(2), id(3)];
        let new = vec![id(3), id(2), id(1), id(5), id(4)];

        let change = MatrixChange::new(self_id, old, new, params(4, 4));
        assert!(change.old_equals_to_new());
    }

    #[test]
    fn old_equals_to_new_is_false_for_different_sets() {
        let self_id = id(0);
        let old = vec![id(1), id(2), id(3)];
        let new = vec![id(1), id(2), id(4)];

        let change = MatrixChange::new(self_id, old, new, params(4, 4));
        assert!(!change.old_equals_to_new());
    }

    // S5 - CheckPmidNodeStatus.
    #[test]
    fn pmid_node_status_reports_up_and_down() {
        let self_id = id(0);
        let a = id(1);
        let b = id(2);
        let c = id(3);
        let d = id(4);
        let e = id(5);

        let old = vec![a, b, c];
        let new = vec![b, c, d];

        let change = MatrixChange::new(self_id, old, new, params(4, 4));
        let status = change.check_pmid_node_status(&[a, b, d, e]);

        assert_eq!(status.nodes_down, vec![a]);
        assert_eq!(status.nodes_up, vec![d]);
    }

    #[test]
    fn pmid_node_status_is_idempotent_and_disjoint() {
        let self_id = id(0);
        let old = vec![id(1), id(2)];
        let new = vec![id(2), id(3)];
        let change = MatrixChange::new(self_id, old, new, params(4, 4));

        let pmid_nodes = vec![id(1), id(2), id(3), id(4)];
        let first = change.check_pmid_node_status(&pmid_nodes);
        let second = change.check_pmid_node_status(&pmid_nodes);
        assert_eq!(first, second);

        let up: HashSet<_> = first.nodes_up.iter().collect();
        let down: HashSet<_> = first.nodes_down.iter().collect();
        assert!(up.is_disjoint(&down));
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        fn arbitrary_distinct_ids(max_len: usize) -> impl Strategy<Value = Vec<NodeId>> {
            proptest::collection::btree_set(any::<u16>(), 0..max_len).prop_map(|values| {
                values
                    .into_iter()
                    .map(|v| {
                        let mut bytes = [0u8; crate::node_id::NODE_ID_LEN];
                        bytes[crate::node_id::NODE_ID_LEN - 2..].copy_from_slice(&v.to_be_bytes());
                        NodeId::from_bytes(bytes)
                    })
                    .collect()
            })
        }

        proptest! {
            // P1: old_sorted/new_sorted are strictly ordered by closeness to self.
            #[test]
            fn snapshots_are_strictly_ordered(
                old in arbitrary_distinct_ids(12),
                new in arbitrary_distinct_ids(12),
            ) {
                let self_id = id(0xAA);
                let old: Vec<_> = old.into_iter().filter(|i| *i != self_id).collect();
                let new: Vec<_> = new.into_iter().filter(|i| *i != self_id).collect();

                let change = MatrixChange::new(self_id, old, new, params(4, 4));
                for pair in change.old_sorted().windows(2) {
                    prop_assert!(closer_to_target(&pair[0], &pair[1], &self_id));
                }
                for pair in change.new_sorted().windows(2) {
                    prop_assert!(closer_to_target(&pair[0], &pair[1], &self_id));
                }
            }

            // P2: lost is the set difference and disjoint from new_sorted.
            #[test]
            fn lost_is_set_difference_and_disjoint_from_new(
                old in arbitrary_distinct_ids(12),
                new in arbitrary_distinct_ids(12),
            ) {
                let self_id = id(0xAA);
                let old: Vec<_> = old.into_iter().filter(|i| *i != self_id).collect();
                let new: Vec<_> = new.into_iter().filter(|i| *i != self_id).collect();

                let old_set: BTreeSet<_> = old.iter().map(|i| i.as_bytes().to_vec()).collect();
                let new_set: BTreeSet<_> = new.iter().map(|i| i.as_bytes().to_vec()).collect();
                let expected_lost: BTreeSet<_> = old_set.difference(&new_set).cloned().collect();

                let change = MatrixChange::new(self_id, old, new, params(4, 4));
                let actual_lost: BTreeSet<_> =
                    change.lost().iter().map(|i| i.as_bytes().to_vec()).collect();

                prop_assert_eq!(actual_lost, expected_lost);
                for lost_id in change.lost() {
                    prop_assert!(!change.new_sorted().contains(lost_id));
                }
            }

            // P3: OldEqualsToNew iff the two input multisets are equal.
            #[test]
            fn old_equals_to_new_matches_set_equality(
                old in arbitrary_distinct_ids(10),
            ) {
                let self_id = id(0xAA);
                let old: Vec<_> = old.into_iter().filter(|i| *i != self_id).collect();
                let mut shuffled = old.clone();
                shuffled.reverse();

                let change = MatrixChange::new(self_id, old, shuffled, params(4, 4));
                prop_assert!(change.old_equals_to_new());
            }

            // P4: new_holders and old_holders never overlap.
            #[test]
            fn holder_deltas_never_overlap(
                old in arbitrary_distinct_ids(12),
                new in arbitrary_distinct_ids(12),
                target_byte in any::<u16>(),
            ) {
                let self_id = id(0xAA);
                let old: Vec<_> = old.into_iter().filter(|i| *i != self_id).collect();
                let new: Vec<_> = new.into_iter().filter(|i| *i != self_id).collect();
                let mut target_bytes = [0u8; crate::node_id::NODE_ID_LEN];
                target_bytes[crate::node_id::NODE_ID_LEN - 2..].copy_from_slice(&target_byte.to_be_bytes());
                let target = NodeId::from_bytes(target_bytes);

                let change = MatrixChange::new(self_id, old, new, params(4, 8));
                let result = change.check_holders(target);
                for new_holder in &result.new_holders {
                    prop_assert!(!result.old_holders.contains(new_holder));
                }
            }

            // P5: if not InRange, both holder lists are empty.
            #[test]
            fn not_in_range_implies_empty_holder_lists(
                old in arbitrary_distinct_ids(12),
                new in arbitrary_distinct_ids(12),
                target_byte in any::<u16>(),
            ) {
                let self_id = id(0xAA);
                let old: Vec<_> = old.into_iter().filter(|i| *i != self_id).collect();
                let new: Vec<_> = new.into_iter().filter(|i| *i != self_id).collect();
                let mut target_bytes = [0u8; crate::node_id::NODE_ID_LEN];
                target_bytes[crate::node_id::NODE_ID_LEN - 2..].copy_from_slice(&target_byte.to_be_bytes());
                let target = NodeId::from_bytes(target_bytes);

                let change = MatrixChange::new(self_id, old, new, params(4, 8));
                let result = change.check_holders(target);
                if result.proximity_status != GroupRangeStatus::InRange {
                    prop_assert!(result.old_holders.is_empty());
                    prop_assert!(result.new_holders.is_empty());
                }
            }

            // P6: CheckPmidNodeStatus is idempotent and up/down are disjoint.
            #[test]
            fn pmid_status_idempotent_and_disjoint(
                old in arbitrary_distinct_ids(10),
                new in arbitrary_distinct_ids(10),
                queried in arbitrary_distinct_ids(10),
            ) {
                let self_id = id(0xAA);
                let old: Vec<_> = old.into_iter().filter(|i| *i != self_id).collect();
                let new: Vec<_> = new.into_iter().filter(|i| *i != self_id).collect();

                let change = MatrixChange::new(self_id, old, new, params(4, 4));
                let first = change.check_pmid_node_status(&queried);
                let second = change.check_pmid_node_status(&queried);
                prop_assert_eq!(&first, &second);

                let up: BTreeSet<_> = first.nodes_up.iter().map(|i| i.as_bytes().to_vec()).collect();
                let down: BTreeSet<_> = first.nodes_down.iter().map(|i| i.as_bytes().to_vec()).collect();
                prop_assert!(up.is_disjoint(&down));
            }
        }
    }
}
