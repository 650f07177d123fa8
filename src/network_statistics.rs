// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Thread-safe aggregation of local and network-wide neighbour-distance
//! statistics.
//!
//! Unlike [`crate::MatrixChange`], a `NetworkStatistics` instance lives for
//! the whole life of the owning node and is mutated from many threads; all
//! mutable state sits behind a single [`parking_lot::Mutex`] and no
//! reference into it ever escapes a locked scope.

use crate::node_id::{closer_to_target, NodeId};
use crate::parameters::Parameters;
use num_bigint::BigUint;
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct NetworkDistanceData {
    contributors: u64,
    total_distance: BigUint,
    average_distance: NodeId,
}

#[derive(Debug)]
struct Inner {
    local_distance: NodeId,
    local_distance_set: bool,
    network_distance_data: NetworkDistanceData,
    max_hops_traversed: u16,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            local_distance: NodeId::zero(),
            local_distance_set: false,
            network_distance_data: NetworkDistanceData::default(),
            max_hops_traversed: 0,
        }
    }
}

/// Running per-node view of how far away its neighbours and the wider
/// network are, in XOR-distance terms.
#[derive(Debug)]
pub struct NetworkStatistics {
    self_id: NodeId,
    parameters: Parameters,
    inner: Mutex<Inner>,
}

impl NetworkStatistics {
    /// Creates a fresh instance for `self_id`, with no neighbours observed
    /// yet.
    pub fn new(self_id: NodeId, parameters: Parameters) -> Self {
        Self {
            self_id,
            parameters,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Recomputes the local average distance from the current unique
    /// neighbour set.
    ///
    /// If fewer than `closest_nodes_size` neighbours are known, the local
    /// distance is left unchanged (not an error - see `spec.md` §7,
    /// "degenerate topology"); [`Self::estimate_in_group`] keeps returning
    /// `false` until enough neighbours have been observed.
    pub fn update_local_average_distance(&self, unique_nodes: &[NodeId]) {
        if unique_nodes.len() < self.parameters.closest_nodes_size() {
            return;
        }

        let mut sorted = unique_nodes.to_vec();
        sorted.sort_by(|a, b| {
            if closer_to_target(a, b, &self.self_id) {
                std::cmp::Ordering::Less
            } else if closer_to_target(b, a, &self.self_id) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
        let furthest_of_closest = sorted[self.parameters.closest_nodes_size() - 1];
        let distance = self.self_id.xor(&furthest_of_closest);

        let mut inner = self.inner.lock();
        inner.local_distance = distance;
        inner.local_distance_set = true;
        trace!(distance = %distance, "updated local average distance");
    }

    /// Folds one more network-reported distance into the running mean.
    pub fn update_network_average_distance(&self, distance: NodeId) {
        let mut inner = self.inner.lock();
        let data = &mut inner.network_distance_data;
        data.contributors += 1;
        data.total_distance += BigUint::from_bytes_be(distance.as_bytes());
        data.average_distance =
            NodeId::from_bigint_truncated(&(&data.total_distance / data.contributors));
        trace!(
            contributors = data.contributors,
            average = %data.average_distance,
            "updated network average distance"
        );
    }

    /// `true` iff `info_id` is closer to `sender_id` than this node's local
    /// distance - i.e. `info_id` looks like it's within `sender_id`'s group
    /// range. Always `false` until enough neighbours have been observed.
    pub fn estimate_in_group(&self, sender_id: &NodeId, info_id: &NodeId) -> bool {
        let inner = self.inner.lock();
        if !inner.local_distance_set {
            return false;
        }
        sender_id.xor(info_id) < inner.local_distance
    }

    /// The current local average distance.
    pub fn get_distance(&self) -> NodeId {
        self.inner.lock().local_distance
    }

    /// Estimated network population, extrapolated from the local average
    /// distance: `2^512 / max(local_distance, 1)`, saturating at `u64::MAX`.
    pub fn network_population(&self) -> u64 {
        let local_distance = self.get_distance();
        let denominator = BigUint::from_bytes_be(local_distance.as_bytes())
            .max(BigUint::from(1u8));
        let two_pow_512 = BigUint::from(1u8) << 512;
        let population = two_pow_512 / denominator;
        population.try_into().unwrap_or(u64::MAX)
    }

    /// Same estimate as [`Self::network_population`]; the `node_id`
    /// argument is accepted but ignored, preserved only for source-API
    /// compatibility (see `SPEC_FULL.md` §5 / `spec.md` §9 Open Questions).
    pub fn network_population_for(&self, _node_id: &NodeId) -> u64 {
        self.network_population()
    }

    /// Raises the recorded maximum hop count ever observed. Never
    /// decreases.
    pub fn set_maximum_hops_traversed(&self, hops_to_live: u16) {
        let mut inner = self.inner.lock();
        if hops_to_live > inner.max_hops_traversed {
            debug!(
                previous = inner.max_hops_traversed,
                new = hops_to_live,
                "raised maximum hops traversed"
            );
            inner.max_hops_traversed = hops_to_live;
        }
    }

    /// The highest hop count ever observed.
    pub fn max_hops_traversed(&self) -> u16 {
        self.inner.lock().max_hops_traversed
    }
}
