// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::node_id::NodeId;

/// How a message is addressed: to one peer directly, to whichever peer is
/// closest to an id, or to the whole group responsible for an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationType {
    /// A single, specific peer.
    Direct,
    /// Whichever peer is closest to the destination id.
    Closest,
    /// The whole replication group responsible for the destination id.
    Group,
}

/// Whether the owning node is authoritative for a target id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRangeStatus {
    /// The owning node is itself one of the holders of the target.
    InRange,
    /// Not a holder, but within `proximity_factor` times the closest-nodes
    /// distance - close enough to watch the group without being in it.
    InProximalRange,
    /// Neither in range nor in proximal range.
    OutwithRange,
}

impl Default for GroupRangeStatus {
    fn default() -> Self {
        GroupRangeStatus::OutwithRange
    }
}

/// Result of [`crate::MatrixChange::check_holders`].
///
/// `old_holders` and `new_holders` are only populated when `proximity_status
/// == GroupRangeStatus::InRange`; otherwise the caller is not authoritative
/// for the target and must not replicate on its behalf, so both lists are
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckHoldersResult {
    /// Whether the owning node is a holder, merely nearby, or neither.
    pub proximity_status: GroupRangeStatus,
    /// Former holders whose replicas were just lost and must be regenerated.
    pub old_holders: Vec<NodeId>,
    /// Newly-responsible holders the key must now be pushed to.
    pub new_holders: Vec<NodeId>,
}

/// Result of [`crate::MatrixChange::check_pmid_node_status`]: which of the
/// queried ids came up and which went down between the old and new matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PmidNodeStatus {
    /// Ids present in the new matrix but absent from the old one.
    pub nodes_up: Vec<NodeId>,
    /// Ids present in the old matrix but absent from the new one.
    pub nodes_down: Vec<NodeId>,
}
