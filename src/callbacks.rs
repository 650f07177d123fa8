// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Signatures of the callbacks the surrounding routing-table layer feeds
//! events through and that, in turn, drive calls into this core.
//!
//! Nothing in this crate invokes these - they are pinned here only so that
//! external layers and this crate agree on shape. See `spec.md` §6.

use crate::node_id::NodeId;
use std::sync::Arc;

/// Called to reply to a received message; passing `None` means "no reply".
pub type ReplyFunctor = Arc<dyn Fn(Option<Vec<u8>>) + Send + Sync>;

/// Fired for any message received that is not a reply to a prior `Send`.
pub type MessageReceivedFunctor =
    Arc<dyn Fn(Vec<u8>, bool /* was_cache_lookup */, ReplyFunctor) + Send + Sync>;

/// Fired when a new close node is inserted into the routing table. Upper
/// layers are responsible for replicating key/value pairs between
/// themselves and the new node; this is the trigger an external layer uses
/// before constructing a [`crate::MatrixChange`].
pub type CloseNodeReplacedFunctor = Arc<dyn Fn(Vec<NodeId>) + Send + Sync>;

/// Fired with a 0-100 estimate of network health.
pub type NetworkStatusFunctor = Arc<dyn Fn(u8) + Send + Sync>;
