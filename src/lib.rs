// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Routing core for a structured p2p overlay keyed by a 512-bit XOR metric.
//!
//! This crate covers three things, and nothing past them:
//!
//! - [`node_id`]: the address space itself - a fixed-width id, the XOR
//!   distance metric, and the `closer_to_target` ordering every other module
//!   builds on.
//! - [`matrix_change`]: an immutable diff between two snapshots of a node's
//!   neighbourhood, used to work out who now holds a given key and who just
//!   lost it.
//! - [`network_statistics`]: a thread-safe running view of local and
//!   network-wide neighbour distances, used to estimate group membership and
//!   network population.
//!
//! Wire framing, transport, identity verification, persistent storage,
//! bootstrapping and rate-limiting all live above this crate, not in it.

#![forbid(
    arithmetic_overflow,
    mutable_transmutes,
    no_mangle_const_items,
    unknown_crate_types,
    unsafe_code
)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

#[macro_use]
extern crate tracing;

pub mod callbacks;
pub mod error;
pub mod matrix_change;
pub mod network_statistics;
pub mod node_id;
pub mod parameters;
pub mod types;

pub use callbacks::{
    CloseNodeReplacedFunctor, MessageReceivedFunctor, NetworkStatusFunctor, ReplyFunctor,
};
pub use error::{Error, Result};
pub use matrix_change::MatrixChange;
pub use network_statistics::NetworkStatistics;
pub use node_id::{closer_to_target, NodeId, NODE_ID_LEN};
pub use parameters::Parameters;
pub use types::{CheckHoldersResult, DestinationType, GroupRangeStatus, PmidNodeStatus};
