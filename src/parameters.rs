// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::error::{Error, Result};

/// Tuning parameters for the routing core.
///
/// These values are inherited from the wider overlay's configuration, not
/// invented by this crate: every [`crate::MatrixChange`] and
/// [`crate::NetworkStatistics`] constructor takes a `Parameters` value
/// explicitly rather than reaching for a global constant.
///
/// Fields are private and only reachable through [`Parameters::new`] or
/// [`Parameters::default`], both of which guarantee every value is
/// non-zero - a zero `closest_nodes_size` would turn `closest_nodes_size -
/// 1` into a panicking or wrapping subtraction at every call site that
/// indexes the `closest_nodes_size`-th closest neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    closest_nodes_size: usize,
    node_group_size: usize,
    proximity_factor: u32,
}

impl Default for Parameters {
    /// The typical values used across the overlay: 8 closest nodes, groups
    /// of 4 holders, and a 2x proximity factor.
    fn default() -> Self {
        Self {
            closest_nodes_size: 8,
            node_group_size: 4,
            proximity_factor: 2,
        }
    }
}

impl Parameters {
    /// Validates and builds a `Parameters` value from externally-supplied
    /// configuration (e.g. parsed from a config file by an outer layer).
    ///
    /// This is the crate's only validation boundary for tuning input; once
    /// constructed, a `Parameters` value is assumed valid everywhere else.
    pub fn new(
        closest_nodes_size: usize,
        node_group_size: usize,
        proximity_factor: u32,
    ) -> Result<Self> {
        if closest_nodes_size == 0 {
            return Err(Error::InvalidParameters(
                "closest_nodes_size must be non-zero".to_string(),
            ));
        }
        if node_group_size == 0 {
            return Err(Error::InvalidParameters(
                "node_group_size must be non-zero".to_string(),
            ));
        }
        if proximity_factor == 0 {
            return Err(Error::InvalidParameters(
                "proximity_factor must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            closest_nodes_size,
            node_group_size,
            proximity_factor,
        })
    }

    /// Size of the innermost neighbourhood (the local node's `k`-closest).
    pub fn closest_nodes_size(&self) -> usize {
        self.closest_nodes_size
    }

    /// Width of a replication group: how many nodes hold a given key.
    pub fn node_group_size(&self) -> usize {
        self.node_group_size
    }

    /// Multiplier defining the "proximal" radius as a multiple of the
    /// closest-nodes distance.
    pub fn proximity_factor(&self) -> u32 {
        self.proximity_factor
    }
}
