// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::error::{Error, Result};
use num_bigint::BigUint;
use rand::Rng;
use std::fmt::{self, Debug, Display, Formatter};

/// Width, in bytes, of a [`NodeId`] (512 bits).
pub const NODE_ID_LEN: usize = 64;

/// A fixed-width 512-bit address in the overlay's identifier space.
///
/// Immutable once created. Equality and ordering are plain byte-lexicographic
/// comparisons of the big-endian representation, which for a fixed-width
/// unsigned integer is the same thing as numeric comparison; the ordering
/// that actually matters for routing, "closeness to a target", is computed
/// separately by [`closer_to_target`] rather than via `Ord`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId([u8; NODE_ID_LEN]);

impl NodeId {
    /// Builds a `NodeId` from raw big-endian bytes.
    pub fn from_bytes(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// The all-zero id.
    pub fn zero() -> Self {
        Self([0u8; NODE_ID_LEN])
    }

    /// The maximum representable id, i.e. `2^512 - 1`.
    pub fn max() -> Self {
        Self([0xff; NODE_ID_LEN])
    }

    /// A cryptographically-insignificant random id, suitable for tests and
    /// for generating a fresh local identity before it is replaced by a
    /// properly-derived one at a higher layer.
    pub fn random() -> Self {
        let mut bytes = [0u8; NODE_ID_LEN];
        rand::thread_rng().fill(&mut bytes);
        Self(bytes)
    }

    /// Parses a `NodeId` from a lowercase or uppercase hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let decoded =
            hex::decode(hex_str).map_err(|_| Error::InvalidHexEncoding(hex_str.to_string()))?;
        if decoded.len() != NODE_ID_LEN {
            return Err(Error::InvalidIdLength {
                expected: NODE_ID_LEN,
                actual: decoded.len(),
            });
        }
        let mut bytes = [0u8; NODE_ID_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Lowercase, fixed-width hex encoding.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// The raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Bitwise XOR, interpreted as the Kademlia distance metric.
    pub fn xor(&self, other: &NodeId) -> NodeId {
        let mut out = [0u8; NODE_ID_LEN];
        for i in 0..NODE_ID_LEN {
            out[i] = self.0[i] ^ other.0[i];
        }
        NodeId(out)
    }

    /// This id's distance to `other`, as an arbitrary-precision unsigned
    /// integer suitable for the radius / average-distance arithmetic in
    /// [`crate::matrix_change`] and [`crate::network_statistics`].
    pub fn distance_as_bigint(&self, other: &NodeId) -> BigUint {
        BigUint::from_bytes_be(&self.xor(other).0)
    }

    /// Reinterprets a big integer as a `NodeId`, left-padding with zeroes or
    /// keeping only the least-significant [`NODE_ID_LEN`] bytes if the value
    /// somehow exceeds 512 bits (it never should for a mean of in-range
    /// distances, but this keeps the conversion total).
    pub fn from_bigint_truncated(value: &BigUint) -> Self {
        let be = value.to_bytes_be();
        let mut bytes = [0u8; NODE_ID_LEN];
        if be.len() <= NODE_ID_LEN {
            bytes[NODE_ID_LEN - be.len()..].copy_from_slice(&be);
        } else {
            bytes.copy_from_slice(&be[be.len() - NODE_ID_LEN..]);
        }
        Self(bytes)
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}..)", &self.to_hex()[..12])
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::zero()
    }
}

/// `true` iff `a` is closer to `target` than `b` is, under the XOR metric.
///
/// This is the sole ordering used throughout the routing core: every sort
/// and set operation takes an explicit `target` and compares via this
/// function rather than hiding the target behind instance state, so the
/// same predicate parameterised differently by `self` (at construction) and
/// by a query's `target` (in `CheckHolders`) is always spelled out at the
/// call site.
///
/// Ties (`a == b`) return `false` in both directions, as required of a
/// strict-weak-ordering predicate.
pub fn closer_to_target(a: &NodeId, b: &NodeId, target: &NodeId) -> bool {
    a.xor(target) < b.xor(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_id() -> impl Strategy<Value = NodeId> {
        any::<[u8; NODE_ID_LEN]>().prop_map(NodeId::from_bytes)
    }

    #[test]
    fn hex_round_trips() {
        let id = NodeId::random();
        let encoded = id.to_hex();
        assert_eq!(encoded.len(), NODE_ID_LEN * 2);
        assert_eq!(NodeId::from_hex(&encoded).unwrap(), id);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            NodeId::from_hex("abcd"),
            Err(Error::InvalidIdLength { .. })
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let bogus = "zz".repeat(NODE_ID_LEN);
        assert!(matches!(
            NodeId::from_hex(&bogus),
            Err(Error::InvalidHexEncoding(_))
        ));
    }

    #[test]
    fn xor_with_self_is_zero() {
        let id = NodeId::random();
        assert_eq!(id.xor(&id), NodeId::zero());
    }

    proptest! {
        // Ties never count as "closer" in either direction.
        #[test]
        fn closer_to_target_is_irreflexive(a in arbitrary_id(), t in arbitrary_id()) {
            prop_assert!(!closer_to_target(&a, &a, &t));
        }

        // closer_to_target is antisymmetric for distinct ids.
        #[test]
        fn closer_to_target_is_antisymmetric(a in arbitrary_id(), b in arbitrary_id(), t in arbitrary_id()) {
            if a != b {
                prop_assert_ne!(closer_to_target(&a, &b, &t), closer_to_target(&b, &a, &t));
            }
        }

        #[test]
        fn bigint_round_trip_preserves_value(bytes in any::<[u8; NODE_ID_LEN]>()) {
            let id = NodeId::from_bytes(bytes);
            let as_big = num_bigint::BigUint::from_bytes_be(&bytes);
            prop_assert_eq!(NodeId::from_bigint_truncated(&as_big), id);
        }
    }
}
