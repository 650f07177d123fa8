// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use thiserror::Error;

/// The type returned by the fallible boundaries of this crate.
///
/// Note this is a small surface: `MatrixChange` and `NetworkStatistics`
/// themselves are total (see their module docs) - this `Error` only covers
/// parsing externally-supplied data (hex-encoded ids, tuning parameters).
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors from the narrow fallible surface of this crate.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Error {
    #[error("expected a {expected}-byte id, got {actual} bytes")]
    InvalidIdLength { expected: usize, actual: usize },
    #[error("'{0}' is not a valid hex-encoded id")]
    InvalidHexEncoding(String),
    #[error("invalid routing parameters: {0}")]
    InvalidParameters(String),
}
