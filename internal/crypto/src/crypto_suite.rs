// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Cryptographic-suite acceptability table.
//!
//! A [`CryptographicSuite`] lists which digest and public-key algorithms are
//! acceptable and until when. An algorithm is reliable at time `T` when it is
//! listed and `T` is strictly before its expiration date (if any).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DigestAlgorithm, EncryptionAlgorithm, SignatureAlgorithm};

/// Expiration of one digest algorithm.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DigestAlgorithmConstraint {
    /// The constrained algorithm.
    pub algorithm: DigestAlgorithm,

    /// Instant from which the algorithm is no longer acceptable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

/// Expiration of a public-key algorithm for keys of at least `min_key_size`
/// bits.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeySizeConstraint {
    /// Smallest key size (in bits) this entry applies to.
    #[serde(default)]
    pub min_key_size: u32,

    /// Instant from which keys in this range are no longer acceptable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

/// Key-size dependent expirations of one public-key algorithm.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EncryptionAlgorithmConstraint {
    /// The constrained algorithm.
    pub algorithm: EncryptionAlgorithm,

    /// Accepted key size ranges.
    pub key_sizes: Vec<KeySizeConstraint>,
}

/// Acceptability table for digest and public-key algorithms.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CryptographicSuite {
    /// Accepted digest algorithms.
    #[serde(default)]
    pub digest_algorithms: Vec<DigestAlgorithmConstraint>,

    /// Accepted public-key algorithms.
    #[serde(default)]
    pub encryption_algorithms: Vec<EncryptionAlgorithmConstraint>,
}

impl CryptographicSuite {
    /// Returns the expiration of `algorithm`, or `None` if it never expires.
    pub fn digest_expiration(
        &self,
        algorithm: DigestAlgorithm,
    ) -> Result<Option<DateTime<Utc>>, CryptoConstraintError> {
        self.digest_algorithms
            .iter()
            .find(|c| c.algorithm == algorithm)
            .map(|c| c.expiration)
            .ok_or(CryptoConstraintError::DigestNotAcceptable(algorithm))
    }

    /// Returns the expiration of `algorithm` for a key of `key_size` bits.
    ///
    /// The entry with the largest `min_key_size` not exceeding `key_size`
    /// applies. A missing key size only matches entries without a minimum.
    pub fn encryption_expiration(
        &self,
        algorithm: EncryptionAlgorithm,
        key_size: Option<u32>,
    ) -> Result<Option<DateTime<Utc>>, CryptoConstraintError> {
        let constraint = self
            .encryption_algorithms
            .iter()
            .find(|c| c.algorithm == algorithm)
            .ok_or(CryptoConstraintError::EncryptionNotAcceptable(algorithm))?;

        let size = key_size.unwrap_or(0);

        constraint
            .key_sizes
            .iter()
            .filter(|k| k.min_key_size <= size)
            .max_by_key(|k| k.min_key_size)
            .map(|k| k.expiration)
            .ok_or_else(|| CryptoConstraintError::KeyTooSmall {
                algorithm,
                key_size: size,
                minimum: constraint
                    .key_sizes
                    .iter()
                    .map(|k| k.min_key_size)
                    .min()
                    .unwrap_or_default(),
            })
    }

    /// Returns the earliest expiration among the parts of a signature
    /// algorithm.
    pub fn signature_expiration(
        &self,
        algorithm: &SignatureAlgorithm,
        key_size: Option<u32>,
    ) -> Result<Option<DateTime<Utc>>, CryptoConstraintError> {
        let encryption = self.encryption_expiration(algorithm.encryption, key_size)?;
        let digest = match algorithm.digest {
            Some(digest) => self.digest_expiration(digest)?,
            None => None,
        };

        Ok(earliest(encryption, digest))
    }

    /// Checks that `algorithm` is reliable at `time`.
    pub fn check_digest_at(
        &self,
        algorithm: DigestAlgorithm,
        time: DateTime<Utc>,
    ) -> Result<(), CryptoConstraintError> {
        check_expiration(
            algorithm.to_string(),
            self.digest_expiration(algorithm)?,
            time,
        )
    }

    /// Checks that a signature algorithm and key size are reliable at `time`.
    pub fn check_signature_at(
        &self,
        algorithm: &SignatureAlgorithm,
        key_size: Option<u32>,
        time: DateTime<Utc>,
    ) -> Result<(), CryptoConstraintError> {
        check_expiration(
            algorithm.to_string(),
            self.signature_expiration(algorithm, key_size)?,
            time,
        )
    }
}

fn earliest(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn check_expiration(
    algorithm: String,
    expiration: Option<DateTime<Utc>>,
    time: DateTime<Utc>,
) -> Result<(), CryptoConstraintError> {
    match expiration {
        Some(expiration) if time >= expiration => Err(CryptoConstraintError::Expired {
            algorithm,
            expiration,
        }),
        _ => Ok(()),
    }
}

/// Describes why an algorithm is not acceptable.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CryptoConstraintError {
    /// The digest algorithm is not listed in the suite.
    #[error("digest algorithm {0} is not acceptable")]
    DigestNotAcceptable(DigestAlgorithm),

    /// The public-key algorithm is not listed in the suite.
    #[error("encryption algorithm {0} is not acceptable")]
    EncryptionNotAcceptable(EncryptionAlgorithm),

    /// The key is smaller than every accepted key size.
    #[error("{algorithm} key of {key_size} bits is below the minimum of {minimum} bits")]
    KeyTooSmall {
        /// The public-key algorithm.
        algorithm: EncryptionAlgorithm,

        /// Size of the presented key.
        key_size: u32,

        /// Smallest accepted key size.
        minimum: u32,
    },

    /// The algorithm had expired at the evaluated time.
    #[error("{algorithm} expired on {expiration}")]
    Expired {
        /// Textual form of the expired algorithm.
        algorithm: String,

        /// Expiration instant.
        expiration: DateTime<Utc>,
    },
}
