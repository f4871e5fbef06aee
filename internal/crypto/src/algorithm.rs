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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash;

/// Digest algorithms that may appear in signatures, certificates and
/// time-stamps.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
pub enum DigestAlgorithm {
    /// SHA-1
    Sha1,

    /// SHA-224
    Sha224,

    /// SHA-256
    Sha256,

    /// SHA-384
    Sha384,

    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// Computes the digest of `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => hash::sha1(data),
            Self::Sha224 => hash::sha224(data),
            Self::Sha256 => hash::sha256(data),
            Self::Sha384 => hash::sha384(data),
            Self::Sha512 => hash::sha512(data),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha224 => "SHA224",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        match alg.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA224" => Ok(Self::Sha224),
            "SHA256" => Ok(Self::Sha256),
            "SHA384" => Ok(Self::Sha384),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(UnknownAlgorithmError(alg.to_owned())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = UnknownAlgorithmError;

    fn try_from(alg: String) -> Result<Self, Self::Error> {
        alg.parse()
    }
}

impl From<DigestAlgorithm> for String {
    fn from(alg: DigestAlgorithm) -> Self {
        alg.to_string()
    }
}

/// Public-key (encryption) algorithms used to produce signatures.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
#[non_exhaustive]
pub enum EncryptionAlgorithm {
    /// RSA with PKCS #1 v1.5 padding
    Rsa,

    /// RSASSA-PSS
    RsaSsaPss,

    /// ECDSA
    Ecdsa,

    /// Edwards-curve DSA
    EdDsa,

    /// DSA
    Dsa,
}

impl EncryptionAlgorithm {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::RsaSsaPss => "RSASSA-PSS",
            Self::Ecdsa => "ECDSA",
            Self::EdDsa => "EDDSA",
            Self::Dsa => "DSA",
        }
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        match alg.to_ascii_uppercase().as_str() {
            "RSA" => Ok(Self::Rsa),
            "RSASSA-PSS" | "RSA-PSS" => Ok(Self::RsaSsaPss),
            "ECDSA" | "EC" => Ok(Self::Ecdsa),
            "EDDSA" | "ED25519" => Ok(Self::EdDsa),
            "DSA" => Ok(Self::Dsa),
            _ => Err(UnknownAlgorithmError(alg.to_owned())),
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EncryptionAlgorithm {
    type Error = UnknownAlgorithmError;

    fn try_from(alg: String) -> Result<Self, Self::Error> {
        alg.parse()
    }
}

impl From<EncryptionAlgorithm> for String {
    fn from(alg: EncryptionAlgorithm) -> Self {
        alg.to_string()
    }
}

/// A signature algorithm: an encryption algorithm combined with the digest
/// algorithm applied to the signed data.
///
/// The textual form is `ENCRYPTION` or `ENCRYPTION-with-DIGEST`, for example
/// `RSA-with-SHA256` or `EDDSA`.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignatureAlgorithm {
    /// Public-key algorithm.
    pub encryption: EncryptionAlgorithm,

    /// Digest algorithm, absent for schemes that hash internally.
    pub digest: Option<DigestAlgorithm>,
}

impl SignatureAlgorithm {
    /// Creates a signature algorithm from its parts.
    pub fn new(encryption: EncryptionAlgorithm, digest: Option<DigestAlgorithm>) -> Self {
        Self { encryption, digest }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        match alg.split_once("-with-") {
            Some((encryption, digest)) => Ok(Self {
                encryption: encryption
                    .parse()
                    .map_err(|_| UnknownAlgorithmError(alg.to_owned()))?,
                digest: Some(
                    digest
                        .parse()
                        .map_err(|_| UnknownAlgorithmError(alg.to_owned()))?,
                ),
            }),
            None => Ok(Self {
                encryption: alg.parse()?,
                digest: None,
            }),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.digest {
            Some(digest) => write!(f, "{}-with-{}", self.encryption, digest),
            None => write!(f, "{}", self.encryption),
        }
    }
}

impl TryFrom<String> for SignatureAlgorithm {
    type Error = UnknownAlgorithmError;

    fn try_from(alg: String) -> Result<Self, Self::Error> {
        alg.parse()
    }
}

impl From<SignatureAlgorithm> for String {
    fn from(alg: SignatureAlgorithm) -> Self {
        alg.to_string()
    }
}

/// This error is thrown when converting from a string to an algorithm
/// if the algorithm string is unrecognized.
#[derive(Debug, Eq, Error, PartialEq)]
#[error("UnknownAlgorithmError({0})")]
pub struct UnknownAlgorithmError(pub String);
