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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]

//! Cryptographic helpers for the adesval validation engine.
//!
//! The engine never implements primitives itself. This crate wraps the
//! hashing, encoding and X.509 parsing crates it relies on and holds the
//! cryptographic-suite acceptability table consulted by the building blocks.

mod algorithm;
pub use algorithm::{DigestAlgorithm, EncryptionAlgorithm, SignatureAlgorithm, UnknownAlgorithmError};

pub mod base64;

pub mod crypto_suite;
pub use crypto_suite::{CryptoConstraintError, CryptographicSuite};

mod digest;
pub use digest::Digest;

pub mod hash;
pub mod time;

pub mod x509;
pub use x509::{CertificateFacts, CertificateParseError, KeyUsage, QcStatements, QcType};

#[cfg(test)]
pub(crate) mod tests;
