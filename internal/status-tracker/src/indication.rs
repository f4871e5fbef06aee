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

//! The two-level result taxonomy defined by ETSI EN 319 102-1.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Top-level verdict for a validated token or building block.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    /// All checks succeeded.
    Passed,

    /// The available evidence does not allow a positive or negative verdict.
    Indeterminate,

    /// At least one check proved the token invalid.
    Failed,
}

impl Indication {
    /// Returns the ETSI name of this indication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Indeterminate => "INDETERMINATE",
            Self::Failed => "FAILED",
        }
    }
}

impl Display for Indication {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! sub_indications {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// Refinement of an [`Indication`] explaining why a token did not pass.
        #[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum SubIndication {
            $($(#[$doc])* $variant,)*
        }

        impl SubIndication {
            /// Returns the ETSI name of this sub-indication.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

sub_indications! {
    /// The signature is not conformant to one of the base standards.
    FormatFailure => "FORMAT_FAILURE",
    /// A signed data object does not match its reference digest.
    HashFailure => "HASH_FAILURE",
    /// The signature value could not be verified with the signer's public key.
    SigCryptoFailure => "SIG_CRYPTO_FAILURE",
    /// The signing certificate was revoked before the signature was produced.
    Revoked => "REVOKED",
    /// Signature attributes do not satisfy the validation constraints.
    SigConstraintsFailure => "SIG_CONSTRAINTS_FAILURE",
    /// The certificate chain does not satisfy the chain constraints.
    ChainConstraintsFailure => "CHAIN_CONSTRAINTS_FAILURE",
    /// The certificate chain could not be processed for an unspecified reason.
    CertificateChainGeneralFailure => "CERTIFICATE_CHAIN_GENERAL_FAILURE",
    /// An algorithm or key size is not acceptable and no POE rescues it.
    CryptoConstraintsFailure => "CRYPTO_CONSTRAINTS_FAILURE",
    /// The signing certificate expired before the signature was produced.
    Expired => "EXPIRED",
    /// The signing certificate was not yet valid when the signature was produced.
    NotYetValid => "NOT_YET_VALID",
    /// The signature policy could not be processed.
    PolicyProcessingError => "POLICY_PROCESSING_ERROR",
    /// The declared signature policy document is not available.
    SignaturePolicyNotAvailable => "SIGNATURE_POLICY_NOT_AVAILABLE",
    /// Time-stamps do not respect the expected chronological order.
    TimestampOrderFailure => "TIMESTAMP_ORDER_FAILURE",
    /// The signing certificate could not be identified.
    NoSigningCertificateFound => "NO_SIGNING_CERTIFICATE_FOUND",
    /// No chain to a trust anchor could be built.
    NoCertificateChainFound => "NO_CERTIFICATE_CHAIN_FOUND",
    /// The signing certificate is revoked and no POE predates the revocation.
    RevokedNoPoe => "REVOKED_NO_POE",
    /// A CA certificate is revoked and no POE predates the revocation.
    RevokedCaNoPoe => "REVOKED_CA_NO_POE",
    /// The validation time is outside the certificate validity and no POE exists.
    OutOfBoundsNoPoe => "OUT_OF_BOUNDS_NO_POE",
    /// The certificate has expired but was not revoked before expiry.
    OutOfBoundsNotRevoked => "OUT_OF_BOUNDS_NOT_REVOKED",
    /// Revocation data was issued outside the certificate validity and no POE exists.
    RevocationOutOfBoundsNoPoe => "REVOCATION_OUT_OF_BOUNDS_NO_POE",
    /// An algorithm is no longer acceptable and no POE predates its expiration.
    CryptoConstraintsFailureNoPoe => "CRYPTO_CONSTRAINTS_FAILURE_NO_POE",
    /// A proof of existence required by the process is missing.
    NoPoe => "NO_POE",
    /// Revocation data is not fresh enough; validation may succeed later.
    TryLater => "TRY_LATER",
    /// A signed data object could not be found.
    SignedDataNotFound => "SIGNED_DATA_NOT_FOUND",
}

impl SubIndication {
    /// Returns `true` for failure classes that proof of existence at an
    /// earlier time can overturn.
    pub fn is_time_sensitive(&self) -> bool {
        matches!(
            self,
            Self::RevokedNoPoe
                | Self::RevokedCaNoPoe
                | Self::OutOfBoundsNoPoe
                | Self::OutOfBoundsNotRevoked
                | Self::RevocationOutOfBoundsNoPoe
                | Self::CryptoConstraintsFailureNoPoe
                | Self::Expired
        )
    }
}

impl Display for SubIndication {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to a validation constraint.
///
/// A failed constraint at [`Level::Fail`] ends the enclosing chain; the other
/// levels only record a message.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// Failure stops the chain and determines its conclusion.
    #[default]
    Fail,

    /// Failure is recorded as a warning.
    Warn,

    /// Failure is recorded as information.
    Inform,

    /// The constraint is not evaluated.
    Ignore,
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "FAIL",
            Self::Warn => "WARN",
            Self::Inform => "INFORM",
            Self::Ignore => "IGNORE",
        })
    }
}
