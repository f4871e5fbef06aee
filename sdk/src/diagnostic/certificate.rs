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

use adesval_crypto::{
    CertificateFacts, CertificateParseError, Digest, EncryptionAlgorithm, KeyUsage,
    QcStatements, SignatureAlgorithm,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diagnostic::digest_matches;

/// An X.509 certificate as seen by the validation engine.
///
/// Certificates are immutable once loaded and are shared by every
/// validation performed against one snapshot.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CertificateToken {
    /// Unique token identifier within the snapshot.
    pub id: String,

    /// Subject distinguished name.
    pub subject: String,

    /// Issuer distinguished name.
    pub issuer: String,

    /// Serial number as hex.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub serial_number: String,

    /// Identifier of the issuing certificate, when the adapter resolved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,

    /// Start of the validity period.
    pub not_before: DateTime<Utc>,

    /// End of the validity period.
    pub not_after: DateTime<Utc>,

    /// Algorithm of the subject public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_algorithm: Option<EncryptionAlgorithm>,

    /// Size of the subject public key in bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_size: Option<u32>,

    /// Algorithm of the issuer's signature over this certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<SignatureAlgorithm>,

    /// The issuer's signature over this certificate verifies.
    #[serde(default)]
    pub signature_intact: bool,

    /// Basic constraints `cA` flag.
    #[serde(default)]
    pub ca: bool,

    /// Key usage bits.
    #[serde(default)]
    pub key_usage: KeyUsage,

    /// Certificate policy OIDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_oids: Vec<String>,

    /// Qualified-certificate statements.
    #[serde(default)]
    pub qc_statements: QcStatements,

    /// Revocation checking is waived for this certificate (`ocsp-nocheck`).
    #[serde(default)]
    pub ocsp_no_check: bool,

    /// The certificate is a trust anchor.
    #[serde(default)]
    pub trusted: bool,

    /// DER encoding, when available.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "adesval_crypto::base64::serde_opt_bytes"
    )]
    pub der: Option<Vec<u8>>,

    /// Known digests of the DER encoding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<Digest>,
}

impl CertificateToken {
    /// Builds a certificate token from its DER encoding.
    ///
    /// The signature is not verified here; see
    /// [`CertificatePool::verify_signatures`](crate::diagnostic::CertificatePool::verify_signatures).
    pub fn from_der(id: impl Into<String>, der: &[u8]) -> Result<Self, CertificateParseError> {
        let facts = CertificateFacts::from_der(der)?;

        Ok(Self {
            id: id.into(),
            subject: facts.subject,
            issuer: facts.issuer,
            serial_number: facts.serial_number,
            issuer_id: None,
            not_before: facts.not_before,
            not_after: facts.not_after,
            public_key_algorithm: facts.public_key_algorithm,
            public_key_size: facts.public_key_size,
            signature_algorithm: facts.signature_algorithm,
            signature_intact: false,
            ca: facts.is_ca,
            key_usage: facts.key_usage,
            policy_oids: facts.policy_oids,
            qc_statements: facts.qc_statements,
            ocsp_no_check: facts.ocsp_no_check,
            trusted: false,
            der: Some(der.to_vec()),
            digests: vec![Digest {
                algorithm: adesval_crypto::DigestAlgorithm::Sha256,
                value: facts.sha256,
            }],
        })
    }

    /// Replaces the certificate facts with those read from the DER
    /// encoding, when one is supplied.
    ///
    /// The identifier, issuer link, trust anchor flag and signature
    /// status are kept, and supplied digests are kept beside the computed
    /// one.
    pub fn with_der_facts(self) -> Result<Self, CertificateParseError> {
        let Some(der) = self.der.as_deref() else {
            return Ok(self);
        };

        let mut parsed = Self::from_der(self.id.clone(), der)?;
        for digest in self.digests {
            if !parsed.digests.contains(&digest) {
                parsed.digests.push(digest);
            }
        }

        Ok(Self {
            issuer_id: self.issuer_id,
            trusted: self.trusted,
            signature_intact: self.signature_intact,
            ..parsed
        })
    }

    /// Returns `true` if subject and issuer names are equal.
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }

    /// Returns `true` if `time` lies inside the validity period.
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    /// Returns `true` if the certificate carries any of `oids`.
    pub fn has_any_policy(&self, oids: &[String]) -> bool {
        self.policy_oids.iter().any(|oid| oids.contains(oid))
    }

    pub(crate) fn matches_digest(&self, digest: &Digest) -> Option<bool> {
        digest_matches(digest, self.der.as_deref(), &self.digests)
    }
}
