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

//! The evidence snapshot a validation runs against.
//!
//! A [`DiagnosticData`] holds every certificate, revocation token,
//! time-stamp, signature and evidence record extracted from a signed
//! document, together with the trust services known to the validator.
//! Format-specific adapters produce it; the engine never parses
//! signature containers itself.

use std::collections::BTreeSet;

use adesval_crypto::{Digest, SignatureAlgorithm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

mod certificate;
pub use certificate::CertificateToken;

mod pool;
pub use pool::{CertificateChain, CertificatePool};

mod revocation;
pub use revocation::{CertificateStatus, RevocationKind, RevocationReason, RevocationToken};

mod signature;
pub use signature::{SignaturePolicyIdentifier, SignatureToken, SigningCertificateReference};

mod timestamp;
pub use timestamp::{
    EvidenceRecord, TimestampToken, TimestampType, TimestampedCategory, TimestampedObject,
};

mod trust_service;
pub use trust_service::{ServiceQualifier, TrustService, CA_QC, GRANTED_STATUSES};

/// Kind of a token that carries a signature validated by the building blocks.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Signature,
    Timestamp,
}

/// A data object signed by a token.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DataReference {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,

    #[serde(default)]
    pub found: bool,

    #[serde(default)]
    pub intact: bool,
}

/// Capability of being validated by the basic building blocks.
///
/// Signatures and time-stamps implement this; the building blocks only see
/// the token through it.
pub trait SignedToken {
    fn id(&self) -> &str;

    fn kind(&self) -> TokenKind;

    fn signing_certificate_id(&self) -> Option<&str>;

    fn signature_algorithm(&self) -> Option<&SignatureAlgorithm>;

    fn signature_intact(&self) -> bool;

    /// Data objects whose digests the signature protects.
    fn references(&self) -> Vec<DataReference>;
}

/// Immutable evidence snapshot for one validation run.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DiagnosticData {
    /// Validation time ("now") of the run. Defaults to the current time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub certificates: Vec<CertificateToken>,

    #[serde(default)]
    pub revocations: Vec<RevocationToken>,

    #[serde(default)]
    pub timestamps: Vec<TimestampToken>,

    #[serde(default)]
    pub signatures: Vec<SignatureToken>,

    #[serde(default)]
    pub evidence_records: Vec<EvidenceRecord>,

    #[serde(default)]
    pub trust_services: Vec<TrustService>,
}

impl DiagnosticData {
    /// Parses a snapshot from its JSON form and checks its references.
    ///
    /// Certificates supplied with a DER encoding take their facts from it.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: DiagnosticData = serde_json::from_str(json)?;
        snapshot.apply_certificate_encodings()?;
        snapshot.check_references()?;
        Ok(snapshot)
    }

    /// Re-derives the facts of certificates that carry a DER encoding and
    /// verifies their signatures against the encodings of their issuers.
    pub fn apply_certificate_encodings(&mut self) -> Result<()> {
        self.certificates = std::mem::take(&mut self.certificates)
            .into_iter()
            .map(CertificateToken::with_der_facts)
            .collect::<std::result::Result<_, _>>()?;

        CertificatePool::verify_signatures(&mut self.certificates);
        Ok(())
    }

    /// Reads a JSON snapshot from `path`.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn certificate(&self, id: &str) -> Option<&CertificateToken> {
        self.certificates.iter().find(|c| c.id == id)
    }

    pub fn timestamp(&self, id: &str) -> Option<&TimestampToken> {
        self.timestamps.iter().find(|t| t.id == id)
    }

    pub fn signature(&self, id: &str) -> Option<&SignatureToken> {
        self.signatures.iter().find(|s| s.id == id)
    }

    /// Revocation tokens about certificate `certificate_id`.
    pub fn revocations_for(&self, certificate_id: &str) -> Vec<&RevocationToken> {
        self.revocations
            .iter()
            .filter(|r| r.certificate_id == certificate_id)
            .collect()
    }

    /// Time-stamps listing `token_id` among their covered objects.
    pub fn timestamps_covering(&self, token_id: &str) -> Vec<&TimestampToken> {
        self.timestamps
            .iter()
            .filter(|t| t.covers(token_id))
            .collect()
    }

    /// Evidence records protecting signature `signature_id`.
    pub fn evidence_records_for(&self, signature_id: &str) -> Vec<&EvidenceRecord> {
        self.evidence_records
            .iter()
            .filter(|e| e.signature_id == signature_id)
            .collect()
    }

    /// Checks whether `digest` is a digest of token `token_id`.
    ///
    /// Returns `None` when neither the encoding nor a digest with the same
    /// algorithm is known for the token.
    pub fn token_matches_digest(&self, token_id: &str, digest: &Digest) -> Option<bool> {
        if let Some(c) = self.certificate(token_id) {
            return c.matches_digest(digest);
        }
        if let Some(r) = self.revocations.iter().find(|r| r.id == token_id) {
            return r.matches_digest(digest);
        }
        if let Some(t) = self.timestamp(token_id) {
            return t.matches_digest(digest);
        }
        if let Some(s) = self.signature(token_id) {
            return s.matches_digest(digest);
        }
        None
    }

    /// Rejects snapshots with duplicate identifiers or references to
    /// tokens that are not present.
    pub fn check_references(&self) -> Result<()> {
        let mut ids = BTreeSet::new();
        let all_ids = self
            .certificates
            .iter()
            .map(|c| c.id.as_str())
            .chain(self.revocations.iter().map(|r| r.id.as_str()))
            .chain(self.timestamps.iter().map(|t| t.id.as_str()))
            .chain(self.signatures.iter().map(|s| s.id.as_str()))
            .chain(self.evidence_records.iter().map(|e| e.id.as_str()));

        for id in all_ids {
            if !ids.insert(id) {
                return Err(Error::DuplicateToken(id.to_owned()));
            }
        }

        let require = |id: &str, referenced_by: &str| -> Result<()> {
            if ids.contains(id) {
                Ok(())
            } else {
                Err(Error::UnknownToken {
                    id: id.to_owned(),
                    referenced_by: referenced_by.to_owned(),
                })
            }
        };

        for c in &self.certificates {
            if let Some(issuer_id) = &c.issuer_id {
                require(issuer_id, &c.id)?;
            }
        }
        for r in &self.revocations {
            require(&r.certificate_id, &r.id)?;
            if let Some(signer) = &r.signing_certificate_id {
                require(signer, &r.id)?;
            }
        }
        for t in &self.timestamps {
            if let Some(signer) = &t.signing_certificate_id {
                require(signer, &t.id)?;
            }
            for object in &t.timestamped_objects {
                require(&object.token_id, &t.id)?;
            }
        }
        for s in &self.signatures {
            if let Some(signer) = &s.signing_certificate_id {
                require(signer, &s.id)?;
            }
        }
        for e in &self.evidence_records {
            require(&e.signature_id, &e.id)?;
            for ats in &e.archive_timestamp_ids {
                if self.timestamp(ats).is_none() {
                    return Err(Error::UnknownToken {
                        id: ats.clone(),
                        referenced_by: e.id.clone(),
                    });
                }
            }
        }
        for service in &self.trust_services {
            for id in &service.certificate_ids {
                require(id, &service.id)?;
            }
        }

        Ok(())
    }
}

/// Compares `digest` against an encoding or a set of known digests.
pub(crate) fn digest_matches(digest: &Digest, encoded: Option<&[u8]>, known: &[Digest]) -> Option<bool> {
    if known.contains(digest) {
        return Some(true);
    }

    if let Some(encoded) = encoded {
        return Some(digest.matches(encoded));
    }

    if known.iter().any(|k| k.algorithm == digest.algorithm) {
        return Some(false);
    }

    None
}
