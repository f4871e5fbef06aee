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

use adesval_crypto::{Digest, SignatureAlgorithm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diagnostic::digest_matches;

/// Kind of revocation status information.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationKind {
    /// Certificate revocation list.
    Crl,

    /// OCSP response.
    Ocsp,
}

/// Status a revocation token asserts for its certificate.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Good,
    Revoked,
    Unknown,
}

/// RFC 5280 revocation reason codes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

/// A CRL entry or OCSP single response about one certificate.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RevocationToken {
    pub id: String,

    pub kind: RevocationKind,

    /// Certificate the token attests about.
    pub certificate_id: String,

    /// `producedAt` for OCSP, `thisUpdate` for CRLs.
    pub production_time: DateTime<Utc>,

    pub this_update: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_update: Option<DateTime<Utc>>,

    pub status: CertificateStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<RevocationReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_date: Option<DateTime<Utc>>,

    /// Certificate that signed the CRL or OCSP response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,

    #[serde(default)]
    pub signature_intact: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<SignatureAlgorithm>,

    /// Status of expired certificates is kept from this date on
    /// (`ExpiredCertsOnCRL` or OCSP `archiveCutoff`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_cutoff: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "adesval_crypto::base64::serde_opt_bytes"
    )]
    pub encoded: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<Digest>,
}

impl RevocationToken {
    /// Returns `true` if the token reports the certificate revoked at or
    /// before `time`.
    ///
    /// A revoked status without a date counts as revoked at any time.
    pub fn is_revoked_at(&self, time: DateTime<Utc>) -> bool {
        self.status == CertificateStatus::Revoked
            && self.revocation_date.map_or(true, |date| date <= time)
    }

    /// Returns `true` if the revocation is a `certificateHold` suspension.
    pub fn is_on_hold(&self) -> bool {
        self.revocation_reason == Some(RevocationReason::CertificateHold)
    }

    /// Returns `true` if the token still reports on the certificate after
    /// it expired.
    pub fn covers_expired_certificate(&self, not_after: DateTime<Utc>) -> bool {
        self.archive_cutoff.is_some_and(|cutoff| cutoff <= not_after)
    }

    pub(crate) fn matches_digest(&self, digest: &Digest) -> Option<bool> {
        digest_matches(digest, self.encoded.as_deref(), &self.digests)
    }
}
