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

use crate::diagnostic::{digest_matches, DataReference, SignedToken, TokenKind};

/// Role of a time-stamp within the signature it belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampType {
    /// Covers the signed content before signing.
    ContentTimestamp,

    /// Covers the signature value.
    SignatureTimestamp,

    /// Covers validation data added to the signature.
    ValidationDataTimestamp,

    /// Covers the signature and all validation material.
    ArchiveTimestamp,

    /// Archive time-stamp inside an evidence record.
    EvidenceRecordTimestamp,
}

/// Category of a token covered by a time-stamp.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampedCategory {
    Signature,
    Certificate,
    Revocation,
    Timestamp,
    SignedData,
}

/// A token covered by a time-stamp, with the digest the time-stamp holds
/// for it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TimestampedObject {
    pub token_id: String,

    pub category: TimestampedCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
}

/// An RFC 3161 time-stamp token.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TimestampToken {
    pub id: String,

    #[serde(rename = "type")]
    pub timestamp_type: TimestampType,

    /// `genTime` of the token.
    pub production_time: DateTime<Utc>,

    /// Message imprint of the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_imprint: Option<Digest>,

    /// The data the imprint was computed over was found.
    #[serde(default)]
    pub message_imprint_found: bool,

    /// The imprint matches that data.
    #[serde(default)]
    pub message_imprint_intact: bool,

    #[serde(default)]
    pub signature_intact: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<SignatureAlgorithm>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamped_objects: Vec<TimestampedObject>,

    /// Digests covered by the token's hash tree, for evidence records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub covered_digests: Vec<Digest>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "adesval_crypto::base64::serde_opt_bytes"
    )]
    pub encoded: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<Digest>,
}

impl TimestampToken {
    /// Returns `true` if `token_id` is among the covered objects.
    pub fn covers(&self, token_id: &str) -> bool {
        self.timestamped_objects
            .iter()
            .any(|object| object.token_id == token_id)
    }

    pub(crate) fn matches_digest(&self, digest: &Digest) -> Option<bool> {
        digest_matches(digest, self.encoded.as_deref(), &self.digests)
    }
}

impl SignedToken for TimestampToken {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TokenKind {
        TokenKind::Timestamp
    }

    fn signing_certificate_id(&self) -> Option<&str> {
        self.signing_certificate_id.as_deref()
    }

    fn signature_algorithm(&self) -> Option<&SignatureAlgorithm> {
        self.signature_algorithm.as_ref()
    }

    fn signature_intact(&self) -> bool {
        self.signature_intact
    }

    fn references(&self) -> Vec<DataReference> {
        vec![DataReference {
            name: "message-imprint".to_owned(),
            digest: self.message_imprint.clone(),
            found: self.message_imprint_found,
            intact: self.message_imprint_intact,
        }]
    }
}

/// An RFC 4998 evidence record protecting one signature.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EvidenceRecord {
    pub id: String,

    /// Signature protected by the record.
    pub signature_id: String,

    /// Archive time-stamps, oldest first.
    pub archive_timestamp_ids: Vec<String>,
}
