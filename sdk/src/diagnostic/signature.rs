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

/// The signed reference to the signing certificate
/// (`signing-certificate-v2` or `SigningCertificateV2`).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SigningCertificateReference {
    /// The referenced digest matches the identified certificate.
    pub digest_match: bool,

    /// The referenced issuer and serial number match, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_serial_match: Option<bool>,
}

/// The signature policy identifier claimed by a signature.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SignaturePolicyIdentifier {
    /// Policy OID or URI.
    pub id: String,

    /// The policy document could be retrieved.
    #[serde(default)]
    pub available: bool,

    /// The retrieved policy matches the signed digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_match: Option<bool>,
}

/// An advanced electronic signature under validation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SignatureToken {
    pub id: String,

    /// Signature format, such as `PAdES-BASELINE-B` or `XAdES-BASELINE-LTA`.
    pub format: String,

    /// Structural problems found while parsing the signature.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structural_errors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_certificate_reference: Option<SigningCertificateReference>,

    /// Claimed signing time (`signing-time` attribute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<SignatureAlgorithm>,

    #[serde(default)]
    pub signature_intact: bool,

    /// Signed data objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<DataReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<SignaturePolicyIdentifier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claimed_roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commitment_types: Vec<String>,

    /// Raw signature value.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "adesval_crypto::base64::serde_opt_bytes"
    )]
    pub signature_value: Option<Vec<u8>>,

    /// Known digests of the signature value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<Digest>,
}

impl SignatureToken {
    pub fn is_structurally_valid(&self) -> bool {
        self.structural_errors.is_empty()
    }

    pub(crate) fn matches_digest(&self, digest: &Digest) -> Option<bool> {
        digest_matches(digest, self.signature_value.as_deref(), &self.digests)
    }
}

impl SignedToken for SignatureToken {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TokenKind {
        TokenKind::Signature
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
        self.references.clone()
    }
}
