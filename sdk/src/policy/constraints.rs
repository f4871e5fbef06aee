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

//! Catalog of the configurable constraints.
//!
//! Each check a building block evaluates is governed by one named
//! constraint whose [`Level`] the validation policy may override.

use adesval_status_tracker::Level;

/// A named, configurable constraint and its default level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Constraint {
    pub name: &'static str,
    pub default_level: Level,
}

macro_rules! constraints {
    ($($(#[$doc:meta])* $id:ident => ($name:literal, $level:ident),)*) => {
        $(
            $(#[$doc])*
            pub const $id: Constraint = Constraint {
                name: $name,
                default_level: Level::$level,
            };
        )*

        /// Every constraint known to the engine.
        pub const ALL: &[Constraint] = &[$($id,)*];
    };
}

constraints! {
    // format checking
    ACCEPTABLE_FORMAT => ("acceptable_format", Fail),
    STRUCTURAL_VALIDATION => ("structural_validation", Warn),

    // identification of the signing certificate
    SIGNING_CERTIFICATE_IDENTIFIED => ("signing_certificate_identified", Fail),
    SIGNING_CERTIFICATE_DIGEST_MATCH => ("signing_certificate_digest_match", Fail),

    // validation context initialization
    ACCEPTED_SIGNATURE_POLICY => ("accepted_signature_policy", Fail),
    SIGNATURE_POLICY_AVAILABLE => ("signature_policy_available", Warn),
    SIGNATURE_POLICY_DIGEST_MATCH => ("signature_policy_digest_match", Warn),

    // X.509 certificate validation
    PROSPECTIVE_CERTIFICATE_CHAIN => ("prospective_certificate_chain", Fail),
    CERTIFICATE_VALIDITY_STARTED => ("certificate_validity_started", Fail),
    SIGNING_CERTIFICATE_NOT_EXPIRED => ("signing_certificate_not_expired", Fail),
    CA_CERTIFICATE_NOT_EXPIRED => ("ca_certificate_not_expired", Fail),
    REVOCATION_DATA_PRESENT => ("revocation_data_present", Fail),
    REVOCATION_DATA_ACCEPTABLE => ("revocation_data_acceptable", Fail),
    REVOCATION_STATUS_KNOWN => ("revocation_status_known", Fail),
    CERTIFICATE_NOT_ON_HOLD => ("certificate_not_on_hold", Fail),
    SIGNING_CERTIFICATE_NOT_REVOKED => ("signing_certificate_not_revoked", Fail),
    CA_CERTIFICATE_NOT_REVOKED => ("ca_certificate_not_revoked", Fail),
    CERTIFICATE_SIGNATURE_INTACT => ("certificate_signature_intact", Fail),
    SIGNING_CERTIFICATE_KEY_USAGE => ("signing_certificate_key_usage", Warn),
    CA_CERTIFICATE_KEY_USAGE => ("ca_certificate_key_usage", Fail),
    CERTIFICATE_CRYPTOGRAPHIC_CONSTRAINTS => ("certificate_cryptographic_constraints", Fail),
    CERTIFICATE_POLICY_IDS => ("certificate_policy_ids", Fail),

    // cryptographic verification
    REFERENCE_DATA_FOUND => ("reference_data_found", Fail),
    REFERENCE_DATA_INTACT => ("reference_data_intact", Fail),
    SIGNATURE_INTACT => ("signature_intact", Fail),

    // signature acceptance validation
    SIGNING_TIME_PRESENT => ("signing_time_present", Warn),
    SIGNING_CERTIFICATE_REFERENCE_PRESENT => ("signing_certificate_reference_present", Warn),
    CLAIMED_ROLE_ACCEPTED => ("claimed_role_accepted", Fail),
    COMMITMENT_TYPE_ACCEPTED => ("commitment_type_accepted", Fail),
    SIGNATURE_POLICY_PRESENT => ("signature_policy_present", Ignore),
    SIGNATURE_CRYPTOGRAPHIC_CONSTRAINTS => ("signature_cryptographic_constraints", Fail),
    REFERENCE_DIGEST_CRYPTOGRAPHIC_CONSTRAINTS => ("reference_digest_cryptographic_constraints", Fail),

    // past certificate validation
    /// Certificates of the chain must have a proof of existence at the
    /// control time reached by control-time sliding.
    CERTIFICATE_POE_AT_CONTROL_TIME => ("certificate_poe_at_control_time", Fail),

    // evidence record validation
    /// An evidence record protecting the signature must be valid.
    EVIDENCE_RECORD_VALID => ("evidence_record_valid", Fail),
    ARCHIVE_TIMESTAMP_COVERAGE => ("archive_timestamp_coverage", Fail),
    ARCHIVE_TIMESTAMP_ORDER => ("archive_timestamp_order", Fail),

    // qualification
    /// Qualification at issuance time must agree with qualification at
    /// the best-signature-time.
    QUALIFICATION_CONSISTENCY => ("qualification_consistency", Warn),
    CERTIFICATE_TYPE_DETERMINED => ("certificate_type_determined", Warn),
}

/// Looks up a constraint by its configuration name.
pub fn find(name: &str) -> Option<Constraint> {
    ALL.iter().copied().find(|c| c.name == name)
}
