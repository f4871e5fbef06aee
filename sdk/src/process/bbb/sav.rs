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

use adesval_status_tracker::{message_tags::*, Indication, SubIndication};
use chrono::{DateTime, Utc};

use crate::{
    diagnostic::{SignatureToken, SignedToken},
    policy::constraints::{
        CLAIMED_ROLE_ACCEPTED, COMMITMENT_TYPE_ACCEPTED, REFERENCE_DIGEST_CRYPTOGRAPHIC_CONSTRAINTS,
        SIGNATURE_CRYPTOGRAPHIC_CONSTRAINTS, SIGNATURE_POLICY_PRESENT,
        SIGNING_CERTIFICATE_REFERENCE_PRESENT, SIGNING_TIME_PRESENT,
    },
    process::{Chain, ChainResult, Rule, ValidationContext},
};

/// Signature acceptance validation at `time`.
///
/// Signed-attribute constraints only apply to signatures; the
/// cryptographic constraints apply to time-stamps as well.
pub(crate) fn signature_acceptance_validation(
    ctx: &ValidationContext<'_>,
    token: &dyn SignedToken,
    signature: Option<&SignatureToken>,
    time: DateTime<Utc>,
) -> ChainResult {
    let policy = ctx.policy;
    let mut chain = Chain::new("signature_acceptance_validation", token.id(), ctx.error_behavior);

    if let Some(signature) = signature {
        chain.rule(
            Rule::new(BBB_SAV_ISQPSTP, policy.level(SIGNING_TIME_PRESENT), move || {
                signature.signing_time.is_some()
            })
            .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
        );

        chain.rule(
            Rule::new(
                BBB_SAV_ISQPSCP,
                policy.level(SIGNING_CERTIFICATE_REFERENCE_PRESENT),
                move || signature.signing_certificate_reference.is_some(),
            )
            .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
        );

        if !policy.accepted_roles.is_empty() {
            chain.rule(
                Rule::new(BBB_SAV_ICRM, policy.level(CLAIMED_ROLE_ACCEPTED), move || {
                    signature
                        .claimed_roles
                        .iter()
                        .any(|role| policy.accepted_roles.contains(role))
                })
                .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
            );
        }

        if !policy.accepted_commitment_types.is_empty() {
            chain.rule(
                Rule::new(BBB_SAV_ICTIM, policy.level(COMMITMENT_TYPE_ACCEPTED), move || {
                    signature
                        .commitment_types
                        .iter()
                        .any(|commitment| policy.accepted_commitment_types.contains(commitment))
                })
                .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
            );
        }

        chain.rule(
            Rule::new(BBB_SAV_ISQPSPP, policy.level(SIGNATURE_POLICY_PRESENT), move || {
                signature.policy.is_some()
            })
            .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
        );
    }

    let algorithm = token.signature_algorithm().copied();
    let key_size = token
        .signing_certificate_id()
        .and_then(|id| ctx.pool.get(id))
        .and_then(|certificate| certificate.public_key_size);

    chain.rule(
        Rule::with_reason(
            BBB_SAV_ASCCM,
            policy.level(SIGNATURE_CRYPTOGRAPHIC_CONSTRAINTS),
            move || {
                let algorithm = algorithm.ok_or(Some("unknown signature algorithm".to_owned()))?;
                policy
                    .cryptographic_suite
                    .check_signature_at(&algorithm, key_size, time)
                    .map_err(|e| Some(e.to_string()))
            },
        )
        .on_failure(Indication::Indeterminate, SubIndication::CryptoConstraintsFailureNoPoe),
    );

    let digests: Vec<_> = token
        .references()
        .into_iter()
        .filter_map(|reference| reference.digest.map(|d| d.algorithm))
        .collect();

    chain.rule(
        Rule::with_reason(
            BBB_SAV_ARDCCM,
            policy.level(REFERENCE_DIGEST_CRYPTOGRAPHIC_CONSTRAINTS),
            move || {
                digests.into_iter().try_for_each(|algorithm| {
                    policy
                        .cryptographic_suite
                        .check_digest_at(algorithm, time)
                        .map_err(|e| Some(e.to_string()))
                })
            },
        )
        .on_failure(Indication::Indeterminate, SubIndication::CryptoConstraintsFailureNoPoe),
    );

    chain.execute()
}

/// Returns `true` if every algorithm protecting `token` is reliable at
/// `time`.
pub(crate) fn algorithms_reliable_at(
    ctx: &ValidationContext<'_>,
    token: &dyn SignedToken,
    time: DateTime<Utc>,
) -> bool {
    let suite = &ctx.policy.cryptographic_suite;
    let key_size = token
        .signing_certificate_id()
        .and_then(|id| ctx.pool.get(id))
        .and_then(|certificate| certificate.public_key_size);

    let signature_ok = token
        .signature_algorithm()
        .is_some_and(|algorithm| suite.check_signature_at(algorithm, key_size, time).is_ok());

    signature_ok
        && token
            .references()
            .iter()
            .filter_map(|reference| reference.digest.as_ref())
            .all(|digest| suite.check_digest_at(digest.algorithm, time).is_ok())
}
