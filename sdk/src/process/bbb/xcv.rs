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

//! X.509 certificate validation.

use adesval_status_tracker::{message_tags::*, Conclusion, Indication, SubIndication};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    diagnostic::{CertificateChain, CertificateStatus, CertificateToken, TokenKind},
    policy::constraints::*,
    process::{
        revocation::{RevocationDataLoadingStrategy, RevocationOutcome},
        Chain, ChainResult, Rule, ValidationContext,
    },
};

/// Validation of one certificate of the chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CertificateValidation {
    pub certificate_id: String,

    /// Revocation token accepted for the certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_id: Option<String>,

    #[serde(flatten)]
    pub result: ChainResult,
}

/// Outcome of validating a certificate chain at one validation time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XcvResult {
    pub validation_time: DateTime<Utc>,

    /// Identifiers of the prospective chain, leaf first.
    pub chain: Vec<String>,

    pub certificates: Vec<CertificateValidation>,

    #[serde(flatten)]
    pub result: ChainResult,
}

impl XcvResult {
    pub fn conclusion(&self) -> &Conclusion {
        &self.result.conclusion
    }

    /// Accepted revocation token for `certificate_id`, if any.
    pub fn revocation_for(&self, certificate_id: &str) -> Option<&str> {
        self.certificates
            .iter()
            .find(|c| c.certificate_id == certificate_id)
            .and_then(|c| c.revocation_id.as_deref())
    }
}

/// Validates the chain of `certificate_id` at `time`.
///
/// The chain must reach a trust anchor. Every certificate below the anchor
/// is then checked, leaf first.
pub fn x509_certificate_validation(
    ctx: &ValidationContext<'_>,
    certificate_id: &str,
    time: DateTime<Utc>,
    subject: TokenKind,
) -> XcvResult {
    let chain = ctx.pool.chain(certificate_id);

    let certificates: Vec<CertificateValidation> = chain
        .certificates
        .iter()
        .enumerate()
        .filter(|(_, certificate)| !certificate.trusted)
        .map(|(index, certificate)| validate_certificate(ctx, &chain, index, certificate, time, subject))
        .collect();

    let complete = chain.complete;
    let mut rules = Chain::new("x509_certificate_validation", certificate_id, ctx.error_behavior);
    rules.rule(
        Rule::new(
            BBB_XCV_CCCBB,
            ctx.policy.level(PROSPECTIVE_CERTIFICATE_CHAIN),
            move || complete,
        )
        .on_failure(Indication::Indeterminate, SubIndication::NoCertificateChainFound),
    );
    for validation in &certificates {
        rules.rule(
            Rule::bubble(BBB_XCV_SUB, &validation.result.conclusion)
                .with_info(validation.certificate_id.clone()),
        );
    }
    let result = rules.execute();

    XcvResult {
        validation_time: time,
        chain: chain.ids(),
        certificates,
        result,
    }
}

fn validate_certificate(
    ctx: &ValidationContext<'_>,
    chain: &CertificateChain<'_>,
    index: usize,
    certificate: &CertificateToken,
    time: DateTime<Utc>,
    subject: TokenKind,
) -> CertificateValidation {
    let policy = ctx.policy;
    let leaf = index == 0;
    let issuer = chain.issuer_at(index);
    let mut rules = Chain::new("x509_certificate_validation", &certificate.id, ctx.error_behavior);

    rules.rule(
        Rule::new(
            BBB_XCV_ICVS,
            policy.level(CERTIFICATE_VALIDITY_STARTED),
            move || time >= certificate.not_before,
        )
        .on_failure(Indication::Indeterminate, SubIndication::NotYetValid),
    );

    let (not_expired, expired) = if leaf {
        (SIGNING_CERTIFICATE_NOT_EXPIRED, SubIndication::Expired)
    } else {
        (CA_CERTIFICATE_NOT_EXPIRED, SubIndication::OutOfBoundsNoPoe)
    };
    rules.rule(
        Rule::new(BBB_XCV_ICNE, policy.level(not_expired), move || {
            time <= certificate.not_after
        })
        .on_failure(Indication::Indeterminate, expired)
        .with_info(certificate.not_after.to_rfc3339()),
    );

    let mut revocation_id = None;
    if !certificate.ocsp_no_check {
        let candidates = ctx.snapshot.revocations_for(&certificate.id);
        let outcome = RevocationDataLoadingStrategy::from_context(ctx).select(
            ctx,
            certificate,
            &candidates,
            time,
        );
        let present = !matches!(outcome, RevocationOutcome::Missing);
        let rejections = outcome.rejection_summary();
        let accepted = outcome.accepted();
        revocation_id = accepted.map(|r| r.id.clone());

        rules.rule(
            Rule::new(BBB_XCV_IRDPFC, policy.level(REVOCATION_DATA_PRESENT), move || present)
                .on_failure(Indication::Indeterminate, SubIndication::TryLater),
        );
        rules.rule(
            Rule::with_reason(BBB_XCV_IRDAC, policy.level(REVOCATION_DATA_ACCEPTABLE), move || {
                match accepted {
                    Some(_) => Ok(()),
                    None => Err(rejections),
                }
            })
            .on_failure(Indication::Indeterminate, SubIndication::TryLater),
        );

        if let Some(revocation) = accepted {
            let revoked = revocation.is_revoked_at(time);
            let on_hold = revoked && revocation.is_on_hold();

            rules.rule(
                Rule::new(BBB_XCV_ICSK, policy.level(REVOCATION_STATUS_KNOWN), move || {
                    revocation.status != CertificateStatus::Unknown
                })
                .on_failure(
                    Indication::Indeterminate,
                    SubIndication::CertificateChainGeneralFailure,
                )
                .with_info(revocation.id.clone()),
            );
            rules.rule(
                Rule::new(BBB_XCV_ISCOH, policy.level(CERTIFICATE_NOT_ON_HOLD), move || !on_hold)
                    .on_failure(Indication::Indeterminate, SubIndication::TryLater)
                    .with_info(revocation.id.clone()),
            );

            let (not_revoked, revoked_sub) = if leaf {
                (SIGNING_CERTIFICATE_NOT_REVOKED, SubIndication::RevokedNoPoe)
            } else {
                (CA_CERTIFICATE_NOT_REVOKED, SubIndication::RevokedCaNoPoe)
            };
            rules.rule(
                Rule::new(BBB_XCV_ISCR, policy.level(not_revoked), move || {
                    !revoked || on_hold
                })
                .on_failure(Indication::Indeterminate, revoked_sub)
                .with_info(revocation.id.clone()),
            );
        }
    }

    let signature_intact = certificate.signature_intact;
    rules.rule(
        Rule::new(
            BBB_XCV_ICSI,
            policy.level(CERTIFICATE_SIGNATURE_INTACT),
            move || signature_intact,
        )
        .on_failure(
            Indication::Indeterminate,
            SubIndication::CertificateChainGeneralFailure,
        ),
    );

    let key_usage = certificate.key_usage;
    if leaf {
        rules.rule(
            Rule::new(
                BBB_XCV_ISCGKU,
                policy.level(SIGNING_CERTIFICATE_KEY_USAGE),
                move || key_usage.non_repudiation || key_usage.digital_signature,
            )
            .on_failure(Indication::Indeterminate, SubIndication::ChainConstraintsFailure),
        );
    } else {
        let ca = certificate.ca;
        rules.rule(
            Rule::new(
                BBB_XCV_ISCGKU,
                policy.level(CA_CERTIFICATE_KEY_USAGE),
                move || ca && key_usage.key_cert_sign,
            )
            .on_failure(Indication::Indeterminate, SubIndication::ChainConstraintsFailure),
        );
    }

    let algorithm = certificate.signature_algorithm;
    let key_size = issuer.and_then(|issuer| issuer.public_key_size);
    rules.rule(
        Rule::with_reason(
            BBB_XCV_ICCM,
            policy.level(CERTIFICATE_CRYPTOGRAPHIC_CONSTRAINTS),
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

    let accepted_policies = &policy.accepted_certificate_policy_oids;
    if leaf && subject == TokenKind::Signature && !accepted_policies.is_empty() {
        rules.rule(
            Rule::new(BBB_XCV_ICPOID, policy.level(CERTIFICATE_POLICY_IDS), move || {
                certificate.has_any_policy(accepted_policies)
            })
            .on_failure(Indication::Indeterminate, SubIndication::ChainConstraintsFailure),
        );
    }

    CertificateValidation {
        certificate_id: certificate.id.clone(),
        revocation_id,
        result: rules.execute(),
    }
}
