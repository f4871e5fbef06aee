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

//! Past certificate validation, control-time sliding and past signature
//! validation.
//!
//! A time-sensitive failure at the validation time may be overturned when
//! the chain was valid at an earlier control time and the token is proven
//! to have existed by then.

use adesval_status_tracker::{message_tags::*, Conclusion, Indication, Level, SubIndication};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::{
    diagnostic::{CertificateStatus, CertificateToken, SignedToken},
    policy::constraints::CERTIFICATE_POE_AT_CONTROL_TIME,
    process::{
        bbb::{algorithms_reliable_at, x509_certificate_validation, BasicBuildingBlocks, XcvResult},
        revocation::{RevocationDataLoadingStrategy, RevocationFreshnessChecker},
        Chain, ChainResult, PoeStore, Rule, ValidationContext,
    },
};

/// One candidate control time tried by past certificate validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlTimeAttempt {
    pub time: DateTime<Utc>,

    /// Chain validation at `time`.
    pub xcv: Conclusion,

    /// Control-time sliding from `time`, when the chain was valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sliding: Option<Conclusion>,
}

/// Sliding outcome for one certificate of the chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlidingStep {
    pub certificate_id: String,

    /// Control time after this certificate.
    pub control_time: DateTime<Utc>,

    #[serde(flatten)]
    pub result: ChainResult,
}

/// Control-time sliding from a time at which the chain was valid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlTimeSliding {
    pub control_time: DateTime<Utc>,

    pub steps: Vec<SlidingStep>,

    #[serde(flatten)]
    pub result: ChainResult,
}

/// Outcome of past certificate validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PastCertificateValidation {
    pub attempts: Vec<ControlTimeAttempt>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sliding: Option<ControlTimeSliding>,

    pub conclusion: Conclusion,
}

/// Outcome of past signature validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PastSignatureValidation {
    pub pcv: PastCertificateValidation,

    #[serde(flatten)]
    pub result: ChainResult,
}

impl PastSignatureValidation {
    pub fn conclusion(&self) -> &Conclusion {
        &self.result.conclusion
    }
}

/// Searches, latest first, for a control time at which the chain of
/// `token` was valid and the token is proven to exist.
///
/// Candidates are the proofs of existence of the token, the production
/// times of time-stamps covering it and of revocation data of its chain.
/// When no candidate works the conclusion of `current_xcv` is returned
/// unchanged.
pub fn past_certificate_validation(
    ctx: &ValidationContext<'_>,
    token: &dyn SignedToken,
    current_xcv: &XcvResult,
    poe: &PoeStore,
) -> PastCertificateValidation {
    let certificate_id = token.signing_certificate_id().unwrap_or_default();

    let mut candidates = poe.poe_times(token.id());
    candidates.extend(
        ctx.snapshot
            .timestamps_covering(token.id())
            .iter()
            .map(|timestamp| timestamp.production_time),
    );
    for id in &current_xcv.chain {
        candidates.extend(
            ctx.snapshot
                .revocations_for(id)
                .iter()
                .map(|revocation| revocation.production_time),
        );
    }
    candidates.retain(|time| *time <= poe.now() && poe.is_poe_exists(token.id(), *time));
    candidates.sort_by(|a, b| b.cmp(a));
    candidates.dedup();

    let mut attempts = Vec::new();
    for time in candidates {
        let xcv = x509_certificate_validation(ctx, certificate_id, time, token.kind());
        if !xcv.result.is_passed() {
            attempts.push(ControlTimeAttempt {
                time,
                xcv: xcv.result.conclusion,
                sliding: None,
            });
            continue;
        }

        let sliding = control_time_sliding(ctx, &xcv, time, poe);
        attempts.push(ControlTimeAttempt {
            time,
            xcv: xcv.result.conclusion.clone(),
            sliding: Some(sliding.result.conclusion.clone()),
        });

        if sliding.result.is_passed() {
            debug!(
                "control time for {} found at {time}, slid to {}",
                token.id(),
                sliding.control_time
            );

            let mut chain = Chain::new("past_certificate_validation", token.id(), ctx.error_behavior);
            chain.rule(
                Rule::bubble(PCV_ICTVC, xcv.conclusion()).with_info(time.to_rfc3339()),
            );
            chain.rule(Rule::bubble(PCV_CTS, &sliding.result.conclusion));

            return PastCertificateValidation {
                attempts,
                control_time: Some(sliding.control_time),
                conclusion: chain.execute().conclusion,
                sliding: Some(sliding),
            };
        }
    }

    debug!("no control time found for {}", token.id());
    PastCertificateValidation {
        attempts,
        control_time: None,
        sliding: None,
        conclusion: current_xcv.conclusion().clone(),
    }
}

/// Slides the control time from the certificate below the trust anchor
/// down to the leaf.
///
/// Each certificate needs revocation data issued at or before the control
/// time. The control time moves back to a revocation date, to the
/// issuance of revocation data that is not fresh, and to the expiration
/// of the certificate signature algorithm.
pub fn control_time_sliding(
    ctx: &ValidationContext<'_>,
    xcv: &XcvResult,
    start: DateTime<Utc>,
    poe: &PoeStore,
) -> ControlTimeSliding {
    let certificates: Vec<&CertificateToken> =
        xcv.chain.iter().filter_map(|id| ctx.pool.get(id)).collect();
    let checker = RevocationFreshnessChecker::new(&ctx.policy.revocation);
    let strategy = RevocationDataLoadingStrategy::from_context(ctx);
    let poe_level = ctx.policy.level(CERTIFICATE_POE_AT_CONTROL_TIME);

    let mut control_time = start;
    let mut steps = Vec::new();

    for (index, certificate) in certificates.iter().enumerate().rev() {
        if certificate.trusted {
            continue;
        }

        let issuer = certificates.get(index + 1);
        let mut rules = Chain::new("control_time_sliding", &certificate.id, ctx.error_behavior);
        let mut selected = None;

        if !certificate.ocsp_no_check {
            let intact: Vec<_> = ctx
                .snapshot
                .revocations_for(&certificate.id)
                .into_iter()
                .filter(|revocation| revocation.signature_intact)
                .collect();
            let issued_before: Vec<_> = intact
                .iter()
                .copied()
                .filter(|revocation| revocation.production_time <= control_time)
                .collect();
            selected = strategy.order(&issued_before).into_iter().next();

            let exists = !intact.is_empty();
            rules.rule(
                Rule::new(CTS_DRIE, Level::Fail, move || exists)
                    .on_failure(Indication::Indeterminate, SubIndication::NoPoe),
            );
            rules.rule(
                Rule::new(CTS_IIDORIBCT, Level::Fail, move || selected.is_some())
                    .on_failure(Indication::Indeterminate, SubIndication::NoPoe)
                    .with_info(control_time.to_rfc3339()),
            );

            let certificate = *certificate;
            rules.rule(
                Rule::new(CTS_IIDOCWVPOC, Level::Fail, move || {
                    selected.is_some_and(|revocation| {
                        certificate.is_valid_at(revocation.production_time)
                            || revocation.covers_expired_certificate(certificate.not_after)
                    })
                })
                .on_failure(Indication::Indeterminate, SubIndication::NoPoe),
            );
        }

        let proven = poe.is_poe_exists(&certificate.id, control_time);
        rules.rule(
            Rule::new(CTS_ITAPOE, poe_level, move || proven)
                .on_failure(Indication::Indeterminate, SubIndication::NoPoe),
        );

        let result = rules.execute();
        let passed = result.is_passed();

        if passed {
            if let Some(revocation) = selected {
                if revocation.status == CertificateStatus::Revoked {
                    if let Some(date) = revocation.revocation_date {
                        control_time = control_time.min(date);
                    }
                }
                if !checker.is_fresh(revocation, control_time) {
                    control_time = control_time.min(revocation.production_time);
                }
            }

            if let Some(algorithm) = &certificate.signature_algorithm {
                let key_size = issuer.and_then(|issuer| issuer.public_key_size);
                if let Ok(Some(expiration)) = ctx
                    .policy
                    .cryptographic_suite
                    .signature_expiration(algorithm, key_size)
                {
                    control_time = control_time.min(expiration);
                }
            }
        }

        steps.push(SlidingStep {
            certificate_id: certificate.id.clone(),
            control_time,
            result,
        });

        if !passed {
            break;
        }
    }

    let leaf_id = xcv.chain.first().cloned().unwrap_or_default();
    let mut chain = Chain::new("control_time_sliding", leaf_id, ctx.error_behavior);
    for step in &steps {
        chain.rule(
            Rule::bubble(PCV_CTS, &step.result.conclusion).with_info(step.certificate_id.clone()),
        );
    }

    ControlTimeSliding {
        control_time,
        result: chain.execute(),
        steps,
    }
}

/// Tries to overturn a time-sensitive building-block failure of `token`.
///
/// Chain failures are overturned when a proof of existence of the token
/// precedes the control time. Algorithm failures are overturned when the
/// algorithms were reliable at the lowest proof of existence. Anything
/// else keeps the current verdict unchanged.
pub fn past_signature_validation(
    ctx: &ValidationContext<'_>,
    token: &dyn SignedToken,
    bbb: &BasicBuildingBlocks,
    poe: &PoeStore,
) -> PastSignatureValidation {
    let current = &bbb.conclusion;
    let pcv = match &bbb.xcv {
        Some(xcv) => past_certificate_validation(ctx, token, xcv, poe),
        None => PastCertificateValidation {
            attempts: Vec::new(),
            control_time: None,
            sliding: None,
            conclusion: current.clone(),
        },
    };

    let lowest_poe = poe.lowest_poe_time(token.id());
    let mut chain = Chain::new("past_signature_validation", token.id(), ctx.error_behavior);
    chain.rule(Rule::bubble(PSV_IPCVC, &pcv.conclusion));

    let crypto_failure = |conclusion: &Conclusion| {
        conclusion.sub_indication == Some(SubIndication::CryptoConstraintsFailureNoPoe)
    };

    if current.is_time_sensitive() && !crypto_failure(current) {
        let control_time = pcv.control_time;
        chain.rule(
            Rule::new(PSV_IPSVC, Level::Fail, move || {
                control_time.is_some_and(|control_time| lowest_poe <= control_time)
            })
            .on_failure_as(current)
            .with_info(lowest_poe.to_rfc3339()),
        );
    } else if !current.is_time_sensitive() {
        chain.rule(Rule::bubble(PSV_IPSVC, current));
    }

    let crypto = [current, &bbb.sav.conclusion]
        .into_iter()
        .find(|conclusion| crypto_failure(*conclusion));
    if let Some(crypto) = crypto {
        let reliable = algorithms_reliable_at(ctx, token, lowest_poe);
        chain.rule(
            Rule::new(PSV_ICAR, Level::Fail, move || reliable)
                .on_failure_as(crypto)
                .with_info(lowest_poe.to_rfc3339()),
        );
    }

    if !bbb.sav.is_passed() && !crypto_failure(&bbb.sav.conclusion) {
        chain.rule(Rule::bubble(BBB_SAV, &bbb.sav.conclusion));
    }

    PastSignatureValidation {
        pcv,
        result: chain.execute(),
    }
}
