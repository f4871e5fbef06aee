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

//! eIDAS qualification of signatures.
//!
//! The signing certificate is qualified from its content under the regime
//! of its issuance date, then overlaid with the trust service that listed
//! its issuer. This is done at issuance time and at the best-signature
//! time; the latter decides the signature label.

use std::fmt;

use adesval_status_tracker::{message_tags::*, Conclusion, Indication, Level};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    diagnostic::{CertificateChain, CertificateToken, SignatureToken},
    policy::constraints::{CERTIFICATE_TYPE_DETERMINED, QUALIFICATION_CONSISTENCY},
    process::{Chain, ChainResult, Rule, ValidationContext},
};

mod certificate;
pub use certificate::{
    CertificateQualification, CertificateType, QualificationRegime, QCP_LEGAL, QCP_LEGAL_QSCD,
    QCP_NATURAL, QCP_NATURAL_QSCD, QCP_WEB,
};

mod trust;
pub use trust::{apply_trust_service, SnapshotTrustServiceLookup, TrustServiceLookup};

/// Qualification label of a signature.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SignatureQualification {
    #[serde(rename = "QESig")]
    QESig,
    #[serde(rename = "QESeal")]
    QESeal,
    #[serde(rename = "AdESig-QC")]
    AdESigQC,
    #[serde(rename = "AdESeal-QC")]
    AdESealQC,
    #[serde(rename = "AdESig")]
    AdESig,
    #[serde(rename = "AdESeal")]
    AdESeal,
    #[serde(rename = "Indeterminate QESig")]
    IndeterminateQESig,
    #[serde(rename = "Indeterminate QESeal")]
    IndeterminateQESeal,
    #[serde(rename = "Indeterminate AdESig-QC")]
    IndeterminateAdESigQC,
    #[serde(rename = "Indeterminate AdESeal-QC")]
    IndeterminateAdESealQC,
    #[serde(rename = "Indeterminate AdESig")]
    IndeterminateAdESig,
    #[serde(rename = "Indeterminate AdESeal")]
    IndeterminateAdESeal,
    #[serde(rename = "NOT_ADES_QC_QSCD")]
    NotAdESQCQSCD,
    #[serde(rename = "NOT_ADES_QC")]
    NotAdESQC,
    #[serde(rename = "NOT_ADES")]
    NotAdES,
    #[serde(rename = "N/A")]
    Na,
}

impl SignatureQualification {
    /// Combines the validation verdict with the qualification of the
    /// signing certificate at the best-signature time.
    pub fn determine(indication: Indication, certificate: Option<&CertificateQualification>) -> Self {
        let Some(q) = certificate else {
            return Self::Na;
        };

        if matches!(q.certificate_type, CertificateType::Wsa | CertificateType::Unknown) {
            return Self::Na;
        }

        let seal = q.certificate_type == CertificateType::ESeal;
        match (indication, q.qualified, q.qscd, seal) {
            (Indication::Failed, true, true, _) => Self::NotAdESQCQSCD,
            (Indication::Failed, true, false, _) => Self::NotAdESQC,
            (Indication::Failed, false, _, _) => Self::NotAdES,
            (Indication::Passed, true, true, false) => Self::QESig,
            (Indication::Passed, true, true, true) => Self::QESeal,
            (Indication::Passed, true, false, false) => Self::AdESigQC,
            (Indication::Passed, true, false, true) => Self::AdESealQC,
            (Indication::Passed, false, _, false) => Self::AdESig,
            (Indication::Passed, false, _, true) => Self::AdESeal,
            (Indication::Indeterminate, true, true, false) => Self::IndeterminateQESig,
            (Indication::Indeterminate, true, true, true) => Self::IndeterminateQESeal,
            (Indication::Indeterminate, true, false, false) => Self::IndeterminateAdESigQC,
            (Indication::Indeterminate, true, false, true) => Self::IndeterminateAdESealQC,
            (Indication::Indeterminate, false, _, false) => Self::IndeterminateAdESig,
            (Indication::Indeterminate, false, _, true) => Self::IndeterminateAdESeal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::QESig => "QESig",
            Self::QESeal => "QESeal",
            Self::AdESigQC => "AdESig-QC",
            Self::AdESealQC => "AdESeal-QC",
            Self::AdESig => "AdESig",
            Self::AdESeal => "AdESeal",
            Self::IndeterminateQESig => "Indeterminate QESig",
            Self::IndeterminateQESeal => "Indeterminate QESeal",
            Self::IndeterminateAdESigQC => "Indeterminate AdESig-QC",
            Self::IndeterminateAdESealQC => "Indeterminate AdESeal-QC",
            Self::IndeterminateAdESig => "Indeterminate AdESig",
            Self::IndeterminateAdESeal => "Indeterminate AdESeal",
            Self::NotAdESQCQSCD => "NOT_ADES_QC_QSCD",
            Self::NotAdESQC => "NOT_ADES_QC",
            Self::NotAdES => "NOT_ADES",
            Self::Na => "N/A",
        }
    }
}

impl fmt::Display for SignatureQualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Certificate qualification at one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualificationAtTime {
    pub time: DateTime<Utc>,

    /// Applicable CA/QC trust services.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trust_services: Vec<String>,

    /// `None` when more than one trust service applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<CertificateQualification>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
}

/// Computes the qualification of `certificate` at `time`.
///
/// No applicable service leaves the content-based qualification in place;
/// a single service overlays it; several services make it undecidable.
pub fn qualification_at(
    ctx: &ValidationContext<'_>,
    certificate: &CertificateToken,
    chain: &CertificateChain<'_>,
    content: &CertificateQualification,
    time: DateTime<Utc>,
) -> QualificationAtTime {
    let services: Vec<_> = ctx
        .services
        .trust_service_lookup
        .applicable_services(ctx.snapshot, chain, time)
        .into_iter()
        .filter(|service| service.is_ca_qc())
        .collect();

    let qualification = match services.as_slice() {
        [] => Some(content.clone()),
        [service] => Some(apply_trust_service(service, certificate, content)),
        _ => {
            warn!(
                "{} trust services apply to {} at {time}, qualification is undecidable",
                services.len(),
                certificate.id
            );
            None
        }
    };

    QualificationAtTime {
        time,
        trust_services: services.iter().map(|s| s.id.clone()).collect(),
        label: qualification.as_ref().map(CertificateQualification::label),
        qualification,
    }
}

/// Qualification outcome for one signature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualificationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<QualificationRegime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_issuance: Option<QualificationAtTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_best_signature_time: Option<QualificationAtTime>,

    pub signature_qualification: SignatureQualification,

    #[serde(flatten)]
    pub result: ChainResult,
}

/// Determines the qualification label of `signature` given its final
/// `conclusion`. The conclusion itself is never changed.
pub fn signature_qualification(
    ctx: &ValidationContext<'_>,
    signature: &SignatureToken,
    conclusion: &Conclusion,
    best_signature_time: DateTime<Utc>,
) -> QualificationResult {
    let Some(certificate) = signature
        .signing_certificate_id
        .as_deref()
        .and_then(|id| ctx.pool.get(id))
    else {
        return QualificationResult {
            certificate_id: None,
            regime: None,
            at_issuance: None,
            at_best_signature_time: None,
            signature_qualification: SignatureQualification::Na,
            result: ChainResult::default(),
        };
    };

    let settings = &ctx.policy.qualification;
    let chain = ctx.pool.chain(&certificate.id);
    let regime = QualificationRegime::of(certificate, settings);
    let content = regime.qualification_from_content(certificate, settings);

    let at_issuance = qualification_at(ctx, certificate, &chain, &content, certificate.not_before);
    let at_signing = qualification_at(ctx, certificate, &chain, &content, best_signature_time);

    let mut rules = Chain::new("qualification", &certificate.id, ctx.error_behavior);
    let decided = at_signing.qualification.clone();
    rules.rule(
        Rule::new(QUAL_ITSU, Level::Fail, move || decided.is_some())
            .with_info(at_signing.trust_services.join(", ")),
    );

    if let Some(q) = at_signing.qualification.clone() {
        let (qualified, certificate_type, qscd) = (q.qualified, q.certificate_type, q.qscd);
        rules.rule(Rule::new(QUAL_IQC, Level::Inform, move || qualified));
        rules.rule(Rule::new(
            QUAL_ITK,
            ctx.policy.level(CERTIFICATE_TYPE_DETERMINED),
            move || certificate_type != CertificateType::Unknown,
        ));
        rules.rule(Rule::new(QUAL_IQSCD, Level::Inform, move || qscd));

        if let Some(issued) = at_issuance.qualification.clone() {
            rules.rule(
                Rule::new(
                    QUAL_ICIS,
                    ctx.policy.level(QUALIFICATION_CONSISTENCY),
                    move || issued == q,
                )
                .with_info(at_issuance.label.unwrap_or_default()),
            );
        }
    }

    let signature_qualification =
        SignatureQualification::determine(conclusion.indication, at_signing.qualification.as_ref());

    QualificationResult {
        certificate_id: Some(certificate.id.clone()),
        regime: Some(regime),
        at_issuance: Some(at_issuance),
        at_best_signature_time: Some(at_signing),
        signature_qualification,
        result: rules.execute(),
    }
}
