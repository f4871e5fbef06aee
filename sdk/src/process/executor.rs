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

use std::collections::BTreeMap;

use adesval_crypto::time::utc_now;
use adesval_status_tracker::{message_tags::*, Conclusion, ErrorBehavior};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    diagnostic::{CertificatePool, DiagnosticData, SignatureToken},
    policy::{constraints::EVIDENCE_RECORD_VALID, PolicyValidate, ValidationPolicy},
    process::{
        bbb::{self, BasicBuildingBlocks},
        erv::{evidence_record_validation, DigestLinkageVerifier, EvidenceRecordValidation, TimestampChainVerifier},
        past::{past_signature_validation, PastSignatureValidation},
        qualification::{signature_qualification, QualificationResult, SnapshotTrustServiceLookup, TrustServiceLookup},
        revocation::{DefaultRevocationDataVerifier, RevocationDataVerifier},
        timestamps::{validate_timestamps, TimestampValidation},
        Chain, PoeScope, PoeStore, Rule, ValidationContext,
    },
    report::{DetailedReport, Reports, SimpleReport},
    Error, Result,
};

/// The pluggable services a validation run consults.
///
/// Passed explicitly to [`DocumentValidator::new`]; nothing is looked up
/// from global state.
pub struct ValidationServices {
    pub revocation_verifier: Box<dyn RevocationDataVerifier>,
    pub timestamp_chain_verifier: Box<dyn TimestampChainVerifier>,
    pub trust_service_lookup: Box<dyn TrustServiceLookup>,
}

impl ValidationServices {
    #[must_use]
    pub fn with_revocation_verifier<V: RevocationDataVerifier + 'static>(mut self, verifier: V) -> Self {
        self.revocation_verifier = Box::new(verifier);
        self
    }

    #[must_use]
    pub fn with_timestamp_chain_verifier<V: TimestampChainVerifier + 'static>(
        mut self,
        verifier: V,
    ) -> Self {
        self.timestamp_chain_verifier = Box::new(verifier);
        self
    }

    #[must_use]
    pub fn with_trust_service_lookup<L: TrustServiceLookup + 'static>(mut self, lookup: L) -> Self {
        self.trust_service_lookup = Box::new(lookup);
        self
    }
}

impl Default for ValidationServices {
    fn default() -> Self {
        Self {
            revocation_verifier: Box::new(DefaultRevocationDataVerifier),
            timestamp_chain_verifier: Box::new(DigestLinkageVerifier),
            trust_service_lookup: Box::new(SnapshotTrustServiceLookup),
        }
    }
}

/// Run-level options.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ValidatorSettings {
    #[serde(default = "default_error_behavior")]
    pub error_behavior: ErrorBehavior,

    #[serde(default)]
    pub poe_scope: PoeScope,

    /// Overrides the validation time of the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_time: Option<DateTime<Utc>>,
}

fn default_error_behavior() -> ErrorBehavior {
    ErrorBehavior::StopOnFirstError
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            error_behavior: default_error_behavior(),
            poe_scope: PoeScope::default(),
            validation_time: None,
        }
    }
}

/// Stage of the validation of one signature.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationState {
    NotStarted,
    BbbRunning,
    TimeStampValidation,
    PastValidation,
    Qualification,
    Done,
}

/// Everything concluded about one signature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignatureValidation {
    pub signature_id: String,

    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_signing_time: Option<DateTime<Utc>>,

    /// States the validation went through, in order.
    pub states: Vec<ValidationState>,

    pub basic_building_blocks: BasicBuildingBlocks,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<TimestampValidation>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evidence_records: Vec<EvidenceRecordValidation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_validation: Option<PastSignatureValidation>,

    pub best_signature_time: DateTime<Utc>,

    pub qualification: QualificationResult,

    pub conclusion: Conclusion,
}

struct SignatureProcess<'c, 'a> {
    ctx: &'c ValidationContext<'a>,
    signature: &'a SignatureToken,
    state: ValidationState,
    states: Vec<ValidationState>,
}

impl<'c, 'a> SignatureProcess<'c, 'a> {
    fn new(ctx: &'c ValidationContext<'a>, signature: &'a SignatureToken) -> Self {
        Self {
            ctx,
            signature,
            state: ValidationState::NotStarted,
            states: vec![ValidationState::NotStarted],
        }
    }

    fn transition(&mut self, next: ValidationState) -> Result<()> {
        if next <= self.state {
            return Err(Error::InvalidStateTransition {
                from: self.state,
                to: next,
            });
        }

        info!("{}: {:?} -> {:?}", self.signature.id, self.state, next);
        self.state = next;
        self.states.push(next);
        Ok(())
    }

    fn run(mut self, poe: &mut PoeStore) -> Result<SignatureValidation> {
        let ctx = self.ctx;
        let signature = self.signature;

        self.transition(ValidationState::BbbRunning)?;
        let bbb = bbb::validate_signature(ctx, signature, ctx.now);

        self.transition(ValidationState::TimeStampValidation)?;
        let timestamps = validate_timestamps(ctx, signature, poe);
        let conclusions: BTreeMap<String, Conclusion> = timestamps
            .iter()
            .map(|t| (t.timestamp_id.clone(), t.conclusion.clone()))
            .collect();
        let evidence_records: Vec<EvidenceRecordValidation> = ctx
            .snapshot
            .evidence_records_for(&signature.id)
            .into_iter()
            .map(|record| evidence_record_validation(ctx, record, signature, &conclusions, poe))
            .collect();

        let past_validation = if bbb.conclusion.is_time_sensitive() {
            self.transition(ValidationState::PastValidation)?;
            Some(past_signature_validation(ctx, signature, &bbb, poe))
        } else {
            None
        };

        let best_signature_time = poe.lowest_poe_time(&signature.id);

        let mut chain = Chain::new("signature_validation", &signature.id, ctx.error_behavior);
        match &past_validation {
            Some(past) => chain.rule(Rule::bubble(ADEST_IPVC, past.conclusion())),
            None => chain.rule(Rule::bubble(ADEST_IBVC, &bbb.conclusion)),
        };
        for record in &evidence_records {
            chain.rule(
                Rule::bubble(ADEST_IERVC, &record.result.conclusion)
                    .at_level(ctx.policy.level(EVIDENCE_RECORD_VALID))
                    .with_info(record.evidence_record_id.clone()),
            );
        }
        let conclusion = chain.execute().conclusion;

        self.transition(ValidationState::Qualification)?;
        let qualification = signature_qualification(ctx, signature, &conclusion, best_signature_time);

        self.transition(ValidationState::Done)?;
        info!(
            "signature {}: {conclusion}, {}",
            signature.id, qualification.signature_qualification
        );

        Ok(SignatureValidation {
            signature_id: signature.id.clone(),
            format: signature.format.clone(),
            signing_certificate_id: signature.signing_certificate_id.clone(),
            claimed_signing_time: signature.signing_time,
            states: self.states,
            basic_building_blocks: bbb,
            timestamps,
            evidence_records,
            past_validation,
            best_signature_time,
            qualification,
            conclusion,
        })
    }
}

/// Validates every signature of a snapshot against a policy.
///
/// ## Example
///
/// ```
/// use adesval::{diagnostic::DiagnosticData, policy::ValidationPolicy, DocumentValidator, ValidationServices};
///
/// let snapshot = DiagnosticData::from_json(r#"{"validation_time": "2024-01-01T00:00:00Z"}"#).unwrap();
/// let policy = ValidationPolicy::default();
/// let services = ValidationServices::default();
///
/// let reports = DocumentValidator::new(&snapshot, &policy, &services).validate().unwrap();
/// assert_eq!(reports.simple.signatures_count, 0);
/// ```
pub struct DocumentValidator<'a> {
    snapshot: &'a DiagnosticData,
    policy: &'a ValidationPolicy,
    services: &'a ValidationServices,
    settings: ValidatorSettings,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(
        snapshot: &'a DiagnosticData,
        policy: &'a ValidationPolicy,
        services: &'a ValidationServices,
    ) -> Self {
        Self {
            snapshot,
            policy,
            services,
            settings: ValidatorSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ValidatorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs the validation and produces both reports.
    ///
    /// Signatures are processed in identifier order. Only a malformed
    /// policy or snapshot yields an error; check failures end up in the
    /// reports.
    pub fn validate(&self) -> Result<Reports> {
        self.policy.validate()?;
        self.snapshot.check_references()?;
        let pool = CertificatePool::new(self.snapshot)?;

        let now = self
            .settings
            .validation_time
            .or(self.snapshot.validation_time)
            .unwrap_or_else(utc_now);

        let ctx = ValidationContext {
            snapshot: self.snapshot,
            pool: &pool,
            policy: self.policy,
            services: self.services,
            error_behavior: self.settings.error_behavior,
            now,
        };

        let mut signatures: Vec<&SignatureToken> = self.snapshot.signatures.iter().collect();
        signatures.sort_by(|a, b| a.id.cmp(&b.id));

        let mut pooled = PoeStore::new(now);
        let mut validations = Vec::with_capacity(signatures.len());
        for signature in signatures {
            let process = SignatureProcess::new(&ctx, signature);
            let validation = match self.settings.poe_scope {
                PoeScope::Pooled => process.run(&mut pooled)?,
                PoeScope::PerSignature => process.run(&mut PoeStore::new(now))?,
            };
            validations.push(validation);
        }

        let detailed = DetailedReport::new(now, &self.policy.name, validations);
        let simple = SimpleReport::from_detailed(&detailed);

        Ok(Reports { detailed, simple })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;
    use crate::tests::fixtures::{now, snapshot, with_context};

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn states_only_move_forward() {
        let snapshot = snapshot();
        let policy = ValidationPolicy::default();

        with_context(&snapshot, &policy, now(), |ctx| {
            let mut process = SignatureProcess::new(ctx, &ctx.snapshot.signatures[0]);
            process.transition(ValidationState::BbbRunning).unwrap();
            process.transition(ValidationState::Qualification).unwrap();

            assert!(matches!(
                process.transition(ValidationState::PastValidation),
                Err(Error::InvalidStateTransition {
                    from: ValidationState::Qualification,
                    to: ValidationState::PastValidation,
                })
            ));
            assert!(process.transition(ValidationState::Qualification).is_err());
            assert_eq!(
                process.states,
                vec![
                    ValidationState::NotStarted,
                    ValidationState::BbbRunning,
                    ValidationState::Qualification,
                ]
            );
        });
    }
}
