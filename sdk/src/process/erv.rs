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

//! Evidence record validation.

use std::collections::BTreeMap;

use adesval_status_tracker::{message_tags::*, Conclusion, Indication, SubIndication};
use log::{debug, warn};
use serde::Serialize;

use crate::{
    diagnostic::{DiagnosticData, EvidenceRecord, SignatureToken, TimestampToken},
    policy::constraints::{ARCHIVE_TIMESTAMP_COVERAGE, ARCHIVE_TIMESTAMP_ORDER},
    process::{Chain, ChainResult, PoeSource, PoeStore, Rule, ValidationContext},
};

/// Decides how archive time-stamps of an evidence record link together.
pub trait TimestampChainVerifier: Send + Sync {
    /// Returns `true` if `archive_timestamp` covers the protected content
    /// of `signature`.
    fn covers_signature(
        &self,
        snapshot: &DiagnosticData,
        archive_timestamp: &TimestampToken,
        signature: &SignatureToken,
    ) -> bool;

    /// Returns `true` if `archive_timestamp` covers `preceding`.
    fn covers_preceding(
        &self,
        snapshot: &DiagnosticData,
        archive_timestamp: &TimestampToken,
        preceding: &TimestampToken,
    ) -> bool;
}

/// Links archive time-stamps through the digests in their hash trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigestLinkageVerifier;

impl TimestampChainVerifier for DigestLinkageVerifier {
    fn covers_signature(
        &self,
        snapshot: &DiagnosticData,
        archive_timestamp: &TimestampToken,
        signature: &SignatureToken,
    ) -> bool {
        archive_timestamp
            .covered_digests
            .iter()
            .any(|digest| snapshot.token_matches_digest(&signature.id, digest) == Some(true))
    }

    fn covers_preceding(
        &self,
        snapshot: &DiagnosticData,
        archive_timestamp: &TimestampToken,
        preceding: &TimestampToken,
    ) -> bool {
        archive_timestamp
            .covered_digests
            .iter()
            .any(|digest| snapshot.token_matches_digest(&preceding.id, digest) == Some(true))
    }
}

/// Outcome of validating one evidence record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvidenceRecordValidation {
    pub evidence_record_id: String,

    pub signature_id: String,

    #[serde(flatten)]
    pub result: ChainResult,
}

/// Validates the archive time-stamp chain of `record`.
///
/// The first time-stamp must cover the signature, each later one the
/// previous one, in non-decreasing time order, and every time-stamp must
/// be valid as already concluded in `timestamp_conclusions`. On success
/// the signature and everything the chain covers is proven to exist at
/// each time-stamp's production time.
pub fn evidence_record_validation(
    ctx: &ValidationContext<'_>,
    record: &EvidenceRecord,
    signature: &SignatureToken,
    timestamp_conclusions: &BTreeMap<String, Conclusion>,
    poe: &mut PoeStore,
) -> EvidenceRecordValidation {
    let verifier = ctx.services.timestamp_chain_verifier.as_ref();
    let coverage = ctx.policy.level(ARCHIVE_TIMESTAMP_COVERAGE);
    let timestamps: Vec<&TimestampToken> = record
        .archive_timestamp_ids
        .iter()
        .filter_map(|id| ctx.snapshot.timestamp(id))
        .collect();

    let mut chain = Chain::new("evidence_record_validation", &record.id, ctx.error_behavior);

    if timestamps.is_empty() {
        chain.rule(
            Rule::new(ERV_IFATSCS, coverage, || false)
                .on_failure(Indication::Failed, SubIndication::HashFailure)
                .with_info("no archive time-stamp"),
        );
    }

    let unknown = Conclusion::new(Indication::Indeterminate, None);
    for (index, timestamp) in timestamps.iter().enumerate() {
        match index.checked_sub(1).and_then(|i| timestamps.get(i)) {
            None => {
                let covered = verifier.covers_signature(ctx.snapshot, timestamp, signature);
                if !covered {
                    warn!("{} does not cover signature {}", timestamp.id, signature.id);
                }
                chain.rule(
                    Rule::new(ERV_IFATSCS, coverage, move || covered)
                        .on_failure(Indication::Failed, SubIndication::HashFailure)
                        .with_info(timestamp.id.clone()),
                );
            }
            Some(preceding) => {
                let covered = verifier.covers_preceding(ctx.snapshot, timestamp, preceding);
                if !covered {
                    warn!("{} does not cover preceding {}", timestamp.id, preceding.id);
                }
                chain.rule(
                    Rule::new(ERV_IATSCP, coverage, move || covered)
                        .on_failure(Indication::Failed, SubIndication::HashFailure)
                        .with_info(timestamp.id.clone()),
                );

                let ordered = timestamp.production_time >= preceding.production_time;
                chain.rule(
                    Rule::new(
                        ERV_IATSO,
                        ctx.policy.level(ARCHIVE_TIMESTAMP_ORDER),
                        move || ordered,
                    )
                    .on_failure(Indication::Failed, SubIndication::TimestampOrderFailure)
                    .with_info(timestamp.id.clone()),
                );
            }
        }

        let conclusion = timestamp_conclusions.get(&timestamp.id).unwrap_or(&unknown);
        chain.rule(Rule::bubble(ERV_IATSV, conclusion).with_info(timestamp.id.clone()));
    }

    let result = chain.execute();

    if result.is_passed() {
        let source = PoeSource::EvidenceRecord(record.id.clone());
        for (index, timestamp) in timestamps.iter().enumerate() {
            let time = timestamp.production_time;
            poe.add(&signature.id, time, source.clone());
            for object in &timestamp.timestamped_objects {
                poe.add(&object.token_id, time, source.clone());
            }
            for preceding in timestamps.iter().take(index) {
                poe.add(&preceding.id, time, source.clone());
            }
        }
        debug!("evidence record {} proves {} existed", record.id, signature.id);
    }

    EvidenceRecordValidation {
        evidence_record_id: record.id.clone(),
        signature_id: signature.id.clone(),
        result,
    }
}
