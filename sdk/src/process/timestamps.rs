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

use std::collections::BTreeSet;

use adesval_status_tracker::Conclusion;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::{
    diagnostic::{SignatureToken, TimestampToken, TimestampType},
    process::{
        bbb::{validate_timestamp, BasicBuildingBlocks},
        past::{past_signature_validation, PastSignatureValidation},
        PoeSource, PoeStore, ValidationContext,
    },
};

/// Outcome of validating one time-stamp of a signature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimestampValidation {
    pub timestamp_id: String,

    #[serde(rename = "type")]
    pub timestamp_type: TimestampType,

    pub production_time: DateTime<Utc>,

    pub basic_building_blocks: BasicBuildingBlocks,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_validation: Option<PastSignatureValidation>,

    /// Tokens whose proof of existence this time-stamp extended.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extended_poe_of: Vec<String>,

    pub conclusion: Conclusion,
}

/// Time-stamps relevant to `signature`: those covering it, those covering
/// another relevant time-stamp and the archive time-stamps of its
/// evidence records. Latest first.
pub fn relevant_timestamps<'a>(
    ctx: &ValidationContext<'a>,
    signature: &SignatureToken,
) -> Vec<&'a TimestampToken> {
    let snapshot = ctx.snapshot;
    let mut covered: BTreeSet<&str> = BTreeSet::from([signature.id.as_str()]);
    let mut selected: BTreeSet<&str> = snapshot
        .evidence_records_for(&signature.id)
        .into_iter()
        .flat_map(|record| record.archive_timestamp_ids.iter().map(String::as_str))
        .collect();
    covered.extend(selected.iter().copied());

    loop {
        let found: Vec<&str> = snapshot
            .timestamps
            .iter()
            .filter(|t| !selected.contains(t.id.as_str()))
            .filter(|t| t.timestamped_objects.iter().any(|o| covered.contains(o.token_id.as_str())))
            .map(|t| t.id.as_str())
            .collect();

        if found.is_empty() {
            break;
        }
        for id in found {
            selected.insert(id);
            covered.insert(id);
        }
    }

    let mut timestamps: Vec<&'a TimestampToken> = snapshot
        .timestamps
        .iter()
        .filter(|t| selected.contains(t.id.as_str()))
        .collect();
    timestamps.sort_by(|a, b| {
        b.production_time
            .cmp(&a.production_time)
            .then_with(|| a.id.cmp(&b.id))
    });
    timestamps
}

/// Validates the time-stamps of `signature`, latest first.
///
/// Each time-stamp runs the building blocks at the validation time and,
/// when that fails in a time-sensitive way, past signature validation with
/// the proofs gathered so far. A valid time-stamp extends the proof of
/// existence of what it covers, including the preceding archive
/// time-stamp of an evidence record.
pub fn validate_timestamps(
    ctx: &ValidationContext<'_>,
    signature: &SignatureToken,
    poe: &mut PoeStore,
) -> Vec<TimestampValidation> {
    let verifier = ctx.services.timestamp_chain_verifier.as_ref();
    let records = ctx.snapshot.evidence_records_for(&signature.id);

    relevant_timestamps(ctx, signature)
        .into_iter()
        .map(|timestamp| {
            let bbb = validate_timestamp(ctx, timestamp, ctx.now);
            let mut conclusion = bbb.conclusion.clone();

            let past_validation = conclusion.is_time_sensitive().then(|| {
                let past = past_signature_validation(ctx, timestamp, &bbb, poe);
                conclusion = past.conclusion().clone();
                past
            });

            let mut extended_poe_of = Vec::new();
            if conclusion.is_passed() {
                extended_poe_of = poe.extend_from_timestamp(timestamp, ctx.snapshot);

                for record in &records {
                    let ids = &record.archive_timestamp_ids;
                    let Some(position) = ids.iter().position(|id| *id == timestamp.id) else {
                        continue;
                    };
                    let preceding = position
                        .checked_sub(1)
                        .and_then(|i| ids.get(i))
                        .and_then(|id| ctx.snapshot.timestamp(id));

                    if let Some(preceding) = preceding {
                        if verifier.covers_preceding(ctx.snapshot, timestamp, preceding)
                            && poe.add(
                                &preceding.id,
                                timestamp.production_time,
                                PoeSource::Timestamp(timestamp.id.clone()),
                            )
                        {
                            extended_poe_of.push(preceding.id.clone());
                        }
                    }
                }
            }

            debug!("time-stamp {}: {conclusion}", timestamp.id);

            TimestampValidation {
                timestamp_id: timestamp.id.clone(),
                timestamp_type: timestamp.timestamp_type,
                production_time: timestamp.production_time,
                basic_building_blocks: bbb,
                past_validation,
                extended_poe_of,
                conclusion,
            }
        })
        .collect()
}
