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

//! Proof-of-existence bookkeeping.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::diagnostic::{DiagnosticData, TimestampToken, TimestampType};

/// What established a proof of existence.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoeSource {
    /// Every token exists at the validation time.
    ValidationTime,
    Timestamp(String),
    EvidenceRecord(String),
}

/// Proof that a token existed at `time`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Poe {
    pub time: DateTime<Utc>,
    pub source: PoeSource,
}

/// Whether signatures share a POE store.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoeScope {
    /// Each signature starts from a fresh store.
    #[default]
    PerSignature,

    /// Proofs gathered for one signature serve the next ones.
    Pooled,
}

/// Proofs of existence gathered during one validation.
///
/// Every token has a proof at the validation time. Proofs are only ever
/// added, so the lowest proof of a token never moves later.
#[derive(Clone, Debug)]
pub struct PoeStore {
    now: DateTime<Utc>,
    proofs: BTreeMap<String, Vec<Poe>>,
}

impl PoeStore {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            proofs: BTreeMap::new(),
        }
    }

    /// Validation time of the run.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Records a proof for `token_id`. Proofs after the validation time are
    /// ignored. Returns `true` if the proof was recorded.
    pub fn add(&mut self, token_id: &str, time: DateTime<Utc>, source: PoeSource) -> bool {
        if time > self.now {
            warn!("ignoring proof of existence for {token_id} after validation time ({time})");
            return false;
        }

        debug!("proof of existence for {token_id} at {time} from {source:?}");
        self.proofs
            .entry(token_id.to_owned())
            .or_default()
            .push(Poe { time, source });
        true
    }

    /// Earliest proof of existence of `token_id`.
    pub fn lowest_poe(&self, token_id: &str) -> Poe {
        self.proofs
            .get(token_id)
            .and_then(|proofs| proofs.iter().min_by_key(|p| p.time))
            .filter(|p| p.time < self.now)
            .cloned()
            .unwrap_or(Poe {
                time: self.now,
                source: PoeSource::ValidationTime,
            })
    }

    pub fn lowest_poe_time(&self, token_id: &str) -> DateTime<Utc> {
        self.lowest_poe(token_id).time
    }

    /// Returns `true` if `token_id` is proven to exist at or before `time`.
    pub fn is_poe_exists(&self, token_id: &str, time: DateTime<Utc>) -> bool {
        self.lowest_poe_time(token_id) <= time
    }

    /// Every instant at which `token_id` is proven to exist, including the
    /// validation time, latest first.
    pub fn poe_times(&self, token_id: &str) -> Vec<DateTime<Utc>> {
        let mut times: Vec<DateTime<Utc>> = self
            .proofs
            .get(token_id)
            .into_iter()
            .flatten()
            .map(|p| p.time)
            .chain(std::iter::once(self.now))
            .collect();
        times.sort_by(|a, b| b.cmp(a));
        times.dedup();
        times
    }

    /// Extends the proofs of the tokens covered by a valid time-stamp.
    ///
    /// A covered object with a digest extends the token only when the
    /// digest is verified against it. Objects without a digest are taken
    /// as listed. Content time-stamps prove nothing about the signature.
    /// Returns the identifiers of the tokens extended.
    pub fn extend_from_timestamp(
        &mut self,
        timestamp: &TimestampToken,
        snapshot: &DiagnosticData,
    ) -> Vec<String> {
        if timestamp.timestamp_type == TimestampType::ContentTimestamp {
            return Vec::new();
        }

        let mut extended = Vec::new();
        for object in &timestamp.timestamped_objects {
            if let Some(digest) = &object.digest {
                match snapshot.token_matches_digest(&object.token_id, digest) {
                    Some(true) => {}
                    Some(false) => {
                        warn!(
                            "time-stamp {} digest does not match covered token {}",
                            timestamp.id, object.token_id
                        );
                        continue;
                    }
                    None => {
                        warn!(
                            "time-stamp {} digest cannot be checked against covered token {}",
                            timestamp.id, object.token_id
                        );
                        continue;
                    }
                }
            }

            if self.add(
                &object.token_id,
                timestamp.production_time,
                PoeSource::Timestamp(timestamp.id.clone()),
            ) {
                extended.push(object.token_id.clone());
            }
        }

        extended
    }
}
