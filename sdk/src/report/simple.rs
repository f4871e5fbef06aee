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

use adesval_status_tracker::{Conclusion, Indication, Level, SubIndication};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    process::{qualification::SignatureQualification, SignatureValidation},
    report::DetailedReport,
    Result,
};

/// Final verdict of one signature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimpleSignature {
    pub id: String,
    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,

    pub indication: Indication,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,

    pub signature_qualification: SignatureQualification,
    pub best_signature_time: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub infos: Vec<String>,
}

fn texts(conclusion: &Conclusion, level: Level) -> Vec<String> {
    let mut texts: Vec<String> = Vec::new();
    for message in conclusion.messages_at(level) {
        if !texts.iter().any(|t| t.as_str() == message.text) {
            texts.push(message.text.to_string());
        }
    }
    texts
}

impl From<&SignatureValidation> for SimpleSignature {
    fn from(validation: &SignatureValidation) -> Self {
        let conclusion = &validation.conclusion;
        let mut warnings = texts(conclusion, Level::Warn);
        let mut infos = texts(conclusion, Level::Inform);

        // qualification messages never touch the verdict
        let qualification = &validation.qualification.result.conclusion;
        warnings.extend(texts(qualification, Level::Warn));
        infos.extend(texts(qualification, Level::Inform));
        if !qualification.is_passed() {
            warnings.extend(texts(qualification, Level::Fail));
        }

        Self {
            id: validation.signature_id.clone(),
            format: validation.format.clone(),
            signing_certificate_id: validation.signing_certificate_id.clone(),
            indication: conclusion.indication,
            sub_indication: conclusion.sub_indication,
            signature_qualification: validation.qualification.signature_qualification,
            best_signature_time: validation.best_signature_time,
            signing_time: validation.claimed_signing_time,
            errors: texts(conclusion, Level::Fail),
            warnings,
            infos,
        }
    }
}

/// Condensed view of a [`DetailedReport`]: one verdict per signature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimpleReport {
    pub validation_time: DateTime<Utc>,
    pub policy: String,
    pub signatures_count: usize,
    pub valid_signatures_count: usize,
    pub signatures: Vec<SimpleSignature>,
}

impl SimpleReport {
    pub fn from_detailed(detailed: &DetailedReport) -> Self {
        let signatures: Vec<SimpleSignature> =
            detailed.signatures.iter().map(SimpleSignature::from).collect();

        Self {
            validation_time: detailed.validation_time,
            policy: detailed.policy.clone(),
            signatures_count: signatures.len(),
            valid_signatures_count: signatures
                .iter()
                .filter(|s| s.indication == Indication::Passed)
                .count(),
            signatures,
        }
    }

    pub fn signature(&self, id: &str) -> Option<&SimpleSignature> {
        self.signatures.iter().find(|s| s.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
