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

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{process::SignatureValidation, Result};

/// Every constraint evaluated for every signature, grouped by process and
/// building block.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailedReport {
    pub validation_time: DateTime<Utc>,
    pub policy: String,
    pub signatures: Vec<SignatureValidation>,
}

impl DetailedReport {
    pub(crate) fn new(validation_time: DateTime<Utc>, policy: &str, signatures: Vec<SignatureValidation>) -> Self {
        Self {
            validation_time,
            policy: policy.to_owned(),
            signatures,
        }
    }

    pub fn signature(&self, id: &str) -> Option<&SignatureValidation> {
        self.signatures.iter().find(|s| s.signature_id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
