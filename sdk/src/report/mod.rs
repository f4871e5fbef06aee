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

//! Detailed and simple validation reports.

use serde::Serialize;

mod detailed;
pub use detailed::DetailedReport;

mod simple;
pub use simple::{SimpleReport, SimpleSignature};

use crate::Result;

/// Both reports produced by one validation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reports {
    pub detailed: DetailedReport,
    pub simple: SimpleReport,
}

impl Reports {
    /// Serializes both reports as a single JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
