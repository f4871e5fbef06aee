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


use std::path::PathBuf;

use adesval::{
    DiagnosticData, DocumentValidator, Reports, Result, ValidationPolicy, ValidationServices,
    ValidatorSettings,
};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn load_snapshot(name: &str) -> Result<DiagnosticData> {
    DiagnosticData::from_file(fixture_path(name))
}

#[allow(unused)]
pub fn load_policy(name: &str) -> Result<ValidationPolicy> {
    ValidationPolicy::from_file(fixture_path(name))
}

/// Validates `snapshot` with the default services.
pub fn validate(
    snapshot: &DiagnosticData,
    policy: &ValidationPolicy,
    settings: ValidatorSettings,
) -> Result<Reports> {
    let services = ValidationServices::default();
    DocumentValidator::new(snapshot, policy, &services)
        .with_settings(settings)
        .validate()
}
