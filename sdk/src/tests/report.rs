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


#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test;

use adesval_crypto::KeyUsage;
use adesval_status_tracker::{Indication, SubIndication};
use serde_json::Value;

use super::fixtures::*;
use crate::{
    diagnostic::DiagnosticData,
    policy::ValidationPolicy,
    process::{qualification::SignatureQualification, DocumentValidator, ValidationServices, ValidatorSettings},
    Reports,
};

fn two_signatures() -> DiagnosticData {
    let mut snapshot = snapshot();
    let mut broken = signature("S-2", SIGNER);
    broken.signature_intact = false;
    snapshot.signatures.push(broken);
    snapshot
}

fn validate_at_signing(snapshot: &DiagnosticData) -> Reports {
    let policy = ValidationPolicy::default();
    let services = ValidationServices::default();
    DocumentValidator::new(snapshot, &policy, &services)
        .with_settings(ValidatorSettings {
            validation_time: Some(at("2020-06-02T00:00:00Z")),
            ..Default::default()
        })
        .validate()
        .unwrap()
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn simple_report_counts() {
    let reports = validate_at_signing(&two_signatures());
    let simple = &reports.simple;

    assert_eq!(simple.signatures_count, 2);
    assert_eq!(simple.valid_signatures_count, 1);
    assert_eq!(simple.policy, ValidationPolicy::default().name);
    assert_eq!(simple.validation_time, at("2020-06-02T00:00:00Z"));

    let valid = simple.signature(SIGNATURE).unwrap();
    assert_eq!(valid.indication, Indication::Passed);
    assert_eq!(valid.signature_qualification, SignatureQualification::AdESig);
    assert_eq!(valid.signing_time, Some(at("2020-06-01T00:00:00Z")));
    assert!(valid.errors.is_empty());

    let broken = simple.signature("S-2").unwrap();
    assert_eq!(broken.indication, Indication::Failed);
    assert_eq!(broken.sub_indication, Some(SubIndication::SigCryptoFailure));
    assert_eq!(broken.signature_qualification, SignatureQualification::NotAdES);
    assert!(broken
        .errors
        .iter()
        .any(|e| e.starts_with("Is the signature intact?")));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn simple_report_messages() {
    let mut snapshot = snapshot();
    snapshot.certificates[1].key_usage = KeyUsage::default();
    let reports = validate_at_signing(&snapshot);
    let valid = reports.simple.signature(SIGNATURE).unwrap();

    assert_eq!(valid.indication, Indication::Passed);
    // inherited through several blocks, listed once
    assert_eq!(
        valid
            .warnings
            .iter()
            .filter(|w| w.starts_with("Has the certificate the expected key usage?"))
            .count(),
        1
    );
    assert!(valid
        .infos
        .iter()
        .any(|i| i.starts_with("Is the certificate qualified?")));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn reports_serialize_to_json() {
    let reports = validate_at_signing(&two_signatures());

    let json: Value = serde_json::from_str(&reports.to_json().unwrap()).unwrap();
    assert_eq!(json["simple"]["signatures_count"], 2);
    assert_eq!(json["simple"]["signatures"][0]["indication"], "PASSED");
    assert_eq!(json["simple"]["signatures"][0]["signature_qualification"], "AdESig");
    assert_eq!(json["simple"]["signatures"][1]["sub_indication"], "SIG_CRYPTO_FAILURE");

    let detailed = &json["detailed"]["signatures"][0];
    assert_eq!(detailed["signature_id"], SIGNATURE);
    assert_eq!(detailed["states"][1], "BBB_RUNNING");
    assert_eq!(detailed["states"].as_array().unwrap().len(), 5);

    let simple: Value = serde_json::from_str(&reports.simple.to_json().unwrap()).unwrap();
    assert_eq!(simple, json["simple"]);

    let detailed: Value = serde_json::from_str(&reports.detailed.to_json().unwrap()).unwrap();
    assert_eq!(detailed, json["detailed"]);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn empty_snapshot_reports_nothing() {
    let snapshot = DiagnosticData {
        validation_time: Some(now()),
        ..Default::default()
    };
    let reports = validate_at_signing(&snapshot);

    assert_eq!(reports.simple.signatures_count, 0);
    assert_eq!(reports.simple.valid_signatures_count, 0);
    assert!(reports.detailed.signatures.is_empty());
}
