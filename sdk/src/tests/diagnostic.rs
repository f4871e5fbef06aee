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

use adesval_crypto::{base64, hash, Digest, DigestAlgorithm, QcType};

use super::fixtures::*;
use crate::{
    diagnostic::{CertificatePool, DiagnosticData, TimestampedCategory, TimestampType},
    Error,
};

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn chain_is_built_to_trust_anchor() {
    let snapshot = snapshot();
    let pool = CertificatePool::new(&snapshot).unwrap();

    let chain = pool.chain(SIGNER);
    assert!(chain.complete);
    assert_eq!(chain.ids(), vec![SIGNER.to_owned(), ROOT.to_owned()]);
    assert_eq!(chain.leaf().unwrap().id, SIGNER);
    assert_eq!(chain.trust_anchor().unwrap().id, ROOT);
    assert_eq!(chain.issuer_at(0).unwrap().id, ROOT);
    assert!(chain.issuer_at(1).is_none());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn issuer_found_by_name_prefers_trusted() {
    let mut untrusted_root = root();
    untrusted_root.id = "C-A-UNTRUSTED".to_owned();
    untrusted_root.trusted = false;

    let mut signer = signer();
    signer.issuer_id = None;

    let snapshot = DiagnosticData {
        certificates: vec![untrusted_root, root(), signer],
        ..Default::default()
    };
    let pool = CertificatePool::new(&snapshot).unwrap();

    let chain = pool.chain(SIGNER);
    assert!(chain.complete);
    assert_eq!(chain.ids(), vec![SIGNER.to_owned(), ROOT.to_owned()]);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn chain_without_anchor_is_incomplete() {
    let mut root = root();
    root.trusted = false;

    let snapshot = DiagnosticData {
        certificates: vec![root, signer()],
        ..Default::default()
    };
    let pool = CertificatePool::new(&snapshot).unwrap();

    let chain = pool.chain(SIGNER);
    assert!(!chain.complete);
    assert_eq!(chain.certificates.len(), 2);
    assert!(chain.trust_anchor().is_none());

    assert!(!pool.chain("C-MISSING").complete);
    assert!(pool.chain("C-MISSING").certificates.is_empty());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn cyclic_issuers_are_rejected() {
    let mut a = intermediate("C-A", &root());
    a.issuer_id = Some("C-B".to_owned());
    let b = intermediate("C-B", &a);

    let snapshot = DiagnosticData {
        certificates: vec![a, b],
        ..Default::default()
    };

    assert!(matches!(
        CertificatePool::new(&snapshot),
        Err(Error::CyclicCertificateChain { .. })
    ));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn dangling_references_are_rejected() {
    let mut snapshot = snapshot();
    snapshot.signatures[0].signing_certificate_id = Some("C-MISSING".to_owned());

    assert!(matches!(
        snapshot.check_references(),
        Err(Error::UnknownToken { id, referenced_by }) if id == "C-MISSING" && referenced_by == SIGNATURE
    ));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn duplicate_ids_are_rejected() {
    let mut snapshot = snapshot();
    snapshot
        .timestamps
        .push(signature_timestamp(SIGNER, "2020-06-01T01:00:00Z"));

    assert!(matches!(
        snapshot.check_references(),
        Err(Error::DuplicateToken(id)) if id == SIGNER
    ));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn json_round_trip_keeps_snapshot() {
    let snapshot = timestamped_snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();

    assert_eq!(DiagnosticData::from_json(&json).unwrap(), snapshot);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn from_json_reads_minimal_snapshot() {
    let json = r#"{
        "validation_time": "2024-01-01T00:00:00Z",
        "certificates": [{
            "id": "C-ROOT",
            "subject": "CN=Root",
            "issuer": "CN=Root",
            "not_before": "2010-01-01T00:00:00Z",
            "not_after": "2040-01-01T00:00:00Z",
            "signature_algorithm": "RSA-with-SHA256",
            "public_key_size": 4096,
            "trusted": true
        }],
        "timestamps": [{
            "id": "T-1",
            "type": "SIGNATURE_TIMESTAMP",
            "production_time": "2020-01-01T00:00:00Z",
            "signing_certificate_id": "C-ROOT",
            "timestamped_objects": [{ "token_id": "C-ROOT", "category": "CERTIFICATE" }]
        }]
    }"#;

    let snapshot = DiagnosticData::from_json(json).unwrap();
    assert_eq!(snapshot.validation_time, Some(now()));
    assert_eq!(snapshot.timestamps[0].timestamp_type, TimestampType::SignatureTimestamp);
    assert_eq!(snapshot.timestamps_covering(ROOT).len(), 1);
    assert_eq!(
        snapshot.certificate(ROOT).unwrap().signature_algorithm,
        Some(rsa_sha256())
    );
}

const ROOT_DER: &[u8] = include_bytes!("../../tests/fixtures/certs/root.der");
const SIGNER_DER: &[u8] = include_bytes!("../../tests/fixtures/certs/signer.der");

fn encoded_snapshot(signer_der: &[u8]) -> String {
    serde_json::json!({
        "certificates": [
            {
                "id": "C-DER-ROOT",
                "subject": "unknown",
                "issuer": "unknown",
                "not_before": "2000-01-01T00:00:00Z",
                "not_after": "2000-01-02T00:00:00Z",
                "trusted": true,
                "der": base64::encode(ROOT_DER)
            },
            {
                "id": "C-DER-SIGNER",
                "subject": "unknown",
                "issuer": "unknown",
                "not_before": "2000-01-01T00:00:00Z",
                "not_after": "2000-01-02T00:00:00Z",
                "der": base64::encode(signer_der)
            }
        ]
    })
    .to_string()
}

#[test]
fn certificate_facts_come_from_der() {
    let snapshot = DiagnosticData::from_json(&encoded_snapshot(SIGNER_DER)).unwrap();

    let signer = snapshot.certificate("C-DER-SIGNER").unwrap();
    assert!(signer.subject.contains("CN=Test Signer"));
    assert_eq!(signer.not_before, at("2018-01-01T00:00:00Z"));
    assert_eq!(signer.not_after, at("2030-01-01T00:00:00Z"));
    assert_eq!(signer.signature_algorithm, Some(rsa_sha256()));
    assert_eq!(signer.public_key_size, Some(2048));
    assert!(signer.key_usage.non_repudiation);
    assert!(signer.qc_statements.compliance);
    assert!(signer.qc_statements.sscd);
    assert_eq!(signer.qc_statements.types, vec![QcType::Esign]);
    assert_eq!(signer.policy_oids, vec!["0.4.0.194112.1.2".to_owned()]);
    assert!(signer.signature_intact);
    assert_eq!(
        snapshot.token_matches_digest("C-DER-SIGNER", &Digest::of(DigestAlgorithm::Sha256, SIGNER_DER)),
        Some(true)
    );

    let root = snapshot.certificate("C-DER-ROOT").unwrap();
    assert!(root.trusted);
    assert!(root.ca);
    assert!(root.signature_intact);
    assert_eq!(root.digests[0].value, hash::sha256(ROOT_DER));

    let pool = CertificatePool::new(&snapshot).unwrap();
    let chain = pool.chain("C-DER-SIGNER");
    assert!(chain.complete);
    assert_eq!(chain.ids(), vec!["C-DER-SIGNER".to_owned(), "C-DER-ROOT".to_owned()]);
}

#[test]
fn tampered_der_does_not_verify() {
    let mut tampered = SIGNER_DER.to_vec();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;

    let snapshot = DiagnosticData::from_json(&encoded_snapshot(&tampered)).unwrap();
    assert!(!snapshot.certificate("C-DER-SIGNER").unwrap().signature_intact);

    let garbage = encoded_snapshot(b"not a certificate");
    assert!(matches!(
        DiagnosticData::from_json(&garbage),
        Err(Error::CertificateParse(_))
    ));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn digests_match_known_encodings() {
    let snapshot = timestamped_snapshot();
    let signature_value = snapshot.signatures[0].signature_value.clone().unwrap();

    let good = Digest::of(DigestAlgorithm::Sha256, &signature_value);
    let bad = Digest::of(DigestAlgorithm::Sha256, b"something else");

    assert_eq!(snapshot.token_matches_digest(SIGNATURE, &good), Some(true));
    assert_eq!(snapshot.token_matches_digest(SIGNATURE, &bad), Some(false));
    // no encoding is known for the root certificate
    assert_eq!(snapshot.token_matches_digest(ROOT, &good), None);
    assert_eq!(snapshot.token_matches_digest("X-UNKNOWN", &good), None);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn lookups_by_reference() {
    let mut snapshot = timestamped_snapshot();
    snapshot.timestamps.push(timestamp(
        "T-CONTENT",
        TimestampType::ContentTimestamp,
        "2020-05-01T00:00:00Z",
        &[],
    ));
    snapshot.timestamps.push(timestamp(
        "T-2",
        TimestampType::ArchiveTimestamp,
        "2021-01-01T00:00:00Z",
        &[("T-1", TimestampedCategory::Timestamp)],
    ));

    assert_eq!(snapshot.revocations_for(SIGNER).len(), 1);
    assert!(snapshot.revocations_for(TSA).is_empty());
    assert_eq!(snapshot.timestamps_covering(SIGNATURE)[0].id, "T-1");
    assert_eq!(snapshot.timestamps_covering("T-1")[0].id, "T-2");
    assert!(snapshot.evidence_records_for(SIGNATURE).is_empty());
}
