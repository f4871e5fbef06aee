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

use adesval_crypto::{QcStatements, QcType};
use adesval_status_tracker::{Conclusion, Indication, Level};

use super::fixtures::*;
use crate::{
    diagnostic::{CertificateToken, DiagnosticData, ServiceQualifier, TrustService},
    policy::{QualificationSettings, ValidationPolicy, QCP},
    process::qualification::{
        apply_trust_service, signature_qualification, CertificateQualification, CertificateType,
        QualificationRegime, SignatureQualification, QCP_LEGAL_QSCD,
    },
};

const EXT: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/";

fn qualified_signer(not_before: &str) -> CertificateToken {
    CertificateToken {
        qc_statements: QcStatements {
            compliance: true,
            sscd: true,
            types: vec![QcType::Esign],
        },
        ..issued(SIGNER, &root(), not_before, "2030-01-01T00:00:00Z")
    }
}

fn qualifier(name: &str) -> ServiceQualifier {
    ServiceQualifier {
        uri: format!("{EXT}{name}"),
        policy_oids: Vec::new(),
    }
}

fn with_qualifiers(names: &[&str]) -> TrustService {
    TrustService {
        qualifiers: names.iter().map(|name| qualifier(name)).collect(),
        ..trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z")
    }
}

fn plain() -> CertificateQualification {
    CertificateQualification {
        qualified: false,
        certificate_type: CertificateType::ESign,
        qscd: false,
    }
}

fn qualified_snapshot(services: Vec<TrustService>) -> DiagnosticData {
    let mut snapshot = snapshot();
    snapshot.certificates[1] = qualified_signer("2018-01-01T00:00:00Z");
    snapshot.trust_services = services;
    snapshot
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn regime_follows_issuance_date() {
    let settings = QualificationSettings::default();

    assert_eq!(
        QualificationRegime::of(&qualified_signer("2015-01-01T00:00:00Z"), &settings),
        QualificationRegime::PreRegulation
    );
    assert_eq!(
        QualificationRegime::of(&qualified_signer("2016-07-01T00:00:00Z"), &settings),
        QualificationRegime::PostRegulation
    );
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn qualification_from_legacy_content() {
    let settings = QualificationSettings::default();
    let regime = QualificationRegime::PreRegulation;

    let by_policy = CertificateToken {
        policy_oids: vec![QCP.to_owned()],
        ..signer()
    };
    assert_eq!(
        regime.qualification_from_content(&by_policy, &settings),
        CertificateQualification {
            qualified: true,
            certificate_type: CertificateType::ESign,
            qscd: false,
        }
    );

    let by_statements = qualified_signer("2015-01-01T00:00:00Z");
    let q = regime.qualification_from_content(&by_statements, &settings);
    assert!(q.qualified && q.qscd);

    assert_eq!(regime.qualification_from_content(&signer(), &settings), plain());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn qualification_from_regulated_content() {
    let settings = QualificationSettings::default();
    let regime = QualificationRegime::PostRegulation;

    let seal = CertificateToken {
        policy_oids: vec![QCP_LEGAL_QSCD.to_owned()],
        ..signer()
    };
    assert_eq!(
        regime.qualification_from_content(&seal, &settings),
        CertificateQualification {
            qualified: true,
            certificate_type: CertificateType::ESeal,
            qscd: true,
        }
    );

    let ambiguous = CertificateToken {
        qc_statements: QcStatements {
            compliance: true,
            sscd: false,
            types: vec![QcType::Esign, QcType::Eseal],
        },
        ..signer()
    };
    assert_eq!(
        regime
            .qualification_from_content(&ambiguous, &settings)
            .certificate_type,
        CertificateType::Unknown
    );

    // the legacy policies mean nothing after the regulation date
    let legacy = CertificateToken {
        policy_oids: vec![QCP.to_owned()],
        ..signer()
    };
    assert_eq!(regime.qualification_from_content(&legacy, &settings), plain());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn trust_service_qualifiers_override_content() {
    let certificate = signer();

    let q = apply_trust_service(
        &with_qualifiers(&["QCStatement", "QCForESeal", "QCWithQSCD"]),
        &certificate,
        &plain(),
    );
    assert_eq!(
        q,
        CertificateQualification {
            qualified: true,
            certificate_type: CertificateType::ESeal,
            qscd: true,
        }
    );

    let content = CertificateQualification {
        qualified: true,
        certificate_type: CertificateType::ESign,
        qscd: true,
    };
    let q = apply_trust_service(&with_qualifiers(&["NotQualified", "QCNoQSCD"]), &certificate, &content);
    assert!(!q.qualified);
    assert!(!q.qscd);

    let q = apply_trust_service(&with_qualifiers(&["QCForESig", "QCForESeal"]), &certificate, &content);
    assert_eq!(q.certificate_type, CertificateType::Unknown);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn qualifiers_apply_to_matching_policies_only() {
    let service = TrustService {
        qualifiers: vec![ServiceQualifier {
            uri: format!("{EXT}QCStatement"),
            policy_oids: vec!["1.2.3.4".to_owned()],
        }],
        ..trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z")
    };

    assert!(!apply_trust_service(&service, &signer(), &plain()).qualified);

    let covered = CertificateToken {
        policy_oids: vec!["1.2.3.4".to_owned()],
        ..signer()
    };
    assert!(apply_trust_service(&service, &covered, &plain()).qualified);

    let foreign = TrustService {
        qualifiers: vec![ServiceQualifier {
            uri: "http://example.com/QCStatement".to_owned(),
            policy_oids: Vec::new(),
        }],
        ..trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z")
    };
    assert!(!apply_trust_service(&foreign, &signer(), &plain()).qualified);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn withdrawn_service_does_not_qualify() {
    let service = TrustService {
        status: "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/withdrawn".to_owned(),
        ..with_qualifiers(&["QCStatement"])
    };
    let content = CertificateQualification {
        qualified: true,
        ..plain()
    };

    assert!(!apply_trust_service(&service, &signer(), &content).qualified);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn additional_information_resolves_unknown_type() {
    let service = TrustService {
        additional_service_info: vec![format!("{EXT}ForeSeals")],
        ..trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z")
    };
    let unknown = CertificateQualification {
        certificate_type: CertificateType::Unknown,
        ..plain()
    };

    assert_eq!(
        apply_trust_service(&service, &signer(), &unknown).certificate_type,
        CertificateType::ESeal
    );
    // a known type is kept
    assert_eq!(
        apply_trust_service(&service, &signer(), &plain()).certificate_type,
        CertificateType::ESign
    );
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn qualified_signature_with_qscd() {
    let snapshot = qualified_snapshot(vec![trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z")]);
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let result = signature_qualification(
            ctx,
            &ctx.snapshot.signatures[0],
            &Conclusion::passed(),
            at("2020-06-01T00:00:00Z"),
        );

        assert_eq!(result.regime, Some(QualificationRegime::PostRegulation));
        assert_eq!(result.signature_qualification, SignatureQualification::QESig);
        assert!(result.result.is_passed());
        let at_signing = result.at_best_signature_time.unwrap();
        assert_eq!(at_signing.trust_services, vec!["TS-1"]);
        assert_eq!(at_signing.label, Some("QC for eSig with QSCD"));
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn indeterminate_signature_keeps_qualification_hint() {
    let snapshot = qualified_snapshot(vec![trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z")]);
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let result = signature_qualification(
            ctx,
            &ctx.snapshot.signatures[0],
            &Conclusion::new(Indication::Indeterminate, None),
            now(),
        );
        assert_eq!(
            result.signature_qualification,
            SignatureQualification::IndeterminateQESig
        );
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn conflicting_services_leave_qualification_open() {
    let snapshot = qualified_snapshot(vec![
        trust_service("TS-1", ROOT, "2016-01-01T00:00:00Z"),
        trust_service("TS-2", ROOT, "2017-01-01T00:00:00Z"),
    ]);
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let result = signature_qualification(
            ctx,
            &ctx.snapshot.signatures[0],
            &Conclusion::passed(),
            at("2020-06-01T00:00:00Z"),
        );

        assert_eq!(result.signature_qualification, SignatureQualification::Na);
        assert!(!result.result.is_passed());
        assert!(result.at_best_signature_time.unwrap().qualification.is_none());
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn inconsistent_qualification_warns() {
    let snapshot = qualified_snapshot(vec![TrustService {
        qualifiers: vec![qualifier("QCNoQSCD")],
        ..trust_service("TS-1", ROOT, "2019-01-01T00:00:00Z")
    }]);
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let result = signature_qualification(
            ctx,
            &ctx.snapshot.signatures[0],
            &Conclusion::passed(),
            at("2020-06-01T00:00:00Z"),
        );

        // qualified from content at issuance, the service removes the QSCD later
        assert_eq!(result.signature_qualification, SignatureQualification::AdESigQC);
        assert!(result.result.is_passed());
        assert!(result
            .result
            .conclusion
            .messages
            .iter()
            .any(|m| m.key == "QUAL_ICIS" && m.level == Level::Warn));
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn unidentified_signer_is_not_applicable() {
    let mut snapshot = snapshot();
    snapshot.signatures[0].signing_certificate_id = None;
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let result =
            signature_qualification(ctx, &ctx.snapshot.signatures[0], &Conclusion::passed(), now());
        assert_eq!(result.signature_qualification, SignatureQualification::Na);
        assert_eq!(result.certificate_id, None);
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn signature_qualification_labels() {
    let qualification = |qualified, certificate_type, qscd| CertificateQualification {
        qualified,
        certificate_type,
        qscd,
    };
    let seal = qualification(false, CertificateType::ESeal, false);
    let qc_qscd = qualification(true, CertificateType::ESign, true);
    let web = qualification(true, CertificateType::Wsa, false);

    assert_eq!(
        SignatureQualification::determine(Indication::Failed, Some(&qc_qscd)),
        SignatureQualification::NotAdESQCQSCD
    );
    assert_eq!(
        SignatureQualification::determine(Indication::Indeterminate, Some(&seal)).label(),
        "Indeterminate AdESeal"
    );
    assert_eq!(
        SignatureQualification::determine(Indication::Passed, Some(&web)),
        SignatureQualification::Na
    );
    assert_eq!(
        SignatureQualification::determine(Indication::Passed, None),
        SignatureQualification::Na
    );
    assert_eq!(
        serde_json::to_string(&SignatureQualification::AdESigQC).unwrap(),
        "\"AdESig-QC\""
    );
}
