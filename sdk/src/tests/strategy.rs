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

use chrono::{DateTime, Utc};

use super::fixtures::*;
use crate::{
    diagnostic::{CertificateToken, RevocationToken},
    policy::{RevocationSettings, RevocationSource, ValidationPolicy},
    process::{
        revocation::{
            DefaultRevocationDataVerifier, RevocationDataLoadingStrategy, RevocationDataVerifier,
            RevocationOutcome, RevocationRejection,
        },
        ValidationContext, ValidationServices,
    },
};

fn ids(tokens: &[&RevocationToken]) -> Vec<String> {
    tokens.iter().map(|t| t.id.clone()).collect()
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn order_prefers_source_then_latest() {
    let old_ocsp = ocsp("R-OCSP-OLD", SIGNER, ROOT, "2020-01-01T00:00:00Z", None);
    let new_ocsp = ocsp("R-OCSP-NEW", SIGNER, ROOT, "2020-06-01T00:00:00Z", None);
    let crl = crl("R-CRL", SIGNER, ROOT, "2019-01-01T00:00:00Z", "2019-02-01T00:00:00Z");
    let candidates = [&old_ocsp, &crl, &new_ocsp];

    let verifier = DefaultRevocationDataVerifier;
    let crl_first = RevocationDataLoadingStrategy::new(RevocationSource::CrlFirst, &verifier);
    assert_eq!(
        ids(&crl_first.order(&candidates)),
        vec!["R-CRL", "R-OCSP-NEW", "R-OCSP-OLD"]
    );

    let ocsp_first = RevocationDataLoadingStrategy::new(RevocationSource::OcspFirst, &verifier);
    assert_eq!(
        ids(&ocsp_first.order(&candidates)),
        vec!["R-OCSP-NEW", "R-OCSP-OLD", "R-CRL"]
    );
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn stale_ocsp_falls_back_to_crl() {
    let snapshot = snapshot();
    let policy = ValidationPolicy {
        revocation: RevocationSettings {
            max_freshness_seconds: Some(7 * 24 * 3600),
            check_next_update: true,
            preferred_source: RevocationSource::OcspFirst,
        },
        ..Default::default()
    };
    let time = at("2020-06-10T00:00:00Z");

    let stale_ocsp = ocsp("R-OCSP", SIGNER, ROOT, "2020-06-01T00:00:00Z", Some("2020-06-02T00:00:00Z"));
    let crl = crl("R-CRL", SIGNER, ROOT, "2020-06-05T00:00:00Z", "2020-06-12T00:00:00Z");
    let candidates = [&crl, &stale_ocsp];

    with_context(&snapshot, &policy, now(), |ctx| {
        let signer = ctx.pool.get(SIGNER).unwrap();
        let strategy = RevocationDataLoadingStrategy::from_context(ctx);
        assert_eq!(ids(&strategy.order(&candidates)), vec!["R-OCSP", "R-CRL"]);

        let outcome = strategy.select(ctx, signer, &candidates, time);
        assert_eq!(outcome.accepted().unwrap().id, "R-CRL");
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn missing_when_no_candidates() {
    let snapshot = snapshot();
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let outcome = RevocationDataLoadingStrategy::from_context(ctx).select(ctx, &tsa(), &[], now());
        assert!(matches!(outcome, RevocationOutcome::Missing));
        assert_eq!(outcome.rejection_summary(), None);
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn accepts_fresh_response_from_issuer() {
    let snapshot = snapshot();
    let policy = ValidationPolicy::default();
    let time = at("2020-06-02T00:00:00Z");

    with_context(&snapshot, &policy, now(), |ctx| {
        let signer = ctx.pool.get(SIGNER).unwrap();
        let candidates = ctx.snapshot.revocations_for(SIGNER);

        let outcome = RevocationDataLoadingStrategy::from_context(ctx).select(ctx, signer, &candidates, time);
        assert_eq!(outcome.accepted().unwrap().id, "R-SIGNER");
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn rejections_are_explained() {
    let snapshot = snapshot();
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let signer = ctx.pool.get(SIGNER).unwrap();
        let verifier = DefaultRevocationDataVerifier;

        let stale = &ctx.snapshot.revocations[0];
        assert!(matches!(
            verifier.verify(ctx, signer, stale, now()),
            Err(RevocationRejection::NotFresh(_))
        ));

        let mut broken = stale.clone();
        broken.signature_intact = false;
        assert!(matches!(
            verifier.verify(ctx, signer, &broken, at("2020-06-02T00:00:00Z")),
            Err(RevocationRejection::SignatureInvalid)
        ));

        let mut other = stale.clone();
        other.certificate_id = TSA.to_owned();
        assert!(matches!(
            verifier.verify(ctx, signer, &other, at("2020-06-02T00:00:00Z")),
            Err(RevocationRejection::NotConcerned(_))
        ));

        let mut unsigned = stale.clone();
        unsigned.signing_certificate_id = None;
        assert!(matches!(
            verifier.verify(ctx, signer, &unsigned, at("2020-06-02T00:00:00Z")),
            Err(RevocationRejection::UnknownIssuer)
        ));

        let mut late = stale.clone();
        late.production_time = at("2023-01-01T00:00:00Z");
        late.next_update = None;
        assert!(matches!(
            verifier.verify(ctx, signer, &late, at("2023-01-02T00:00:00Z")),
            Err(RevocationRejection::OutOfCertificateValidity(_))
        ));

        let mut archived = late.clone();
        archived.archive_cutoff = Some(at("2019-01-01T00:00:00Z"));
        assert!(verifier
            .verify(ctx, signer, &archived, at("2023-01-02T00:00:00Z"))
            .is_ok());

        let candidates = [stale, &broken];
        let outcome = RevocationDataLoadingStrategy::from_context(ctx).select(ctx, signer, &candidates, now());
        let summary = outcome.rejection_summary().unwrap();
        assert!(outcome.accepted().is_none());
        assert!(summary.contains("R-SIGNER: next update"));
        assert!(summary.contains("token signature is not intact"));
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn untrusted_responder_is_rejected() {
    let mut snapshot = snapshot();
    let mut rogue = root();
    rogue.id = "C-ROGUE".to_owned();
    rogue.subject = "CN=Rogue".to_owned();
    rogue.issuer = "CN=Rogue".to_owned();
    rogue.trusted = false;
    snapshot.certificates.push(rogue);
    snapshot.revocations[0].signing_certificate_id = Some("C-ROGUE".to_owned());
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let signer = ctx.pool.get(SIGNER).unwrap();
        assert!(matches!(
            DefaultRevocationDataVerifier.verify(ctx, signer, &ctx.snapshot.revocations[0], at("2020-06-02T00:00:00Z")),
            Err(RevocationRejection::UntrustedIssuer(id)) if id == "C-ROGUE"
        ));
    });
}

struct AcceptEverything;

impl RevocationDataVerifier for AcceptEverything {
    fn verify(
        &self,
        _ctx: &ValidationContext<'_>,
        _certificate: &CertificateToken,
        _revocation: &RevocationToken,
        _validation_time: DateTime<Utc>,
    ) -> Result<(), RevocationRejection> {
        Ok(())
    }
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn verifier_is_taken_from_services() {
    let snapshot = snapshot();
    let policy = ValidationPolicy::default();
    let services = ValidationServices::default().with_revocation_verifier(AcceptEverything);

    with_services(&snapshot, &policy, &services, now(), |ctx| {
        let signer = ctx.pool.get(SIGNER).unwrap();
        let candidates = ctx.snapshot.revocations_for(SIGNER);

        let outcome = RevocationDataLoadingStrategy::from_context(ctx).select(ctx, signer, &candidates, now());
        assert_eq!(outcome.accepted().unwrap().id, "R-SIGNER");
    });
}
