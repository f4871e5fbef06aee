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

use adesval_status_tracker::{Indication, SubIndication};

use super::fixtures::*;
use crate::{
    diagnostic::{CertificateToken, DiagnosticData, TimestampToken, TimestampType, TimestampedCategory},
    policy::ValidationPolicy,
    process::{
        timestamps::{relevant_timestamps, validate_timestamps},
        PoeSource, PoeStore,
    },
};

const TS_TIME: &str = "2020-06-01T01:00:00Z";
const RENEWAL_TIME: &str = "2023-01-01T00:00:00Z";

fn renewal(id: &str, signed_by: &str) -> TimestampToken {
    TimestampToken {
        signing_certificate_id: Some(signed_by.to_owned()),
        ..timestamp(
            id,
            TimestampType::ArchiveTimestamp,
            RENEWAL_TIME,
            &[
                ("T-1", TimestampedCategory::Timestamp),
                (TSA, TimestampedCategory::Certificate),
            ],
        )
    }
}

fn second_tsa() -> CertificateToken {
    CertificateToken {
        id: "C-TSA-2".to_owned(),
        subject: "CN=C-TSA-2".to_owned(),
        ..tsa()
    }
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn relevant_timestamps_latest_first() {
    let mut snapshot = timestamped_snapshot();
    snapshot.timestamps.push(renewal("T-2", TSA));
    snapshot.timestamps.push(signature_timestamp("T-0", TS_TIME));
    snapshot.timestamps.push(timestamp(
        "T-UNRELATED",
        TimestampType::SignatureTimestamp,
        "2022-01-01T00:00:00Z",
        &[(ROOT, TimestampedCategory::Certificate)],
    ));
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let ids: Vec<_> = relevant_timestamps(ctx, &ctx.snapshot.signatures[0])
            .iter()
            .map(|t| t.id.as_str())
            .collect();

        // T-2 is reached through T-1, ties break on the identifier
        assert_eq!(ids, vec!["T-2", "T-0", "T-1"]);
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn evidence_record_timestamps_are_relevant() {
    let mut snapshot = snapshot();
    snapshot
        .timestamps
        .push(archive_timestamp("ATS-1", "2021-01-01T00:00:00Z", &[]));
    snapshot.evidence_records.push(evidence_record("ER-1", &["ATS-1"]));
    let policy = ValidationPolicy::default();

    with_context(&snapshot, &policy, now(), |ctx| {
        let timestamps = relevant_timestamps(ctx, &ctx.snapshot.signatures[0]);
        assert_eq!(timestamps.len(), 1);
        assert_eq!(timestamps[0].id, "ATS-1");
    });
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn valid_timestamp_extends_poe() {
    let snapshot = timestamped_snapshot();
    let policy = ValidationPolicy::default();
    let mut poe = PoeStore::new(now());

    with_context(&snapshot, &policy, now(), |ctx| {
        let validations = validate_timestamps(ctx, &ctx.snapshot.signatures[0], &mut poe);

        assert_eq!(validations.len(), 1);
        assert!(validations[0].conclusion.is_passed());
        assert!(validations[0].past_validation.is_none());
        assert_eq!(validations[0].extended_poe_of, vec![SIGNATURE, SIGNER]);
    });

    assert_eq!(poe.lowest_poe_time(SIGNATURE), at(TS_TIME));
    assert_eq!(
        poe.lowest_poe(SIGNER).source,
        PoeSource::Timestamp("T-1".to_owned())
    );
    assert_eq!(poe.lowest_poe_time(ROOT), now());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn failed_timestamp_proves_nothing() {
    let mut snapshot = timestamped_snapshot();
    snapshot.timestamps[0].message_imprint_intact = false;
    let policy = ValidationPolicy::default();
    let mut poe = PoeStore::new(now());

    with_context(&snapshot, &policy, now(), |ctx| {
        let validations = validate_timestamps(ctx, &ctx.snapshot.signatures[0], &mut poe);

        assert_eq!(validations[0].conclusion.indication, Indication::Failed);
        assert_eq!(validations[0].conclusion.sub_indication, Some(SubIndication::HashFailure));
        assert!(validations[0].extended_poe_of.is_empty());
    });

    assert_eq!(poe.lowest_poe_time(SIGNATURE), now());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn renewal_rescues_timestamp_of_expired_unit() {
    let mut snapshot: DiagnosticData = timestamped_snapshot();
    snapshot.certificates[2].not_after = at("2023-06-01T00:00:00Z");
    snapshot.certificates.push(second_tsa());
    snapshot.timestamps.push(renewal("T-2", "C-TSA-2"));
    let policy = ValidationPolicy::default();
    let mut poe = PoeStore::new(now());

    with_context(&snapshot, &policy, now(), |ctx| {
        let validations = validate_timestamps(ctx, &ctx.snapshot.signatures[0], &mut poe);
        assert_eq!(validations.len(), 2);

        let (renewal, original) = (&validations[0], &validations[1]);
        assert_eq!(renewal.timestamp_id, "T-2");
        assert!(renewal.conclusion.is_passed());
        assert_eq!(renewal.extended_poe_of, vec!["T-1", TSA]);

        assert_eq!(original.timestamp_id, "T-1");
        assert_eq!(
            original.basic_building_blocks.conclusion.sub_indication,
            Some(SubIndication::Expired)
        );
        let past = original.past_validation.as_ref().unwrap();
        assert_eq!(past.pcv.control_time, Some(at(RENEWAL_TIME)));
        assert!(original.conclusion.is_passed(), "{:?}", original.conclusion);
    });

    assert_eq!(poe.lowest_poe_time(SIGNATURE), at(TS_TIME));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn expired_unit_without_renewal_stays_indeterminate() {
    let mut snapshot = timestamped_snapshot();
    snapshot.certificates[2].not_after = at("2023-06-01T00:00:00Z");
    let policy = ValidationPolicy::default();
    let mut poe = PoeStore::new(now());

    with_context(&snapshot, &policy, now(), |ctx| {
        let validations = validate_timestamps(ctx, &ctx.snapshot.signatures[0], &mut poe);

        assert_eq!(validations[0].conclusion.indication, Indication::Indeterminate);
        assert_eq!(validations[0].conclusion.sub_indication, Some(SubIndication::Expired));
    });

    assert_eq!(poe.lowest_poe_time(SIGNATURE), now());
}
