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

use crate::{
    log_item,
    message_tags::{BBB_SAV_ISQPSTP, BBB_XCV_ICNE},
    Conclusion, Indication, Level, StatusTracker, SubIndication,
};

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn passed_drops_sub_indication() {
    let conclusion = Conclusion::new(Indication::Passed, Some(SubIndication::Expired));

    assert!(conclusion.is_passed());
    assert_eq!(conclusion.sub_indication, None);
    assert_eq!(conclusion.to_string(), "PASSED");
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn display() {
    let conclusion = Conclusion::new(Indication::Indeterminate, Some(SubIndication::Expired));

    assert!(conclusion.is_indeterminate());
    assert!(conclusion.is_time_sensitive());
    assert_eq!(conclusion.to_string(), "INDETERMINATE/EXPIRED");
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn from_log_items_keeps_failures_in_order() {
    let mut tracker = StatusTracker::default();

    log_item!("S-1", BBB_SAV_ISQPSTP, "test func")
        .level(Level::Warn)
        .failure(&mut tracker, ())
        .unwrap();
    log_item!("C-1", BBB_XCV_ICNE, "test func")
        .additional_info("expired 2024-01-01")
        .failure(&mut tracker, ())
        .unwrap();

    let conclusion = Conclusion::from_log_items(
        tracker.logged_items(),
        Some((Indication::Indeterminate, Some(SubIndication::Expired))),
    );

    assert_eq!(conclusion.messages.len(), 2);
    assert_eq!(conclusion.messages[0].level, Level::Warn);
    assert_eq!(conclusion.messages[1].key, "BBB_XCV_ICNE");
    assert_eq!(
        conclusion.messages[1].text,
        "Is the certificate not expired at the validation time? (expired 2024-01-01)"
    );
    assert_eq!(conclusion.messages_at(Level::Fail).count(), 1);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn same_verdict_ignores_messages() {
    let a = Conclusion::new(Indication::Failed, Some(SubIndication::HashFailure));
    let mut b = a.clone();
    b.messages.clear();

    assert!(a.same_verdict(&b));
    assert!(!a.same_verdict(&Conclusion::passed()));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn serde_round_trip() {
    let conclusion = Conclusion::new(Indication::Indeterminate, Some(SubIndication::TryLater));
    let json = serde_json::to_string(&conclusion).unwrap();

    assert_eq!(json, r#"{"indication":"INDETERMINATE","sub_indication":"TRY_LATER"}"#);
    assert_eq!(serde_json::from_str::<Conclusion>(&json).unwrap(), conclusion);
}
