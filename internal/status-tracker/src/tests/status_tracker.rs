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
    message_tags::{BBB_CV_ISI, BBB_FC_IEFF, BBB_SAV_ISQPSTP},
    ErrorBehavior, Level, StatusTracker,
};

#[derive(Debug, Eq, PartialEq)]
struct SampleError {}

mod continue_when_possible {
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn aggregates_errors() {
        let mut tracker = StatusTracker::default();

        log_item!("S-1", BBB_FC_IEFF, "test func").success(&mut tracker);

        // An error does not stop the tracker.
        log_item!("S-1", BBB_CV_ISI, "test func")
            .failure(&mut tracker, SampleError {})
            .unwrap();

        assert_eq!(tracker.logged_items().len(), 2);
        assert_eq!(tracker.filter_errors().count(), 1);
        assert!(tracker.has_error(SampleError {}));
        assert!(tracker.has_status("BBB_CV_ISI"));
    }
}

mod stop_on_first_error {
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn stops_on_fail_level() {
        let mut tracker = StatusTracker::with_error_behavior(ErrorBehavior::StopOnFirstError);
        assert_eq!(tracker.error_behavior(), ErrorBehavior::StopOnFirstError);

        let err = log_item!("S-1", BBB_CV_ISI, "test func")
            .failure(&mut tracker, SampleError {})
            .unwrap_err();

        assert_eq!(err, SampleError {});
        assert!(tracker.has_any_error());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn informs_without_stopping() {
        let mut tracker = StatusTracker::with_error_behavior(ErrorBehavior::StopOnFirstError);

        log_item!("S-1", BBB_SAV_ISQPSTP, "test func")
            .level(Level::Inform)
            .failure(&mut tracker, SampleError {})
            .unwrap();

        assert!(!tracker.has_any_error());
    }
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn append() {
    let mut first = StatusTracker::default();
    log_item!("S-1", BBB_FC_IEFF, "test func").success(&mut first);

    let mut second = StatusTracker::default();
    log_item!("S-2", BBB_CV_ISI, "test func").informational(&mut second);

    first.append(&second);

    let items = first.into_logged_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].label, "S-2");
}
