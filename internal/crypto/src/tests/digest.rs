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

use crate::{Digest, DigestAlgorithm};

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn matches() {
    let digest = Digest::of(DigestAlgorithm::Sha256, b"signed content");

    assert!(digest.matches(b"signed content"));
    assert!(!digest.matches(b"tampered content"));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn serde_form() {
    let digest = Digest {
        algorithm: DigestAlgorithm::Sha1,
        value: vec![0xde, 0xad],
    };

    let json = serde_json::to_string(&digest).unwrap();
    assert_eq!(json, r#"{"algorithm":"SHA1","value":"3q0="}"#);
    assert_eq!(digest.to_string(), "SHA1:dead");
}
