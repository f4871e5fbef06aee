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

use adesval_status_tracker::{message_tags::*, Indication, SubIndication};

use crate::{
    diagnostic::SignedToken,
    policy::constraints::{REFERENCE_DATA_FOUND, REFERENCE_DATA_INTACT, SIGNATURE_INTACT},
    process::{Chain, ChainResult, Rule, ValidationContext},
};

/// Cryptographic verification: every signed data object is found and
/// intact and the signature value verifies.
pub(crate) fn cryptographic_verification(ctx: &ValidationContext<'_>, token: &dyn SignedToken) -> ChainResult {
    let mut chain = Chain::new("cryptographic_verification", token.id(), ctx.error_behavior);
    let references = token.references();

    if references.is_empty() {
        chain.rule(
            Rule::new(BBB_CV_IRDOF, ctx.policy.level(REFERENCE_DATA_FOUND), || false)
                .on_failure(Indication::Indeterminate, SubIndication::SignedDataNotFound)
                .with_info("no signed data object"),
        );
    }

    for reference in references {
        let (found, intact) = (reference.found, reference.intact);

        chain.rule(
            Rule::new(BBB_CV_IRDOF, ctx.policy.level(REFERENCE_DATA_FOUND), move || found)
                .on_failure(Indication::Indeterminate, SubIndication::SignedDataNotFound)
                .with_info(reference.name.clone()),
        );
        chain.rule(
            Rule::new(BBB_CV_IRDOI, ctx.policy.level(REFERENCE_DATA_INTACT), move || intact)
                .on_failure(Indication::Failed, SubIndication::HashFailure)
                .with_info(reference.name),
        );
    }

    let intact = token.signature_intact();
    chain.rule(
        Rule::new(BBB_CV_ISI, ctx.policy.level(SIGNATURE_INTACT), move || intact)
            .on_failure(Indication::Failed, SubIndication::SigCryptoFailure),
    );

    chain.execute()
}
