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
    diagnostic::SignatureToken,
    policy::constraints::{
        ACCEPTED_SIGNATURE_POLICY, SIGNATURE_POLICY_AVAILABLE, SIGNATURE_POLICY_DIGEST_MATCH,
    },
    process::{Chain, ChainResult, Rule, ValidationContext},
};

/// Validation context initialization. Signatures without an explicit
/// policy run under the implicit one and pass.
pub(crate) fn validation_context_initialization(
    ctx: &ValidationContext<'_>,
    signature: &SignatureToken,
) -> ChainResult {
    let mut chain = Chain::new("validation_context_initialization", &signature.id, ctx.error_behavior);

    if let Some(policy) = &signature.policy {
        let accepted = &ctx.policy.accepted_signature_policies;

        chain.rule(
            Rule::new(BBB_VCI_ISPK, ctx.policy.level(ACCEPTED_SIGNATURE_POLICY), move || {
                accepted.is_empty() || accepted.contains(&policy.id)
            })
            .on_failure(Indication::Indeterminate, SubIndication::PolicyProcessingError)
            .with_info(policy.id.clone()),
        );

        chain.rule(
            Rule::new(BBB_VCI_ISPA, ctx.policy.level(SIGNATURE_POLICY_AVAILABLE), move || {
                policy.available
            })
            .on_failure(Indication::Indeterminate, SubIndication::SignaturePolicyNotAvailable),
        );

        chain.rule(
            Rule::new(BBB_VCI_ISPM, ctx.policy.level(SIGNATURE_POLICY_DIGEST_MATCH), move || {
                !policy.available || policy.digest_match == Some(true)
            })
            .on_failure(Indication::Indeterminate, SubIndication::PolicyProcessingError),
        );
    }

    chain.execute()
}
