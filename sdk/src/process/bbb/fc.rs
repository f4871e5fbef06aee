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
    policy::constraints::{ACCEPTABLE_FORMAT, STRUCTURAL_VALIDATION},
    process::{Chain, ChainResult, Rule, ValidationContext},
};

/// Format checking: the signature is in an accepted format and
/// structurally sound.
pub(crate) fn format_checking(ctx: &ValidationContext<'_>, signature: &SignatureToken) -> ChainResult {
    let accepted = &ctx.policy.accepted_formats;
    let mut chain = Chain::new("format_checking", &signature.id, ctx.error_behavior);

    chain.rule(
        Rule::new(BBB_FC_IEFF, ctx.policy.level(ACCEPTABLE_FORMAT), move || {
            accepted.is_empty() || accepted.contains(&signature.format)
        })
        .on_failure(Indication::Failed, SubIndication::FormatFailure)
        .with_info(signature.format.clone()),
    );

    chain.rule(
        Rule::with_reason(BBB_FC_ISSV, ctx.policy.level(STRUCTURAL_VALIDATION), move || {
            if signature.is_structurally_valid() {
                Ok(())
            } else {
                Err(Some(signature.structural_errors.join("; ")))
            }
        })
        .on_failure(Indication::Failed, SubIndication::FormatFailure),
    );

    chain.execute()
}
