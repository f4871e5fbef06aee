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
    diagnostic::{SignedToken, SigningCertificateReference},
    policy::constraints::{SIGNING_CERTIFICATE_DIGEST_MATCH, SIGNING_CERTIFICATE_IDENTIFIED},
    process::{Chain, ChainResult, Rule, ValidationContext},
};

/// Identification of the signing certificate.
pub(crate) fn identification_of_signing_certificate(
    ctx: &ValidationContext<'_>,
    token: &dyn SignedToken,
    reference: Option<&SigningCertificateReference>,
) -> ChainResult {
    let pool = ctx.pool;
    let candidate = token.signing_certificate_id();
    let mut chain = Chain::new("identification_of_signing_certificate", token.id(), ctx.error_behavior);

    chain.rule(
        Rule::new(
            BBB_ICS_ISCI,
            ctx.policy.level(SIGNING_CERTIFICATE_IDENTIFIED),
            move || candidate.is_some_and(|id| pool.get(id).is_some()),
        )
        .on_failure(Indication::Indeterminate, SubIndication::NoSigningCertificateFound),
    );

    if let Some(reference) = reference {
        chain.rule(
            Rule::new(
                BBB_ICS_IDVM,
                ctx.policy.level(SIGNING_CERTIFICATE_DIGEST_MATCH),
                move || reference.digest_match && reference.issuer_serial_match != Some(false),
            )
            .on_failure(Indication::Indeterminate, SubIndication::NoSigningCertificateFound),
        );
    }

    chain.execute()
}
