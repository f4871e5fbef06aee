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

//! Basic building blocks of ETSI EN 319 102-1.
//!
//! Format checking, identification of the signing certificate, validation
//! context initialization, cryptographic verification, X.509 certificate
//! validation and signature acceptance validation each evaluate as a
//! [`Chain`](crate::process::Chain). Their conclusions are aggregated in
//! that order by bubbling rules.

use adesval_status_tracker::{message_tags::*, Conclusion};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::{
    diagnostic::{SignatureToken, SignedToken, TimestampToken, TokenKind},
    process::{Chain, ChainResult, Rule, ValidationContext},
};

mod cv;
mod fc;
mod isc;
mod sav;
mod vci;
pub mod xcv;

pub(crate) use sav::algorithms_reliable_at;
pub use xcv::{x509_certificate_validation, CertificateValidation, XcvResult};

/// Results of the basic building blocks for one token.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BasicBuildingBlocks {
    pub token_id: String,

    pub token_kind: TokenKind,

    pub validation_time: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fc: Option<ChainResult>,

    pub isc: ChainResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vci: Option<ChainResult>,

    pub cv: ChainResult,

    /// Skipped when the signing certificate could not be identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcv: Option<XcvResult>,

    pub sav: ChainResult,

    pub conclusion: Conclusion,
}

/// Runs the building blocks for a signature at `time`.
pub fn validate_signature(
    ctx: &ValidationContext<'_>,
    signature: &SignatureToken,
    time: DateTime<Utc>,
) -> BasicBuildingBlocks {
    execute(ctx, signature, Some(signature), time)
}

/// Runs the building blocks for a time-stamp at `time`.
pub fn validate_timestamp(
    ctx: &ValidationContext<'_>,
    timestamp: &TimestampToken,
    time: DateTime<Utc>,
) -> BasicBuildingBlocks {
    execute(ctx, timestamp, None, time)
}

fn execute(
    ctx: &ValidationContext<'_>,
    token: &dyn SignedToken,
    signature: Option<&SignatureToken>,
    time: DateTime<Utc>,
) -> BasicBuildingBlocks {
    let fc = signature.map(|signature| fc::format_checking(ctx, signature));
    let isc = isc::identification_of_signing_certificate(
        ctx,
        token,
        signature.and_then(|signature| signature.signing_certificate_reference.as_ref()),
    );
    let vci = signature.map(|signature| vci::validation_context_initialization(ctx, signature));
    let cv = cv::cryptographic_verification(ctx, token);
    let xcv = isc.is_passed().then(|| {
        x509_certificate_validation(
            ctx,
            token.signing_certificate_id().unwrap_or_default(),
            time,
            token.kind(),
        )
    });
    let sav = sav::signature_acceptance_validation(ctx, token, signature, time);

    let mut chain = Chain::new("basic_building_blocks", token.id(), ctx.error_behavior);
    if let Some(fc) = &fc {
        chain.rule(Rule::bubble(BBB_FC, &fc.conclusion));
    }
    chain.rule(Rule::bubble(BBB_ISC, &isc.conclusion));
    if let Some(vci) = &vci {
        chain.rule(Rule::bubble(BBB_VCI, &vci.conclusion));
    }
    chain.rule(Rule::bubble(BBB_CV, &cv.conclusion));
    if let Some(xcv) = &xcv {
        chain.rule(Rule::bubble(BBB_XCV, xcv.conclusion()));
    }
    chain.rule(Rule::bubble(BBB_SAV, &sav.conclusion));
    let conclusion = chain.execute().conclusion;

    debug!("basic building blocks of {} at {time}: {conclusion}", token.id());

    BasicBuildingBlocks {
        token_id: token.id().to_owned(),
        token_kind: token.kind(),
        validation_time: time,
        fc,
        isc,
        vci,
        cv,
        xcv,
        sav,
        conclusion,
    }
}
