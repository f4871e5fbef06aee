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

use adesval_crypto::CryptoConstraintError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use thiserror::Error;

use crate::{
    diagnostic::{CertificateToken, RevocationKind, RevocationToken},
    policy::RevocationSource,
    process::{
        revocation::{FreshnessError, RevocationFreshnessChecker},
        ValidationContext,
    },
};

/// Describes why a revocation token was not accepted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RevocationRejection {
    #[error("token is about certificate {0}")]
    NotConcerned(String),

    #[error("token signature is not intact")]
    SignatureInvalid,

    #[error("token issuer is unknown")]
    UnknownIssuer,

    #[error("token issuer {0} does not chain to a trust anchor")]
    UntrustedIssuer(String),

    #[error(transparent)]
    Cryptographic(#[from] CryptoConstraintError),

    #[error("token produced at {0}, outside the certificate validity")]
    OutOfCertificateValidity(DateTime<Utc>),

    #[error(transparent)]
    NotFresh(#[from] FreshnessError),
}

/// Decides whether one revocation token is acceptable for a certificate at
/// a validation time.
pub trait RevocationDataVerifier: Send + Sync {
    fn verify(
        &self,
        ctx: &ValidationContext<'_>,
        certificate: &CertificateToken,
        revocation: &RevocationToken,
        validation_time: DateTime<Utc>,
    ) -> Result<(), RevocationRejection>;
}

/// Checks scope, signature, issuer trust, algorithm strength, production
/// time and freshness.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRevocationDataVerifier;

impl RevocationDataVerifier for DefaultRevocationDataVerifier {
    fn verify(
        &self,
        ctx: &ValidationContext<'_>,
        certificate: &CertificateToken,
        revocation: &RevocationToken,
        validation_time: DateTime<Utc>,
    ) -> Result<(), RevocationRejection> {
        if revocation.certificate_id != certificate.id {
            return Err(RevocationRejection::NotConcerned(
                revocation.certificate_id.clone(),
            ));
        }

        if !revocation.signature_intact {
            return Err(RevocationRejection::SignatureInvalid);
        }

        let signer_id = revocation
            .signing_certificate_id
            .as_deref()
            .ok_or(RevocationRejection::UnknownIssuer)?;
        let issued_by_ca = ctx
            .pool
            .issuer_of(certificate)
            .is_some_and(|issuer| issuer.id == signer_id);
        if !issued_by_ca && !ctx.pool.chain(signer_id).complete {
            return Err(RevocationRejection::UntrustedIssuer(signer_id.to_owned()));
        }

        if let Some(algorithm) = &revocation.signature_algorithm {
            let key_size = ctx.pool.get(signer_id).and_then(|s| s.public_key_size);
            ctx.policy
                .cryptographic_suite
                .check_signature_at(algorithm, key_size, validation_time)?;
        }

        if !certificate.is_valid_at(revocation.production_time)
            && !revocation.covers_expired_certificate(certificate.not_after)
        {
            return Err(RevocationRejection::OutOfCertificateValidity(
                revocation.production_time,
            ));
        }

        RevocationFreshnessChecker::new(&ctx.policy.revocation)
            .check(revocation, validation_time)?;

        Ok(())
    }
}

/// Result of selecting revocation data for one certificate.
#[derive(Clone, Debug)]
pub enum RevocationOutcome<'a> {
    /// The first candidate the verifier accepted.
    Accepted(&'a RevocationToken),

    /// Every candidate was rejected, with the reason per token.
    Rejected(Vec<(String, String)>),

    /// No revocation data exists for the certificate.
    Missing,
}

impl<'a> RevocationOutcome<'a> {
    pub fn accepted(&self) -> Option<&'a RevocationToken> {
        match self {
            Self::Accepted(revocation) => Some(*revocation),
            _ => None,
        }
    }

    /// Describes the rejections, for reports.
    pub fn rejection_summary(&self) -> Option<String> {
        match self {
            Self::Rejected(reasons) => Some(
                reasons
                    .iter()
                    .map(|(id, reason)| format!("{id}: {reason}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        }
    }
}

/// Picks revocation data for a certificate, trying one source kind before
/// the other and the most recently produced token first.
pub struct RevocationDataLoadingStrategy<'v> {
    order: RevocationSource,
    verifier: &'v dyn RevocationDataVerifier,
}

impl<'v> RevocationDataLoadingStrategy<'v> {
    pub fn new(order: RevocationSource, verifier: &'v dyn RevocationDataVerifier) -> Self {
        Self { order, verifier }
    }

    /// Strategy configured by the policy and services of `ctx`.
    pub fn from_context(ctx: &ValidationContext<'v>) -> Self {
        Self::new(
            ctx.policy.revocation.preferred_source,
            ctx.services.revocation_verifier.as_ref(),
        )
    }

    /// Orders candidates: preferred kind first, then latest production
    /// time, then identifier.
    pub fn order<'a>(&self, candidates: &[&'a RevocationToken]) -> Vec<&'a RevocationToken> {
        let preferred = match self.order {
            RevocationSource::CrlFirst => RevocationKind::Crl,
            RevocationSource::OcspFirst => RevocationKind::Ocsp,
        };

        let mut ordered = candidates.to_vec();
        ordered.sort_by(|a, b| {
            (b.kind == preferred)
                .cmp(&(a.kind == preferred))
                .then_with(|| b.production_time.cmp(&a.production_time))
                .then_with(|| a.id.cmp(&b.id))
        });
        ordered
    }

    pub fn select<'a>(
        &self,
        ctx: &ValidationContext<'_>,
        certificate: &CertificateToken,
        candidates: &[&'a RevocationToken],
        validation_time: DateTime<Utc>,
    ) -> RevocationOutcome<'a> {
        if candidates.is_empty() {
            return RevocationOutcome::Missing;
        }

        let mut rejected = Vec::new();
        for candidate in self.order(candidates) {
            match self
                .verifier
                .verify(ctx, certificate, candidate, validation_time)
            {
                Ok(()) => {
                    debug!(
                        "revocation {} accepted for {} at {validation_time}",
                        candidate.id, certificate.id
                    );
                    return RevocationOutcome::Accepted(candidate);
                }
                Err(reason) => {
                    warn!(
                        "revocation {} rejected for {}: {reason}",
                        candidate.id, certificate.id
                    );
                    rejected.push((candidate.id.clone(), reason.to_string()));
                }
            }
        }

        RevocationOutcome::Rejected(rejected)
    }
}
