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

//! Trusted-list overlay of certificate qualification.

use chrono::{DateTime, Utc};

use crate::{
    diagnostic::{CertificateChain, CertificateToken, DiagnosticData, TrustService},
    process::qualification::{CertificateQualification, CertificateType},
};

/// Namespace of service qualifiers and additional service information.
const EXTENSION_PREFIX: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/";

/// Finds the trust services that may apply to a certificate chain.
pub trait TrustServiceLookup: Send + Sync {
    /// Services active at `time` whose digital identity is a certificate of
    /// `chain` other than the leaf.
    fn applicable_services<'s>(
        &self,
        snapshot: &'s DiagnosticData,
        chain: &CertificateChain<'_>,
        time: DateTime<Utc>,
    ) -> Vec<&'s TrustService>;
}

/// Looks trust services up in the snapshot itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotTrustServiceLookup;

impl TrustServiceLookup for SnapshotTrustServiceLookup {
    fn applicable_services<'s>(
        &self,
        snapshot: &'s DiagnosticData,
        chain: &CertificateChain<'_>,
        time: DateTime<Utc>,
    ) -> Vec<&'s TrustService> {
        let issuers = chain.certificates.get(1..).unwrap_or_default();

        snapshot
            .trust_services
            .iter()
            .filter(|service| service.is_active_at(time))
            .filter(|service| {
                service
                    .certificate_ids
                    .iter()
                    .any(|id| issuers.iter().any(|issuer| issuer.id == *id))
            })
            .collect()
    }
}

fn extension_name(uri: &str) -> Option<&str> {
    uri.strip_prefix(EXTENSION_PREFIX)
}

/// Applies the status and qualifiers of `service` over the qualification
/// from certificate content.
pub fn apply_trust_service(
    service: &TrustService,
    certificate: &CertificateToken,
    content: &CertificateQualification,
) -> CertificateQualification {
    let qualifiers: Vec<&str> = service
        .qualifiers
        .iter()
        .filter(|q| q.policy_oids.is_empty() || certificate.has_any_policy(&q.policy_oids))
        .filter_map(|q| extension_name(&q.uri))
        .collect();
    let has = |name: &str| qualifiers.contains(&name);

    let qualified = if !service.is_granted() || has("NotQualified") {
        false
    } else {
        has("QCStatement") || content.qualified
    };

    let mut types: Vec<CertificateType> = [
        ("QCForESig", CertificateType::ESign),
        ("QCForESeal", CertificateType::ESeal),
        ("QCForWSA", CertificateType::Wsa),
    ]
    .into_iter()
    .filter(|(name, _)| has(*name))
    .map(|(_, certificate_type)| certificate_type)
    .collect();

    if types.is_empty() && content.certificate_type == CertificateType::Unknown {
        types = [
            ("ForeSignatures", CertificateType::ESign),
            ("ForeSeals", CertificateType::ESeal),
            ("ForWebSiteAuthentication", CertificateType::Wsa),
        ]
        .into_iter()
        .filter(|(name, _)| {
            service
                .additional_service_info
                .iter()
                .any(|uri| extension_name(uri) == Some(*name))
        })
        .map(|(_, certificate_type)| certificate_type)
        .collect();
    }

    let certificate_type = match types.as_slice() {
        [] => content.certificate_type,
        [only] => *only,
        _ => CertificateType::Unknown,
    };

    let qscd = if has("QCWithSSCD") || has("QCWithQSCD") || has("QCQSCDManagedOnBehalf") {
        true
    } else if has("QCNoSSCD") || has("QCNoQSCD") {
        false
    } else {
        content.qscd
    };

    CertificateQualification {
        qualified,
        certificate_type,
        qscd,
    }
}
