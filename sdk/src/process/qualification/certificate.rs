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

//! Qualification of a certificate from its own content.

use std::collections::BTreeSet;

use adesval_crypto::QcType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{diagnostic::CertificateToken, policy::QualificationSettings};

/// QCP-n: qualified certificate for natural persons.
pub const QCP_NATURAL: &str = "0.4.0.194112.1.0";
/// QCP-l: qualified certificate for legal persons.
pub const QCP_LEGAL: &str = "0.4.0.194112.1.1";
/// QCP-n-qscd
pub const QCP_NATURAL_QSCD: &str = "0.4.0.194112.1.2";
/// QCP-l-qscd
pub const QCP_LEGAL_QSCD: &str = "0.4.0.194112.1.3";
/// QCP-w: qualified website authentication certificate.
pub const QCP_WEB: &str = "0.4.0.194112.1.4";

/// Purpose a certificate is issued for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateType {
    ESign,
    ESeal,
    Wsa,
    Unknown,
}

/// Qualification status of a certificate at one point in time.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CertificateQualification {
    pub qualified: bool,
    pub certificate_type: CertificateType,
    pub qscd: bool,
}

impl CertificateQualification {
    pub fn label(&self) -> &'static str {
        use CertificateType::*;
        match (self.qualified, self.certificate_type, self.qscd) {
            (true, ESign, true) => "QC for eSig with QSCD",
            (true, ESign, false) => "QC for eSig",
            (true, ESeal, true) => "QC for eSeal with QSCD",
            (true, ESeal, false) => "QC for eSeal",
            (true, Wsa, _) => "QC for WSA",
            (true, Unknown, _) => "QC of unknown type",
            (false, ESign, _) => "Cert for eSig",
            (false, ESeal, _) => "Cert for eSeal",
            (false, Wsa, _) => "Cert for WSA",
            (false, Unknown, _) => "Cert of unknown type",
        }
    }
}

/// Legal regime a certificate is judged under, chosen by issuance date.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationRegime {
    /// Directive 1999/93/EC.
    PreRegulation,

    /// Regulation (EU) No 910/2014.
    PostRegulation,
}

impl QualificationRegime {
    pub fn of(certificate: &CertificateToken, settings: &QualificationSettings) -> Self {
        Self::at(certificate.not_before, settings)
    }

    pub fn at(issuance: DateTime<Utc>, settings: &QualificationSettings) -> Self {
        if issuance < settings.regulation_date {
            Self::PreRegulation
        } else {
            Self::PostRegulation
        }
    }

    /// Qualification derived from QC statements and certificate policies.
    pub fn qualification_from_content(
        &self,
        certificate: &CertificateToken,
        settings: &QualificationSettings,
    ) -> CertificateQualification {
        let qc = &certificate.qc_statements;
        let has = |oid: &str| certificate.policy_oids.iter().any(|p| p == oid);

        match self {
            Self::PreRegulation => CertificateQualification {
                qualified: qc.compliance
                    || certificate.has_any_policy(&settings.legacy_qualified_policy_oids),
                certificate_type: CertificateType::ESign,
                qscd: qc.sscd || has(crate::policy::QCP_PLUS),
            },
            Self::PostRegulation => {
                let mut types: BTreeSet<CertificateType> = qc
                    .types
                    .iter()
                    .map(|t| match t {
                        QcType::Esign => CertificateType::ESign,
                        QcType::Eseal => CertificateType::ESeal,
                        QcType::Web => CertificateType::Wsa,
                    })
                    .collect();
                for (oid, certificate_type) in [
                    (QCP_NATURAL, CertificateType::ESign),
                    (QCP_NATURAL_QSCD, CertificateType::ESign),
                    (QCP_LEGAL, CertificateType::ESeal),
                    (QCP_LEGAL_QSCD, CertificateType::ESeal),
                    (QCP_WEB, CertificateType::Wsa),
                ] {
                    if has(oid) {
                        types.insert(certificate_type);
                    }
                }

                let certificate_type = match types.len() {
                    0 => CertificateType::ESign,
                    1 => types.into_iter().next().unwrap_or(CertificateType::Unknown),
                    _ => CertificateType::Unknown,
                };

                CertificateQualification {
                    qualified: qc.compliance
                        || [QCP_NATURAL, QCP_LEGAL, QCP_NATURAL_QSCD, QCP_LEGAL_QSCD, QCP_WEB]
                            .into_iter()
                            .any(has),
                    certificate_type,
                    qscd: qc.sscd || has(QCP_NATURAL_QSCD) || has(QCP_LEGAL_QSCD),
                }
            }
        }
    }
}
