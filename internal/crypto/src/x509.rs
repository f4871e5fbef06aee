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

//! Extraction of the certificate facts the validation engine reasons about.

use asn1_rs::{oid, FromDer, Oid};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use x509_parser::{
    certificate::X509Certificate, der_parser::ber::parse_ber_sequence, extensions::ParsedExtension,
    public_key::PublicKey, time::ASN1Time,
};

use crate::{hash, DigestAlgorithm, EncryptionAlgorithm, SignatureAlgorithm};

/// Key usage bits relevant to chain validation.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyUsage {
    /// `digitalSignature`
    #[serde(default)]
    pub digital_signature: bool,

    /// `nonRepudiation` (`contentCommitment`)
    #[serde(default)]
    pub non_repudiation: bool,

    /// `keyCertSign`
    #[serde(default)]
    pub key_cert_sign: bool,

    /// `cRLSign`
    #[serde(default)]
    pub crl_sign: bool,
}

/// Type markers of the ETSI EN 319 412-5 `QcType` statement.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QcType {
    /// `id-etsi-qct-esign`
    Esign,

    /// `id-etsi-qct-eseal`
    Eseal,

    /// `id-etsi-qct-web`
    Web,
}

/// Qualified-certificate statements found in a certificate.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct QcStatements {
    /// `id-etsi-qcs-QcCompliance` is present.
    #[serde(default)]
    pub compliance: bool,

    /// `id-etsi-qcs-QcSSCD` is present.
    #[serde(default)]
    pub sscd: bool,

    /// Type markers from `id-etsi-qcs-QcType`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<QcType>,
}

/// Facts extracted from a DER-encoded X.509 certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateFacts {
    /// Subject distinguished name.
    pub subject: String,

    /// Issuer distinguished name.
    pub issuer: String,

    /// Serial number as lowercase hex.
    pub serial_number: String,

    /// Start of the validity period.
    pub not_before: DateTime<Utc>,

    /// End of the validity period.
    pub not_after: DateTime<Utc>,

    /// Algorithm of the subject public key, when recognized.
    pub public_key_algorithm: Option<EncryptionAlgorithm>,

    /// Size of the subject public key in bits, when known.
    pub public_key_size: Option<u32>,

    /// Algorithm of the issuer's signature over this certificate.
    pub signature_algorithm: Option<SignatureAlgorithm>,

    /// The certificate is a CA certificate.
    pub is_ca: bool,

    /// Key usage bits.
    pub key_usage: KeyUsage,

    /// Certificate policy OIDs in dotted form.
    pub policy_oids: Vec<String>,

    /// Qualified-certificate statements.
    pub qc_statements: QcStatements,

    /// `id-pkix-ocsp-nocheck` is present.
    pub ocsp_no_check: bool,

    /// SHA-256 digest of the DER encoding.
    pub sha256: Vec<u8>,
}

impl CertificateFacts {
    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateParseError> {
        let (_rem, cert) =
            X509Certificate::from_der(der).map_err(|_| CertificateParseError::InvalidCertificate)?;

        let public_key = cert.public_key();
        let public_key_algorithm = key_algorithm(&public_key.algorithm.algorithm);
        let public_key_size = match public_key.parsed() {
            Ok(PublicKey::RSA(rsa)) => Some(rsa.key_size() as u32),
            Ok(PublicKey::EC(ec)) => Some(ec.key_size() as u32),
            _ => None,
        };

        let key_usage = match cert.key_usage() {
            Ok(Some(ext)) => KeyUsage {
                digital_signature: ext.value.digital_signature(),
                non_repudiation: ext.value.non_repudiation(),
                key_cert_sign: ext.value.key_cert_sign(),
                crl_sign: ext.value.crl_sign(),
            },
            Ok(None) => KeyUsage::default(),
            Err(_) => return Err(CertificateParseError::InvalidExtension("keyUsage")),
        };

        let mut policy_oids = Vec::new();
        let mut qc_statements = QcStatements::default();
        let mut ocsp_no_check = false;

        for ext in cert.extensions() {
            if ext.oid == QC_STATEMENTS_OID {
                qc_statements = parse_qc_statements(ext.value)?;
            } else if ext.oid == OCSP_NO_CHECK_OID {
                ocsp_no_check = true;
            } else if ext.oid == CERTIFICATE_POLICIES_OID {
                match ext.parsed_extension() {
                    ParsedExtension::CertificatePolicies(policies) => policy_oids
                        .extend(policies.iter().map(|p| p.policy_id.to_id_string())),
                    _ => {
                        return Err(CertificateParseError::InvalidExtension(
                            "certificatePolicies",
                        ))
                    }
                }
            }
        }

        Ok(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial_number: cert.raw_serial_as_string().replace(':', ""),
            not_before: to_datetime(cert.validity().not_before)?,
            not_after: to_datetime(cert.validity().not_after)?,
            public_key_algorithm,
            public_key_size,
            signature_algorithm: signature_algorithm(&cert.signature_algorithm.algorithm),
            is_ca: cert.tbs_certificate.is_ca(),
            key_usage,
            policy_oids,
            qc_statements,
            ocsp_no_check,
            sha256: hash::sha256(der),
        })
    }
}

/// Returns `Ok(true)` if the signature on `certificate_der` verifies with
/// the public key of `issuer_der`.
pub fn verify_issued_by(certificate_der: &[u8], issuer_der: &[u8]) -> Result<bool, CertificateParseError> {
    let (_, cert) = X509Certificate::from_der(certificate_der)
        .map_err(|_| CertificateParseError::InvalidCertificate)?;
    let (_, issuer) =
        X509Certificate::from_der(issuer_der).map_err(|_| CertificateParseError::InvalidCertificate)?;

    match cert.verify_signature(Some(issuer.public_key())) {
        Ok(()) => Ok(true),
        Err(err) => {
            debug!("certificate signature does not verify with issuer key: {err}");
            Ok(false)
        }
    }
}

fn to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CertificateParseError> {
    DateTime::from_timestamp(time.timestamp(), 0).ok_or(CertificateParseError::InvalidValidity)
}

fn key_algorithm(oid: &Oid) -> Option<EncryptionAlgorithm> {
    if *oid == RSA_OID {
        Some(EncryptionAlgorithm::Rsa)
    } else if *oid == RSASSA_PSS_OID {
        Some(EncryptionAlgorithm::RsaSsaPss)
    } else if *oid == EC_PUBLICKEY_OID {
        Some(EncryptionAlgorithm::Ecdsa)
    } else if *oid == ED25519_OID {
        Some(EncryptionAlgorithm::EdDsa)
    } else if *oid == DSA_OID {
        Some(EncryptionAlgorithm::Dsa)
    } else {
        None
    }
}

fn signature_algorithm(oid: &Oid) -> Option<SignatureAlgorithm> {
    let (encryption, digest) = if *oid == SHA1_WITH_RSAENCRYPTION_OID {
        (EncryptionAlgorithm::Rsa, Some(DigestAlgorithm::Sha1))
    } else if *oid == SHA256_WITH_RSAENCRYPTION_OID {
        (EncryptionAlgorithm::Rsa, Some(DigestAlgorithm::Sha256))
    } else if *oid == SHA384_WITH_RSAENCRYPTION_OID {
        (EncryptionAlgorithm::Rsa, Some(DigestAlgorithm::Sha384))
    } else if *oid == SHA512_WITH_RSAENCRYPTION_OID {
        (EncryptionAlgorithm::Rsa, Some(DigestAlgorithm::Sha512))
    } else if *oid == ECDSA_WITH_SHA256_OID {
        (EncryptionAlgorithm::Ecdsa, Some(DigestAlgorithm::Sha256))
    } else if *oid == ECDSA_WITH_SHA384_OID {
        (EncryptionAlgorithm::Ecdsa, Some(DigestAlgorithm::Sha384))
    } else if *oid == ECDSA_WITH_SHA512_OID {
        (EncryptionAlgorithm::Ecdsa, Some(DigestAlgorithm::Sha512))
    } else if *oid == RSASSA_PSS_OID {
        // The digest lives in the parameters; the suite entry for PSS covers it.
        (EncryptionAlgorithm::RsaSsaPss, None)
    } else if *oid == ED25519_OID {
        (EncryptionAlgorithm::EdDsa, None)
    } else {
        return None;
    };

    Some(SignatureAlgorithm::new(encryption, digest))
}

fn parse_qc_statements(value: &[u8]) -> Result<QcStatements, CertificateParseError> {
    let invalid = || CertificateParseError::InvalidExtension("qcStatements");

    let (_, statements) = parse_ber_sequence(value).map_err(|_| invalid())?;
    let mut result = QcStatements::default();

    for statement in statements.as_sequence().map_err(|_| invalid())? {
        let parts = statement.as_sequence().map_err(|_| invalid())?;
        let Some(id) = parts.first() else {
            return Err(invalid());
        };
        let id = id.as_oid().map_err(|_| invalid())?;

        if *id == QC_COMPLIANCE_OID {
            result.compliance = true;
        } else if *id == QC_SSCD_OID {
            result.sscd = true;
        } else if *id == QC_TYPE_OID {
            let Some(info) = parts.get(1) else {
                continue;
            };

            for qc_type in info.as_sequence().map_err(|_| invalid())? {
                let qc_type = qc_type.as_oid().map_err(|_| invalid())?;

                let marker = if *qc_type == QCT_ESIGN_OID {
                    QcType::Esign
                } else if *qc_type == QCT_ESEAL_OID {
                    QcType::Eseal
                } else if *qc_type == QCT_WEB_OID {
                    QcType::Web
                } else {
                    continue;
                };

                if !result.types.contains(&marker) {
                    result.types.push(marker);
                }
            }
        }
    }

    Ok(result)
}

/// Describes errors that can occur while extracting certificate facts.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CertificateParseError {
    /// The data presented isn't a valid X.509 certificate in DER format.
    #[error("the certificate is invalid")]
    InvalidCertificate,

    /// The validity period cannot be represented.
    #[error("the certificate validity period is invalid")]
    InvalidValidity,

    /// An extension could not be decoded.
    #[error("the certificate extension {0} is invalid")]
    InvalidExtension(&'static str),
}

const RSA_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .1);
const EC_PUBLICKEY_OID: Oid<'static> = oid!(1.2.840 .10045 .2 .1);
const RSASSA_PSS_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .10);
const DSA_OID: Oid<'static> = oid!(1.2.840 .10040 .4 .1);

const ECDSA_WITH_SHA256_OID: Oid<'static> = oid!(1.2.840 .10045 .4 .3 .2);
const ECDSA_WITH_SHA384_OID: Oid<'static> = oid!(1.2.840 .10045 .4 .3 .3);
const ECDSA_WITH_SHA512_OID: Oid<'static> = oid!(1.2.840 .10045 .4 .3 .4);
const SHA1_WITH_RSAENCRYPTION_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .5);
const SHA256_WITH_RSAENCRYPTION_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .11);
const SHA384_WITH_RSAENCRYPTION_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .12);
const SHA512_WITH_RSAENCRYPTION_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .13);
const ED25519_OID: Oid<'static> = oid!(1.3.101 .112);

const QC_STATEMENTS_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .1 .3);
const OCSP_NO_CHECK_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .48 .1 .5);
const CERTIFICATE_POLICIES_OID: Oid<'static> = oid!(2.5.29 .32);

const QC_COMPLIANCE_OID: Oid<'static> = oid!(0.4.0 .1862 .1 .1);
const QC_SSCD_OID: Oid<'static> = oid!(0.4.0 .1862 .1 .4);
const QC_TYPE_OID: Oid<'static> = oid!(0.4.0 .1862 .1 .6);
const QCT_ESIGN_OID: Oid<'static> = oid!(0.4.0 .1862 .1 .6 .1);
const QCT_ESEAL_OID: Oid<'static> = oid!(0.4.0 .1862 .1 .6 .2);
const QCT_WEB_OID: Oid<'static> = oid!(0.4.0 .1862 .1 .6 .3);
