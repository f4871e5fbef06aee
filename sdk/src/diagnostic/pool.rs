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

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::{
    diagnostic::{CertificateToken, DiagnosticData},
    Error, Result,
};

/// Read-only index of the certificates of one snapshot.
///
/// Chains are built on demand from a leaf to a trust anchor. A pool
/// refuses to build from snapshots whose issuer links form a cycle.
#[derive(Debug)]
pub struct CertificatePool<'a> {
    certificates: BTreeMap<&'a str, &'a CertificateToken>,
}

impl<'a> CertificatePool<'a> {
    pub fn new(snapshot: &'a DiagnosticData) -> Result<Self> {
        let pool = Self {
            certificates: snapshot
                .certificates
                .iter()
                .map(|c| (c.id.as_str(), c))
                .collect(),
        };

        for certificate in pool.certificates.values().copied() {
            pool.walk(certificate)?;
        }

        Ok(pool)
    }

    pub fn get(&self, id: &str) -> Option<&'a CertificateToken> {
        self.certificates.get(id).copied()
    }

    /// Returns the issuer of `certificate`, if present in the pool.
    ///
    /// An explicit `issuer_id` wins. Otherwise the issuer is matched by
    /// name, preferring trust anchors, then the lowest identifier.
    pub fn issuer_of(&self, certificate: &CertificateToken) -> Option<&'a CertificateToken> {
        if let Some(issuer_id) = &certificate.issuer_id {
            return self.get(issuer_id);
        }

        if certificate.is_self_issued() {
            return None;
        }

        let mut candidates: Vec<&'a CertificateToken> = self
            .certificates
            .values()
            .copied()
            .filter(|c| c.id != certificate.id && c.subject == certificate.issuer)
            .collect();
        candidates.sort_by(|a, b| b.trusted.cmp(&a.trusted).then_with(|| a.id.cmp(&b.id)));

        candidates.into_iter().next()
    }

    /// Builds the prospective chain of `leaf_id`, leaf first.
    pub fn chain(&self, leaf_id: &str) -> CertificateChain<'a> {
        let Some(leaf) = self.get(leaf_id) else {
            warn!("certificate {leaf_id} is not in the pool");
            return CertificateChain::default();
        };

        match self.walk(leaf) {
            Ok(chain) => chain,
            Err(_) => CertificateChain {
                certificates: vec![leaf],
                complete: false,
            },
        }
    }

    fn walk(&self, leaf: &'a CertificateToken) -> Result<CertificateChain<'a>> {
        let mut certificates = vec![leaf];
        let mut seen = BTreeSet::from([leaf.id.as_str()]);
        let mut current = leaf;

        loop {
            if current.trusted {
                return Ok(CertificateChain {
                    certificates,
                    complete: true,
                });
            }

            let Some(issuer) = self.issuer_of(current) else {
                debug!("chain of {} ends at untrusted {}", leaf.id, current.id);
                return Ok(CertificateChain {
                    certificates,
                    complete: false,
                });
            };

            if !seen.insert(issuer.id.as_str()) {
                return Err(Error::CyclicCertificateChain {
                    certificate_id: issuer.id.clone(),
                });
            }

            certificates.push(issuer);
            current = issuer;
        }
    }

    /// Sets `signature_intact` on every certificate whose DER encoding and
    /// issuer DER encoding are both known.
    pub fn verify_signatures(certificates: &mut [CertificateToken]) {
        let encodings: BTreeMap<String, (String, Vec<u8>)> = certificates
            .iter()
            .filter_map(|c| Some((c.id.clone(), (c.subject.clone(), c.der.clone()?))))
            .collect();

        for certificate in certificates.iter_mut() {
            let Some(der) = certificate.der.as_deref() else {
                continue;
            };

            let issuer_der = match &certificate.issuer_id {
                Some(issuer_id) => encodings.get(issuer_id).map(|(_, der)| der),
                None => encodings
                    .values()
                    .find(|(subject, _)| *subject == certificate.issuer)
                    .map(|(_, der)| der),
            };

            if let Some(issuer_der) = issuer_der {
                certificate.signature_intact =
                    adesval_crypto::x509::verify_issued_by(der, issuer_der).unwrap_or(false);
            }
        }
    }
}

/// A certificate chain, leaf first.
#[derive(Clone, Debug, Default)]
pub struct CertificateChain<'a> {
    pub certificates: Vec<&'a CertificateToken>,

    /// The chain ends at a trust anchor.
    pub complete: bool,
}

impl<'a> CertificateChain<'a> {
    pub fn leaf(&self) -> Option<&'a CertificateToken> {
        self.certificates.first().copied()
    }

    pub fn trust_anchor(&self) -> Option<&'a CertificateToken> {
        if self.complete {
            self.certificates.last().copied()
        } else {
            None
        }
    }

    /// Issuer of the certificate at `index`.
    pub fn issuer_at(&self, index: usize) -> Option<&'a CertificateToken> {
        self.certificates.get(index + 1).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.certificates.iter().any(|c| c.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.certificates.iter().map(|c| c.id.clone()).collect()
    }
}
