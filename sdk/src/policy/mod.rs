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

//! Validation policy: constraint levels, cryptographic suite, accepted
//! values and revocation and qualification settings.
//!
//! Policies load from JSON or TOML through the `config` crate and are
//! checked with [`PolicyValidate`] before a run starts.

use std::{collections::BTreeMap, path::Path};

use adesval_crypto::{
    crypto_suite::{DigestAlgorithmConstraint, EncryptionAlgorithmConstraint, KeySizeConstraint},
    CryptographicSuite, DigestAlgorithm, EncryptionAlgorithm,
};
use adesval_status_tracker::Level;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub mod constraints;
pub use constraints::Constraint;

/// QCP+ (`0.4.0.1456.1.1`), qualified policy with SSCD before eIDAS.
pub const QCP_PLUS: &str = "0.4.0.1456.1.1";

/// QCP (`0.4.0.1456.1.2`), qualified policy before eIDAS.
pub const QCP: &str = "0.4.0.1456.1.2";

// trait used to validate user input to make sure user supplied policies are valid
pub(crate) trait PolicyValidate {
    // returns error if the policy is invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Order in which revocation sources are tried.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationSource {
    #[default]
    CrlFirst,
    OcspFirst,
}

/// Settings for revocation data acceptance.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RevocationSettings {
    /// Maximum age in seconds of revocation data relative to the
    /// validation time. Unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_freshness_seconds: Option<i64>,

    /// Reject revocation data whose `nextUpdate` precedes the validation
    /// time.
    #[serde(default = "default_true")]
    pub check_next_update: bool,

    #[serde(default)]
    pub preferred_source: RevocationSource,
}

/// Largest accepted `max_freshness_seconds`, one hundred years.
pub const MAX_FRESHNESS_SECONDS: i64 = 100 * 366 * 24 * 3600;

impl RevocationSettings {
    /// Maximum age of revocation data, `None` when unlimited or not
    /// representable.
    pub fn max_freshness(&self) -> Option<TimeDelta> {
        self.max_freshness_seconds.and_then(TimeDelta::try_seconds)
    }
}

impl Default for RevocationSettings {
    fn default() -> Self {
        Self {
            max_freshness_seconds: None,
            check_next_update: true,
            preferred_source: RevocationSource::default(),
        }
    }
}

impl PolicyValidate for RevocationSettings {
    fn validate(&self) -> Result<()> {
        match self.max_freshness_seconds {
            Some(seconds) if seconds < 0 => Err(Error::MalformedPolicy(format!(
                "max_freshness_seconds must not be negative, got {seconds}"
            ))),
            Some(seconds) if seconds > MAX_FRESHNESS_SECONDS => Err(Error::MalformedPolicy(format!(
                "max_freshness_seconds must not exceed {MAX_FRESHNESS_SECONDS}, got {seconds}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Settings for eIDAS qualification.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct QualificationSettings {
    /// Date from which certificates are judged under Regulation (EU)
    /// No 910/2014.
    #[serde(default = "default_regulation_date")]
    pub regulation_date: DateTime<Utc>,

    /// Policies that make a certificate qualified before the regulation date.
    #[serde(default = "default_legacy_policies")]
    pub legacy_qualified_policy_oids: Vec<String>,
}

impl Default for QualificationSettings {
    fn default() -> Self {
        Self {
            regulation_date: default_regulation_date(),
            legacy_qualified_policy_oids: default_legacy_policies(),
        }
    }
}

impl PolicyValidate for QualificationSettings {}

impl PolicyValidate for CryptographicSuite {
    fn validate(&self) -> Result<()> {
        for (i, d) in self.digest_algorithms.iter().enumerate() {
            if self.digest_algorithms[..i]
                .iter()
                .any(|other| other.algorithm == d.algorithm)
            {
                return Err(Error::MalformedPolicy(format!(
                    "digest algorithm {} is listed more than once",
                    d.algorithm
                )));
            }
        }

        for e in &self.encryption_algorithms {
            if e.key_sizes.is_empty() {
                return Err(Error::MalformedPolicy(format!(
                    "encryption algorithm {} has no key sizes",
                    e.algorithm
                )));
            }
        }

        Ok(())
    }
}

/// A validation policy.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ValidationPolicy {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Level overrides, keyed by constraint name.
    #[serde(default)]
    pub constraints: BTreeMap<String, Level>,

    #[serde(default = "default_cryptographic_suite")]
    pub cryptographic_suite: CryptographicSuite,

    /// Accepted signature formats. Any format is accepted when empty.
    #[serde(default)]
    pub accepted_formats: Vec<String>,

    /// Accepted signature policy identifiers. Any declared policy is
    /// accepted when empty.
    #[serde(default)]
    pub accepted_signature_policies: Vec<String>,

    /// Policy OIDs the signing certificate must carry one of. Not checked
    /// when empty.
    #[serde(default)]
    pub accepted_certificate_policy_oids: Vec<String>,

    #[serde(default)]
    pub accepted_commitment_types: Vec<String>,

    #[serde(default)]
    pub accepted_roles: Vec<String>,

    #[serde(default)]
    pub revocation: RevocationSettings,

    #[serde(default)]
    pub qualification: QualificationSettings,
}

impl ValidationPolicy {
    /// Level configured for `constraint`, or its default.
    pub fn level(&self, constraint: Constraint) -> Level {
        self.constraints
            .get(constraint.name)
            .copied()
            .unwrap_or(constraint.default_level)
    }

    /// Returns a copy of this policy with `constraint` set to `level`.
    #[must_use]
    pub fn with_level(mut self, constraint: Constraint, level: Level) -> Self {
        self.constraints.insert(constraint.name.to_owned(), level);
        self
    }

    /// Loads a policy from a JSON or TOML file, chosen by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("json")
            .to_owned();

        let policy = std::fs::read_to_string(path)?;
        Self::from_string(&policy, &ext)
    }

    /// Loads a policy from a string in `format` (`json` or `toml`).
    pub fn from_string(policy: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            other => return Err(Error::UnsupportedFormat(other.to_owned())),
        };

        let policy = Config::builder()
            .add_source(config::File::from_str(policy, f))
            .build()?
            .try_deserialize::<ValidationPolicy>()
            .map_err(|e| Error::MalformedPolicy(e.to_string()))?;

        policy.validate()?;
        Ok(policy)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_string(json, "json")
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::from_string(toml, "toml")
    }
}

impl PolicyValidate for ValidationPolicy {
    fn validate(&self) -> Result<()> {
        if let Some(unknown) = self
            .constraints
            .keys()
            .find(|name| constraints::find(name).is_none())
        {
            return Err(Error::UnknownConstraint(unknown.clone()));
        }

        self.cryptographic_suite.validate()?;
        self.revocation.validate()?;
        self.qualification.validate()
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: Some("Default policy for AdES validation".to_owned()),
            constraints: BTreeMap::new(),
            cryptographic_suite: default_cryptographic_suite(),
            accepted_formats: Vec::new(),
            accepted_signature_policies: Vec::new(),
            accepted_certificate_policy_oids: Vec::new(),
            accepted_commitment_types: Vec::new(),
            accepted_roles: Vec::new(),
            revocation: RevocationSettings::default(),
            qualification: QualificationSettings::default(),
        }
    }
}

fn default_name() -> String {
    "default".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_regulation_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 7, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn default_legacy_policies() -> Vec<String> {
    vec![QCP_PLUS.to_owned(), QCP.to_owned()]
}

fn date(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

fn key_sizes(sizes: &[(u32, Option<DateTime<Utc>>)]) -> Vec<KeySizeConstraint> {
    sizes
        .iter()
        .map(|(min_key_size, expiration)| KeySizeConstraint {
            min_key_size: *min_key_size,
            expiration: *expiration,
        })
        .collect()
}

fn default_cryptographic_suite() -> CryptographicSuite {
    let digest = |algorithm, expiration| DigestAlgorithmConstraint {
        algorithm,
        expiration,
    };
    let encryption = |algorithm, sizes: &[(u32, Option<DateTime<Utc>>)]| {
        EncryptionAlgorithmConstraint {
            algorithm,
            key_sizes: key_sizes(sizes),
        }
    };

    CryptographicSuite {
        digest_algorithms: vec![
            digest(DigestAlgorithm::Sha1, date(2012, 8, 1)),
            digest(DigestAlgorithm::Sha224, None),
            digest(DigestAlgorithm::Sha256, None),
            digest(DigestAlgorithm::Sha384, None),
            digest(DigestAlgorithm::Sha512, None),
        ],
        encryption_algorithms: vec![
            encryption(
                EncryptionAlgorithm::Rsa,
                &[(1024, date(2010, 1, 1)), (1536, date(2016, 1, 1)), (1900, None)],
            ),
            encryption(
                EncryptionAlgorithm::RsaSsaPss,
                &[(1024, date(2010, 1, 1)), (1536, date(2016, 1, 1)), (1900, None)],
            ),
            encryption(
                EncryptionAlgorithm::Ecdsa,
                &[(160, date(2013, 1, 1)), (192, date(2016, 1, 1)), (256, None)],
            ),
            encryption(EncryptionAlgorithm::EdDsa, &[(256, None)]),
            encryption(EncryptionAlgorithm::Dsa, &[(1024, date(2013, 1, 1)), (2048, None)]),
        ],
    }
}
