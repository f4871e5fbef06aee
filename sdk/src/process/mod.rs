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

//! The validation processes: building blocks, time-stamp and evidence
//! record validation, past validation, qualification and the orchestrator
//! sequencing them per signature.

use adesval_status_tracker::ErrorBehavior;
use chrono::{DateTime, Utc};

use crate::{
    diagnostic::{CertificatePool, DiagnosticData},
    policy::ValidationPolicy,
};

pub mod bbb;

mod chain;
pub use chain::{Chain, ChainResult, Rule};

pub mod erv;
pub use erv::{DigestLinkageVerifier, EvidenceRecordValidation, TimestampChainVerifier};

mod executor;
pub use executor::{
    DocumentValidator, SignatureValidation, ValidationServices, ValidationState, ValidatorSettings,
};

pub mod past;

mod poe;
pub use poe::{Poe, PoeScope, PoeSource, PoeStore};

pub mod qualification;

pub mod revocation;

pub mod timestamps;
pub use timestamps::TimestampValidation;

/// Read-only inputs shared by every process of one validation run.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub snapshot: &'a DiagnosticData,
    pub pool: &'a CertificatePool<'a>,
    pub policy: &'a ValidationPolicy,
    pub services: &'a ValidationServices,
    pub error_behavior: ErrorBehavior,

    /// Validation time of the run.
    pub now: DateTime<Utc>,
}
