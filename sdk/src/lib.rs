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


#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

//! This library validates advanced electronic signatures (AdES) following
//! the validation processes of ETSI EN 319 102-1, and determines their
//! qualification under eIDAS.
//!
//! Input is a [`DiagnosticData`] snapshot describing the signatures,
//! certificates, revocation data, time-stamps, evidence records and trust
//! services already extracted from a signed document. Validation is driven
//! by a [`ValidationPolicy`] and produces a detailed and a simple report.
//!
//! # Example: Validating a snapshot
//!
//! ```no_run
//! # use adesval::Result;
//! use adesval::{
//!     diagnostic::DiagnosticData, policy::ValidationPolicy, DocumentValidator,
//!     ValidationServices,
//! };
//!
//! # fn main() -> Result<()> {
//! let snapshot = DiagnosticData::from_file("tests/fixtures/diagnostic.json")?;
//! let policy = ValidationPolicy::default();
//! let services = ValidationServices::default();
//!
//! let reports = DocumentValidator::new(&snapshot, &policy, &services).validate()?;
//! for signature in &reports.simple.signatures {
//!     println!("{}: {:?}", signature.id, signature.indication);
//! }
//! # Ok(())
//! # }
//! ```

pub use adesval_status_tracker as status_tracker;
pub use adesval_status_tracker::{Conclusion, ErrorBehavior, Indication, Level, SubIndication};

pub mod diagnostic;
pub use diagnostic::DiagnosticData;

mod error;
pub use error::{Error, Result};

pub mod policy;
pub use policy::ValidationPolicy;

pub mod process;
pub use process::{
    DocumentValidator, PoeScope, SignatureValidation, ValidationServices, ValidationState,
    ValidatorSettings,
};

pub mod report;
pub use report::{DetailedReport, Reports, SimpleReport};

#[cfg(test)]
pub(crate) mod tests;
