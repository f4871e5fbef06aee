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

use thiserror::Error;

use crate::process::ValidationState;

/// `Error` enumerates the fatal errors of a validation run.
///
/// Check failures are never reported through this type. They become
/// [`Conclusion`](adesval_status_tracker::Conclusion)s in the reports. An
/// `Error` means no report could be produced at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The validation policy could not be interpreted.
    #[error("malformed validation policy: {0}")]
    MalformedPolicy(String),

    /// The validation policy configures a constraint the engine does not know.
    #[error("unknown constraint in validation policy: {0}")]
    UnknownConstraint(String),

    /// The policy or snapshot format is not supported.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Issuer links of the snapshot certificates loop.
    #[error("certificate chain contains a cycle at {certificate_id}")]
    CyclicCertificateChain { certificate_id: String },

    /// A token refers to a token missing from the snapshot.
    #[error("token {id} referenced by {referenced_by} is not in the snapshot")]
    UnknownToken { id: String, referenced_by: String },

    /// Two tokens of the snapshot share an identifier.
    #[error("token id {0} is used more than once")]
    DuplicateToken(String),

    /// The engine attempted to leave the validation states in order.
    #[error("invalid validation state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: ValidationState,
        to: ValidationState,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    CertificateParse(#[from] adesval_crypto::CertificateParseError),
}

/// A specialized `Result` type for validation runs.
pub type Result<T> = std::result::Result<T, Error>;
