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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `Svctype` of a CA issuing qualified certificates.
pub const CA_QC: &str = "http://uri.etsi.org/TrstSvc/Svctype/CA/QC";

/// Service status URIs counting as granted, including the pre-eIDAS ones.
pub const GRANTED_STATUSES: &[&str] = &[
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/granted",
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/recognisedatnationallevel",
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/undersupervision",
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/supervisionincessation",
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/accredited",
];

/// A qualifier extension attached to a trust service.
///
/// When `policy_oids` is not empty the qualifier applies only to
/// certificates carrying one of these policies.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ServiceQualifier {
    pub uri: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_oids: Vec<String>,
}

/// One status period of a trust service listed on a trusted list.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TrustService {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// `ServiceTypeIdentifier` URI.
    pub service_type: String,

    /// `ServiceStatus` URI.
    pub status: String,

    pub start_date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    /// Certificates forming the service digital identity.
    pub certificate_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<ServiceQualifier>,

    /// `AdditionalServiceInformation` URIs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_service_info: Vec<String>,
}

impl TrustService {
    /// Returns `true` if this status period covers `time`.
    pub fn is_active_at(&self, time: DateTime<Utc>) -> bool {
        self.start_date <= time && self.end_date.map_or(true, |end| time < end)
    }

    pub fn is_granted(&self) -> bool {
        GRANTED_STATUSES.contains(&self.status.as_str())
    }

    pub fn is_ca_qc(&self) -> bool {
        self.service_type == CA_QC
    }
}
