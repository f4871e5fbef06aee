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

//! Message catalog for the validation checks.
//!
//! Every check evaluated by a building block is identified by a stable key
//! and a question-style text, in the manner of the ETSI EN 319 102-1
//! validation report.

use serde::Serialize;

/// Key and text of one validation check.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct MessageTag {
    /// Stable identifier of the check.
    pub key: &'static str,

    /// Human-readable description of the check.
    pub text: &'static str,
}

macro_rules! tags {
    ($($name:ident => $text:literal,)*) => {
        $(
            #[doc = $text]
            pub const $name: MessageTag = MessageTag {
                key: stringify!($name),
                text: $text,
            };
        )*
    };
}

// -- building block aggregation --

tags! {
    BBB_FC => "Is the result of the 'Format Checking' building block conclusive?",
    BBB_ISC => "Is the result of the 'Identification of Signing Certificate' building block conclusive?",
    BBB_VCI => "Is the result of the 'Validation Context Initialization' building block conclusive?",
    BBB_CV => "Is the result of the 'Cryptographic Verification' building block conclusive?",
    BBB_XCV => "Is the result of the 'X.509 Certificate Validation' building block conclusive?",
    BBB_SAV => "Is the result of the 'Signature Acceptance Validation' building block conclusive?",
}

// -- format checking --

tags! {
    BBB_FC_IEFF => "Is the expected format found?",
    BBB_FC_ISSV => "Is the signature structurally valid?",
}

// -- identification of the signing certificate --

tags! {
    BBB_ICS_ISCI => "Is there an identified candidate for the signing certificate?",
    BBB_ICS_IDVM => "Does the signing certificate digest match the signed reference?",
}

// -- validation context initialization --

tags! {
    BBB_VCI_ISPK => "Is the signature policy known?",
    BBB_VCI_ISPA => "Is the signature policy available?",
    BBB_VCI_ISPM => "Does the signature policy digest match?",
}

// -- X.509 certificate validation --

tags! {
    BBB_XCV_CCCBB => "Can the certificate chain be built till a trust anchor?",
    BBB_XCV_SUB => "Is the certificate validation conclusive?",
    BBB_XCV_ICVS => "Has the certificate validity started at the validation time?",
    BBB_XCV_ICNE => "Is the certificate not expired at the validation time?",
    BBB_XCV_IRDPFC => "Is the revocation data present for the certificate?",
    BBB_XCV_IRDAC => "Is acceptable and fresh revocation data available for the certificate?",
    BBB_XCV_ICSK => "Is the certificate revocation status known?",
    BBB_XCV_ISCOH => "Is the certificate not on hold?",
    BBB_XCV_ISCR => "Is the certificate not revoked?",
    BBB_XCV_ICSI => "Is the certificate signature intact?",
    BBB_XCV_ISCGKU => "Has the certificate the expected key usage?",
    BBB_XCV_ICCM => "Are the cryptographic constraints met for the certificate signature?",
    BBB_XCV_ICPOID => "Does the certificate contain an accepted certificate policy?",
}

// -- cryptographic verification --

tags! {
    BBB_CV_IRDOF => "Is the reference data object found?",
    BBB_CV_IRDOI => "Is the reference data object intact?",
    BBB_CV_ISI => "Is the signature intact?",
}

// -- signature acceptance validation --

tags! {
    BBB_SAV_ISQPSTP => "Is the signed qualifying property: 'signing-time' present?",
    BBB_SAV_ISQPSCP => "Is the signed qualifying property: 'signing-certificate' present?",
    BBB_SAV_ICRM => "Is the claimed role accepted?",
    BBB_SAV_ICTIM => "Is the commitment type indication accepted?",
    BBB_SAV_ISQPSPP => "Is the signed qualifying property: 'signature-policy-identifier' present?",
    BBB_SAV_ASCCM => "Are the signature cryptographic constraints met?",
    BBB_SAV_ARDCCM => "Are the reference digest cryptographic constraints met?",
}

// -- past certificate and signature validation --

tags! {
    PCV_ICTVC => "Is there a control time at which the certificate chain is valid?",
    PCV_CTS => "Is the control-time sliding conclusive?",
    CTS_DRIE => "Does the revocation information exist for the certificate?",
    CTS_IIDOCWVPOC => "Is the issuance date of the revocation information within the certificate validity range?",
    CTS_IIDORIBCT => "Is the issuance date of the revocation information before the control time?",
    CTS_ITAPOE => "Is there a proof of existence of the certificate at the control time?",
    PSV_IPCVC => "Is the result of the past certificate validation conclusive?",
    PSV_IPSVC => "Is there a proof of existence of the token at or before the control time?",
    PSV_ICAR => "Are the cryptographic algorithms reliable at the proof of existence time?",
}

// -- evidence records --

tags! {
    ERV_IFATSCS => "Does the first archive time-stamp cover the signature?",
    ERV_IATSCP => "Does the archive time-stamp cover the preceding time-stamp?",
    ERV_IATSO => "Is the archive time-stamp not earlier than the preceding one?",
    ERV_IATSV => "Is the archive time-stamp valid?",
}

// -- qualification --

tags! {
    QUAL_ITSU => "Is a single trust service applicable at the evaluation time?",
    QUAL_IQC => "Is the certificate qualified?",
    QUAL_ITK => "Is the certificate type unambiguous?",
    QUAL_IQSCD => "Is the private key on a qualified signature creation device?",
    QUAL_ICIS => "Is the qualification at issuance time consistent with the qualification at signing time?",
}

// -- signature-level results --

tags! {
    ADEST_IBVC => "Is the result of the basic validation conclusive?",
    ADEST_IPVC => "Is the result of the past signature validation conclusive?",
    ADEST_IERVC => "Is the result of the evidence record validation conclusive?",
}
