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
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Result taxonomy and status tracking for the adesval validation engine.
//!
//! This crate holds the vocabulary every building block speaks: the
//! [`Indication`]/[`SubIndication`] pair, the severity [`Level`] of a
//! constraint, the [`Conclusion`] attached to each block, and the
//! [`StatusTracker`] that records the outcome of each check.

mod conclusion;
pub use conclusion::{Conclusion, Message};

mod indication;
pub use indication::{Indication, Level, SubIndication};

mod log_item;
pub use log_item::{LogItem, LogKind};

pub mod message_tags;
pub use message_tags::MessageTag;

mod status_tracker;
pub use status_tracker::{ErrorBehavior, StatusTracker};

#[cfg(test)]
pub(crate) mod tests;
