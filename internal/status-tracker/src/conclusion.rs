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

use std::{
    borrow::Cow,
    fmt::{self, Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::{Indication, Level, LogItem, LogKind, SubIndication};

/// One entry in the ordered message list of a [`Conclusion`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Message {
    /// Severity at which the message was recorded.
    pub level: Level,

    /// Stable message key.
    pub key: Cow<'static, str>,

    /// Human-readable text.
    pub text: Cow<'static, str>,
}

impl Message {
    /// Creates a message from a failed [`LogItem`].
    pub fn from_log_item(item: &LogItem) -> Self {
        let text = match &item.additional_info {
            Some(info) => Cow::Owned(format!("{} ({info})", item.description)),
            None => item.description.clone(),
        };

        Self {
            level: item.level,
            key: item.key.clone(),
            text,
        }
    }
}

/// Verdict attached to every chain and building block result.
///
/// A sub-indication is only carried alongside an [`Indication`] other than
/// [`Indication::Passed`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Conclusion {
    /// Top-level verdict.
    pub indication: Indication,

    /// Reason for a non-passing verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,

    /// Errors, warnings and information messages in evaluation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl Conclusion {
    /// Returns a passing conclusion with no messages.
    pub fn passed() -> Self {
        Self {
            indication: Indication::Passed,
            sub_indication: None,
            messages: vec![],
        }
    }

    /// Returns a conclusion with the given verdict.
    ///
    /// The sub-indication is discarded when `indication` is
    /// [`Indication::Passed`].
    pub fn new(indication: Indication, sub_indication: Option<SubIndication>) -> Self {
        let sub_indication = match indication {
            Indication::Passed => None,
            _ => sub_indication,
        };

        Self {
            indication,
            sub_indication,
            messages: vec![],
        }
    }

    /// Builds a conclusion from the log items of one chain evaluation.
    ///
    /// The verdict comes from the first error in `items`; every failed item
    /// contributes a message in order.
    pub fn from_log_items(items: &[LogItem], failure: Option<(Indication, Option<SubIndication>)>) -> Self {
        let mut conclusion = match failure {
            Some((indication, sub_indication)) => Self::new(indication, sub_indication),
            None => Self::passed(),
        };

        conclusion.messages = items
            .iter()
            .filter(|item| item.kind == LogKind::Failure)
            .map(Message::from_log_item)
            .collect();

        conclusion
    }

    /// Adds a message, keeping the verdict unchanged.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Returns `true` if the indication is [`Indication::Passed`].
    pub fn is_passed(&self) -> bool {
        self.indication == Indication::Passed
    }

    /// Returns `true` if the indication is [`Indication::Failed`].
    pub fn is_failed(&self) -> bool {
        self.indication == Indication::Failed
    }

    /// Returns `true` if the indication is [`Indication::Indeterminate`].
    pub fn is_indeterminate(&self) -> bool {
        self.indication == Indication::Indeterminate
    }

    /// Returns `true` if this conclusion may be overturned by proof of
    /// existence at an earlier time.
    pub fn is_time_sensitive(&self) -> bool {
        self.sub_indication
            .is_some_and(|sub_indication| sub_indication.is_time_sensitive())
    }

    /// Returns `true` if both conclusions carry the same indication and
    /// sub-indication, regardless of their messages.
    pub fn same_verdict(&self, other: &Conclusion) -> bool {
        self.indication == other.indication && self.sub_indication == other.sub_indication
    }

    /// Returns the messages recorded at `level`.
    pub fn messages_at(&self, level: Level) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.level == level)
    }
}

impl Default for Conclusion {
    fn default() -> Self {
        Self::passed()
    }
}

impl Display for Conclusion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.sub_indication {
            Some(sub_indication) => write!(f, "{}/{}", self.indication, sub_indication),
            None => write!(f, "{}", self.indication),
        }
    }
}
