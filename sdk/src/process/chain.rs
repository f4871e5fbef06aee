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

//! Ordered evaluation of validation rules.
//!
//! Every building block is a [`Chain`] of [`Rule`]s. A rule pairs a
//! message tag and a configured [`Level`] with a predicate and the verdict
//! it maps to on failure. Bubbling rules adopt the conclusion of a child
//! block verbatim.

use std::borrow::Cow;

use adesval_status_tracker::{
    log_item, Conclusion, ErrorBehavior, Indication, Level, LogItem, Message, MessageTag,
    StatusTracker, SubIndication,
};
use serde::Serialize;

type Check<'a> = Box<dyn FnOnce() -> std::result::Result<(), Option<String>> + 'a>;

/// One check of a building block.
pub struct Rule<'a> {
    tag: MessageTag,
    level: Level,
    indication: Indication,
    sub_indication: Option<SubIndication>,
    info: Option<String>,
    inherited: Vec<Message>,
    check: Check<'a>,
}

impl<'a> Rule<'a> {
    /// Creates a rule from a boolean predicate.
    ///
    /// The rule fails as `INDETERMINATE` until [`Rule::on_failure`] says
    /// otherwise.
    pub fn new<F>(tag: MessageTag, level: Level, check: F) -> Self
    where
        F: FnOnce() -> bool + 'a,
    {
        Self::with_reason(tag, level, move || if check() { Ok(()) } else { Err(None) })
    }

    /// Creates a rule whose predicate may explain its failure.
    pub fn with_reason<F>(tag: MessageTag, level: Level, check: F) -> Self
    where
        F: FnOnce() -> std::result::Result<(), Option<String>> + 'a,
    {
        Self {
            tag,
            level,
            indication: Indication::Indeterminate,
            sub_indication: None,
            info: None,
            inherited: Vec::new(),
            check: Box::new(check),
        }
    }

    /// Creates a rule that fails with the verdict of `child` unless it
    /// passed. The messages of `child` are carried into the parent.
    pub fn bubble(tag: MessageTag, child: &Conclusion) -> Self {
        let passed = child.is_passed();
        Self {
            tag,
            level: Level::Fail,
            indication: child.indication,
            sub_indication: child.sub_indication,
            info: None,
            inherited: child.messages.clone(),
            check: Box::new(move || if passed { Ok(()) } else { Err(None) }),
        }
    }

    /// Sets the verdict reported when the rule fails.
    #[must_use]
    pub fn on_failure(mut self, indication: Indication, sub_indication: SubIndication) -> Self {
        self.indication = indication;
        self.sub_indication = Some(sub_indication);
        self
    }

    /// Fails with the verdict of `conclusion`, unchanged.
    #[must_use]
    pub fn on_failure_as(mut self, conclusion: &Conclusion) -> Self {
        self.indication = conclusion.indication;
        self.sub_indication = conclusion.sub_indication;
        self
    }

    /// Overrides the severity of the rule, usually with a policy level.
    #[must_use]
    pub fn at_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Attaches context, such as the identifier of the token checked.
    #[must_use]
    pub fn with_info<S: Into<String>>(mut self, info: S) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Outcome of a chain: one log item per evaluated rule and the conclusion.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChainResult {
    pub constraints: Vec<LogItem>,
    pub conclusion: Conclusion,
}

impl ChainResult {
    /// A result holding only `conclusion`.
    pub fn from_conclusion(conclusion: Conclusion) -> Self {
        Self {
            constraints: Vec::new(),
            conclusion,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.conclusion.is_passed()
    }
}

/// An ordered list of rules evaluated for one token.
pub struct Chain<'a> {
    label: String,
    block: &'static str,
    error_behavior: ErrorBehavior,
    rules: Vec<Rule<'a>>,
}

impl<'a> Chain<'a> {
    /// Starts a chain for building block `block` on token `label`.
    pub fn new<S: Into<String>>(block: &'static str, label: S, error_behavior: ErrorBehavior) -> Self {
        Self {
            label: label.into(),
            block,
            error_behavior,
            rules: Vec::new(),
        }
    }

    pub fn rule(&mut self, rule: Rule<'a>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Evaluates the rules in order.
    ///
    /// `IGNORE` rules are skipped without a record. The first failing
    /// `FAIL` rule sets the conclusion. Under
    /// [`ErrorBehavior::StopOnFirstError`] evaluation ends there; otherwise
    /// later rules are still recorded. `WARN` and `INFORM` failures only
    /// add messages.
    pub fn execute(self) -> ChainResult {
        let mut tracker = StatusTracker::with_error_behavior(self.error_behavior);
        let mut messages = Vec::new();
        let mut failure = None;

        for rule in self.rules {
            if rule.level == Level::Ignore {
                continue;
            }

            let Rule {
                tag,
                level,
                indication,
                sub_indication,
                info,
                inherited,
                check,
            } = rule;

            messages.extend(inherited);

            let mut item: LogItem = log_item!(self.label.clone(), tag, self.block)
                .level(level)
                .sub_indication(sub_indication);
            if let Some(info) = info {
                item = item.additional_info(info);
            }

            match check() {
                Ok(()) => item.success(&mut tracker),
                Err(reason) => {
                    if let Some(reason) = reason {
                        let info = match item.additional_info.take() {
                            Some(info) => Cow::Owned(format!("{info}: {reason}")),
                            None => Cow::Owned(reason),
                        };
                        item = item.additional_info(info);
                    }

                    messages.push(Message::from_log_item(&item));

                    if level == Level::Fail && failure.is_none() {
                        failure = Some((indication, sub_indication));
                    }

                    if item.failure(&mut tracker, tag.key).is_err() {
                        break;
                    }
                }
            }
        }

        let mut conclusion = match failure {
            Some((indication, sub_indication)) => Conclusion::new(indication, sub_indication),
            None => Conclusion::passed(),
        };
        conclusion.messages = messages;

        ChainResult {
            constraints: tracker.into_logged_items(),
            conclusion,
        }
    }
}
