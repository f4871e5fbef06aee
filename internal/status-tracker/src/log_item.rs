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

use std::{borrow::Cow, fmt::Debug};

use serde::Serialize;

use crate::{Level, StatusTracker, SubIndication};

/// Creates a [`LogItem`] struct that is annotated with the source file and line
/// number where the log condition was discovered.
///
/// Takes three parameters:
///
/// * `label`: identifier of the token or block this `LogItem` references
/// * `tag`: the [`MessageTag`](crate::MessageTag) describing the check
/// * `function`: name of the function generating this `LogItem`
///
/// ## Example
///
/// ```
/// # use std::borrow::Cow;
/// # use adesval_status_tracker::{log_item, message_tags::BBB_CV_ISI, LogItem, LogKind};
/// let log = log_item!("S-1", BBB_CV_ISI, "test func");
///
/// assert_eq!(
///     log,
///     LogItem {
///         kind: LogKind::Informational,
///         label: Cow::Borrowed("S-1"),
///         key: Cow::Borrowed("BBB_CV_ISI"),
///         description: Cow::Borrowed("Is the signature intact?"),
///         file: Cow::Borrowed(file!()),
///         function: Cow::Borrowed("test func"),
///         line: log.line,
///         ..Default::default()
///     }
/// );
/// #
/// # assert!(log.line > 2);
/// ```
#[macro_export]
macro_rules! log_item {
    ($label:expr, $tag:expr, $function:expr) => {{
        let tag: $crate::MessageTag = $tag;
        $crate::LogItem {
            kind: $crate::LogKind::Informational,
            label: $label.into(),
            key: tag.key.into(),
            description: tag.text.into(),
            file: file!().into(),
            function: $function.into(),
            line: line!(),
            ..Default::default()
        }
    }};
}

/// Detailed information about the outcome of one validation check.
///
/// Use the [`log_item`](crate::log_item) macro to create a `LogItem`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LogItem {
    /// Kind of log item.
    #[serde(rename = "status")]
    pub kind: LogKind,

    /// Severity configured for the check.
    pub level: Level,

    /// Identifier of the token or block the check applies to.
    pub label: Cow<'static, str>,

    /// Stable message key of the check.
    pub key: Cow<'static, str>,

    /// Human-readable description of the check.
    pub description: Cow<'static, str>,

    /// Source file where the check was evaluated.
    #[serde(skip)]
    pub file: Cow<'static, str>,

    /// Function where the check was evaluated.
    #[serde(skip)]
    pub function: Cow<'static, str>,

    /// Source line number where the check was evaluated.
    #[serde(skip)]
    pub line: u32,

    /// Failure reason as string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_val: Option<Cow<'static, str>>,

    /// Sub-indication the check maps to when it fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,

    /// Extra context, such as the identifier of a rejected token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<Cow<'static, str>>,
}

impl Default for LogItem {
    fn default() -> Self {
        LogItem {
            kind: LogKind::Success,
            level: Level::Fail,
            label: Cow::Borrowed(""),
            key: Cow::Borrowed(""),
            description: Cow::Borrowed(""),
            file: Cow::Borrowed(""),
            function: Cow::Borrowed(""),
            line: 0,
            err_val: None,
            sub_indication: None,
            additional_info: None,
        }
    }
}

impl LogItem {
    /// Sets the severity level of the check.
    #[must_use]
    pub fn level(self, level: Level) -> Self {
        LogItem { level, ..self }
    }

    /// Records the sub-indication the check maps to on failure.
    #[must_use]
    pub fn sub_indication(self, sub_indication: Option<SubIndication>) -> Self {
        LogItem {
            sub_indication,
            ..self
        }
    }

    /// Attaches extra context to the item.
    ///
    /// ## Example
    ///
    /// ```
    /// # use std::borrow::Cow;
    /// # use adesval_status_tracker::{log_item, message_tags::BBB_XCV_IRDAC};
    /// let log = log_item!("C-1", BBB_XCV_IRDAC, "test func").additional_info("R-7 is not fresh");
    ///
    /// assert_eq!(log.additional_info, Some(Cow::Borrowed("R-7 is not fresh")));
    /// ```
    #[must_use]
    pub fn additional_info<S: Into<Cow<'static, str>>>(self, info: S) -> Self {
        LogItem {
            additional_info: Some(info.into()),
            ..self
        }
    }

    /// Set the log item kind to [`LogKind::Success`] and add it to the
    /// [`StatusTracker`].
    pub fn success(mut self, tracker: &mut StatusTracker) {
        self.kind = LogKind::Success;
        tracker.add_non_error(self);
    }

    /// Set the log item kind to [`LogKind::Informational`] and add it to the
    /// [`StatusTracker`].
    pub fn informational(mut self, tracker: &mut StatusTracker) {
        self.kind = LogKind::Informational;
        tracker.add_non_error(self);
    }

    /// Set the log item kind to [`LogKind::Failure`] and add it to the
    /// [`StatusTracker`].
    ///
    /// Only failures at [`Level::Fail`] are treated as errors. If the tracker
    /// is configured to stop on the first error, this function will return
    /// `Err(err)`.
    pub fn failure<E: Debug>(mut self, tracker: &mut StatusTracker, err: E) -> Result<E, E> {
        self.kind = LogKind::Failure;
        self.err_val = Some(format!("{err:?}").into());

        if self.level == Level::Fail {
            tracker.add_error(self, err)
        } else {
            tracker.add_non_error(self);
            Ok(err)
        }
    }

    /// Set the log item kind to [`LogKind::Failure`] and add it to the
    /// [`StatusTracker`].
    ///
    /// Does not return a [`Result`] and thus ignores the [`StatusTracker`]
    /// error-handling configuration.
    pub fn failure_no_throw<E: Debug>(mut self, tracker: &mut StatusTracker, err: E) {
        self.kind = LogKind::Failure;
        self.err_val = Some(format!("{err:?}").into());

        tracker.add_non_error(self);
    }

    /// Returns `true` if this item records a failed check at [`Level::Fail`].
    pub fn is_error(&self) -> bool {
        self.kind == LogKind::Failure && self.level == Level::Fail
    }
}

/// Descriptive nature of this [`LogItem`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    /// The check succeeded.
    #[serde(rename = "OK")]
    Success,

    /// The item records a noteworthy condition that is not a check outcome.
    Informational,

    /// The check failed.
    #[serde(rename = "KO")]
    Failure,
}
