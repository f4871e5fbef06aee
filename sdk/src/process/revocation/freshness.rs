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

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::{diagnostic::RevocationToken, policy::RevocationSettings};

/// Describes why revocation data is not fresh at a validation time.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FreshnessError {
    #[error("next update {next_update} precedes validation time {validation_time}")]
    NextUpdateExceeded {
        next_update: DateTime<Utc>,
        validation_time: DateTime<Utc>,
    },

    #[error("validation time {validation_time} is past the implied freshness window ending {window_end}")]
    ImpliedWindowExceeded {
        window_end: DateTime<Utc>,
        validation_time: DateTime<Utc>,
    },

    #[error("produced {production_time}, earlier than the accepted {earliest_accepted}")]
    TooOld {
        production_time: DateTime<Utc>,
        earliest_accepted: DateTime<Utc>,
    },

    #[error("freshness bound around {time} is out of range")]
    OutOfRange { time: DateTime<Utc> },
}

/// Decides whether revocation data is fresh enough at a validation time.
#[derive(Clone, Copy, Debug)]
pub struct RevocationFreshnessChecker {
    max_freshness: Option<TimeDelta>,
    check_next_update: bool,
}

impl RevocationFreshnessChecker {
    pub fn new(settings: &RevocationSettings) -> Self {
        Self {
            max_freshness: settings.max_freshness(),
            check_next_update: settings.check_next_update,
        }
    }

    /// Checks `revocation` at `validation_time`.
    ///
    /// With `nextUpdate` present the validation time must not pass it.
    /// Without it, the distance from `thisUpdate` to the production time
    /// is the implied update interval. A configured maximum age applies
    /// in both cases.
    pub fn check(
        &self,
        revocation: &RevocationToken,
        validation_time: DateTime<Utc>,
    ) -> Result<(), FreshnessError> {
        match revocation.next_update {
            Some(next_update) => {
                if self.check_next_update && validation_time > next_update {
                    return Err(FreshnessError::NextUpdateExceeded {
                        next_update,
                        validation_time,
                    });
                }
            }
            None => {
                let window = revocation.production_time - revocation.this_update;
                if window > TimeDelta::zero() {
                    let window_end = revocation
                        .production_time
                        .checked_add_signed(window)
                        .ok_or(FreshnessError::OutOfRange {
                            time: revocation.production_time,
                        })?;
                    if validation_time > window_end {
                        return Err(FreshnessError::ImpliedWindowExceeded {
                            window_end,
                            validation_time,
                        });
                    }
                }
            }
        }

        if let Some(max_freshness) = self.max_freshness {
            let earliest_accepted = validation_time
                .checked_sub_signed(max_freshness)
                .ok_or(FreshnessError::OutOfRange {
                    time: validation_time,
                })?;
            if revocation.production_time < earliest_accepted {
                return Err(FreshnessError::TooOld {
                    production_time: revocation.production_time,
                    earliest_accepted,
                });
            }
        }

        Ok(())
    }

    pub fn is_fresh(&self, revocation: &RevocationToken, validation_time: DateTime<Utc>) -> bool {
        self.check(revocation, validation_time).is_ok()
    }
}
