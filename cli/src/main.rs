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


#![doc = include_str!("../README.md")]

use std::{fs, path::PathBuf};

use adesval::{
    DiagnosticData, DocumentValidator, ErrorBehavior, PoeScope, ValidationPolicy,
    ValidationServices, ValidatorSettings,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;

/// Validates the AdES signatures described by a diagnostic snapshot.
#[derive(Debug, Parser)]
#[command(author, version, about, rename_all = "snake_case")]
struct CliArgs {
    /// Path to the diagnostic snapshot JSON.
    path: PathBuf,

    /// Path to a validation policy in JSON or TOML, defaults to the built-in policy.
    #[clap(short, long, env = "ADESVAL_POLICY")]
    policy: Option<PathBuf>,

    /// Print the detailed report instead of the simple one.
    #[clap(short, long)]
    detailed: bool,

    /// Validate at this time instead of the snapshot's validation time.
    #[clap(long)]
    validation_time: Option<DateTime<Utc>>,

    /// Keep running the checks of a building block after the first failure.
    #[clap(long)]
    continue_on_failure: bool,

    /// Share proofs of existence between the signatures of the snapshot.
    #[clap(long)]
    pooled_poe: bool,

    /// Write the report to this file instead of stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of output if it already exists.
    #[clap(short, long)]
    force: bool,
}

impl CliArgs {
    fn settings(&self) -> ValidatorSettings {
        ValidatorSettings {
            error_behavior: if self.continue_on_failure {
                ErrorBehavior::ContinueWhenPossible
            } else {
                ErrorBehavior::StopOnFirstError
            },
            poe_scope: if self.pooled_poe {
                PoeScope::Pooled
            } else {
                PoeScope::PerSignature
            },
            validation_time: self.validation_time,
        }
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // set RUST_LOG=debug to get detailed debug logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "error");
    }
    env_logger::init();

    if let Some(output) = &args.output {
        if output.exists() && !args.force {
            bail!("Output already exists; use -f/force to force write");
        }
    }

    let snapshot = DiagnosticData::from_file(&args.path)
        .with_context(|| format!("reading snapshot {}", args.path.display()))?;
    let policy = match &args.policy {
        Some(path) => ValidationPolicy::from_file(path)
            .with_context(|| format!("reading policy {}", path.display()))?,
        None => ValidationPolicy::default(),
    };
    info!("validating {} with policy {}", args.path.display(), policy.name);

    let services = ValidationServices::default();
    let reports = DocumentValidator::new(&snapshot, &policy, &services)
        .with_settings(args.settings())
        .validate()?;

    let report = if args.detailed {
        reports.detailed.to_json()?
    } else {
        reports.simple.to_json()?
    };

    match &args.output {
        Some(output) => {
            fs::write(output, report)?;
            info!("report written to {}", output.display());
        }
        None => println!("{report}"),
    }

    Ok(())
}
