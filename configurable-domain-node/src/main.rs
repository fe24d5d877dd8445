/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/


mod config;

use crate::config::{Config, ConfigError};
use clap::Parser;
use endpoint_directory_static_file::EndpointDirectoryStaticFile;
use sca_binder::builder::BuilderRegistry;
use sca_binder::{DeploymentError, EndpointReferenceBinder, ScaDomain};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Parser)]
#[command(about = "Deploys an SCA composite and reports how its references bind")]
struct NodeArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Also resolve every reference at run time after deployment.
    #[arg(long)]
    runtime: bool,
}

#[derive(Debug, Error)]
enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    #[error("composite {composite} deployed with errors")]
    DeployedWithErrors { composite: String },

    #[error("{0} reference(s) could not be resolved at run time")]
    Unresolved(usize),
}

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started configurable-domain-node");

    let args = NodeArgs::parse();
    let config = Config::load(&args.config)?;

    let binder = EndpointReferenceBinder::new(
        Arc::new(BuilderRegistry::new()),
        Arc::new(config.definitions),
    );
    let domain = ScaDomain::with_local_registry(&config.domain.name, binder);

    if let Some(directory) = config.endpoint_directory {
        let directory = EndpointDirectoryStaticFile::new(directory.file_path);
        let refreshed = domain.refresh_endpoints(&directory).await?;
        for problem in &refreshed.problems {
            info!("{problem}");
        }
        info!(
            "Published {} endpoint(s) from the directory, skipped {}",
            refreshed.endpoints.len(),
            refreshed.skipped
        );
    }

    let report = domain
        .deploy(config.composite, config.binding_base_uris)
        .await?;
    for problem in report.all_problems() {
        info!("{problem}");
    }
    for reference in &report.references {
        info!(
            "{}/{}: {} endpoint reference(s), resolved: {}",
            reference.component,
            reference.reference,
            reference.endpoint_references.len(),
            reference.is_resolved()
        );
    }
    if report.has_errors() {
        return Err(NodeError::DeployedWithErrors {
            composite: report.composite,
        });
    }

    if args.runtime {
        let mut unresolved = 0;
        for reference in &report.references {
            match domain
                .resolve_reference(&reference.component, &reference.reference)
                .await
            {
                Ok(bound) => {
                    for endpoint_reference in bound {
                        info!("{endpoint_reference}");
                    }
                }
                Err(err) => {
                    unresolved += 1;
                    warn!("{err}");
                    if let DeploymentError::Bind { source, .. } = &err {
                        if let Some(audit) = source.audit() {
                            warn!("Match audit:\n{audit}");
                        }
                    }
                }
            }
        }
        if unresolved > 0 {
            return Err(NodeError::Unresolved(unresolved));
        }
    }

    info!("Domain {} deployed", domain.name());
    Ok(())
}
