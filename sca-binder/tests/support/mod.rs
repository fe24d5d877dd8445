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


use async_trait::async_trait;
use sca_binder::assembly::{Composite, Definitions, EndpointDescriptor};
use sca_binder::builder::BindingBaseUris;
use sca_binder::error::DirectoryError;
use sca_binder::registry::EndpointDirectory;
use sca_binder::{DeploymentReport, ScaDomain};

pub(crate) fn make_domain(name: &str, definitions: Definitions) -> ScaDomain {
    ScaDomain::with_local_registry(name, integration_test_utils::binder(definitions))
}

pub(crate) async fn deploy_ok(domain: &ScaDomain, composite: Composite) -> DeploymentReport {
    domain
        .deploy(composite, BindingBaseUris::new())
        .await
        .expect("deployment should succeed")
}

/// Directory serving a fixed set of records.
#[allow(dead_code)]
pub(crate) struct FixedDirectory(pub(crate) Vec<EndpointDescriptor>);

#[async_trait]
impl EndpointDirectory for FixedDirectory {
    async fn fetch_endpoints(&self) -> Result<Vec<EndpointDescriptor>, DirectoryError> {
        Ok(self.0.clone())
    }
}

#[allow(dead_code)]
pub(crate) struct UnavailableDirectory;

#[async_trait]
impl EndpointDirectory for UnavailableDirectory {
    async fn fetch_endpoints(&self) -> Result<Vec<EndpointDescriptor>, DirectoryError> {
        Err(DirectoryError::Unavailable {
            directory: "unavailable".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}
