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

//! Domain registry of published endpoints.

pub mod directory;
pub mod local;
pub mod matching;

use crate::assembly::{Endpoint, EndpointReference};
use crate::error::RegistryError;
use std::sync::Arc;

pub use directory::EndpointDirectory;
pub use local::LocalDomainRegistry;
pub use matching::matches_target;

///
/// Store of the endpoints published across a domain.
///
/// Calls may block on I/O in distributed implementations; the binder imposes
/// no timeout of its own.
///
pub trait DomainRegistry: Send + Sync {
    /// Endpoints matching the reference's target, in registry order.
    fn find_endpoint(
        &self,
        endpoint_reference: &EndpointReference,
    ) -> Result<Vec<Arc<Endpoint>>, RegistryError>;

    /// Every endpoint, from one consistent snapshot.
    fn endpoints(&self) -> Result<Vec<Arc<Endpoint>>, RegistryError>;

    /// Publishes `endpoint`, replacing any endpoint with the same URI.
    fn add_endpoint(&self, endpoint: Arc<Endpoint>) -> Result<(), RegistryError>;

    fn remove_endpoint(&self, uri: &str) -> Result<Option<Arc<Endpoint>>, RegistryError>;

    fn installed_contributions(&self) -> Vec<String>;

    fn install_contribution(&self, uri: &str) -> Result<(), RegistryError>;

    /// Returns `true` when the contribution was installed.
    fn uninstall_contribution(&self, uri: &str) -> bool;
}
