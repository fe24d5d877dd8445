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

//! In-process endpoint registry.

use crate::assembly::{Endpoint, EndpointReference};
use crate::error::RegistryError;
use crate::observability::events;
use crate::registry::matching::matches_target;
use crate::registry::DomainRegistry;
use arc_swap::ArcSwap;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "local_domain_registry";

#[derive(Default)]
struct RegistrySnapshot {
    version: u64,
    endpoints: IndexMap<String, Arc<Endpoint>>,
}

///
/// Endpoint registry for a single node.
///
/// Endpoints are kept in insertion order under their URI. Each update
/// publishes a new snapshot, so an enumeration never observes a half applied
/// change and readers never block writers.
///
#[derive(Default)]
pub struct LocalDomainRegistry {
    snapshot: ArcSwap<RegistrySnapshot>,
    contributions: ArcSwap<IndexSet<String>>,
}

impl LocalDomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version of the current snapshot; increases on every change.
    pub fn snapshot_version(&self) -> u64 {
        self.snapshot.load().version
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DomainRegistry for LocalDomainRegistry {
    fn find_endpoint(
        &self,
        endpoint_reference: &EndpointReference,
    ) -> Result<Vec<Arc<Endpoint>>, RegistryError> {
        let Some(target) = endpoint_reference.target_uri() else {
            return Ok(Vec::new());
        };
        let snapshot = self.snapshot.load();
        let found: Vec<_> = snapshot
            .endpoints
            .values()
            .filter(|endpoint| matches_target(target, endpoint))
            .cloned()
            .collect();
        if found.is_empty() {
            debug!(
                event = events::REGISTRY_LOOKUP_EMPTY,
                component = COMPONENT,
                target,
                snapshot_version = snapshot.version,
                "no endpoints match reference target"
            );
        }
        Ok(found)
    }

    fn endpoints(&self) -> Result<Vec<Arc<Endpoint>>, RegistryError> {
        Ok(self.snapshot.load().endpoints.values().cloned().collect())
    }

    fn add_endpoint(&self, endpoint: Arc<Endpoint>) -> Result<(), RegistryError> {
        let uri = endpoint.uri.clone();
        let previous = self.snapshot.rcu(|current| {
            let mut endpoints = current.endpoints.clone();
            endpoints.insert(uri.clone(), endpoint.clone());
            RegistrySnapshot {
                version: current.version + 1,
                endpoints,
            }
        });
        let event = if previous.endpoints.contains_key(&uri) {
            events::REGISTRY_ENDPOINT_REPLACED
        } else {
            events::REGISTRY_ENDPOINT_ADDED
        };
        debug!(
            event,
            component = COMPONENT,
            endpoint = uri.as_str(),
            snapshot_version = previous.version + 1,
            "endpoint published"
        );
        Ok(())
    }

    fn remove_endpoint(&self, uri: &str) -> Result<Option<Arc<Endpoint>>, RegistryError> {
        let previous = self.snapshot.rcu(|current| {
            let mut endpoints = current.endpoints.clone();
            endpoints.shift_remove(uri);
            RegistrySnapshot {
                version: current.version + 1,
                endpoints,
            }
        });
        let removed = previous.endpoints.get(uri).cloned();
        if removed.is_some() {
            debug!(
                event = events::REGISTRY_ENDPOINT_REMOVED,
                component = COMPONENT,
                endpoint = uri,
                "endpoint withdrawn"
            );
        }
        Ok(removed)
    }

    fn installed_contributions(&self) -> Vec<String> {
        self.contributions.load().iter().cloned().collect()
    }

    fn install_contribution(&self, uri: &str) -> Result<(), RegistryError> {
        let mut already_installed = false;
        self.contributions.rcu(|current| {
            already_installed = current.contains(uri);
            let mut contributions = IndexSet::clone(current);
            contributions.insert(uri.to_string());
            contributions
        });
        if already_installed {
            return Err(RegistryError::ContributionAlreadyInstalled(uri.to_string()));
        }
        Ok(())
    }

    fn uninstall_contribution(&self, uri: &str) -> bool {
        let previous = self.contributions.rcu(|current| {
            let mut contributions = IndexSet::clone(current);
            contributions.shift_remove(uri);
            contributions
        });
        previous.contains(uri)
    }
}
