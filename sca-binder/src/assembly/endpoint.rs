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

use crate::assembly::arena::{ComponentId, ServiceId};
use crate::assembly::binding::Binding;
use crate::assembly::endpoint_reference::EndpointReference;
use crate::assembly::interface::InterfaceContract;
use crate::assembly::policy::{Intent, PolicySet};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Builds the structural URI `component#service-binding(service/binding)`.
pub fn structural_endpoint_uri(component_uri: &str, service: &str, binding: &str) -> String {
    format!("{component_uri}#service-binding({service}/{binding})")
}

///
/// One published binding of one service.
///
/// Endpoints are shared between the registry and the endpoint references that
/// target them, so they are handed around as `Arc<Endpoint>` and never mutated
/// once published. Endpoints published by another node carry no
/// [`ComponentId`] and are flagged `remote`.
///
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub uri: String,
    pub component: Option<ComponentId>,
    pub service: Option<ServiceId>,
    pub component_uri: String,
    pub service_name: String,
    pub interface_contract: Option<InterfaceContract>,
    pub binding: Option<Binding>,
    pub policy_sets: Vec<Arc<PolicySet>>,
    pub required_intents: Vec<Arc<Intent>>,
    pub remote: bool,
    pub unresolved: bool,
    /// Endpoint references the service uses to call back into its clients.
    pub callback_endpoint_references: Vec<EndpointReference>,
    /// Name of the forward service when this endpoint receives callbacks.
    pub forward_service: Option<String>,
}

impl Endpoint {
    /// Creates a resolved endpoint for a service binding.
    pub fn published(component_uri: &str, service_name: &str, binding: Binding) -> Self {
        let binding_name = binding.name.clone().unwrap_or_else(|| service_name.to_string());
        Self {
            uri: structural_endpoint_uri(component_uri, service_name, &binding_name),
            component: None,
            service: None,
            component_uri: component_uri.to_string(),
            service_name: service_name.to_string(),
            interface_contract: None,
            binding: Some(binding),
            policy_sets: Vec::new(),
            required_intents: Vec::new(),
            remote: false,
            unresolved: false,
            callback_endpoint_references: Vec::new(),
            forward_service: None,
        }
    }

    /// Creates a placeholder naming a target that has not been looked up yet.
    ///
    /// The service is the last path segment, so nested component URIs stay whole.
    pub fn unresolved_target(target: &str) -> Self {
        let (component_uri, service_name) = match target.rsplit_once('/') {
            Some((component, service)) => (component, service),
            None => (target, ""),
        };
        Self {
            uri: target.to_string(),
            component: None,
            service: None,
            component_uri: component_uri.to_string(),
            service_name: service_name.to_string(),
            interface_contract: None,
            binding: None,
            policy_sets: Vec::new(),
            required_intents: Vec::new(),
            remote: false,
            unresolved: true,
            callback_endpoint_references: Vec::new(),
            forward_service: None,
        }
    }

    pub fn owned_by(mut self, component: ComponentId, service: ServiceId) -> Self {
        self.component = Some(component);
        self.service = Some(service);
        self
    }

    pub fn with_interface_contract(mut self, contract: InterfaceContract) -> Self {
        self.interface_contract = Some(contract);
        self
    }

    pub fn with_policy_set(mut self, policy_set: Arc<PolicySet>) -> Self {
        self.policy_sets.push(policy_set);
        self
    }

    pub fn with_required_intent(mut self, intent: Arc<Intent>) -> Self {
        self.required_intents.push(intent);
        self
    }

    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    pub fn binding_uri(&self) -> Option<&str> {
        self.binding.as_ref().and_then(|binding| binding.uri.as_deref())
    }

    pub fn binding_name(&self) -> Option<&str> {
        self.binding.as_ref().and_then(|binding| binding.name.as_deref())
    }

    /// `true` when both endpoints were published under the same URI.
    pub fn same_as(&self, other: &Endpoint) -> bool {
        self.uri == other.uri
    }

    /// `true` when the endpoint's interface has not been resolved yet.
    pub fn has_empty_interface(&self) -> bool {
        self.interface_contract
            .as_ref()
            .is_some_and(|contract| contract.interface.operations.is_empty())
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Endpoint: URI = {}", self.uri)?;
        if self.unresolved {
            write!(f, " <unresolved>")?;
        }
        if self.remote {
            write!(f, " <remote>")?;
        }
        Ok(())
    }
}

///
/// Serializable description of an endpoint published by another node.
///
/// Intents and policy sets are carried by name and resolved against the
/// receiving domain's definitions.
///
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointDescriptor {
    pub component_uri: String,
    pub service: String,
    pub binding: Binding,
    #[serde(default)]
    pub interface_contract: Option<InterfaceContract>,
    #[serde(default)]
    pub required_intents: Vec<String>,
    #[serde(default)]
    pub policy_sets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{structural_endpoint_uri, Endpoint};
    use crate::assembly::binding::Binding;

    #[test]
    fn published_endpoints_default_binding_name_to_service() {
        let endpoint = Endpoint::published("Outer/Server", "Hello", Binding::sca());

        assert_eq!(
            endpoint.uri,
            "Outer/Server#service-binding(Hello/Hello)".to_string()
        );
        assert!(!endpoint.unresolved);
    }

    #[test]
    fn unresolved_target_splits_component_and_service() {
        let endpoint = Endpoint::unresolved_target("Server/Hello");

        assert!(endpoint.unresolved);
        assert_eq!(endpoint.component_uri, "Server");
        assert_eq!(endpoint.service_name, "Hello");
        assert_eq!(endpoint.uri, "Server/Hello");
    }

    #[test]
    fn unresolved_nested_target_keeps_the_component_path() {
        let endpoint = Endpoint::unresolved_target("Outer/Server/Hello");

        assert_eq!(endpoint.component_uri, "Outer/Server");
        assert_eq!(endpoint.service_name, "Hello");
        assert_eq!(endpoint.uri, "Outer/Server/Hello");
    }

    #[test]
    fn structural_uri_uses_binding_name() {
        assert_eq!(
            structural_endpoint_uri("A", "S", "ws"),
            "A#service-binding(S/ws)"
        );
    }
}
