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

//! Arena of deployed components, services and references.
//!
//! Declarations are addressed through stable handles minted by [`Assembly`];
//! endpoints and endpoint references refer back to their owners through these
//! handles instead of holding pointers into the tree.

use crate::assembly::binding::Binding;
use crate::assembly::endpoint::Endpoint;
use crate::assembly::endpoint_reference::EndpointReference;
use crate::assembly::interface::InterfaceContract;
use crate::assembly::multiplicity::Multiplicity;
use crate::assembly::policy::{Intent, PolicySet};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

macro_rules! arena_id {
    ($name:ident, $label:literal) => {
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(u32);

        impl $name {
            fn index(self) -> usize {
                self.0 as usize
            }

            fn from_len(len: usize) -> Self {
                Self(len as u32)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

arena_id!(ComponentId, "component");
arena_id!(ServiceId, "service");
arena_id!(ReferenceId, "reference");

#[derive(Clone, Debug)]
pub struct ComponentDecl {
    pub name: String,
    pub uri: String,
    /// Set once the component is undeployed; its handles stay valid.
    pub retired: bool,
}

#[derive(Clone, Debug)]
pub struct ServiceDecl {
    pub component: ComponentId,
    pub name: String,
    pub interface_contract: Option<InterfaceContract>,
    pub bindings: Vec<Binding>,
    pub endpoints: Vec<Arc<Endpoint>>,
    /// Set on the service a reference uses to receive callbacks.
    pub is_callback: bool,
}

impl ServiceDecl {
    pub fn new(component: ComponentId, name: &str) -> Self {
        Self {
            component,
            name: name.to_string(),
            interface_contract: None,
            bindings: Vec::new(),
            endpoints: Vec::new(),
            is_callback: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReferenceDecl {
    pub component: ComponentId,
    pub name: String,
    pub multiplicity: Multiplicity,
    pub interface_contract: Option<InterfaceContract>,
    pub bindings: Vec<Binding>,
    pub callback_service: Option<ServiceId>,
    pub autowire: bool,
    /// Declared wiring targets, as written.
    pub targets: Vec<String>,
    pub required_intents: Vec<Arc<Intent>>,
    pub policy_sets: Vec<Arc<PolicySet>>,
    pub async_invocation: bool,
    /// Endpoint references wired for this reference.
    pub endpoint_references: Vec<EndpointReference>,
}

impl ReferenceDecl {
    pub fn new(component: ComponentId, name: &str) -> Self {
        Self {
            component,
            name: name.to_string(),
            multiplicity: Multiplicity::default(),
            interface_contract: None,
            bindings: Vec::new(),
            callback_service: None,
            autowire: false,
            targets: Vec::new(),
            required_intents: Vec::new(),
            policy_sets: Vec::new(),
            async_invocation: false,
            endpoint_references: Vec::new(),
        }
    }

    pub fn has_callback(&self) -> bool {
        self.interface_contract
            .as_ref()
            .is_some_and(|contract| contract.callback_interface.is_some())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Assembly {
    components: Vec<ComponentDecl>,
    services: Vec<ServiceDecl>,
    references: Vec<ReferenceDecl>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, name: &str, uri: &str) -> ComponentId {
        let id = ComponentId::from_len(self.components.len());
        self.components.push(ComponentDecl {
            name: name.to_string(),
            uri: uri.to_string(),
            retired: false,
        });
        id
    }

    pub fn add_service(&mut self, service: ServiceDecl) -> ServiceId {
        let id = ServiceId::from_len(self.services.len());
        self.services.push(service);
        id
    }

    pub fn add_reference(&mut self, reference: ReferenceDecl) -> ReferenceId {
        let id = ReferenceId::from_len(self.references.len());
        self.references.push(reference);
        id
    }

    pub fn component(&self, id: ComponentId) -> &ComponentDecl {
        &self.components[id.index()]
    }

    pub fn service(&self, id: ServiceId) -> &ServiceDecl {
        &self.services[id.index()]
    }

    pub fn service_mut(&mut self, id: ServiceId) -> &mut ServiceDecl {
        &mut self.services[id.index()]
    }

    pub fn reference(&self, id: ReferenceId) -> &ReferenceDecl {
        &self.references[id.index()]
    }

    pub fn reference_mut(&mut self, id: ReferenceId) -> &mut ReferenceDecl {
        &mut self.references[id.index()]
    }

    /// Like [`Assembly::reference`], for handles that may come from another node.
    pub fn get_reference(&self, id: ReferenceId) -> Option<&ReferenceDecl> {
        self.references.get(id.index())
    }

    pub fn get_service(&self, id: ServiceId) -> Option<&ServiceDecl> {
        self.services.get(id.index())
    }

    /// Finds a deployed component; retired components are skipped.
    pub fn find_component(&self, uri: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|component| component.uri == uri && !component.retired)
            .map(ComponentId::from_len)
    }

    pub fn retire_component(&mut self, id: ComponentId) {
        self.components[id.index()].retired = true;
    }

    pub fn find_reference(&self, component: ComponentId, name: &str) -> Option<ReferenceId> {
        self.references
            .iter()
            .position(|reference| reference.component == component && reference.name == name)
            .map(ReferenceId::from_len)
    }

    pub fn find_service(&self, component: ComponentId, name: &str) -> Option<ServiceId> {
        self.services
            .iter()
            .position(|service| {
                service.component == component && service.name == name && !service.is_callback
            })
            .map(ServiceId::from_len)
    }

    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        (0..self.components.len()).map(ComponentId::from_len)
    }

    pub fn service_ids(&self) -> impl Iterator<Item = ServiceId> + '_ {
        (0..self.services.len()).map(ServiceId::from_len)
    }

    pub fn reference_ids(&self) -> impl Iterator<Item = ReferenceId> + '_ {
        (0..self.references.len()).map(ReferenceId::from_len)
    }
}

#[cfg(test)]
mod tests {
    use super::{Assembly, ReferenceDecl, ServiceDecl};

    #[test]
    fn handles_address_their_declarations() {
        let mut assembly = Assembly::new();
        let client = assembly.add_component("Client", "Client");
        let server = assembly.add_component("Server", "Outer/Server");
        let service = assembly.add_service(ServiceDecl::new(server, "Hello"));
        let reference = assembly.add_reference(ReferenceDecl::new(client, "hello"));

        assert_eq!(assembly.component(server).uri, "Outer/Server");
        assert_eq!(assembly.service(service).name, "Hello");
        assert_eq!(assembly.reference(reference).component, client);
        assert_eq!(assembly.find_component("Outer/Server"), Some(server));
        assert_eq!(assembly.find_reference(client, "hello"), Some(reference));
        assert_eq!(assembly.find_service(server, "Hello"), Some(service));
        assert_eq!(assembly.find_service(client, "Hello"), None);
    }

    #[test]
    fn callback_services_are_not_found_as_forward_services() {
        let mut assembly = Assembly::new();
        let client = assembly.add_component("Client", "Client");
        let mut callback = ServiceDecl::new(client, "hello");
        callback.is_callback = true;
        assembly.add_service(callback);

        assert_eq!(assembly.find_service(client, "hello"), None);
    }

    #[test]
    fn retired_components_free_their_uri() {
        let mut assembly = Assembly::new();
        let first = assembly.add_component("Server", "Server");
        assembly.retire_component(first);

        assert_eq!(assembly.find_component("Server"), None);
        assert!(assembly.component(first).retired);

        let second = assembly.add_component("Server", "Server");
        assert_eq!(assembly.find_component("Server"), Some(second));
    }
}
