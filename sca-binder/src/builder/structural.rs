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

//! Assigns component URIs, binding names and binding URIs across a composite tree.

use crate::assembly::{Binding, Composite, Contract, ContractRole, Implementation};
use crate::builder::uri::{binding_uri_for, BindingBaseUris};
use crate::monitor::catalog::{self, ASSEMBLY_VALIDATION};
use crate::monitor::Monitor;
use crate::observability::events;
use std::collections::HashSet;
use tracing::debug;

const COMPONENT: &str = "structural_uri_builder";

#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralUriBuilder;

impl StructuralUriBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Walks `composite` and every nested composite, reporting problems to `monitor`.
    pub fn build(&self, composite: &mut Composite, base_uris: &BindingBaseUris, monitor: &mut Monitor) {
        self.configure_structural_uris(composite, None, base_uris, monitor);
    }

    fn configure_structural_uris(
        &self,
        composite: &mut Composite,
        parent_component_uri: Option<&str>,
        base_uris: &BindingBaseUris,
        monitor: &mut Monitor,
    ) {
        monitor.push_context(format!("Composite: {}", composite.name));

        for service in &mut composite.services {
            construct_binding_names(service, monitor);
        }
        for reference in &mut composite.references {
            construct_binding_names(reference, monitor);
        }

        for component in &mut composite.components {
            let component_uri = match parent_component_uri {
                Some(parent) => format!("{parent}/{}", component.name),
                None => component.name.clone(),
            };
            component.uri = Some(component_uri.clone());

            monitor.push_context(format!("Component: {}", component.name));
            for service in &mut component.services {
                construct_binding_names(service, monitor);
                for binding in &mut service.bindings {
                    construct_binding_uri(&component_uri, &service.name, binding, base_uris, monitor);
                }
            }
            for reference in &mut component.references {
                construct_binding_names(reference, monitor);
            }
            monitor.pop_context();

            if let Some(Implementation::Composite(nested)) =
                component.implementation.as_mut()
            {
                self.configure_structural_uris(nested, Some(&component_uri), base_uris, monitor);
            }
        }

        monitor.pop_context();
    }
}

fn construct_binding_names(contract: &mut dyn Contract, monitor: &mut Monitor) {
    let contract_name = contract.name().to_string();
    let role = contract.role();

    let forward_key = match role {
        ContractRole::Service => catalog::MULTIPLE_BINDINGS_FOR_SERVICE,
        ContractRole::Reference => catalog::MULTIPLE_BINDINGS_FOR_REFERENCE,
    };
    name_bindings(&contract_name, contract.bindings_mut(), forward_key, monitor);

    let callback_key = match role {
        ContractRole::Service => catalog::MULTIPLE_BINDINGS_FOR_SERVICE_CALLBACK,
        ContractRole::Reference => catalog::MULTIPLE_BINDINGS_FOR_REFERENCE_CALLBACK,
    };
    if let Some(callback) = contract.callback_mut() {
        name_bindings(&contract_name, &mut callback.bindings, callback_key, monitor);
    }
}

fn name_bindings(
    contract_name: &str,
    bindings: &mut [Binding],
    duplicate_key: &'static str,
    monitor: &mut Monitor,
) {
    let mut seen = HashSet::new();
    for binding in bindings {
        let name = binding
            .name
            .get_or_insert_with(|| {
                debug!(
                    event = events::BINDING_NAME_DEFAULTED,
                    component = COMPONENT,
                    contract = contract_name,
                    "binding name defaulted to contract name"
                );
                contract_name.to_string()
            })
            .clone();
        if !seen.insert(name.clone()) {
            monitor.error(
                COMPONENT,
                ASSEMBLY_VALIDATION,
                duplicate_key,
                [contract_name.to_string(), name],
            );
        }
    }
}

fn construct_binding_uri(
    component_uri: &str,
    service_name: &str,
    binding: &mut Binding,
    base_uris: &BindingBaseUris,
    monitor: &mut Monitor,
) {
    match binding_uri_for(Some(component_uri), service_name, binding, base_uris) {
        Ok(Some(uri)) => {
            debug!(
                event = events::BINDING_URI_ASSIGNED,
                component = COMPONENT,
                component_uri,
                service = service_name,
                binding_uri = uri.as_str(),
                "binding URI assigned"
            );
            binding.uri = Some(uri);
        }
        Ok(None) => {}
        Err(err) => {
            debug!(component = COMPONENT, err = %err, "binding URI could not be built");
            monitor.error(
                COMPONENT,
                ASSEMBLY_VALIDATION,
                catalog::URL_SYNTAX_EXCEPTION,
                [
                    component_uri.to_string(),
                    service_name.to_string(),
                    binding.name.clone().unwrap_or_default(),
                ],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StructuralUriBuilder;
    use crate::assembly::{
        Binding, Callback, Component, ComponentReference, ComponentService, Composite,
        Implementation, QName,
    };
    use crate::builder::uri::BindingBaseUris;
    use crate::monitor::{catalog, Monitor};

    fn nested_tree() -> Composite {
        let leaf = Component::new("Server").with_service(ComponentService {
            bindings: vec![Binding::sca()],
            ..ComponentService::new("Hello")
        });
        let inner = Composite::new("Inner").with_component(leaf);
        let mut outer = Component::new("Outer");
        outer.implementation = Some(Implementation::Composite(Box::new(inner)));
        Composite::new("Domain").with_component(outer)
    }

    #[test]
    fn component_uris_follow_nesting() {
        let mut composite = nested_tree();
        let mut monitor = Monitor::new();

        StructuralUriBuilder::new().build(&mut composite, &BindingBaseUris::new(), &mut monitor);

        let outer = &composite.components[0];
        assert_eq!(outer.uri.as_deref(), Some("Outer"));
        let inner = outer.nested_composite().expect("nested composite");
        let server = &inner.components[0];
        assert_eq!(server.uri.as_deref(), Some("Outer/Server"));
        let binding = &server.services[0].bindings[0];
        assert_eq!(binding.name.as_deref(), Some("Hello"));
        assert_eq!(binding.uri.as_deref(), Some("/Outer/Server/Hello"));
        assert!(monitor.problems().is_empty());
    }

    #[test]
    fn duplicate_binding_names_are_reported_and_processing_continues() {
        let ws = QName::sca("binding.ws");
        let service = ComponentService {
            bindings: vec![Binding::new(ws.clone()), Binding::new(ws.clone()).with_name("Hello")],
            ..ComponentService::new("Hello")
        };
        let reference = ComponentReference {
            callback: Some(Callback {
                bindings: vec![Binding::sca().with_name("cb"), Binding::sca().with_name("cb")],
            }),
            ..ComponentReference::new("hello")
        };
        let mut composite = Composite::new("Domain")
            .with_component(Component::new("A").with_service(service).with_reference(reference))
            .with_component(Component::new("B").with_service(ComponentService {
                bindings: vec![Binding::sca()],
                ..ComponentService::new("Other")
            }));
        let mut monitor = Monitor::new();

        StructuralUriBuilder::new().build(&mut composite, &BindingBaseUris::new(), &mut monitor);

        let keys: Vec<_> = monitor.problems().iter().map(|p| p.message_key).collect();
        assert_eq!(
            keys,
            vec![
                catalog::MULTIPLE_BINDINGS_FOR_SERVICE,
                catalog::MULTIPLE_BINDINGS_FOR_REFERENCE_CALLBACK
            ]
        );
        assert_eq!(monitor.problems()[0].context.as_deref(), Some("Component: A"));
        let other = &composite.components[1].services[0].bindings[0];
        assert_eq!(other.uri.as_deref(), Some("/B/Other"));
    }

    #[test]
    fn malformed_uris_are_reported_with_component_service_and_binding() {
        let mut composite = Composite::new("Domain").with_component(
            Component::new("Bad Name").with_service(ComponentService {
                bindings: vec![Binding::sca()],
                ..ComponentService::new("Hello")
            }),
        );
        let mut monitor = Monitor::new();

        StructuralUriBuilder::new().build(&mut composite, &BindingBaseUris::new(), &mut monitor);

        let problem = monitor.last_problem().expect("syntax problem recorded");
        assert_eq!(problem.message_key, catalog::URL_SYNTAX_EXCEPTION);
        assert_eq!(problem.params, vec!["Bad Name", "Hello", "Hello"]);
        assert!(composite.components[0].services[0].bindings[0].uri.is_none());
    }

    #[test]
    fn base_uris_apply_per_binding_type() {
        let ws = QName::sca("binding.ws");
        let bases = BindingBaseUris::from([(ws.clone(), vec!["http://x/".to_string()])]);
        let mut composite = Composite::new("Domain").with_component(
            Component::new("a").with_service(ComponentService {
                bindings: vec![Binding::new(ws), Binding::sca().with_name("local")],
                ..ComponentService::new("S")
            }),
        );
        let mut monitor = Monitor::new();

        StructuralUriBuilder::new().build(&mut composite, &bases, &mut monitor);

        let bindings = &composite.components[0].services[0].bindings;
        assert_eq!(bindings[0].uri.as_deref(), Some("http://x/a/S"));
        assert_eq!(bindings[1].uri.as_deref(), Some("/a/S/local"));
    }
}
