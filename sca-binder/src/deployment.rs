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

//! Turns a composite tree into arena declarations, endpoints and initial
//! endpoint references.
//!
//! Runs after [`crate::builder::StructuralUriBuilder`], so component URIs and
//! binding names are already assigned. Nested composites are flattened: only
//! components with a non composite implementation are deployed.

use crate::assembly::{
    Assembly, Binding, Component, ComponentId, ComponentReference, ComponentService, Composite,
    Definitions, Endpoint, EndpointDescriptor, EndpointReference, Intent, InterfaceContract,
    PolicySet, QName, ReferenceDecl, ReferenceId, ServiceDecl, ServiceId, Status,
};
use crate::builder::uri::{binding_uri_for, BindingBaseUris};
use crate::monitor::catalog::{self, ASSEMBLY_VALIDATION};
use crate::monitor::Monitor;
use crate::observability::{events, fields};
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "composite_deployment";

/// Declarations created by one [`CompositeAssembler::assemble`] call.
#[derive(Clone, Debug, Default)]
pub struct AssembledComposite {
    pub components: Vec<ComponentId>,
    pub references: Vec<ReferenceId>,
    /// Forward service endpoints, ready to be published.
    pub endpoints: Vec<Arc<Endpoint>>,
}

pub struct CompositeAssembler<'a> {
    definitions: &'a Definitions,
    base_uris: &'a BindingBaseUris,
}

impl<'a> CompositeAssembler<'a> {
    pub fn new(definitions: &'a Definitions, base_uris: &'a BindingBaseUris) -> Self {
        Self {
            definitions,
            base_uris,
        }
    }

    pub fn assemble(
        &self,
        composite: &Composite,
        assembly: &mut Assembly,
        monitor: &mut Monitor,
    ) -> AssembledComposite {
        let mut assembled = AssembledComposite::default();
        self.assemble_composite(composite, assembly, monitor, &mut assembled);
        assembled
    }

    fn assemble_composite(
        &self,
        composite: &Composite,
        assembly: &mut Assembly,
        monitor: &mut Monitor,
        assembled: &mut AssembledComposite,
    ) {
        monitor.push_context(format!("Composite: {}", composite.name));
        for component in &composite.components {
            if let Some(nested) = component.nested_composite() {
                self.assemble_composite(nested, assembly, monitor, assembled);
                continue;
            }
            monitor.push_context(format!("Component: {}", component.name));
            self.assemble_component(component, assembly, monitor, assembled);
            monitor.pop_context();
        }
        monitor.pop_context();
    }

    fn assemble_component(
        &self,
        component: &Component,
        assembly: &mut Assembly,
        monitor: &mut Monitor,
        assembled: &mut AssembledComposite,
    ) {
        let uri = component.uri.clone().unwrap_or_else(|| component.name.clone());
        if assembly.find_component(&uri).is_some() {
            monitor.error(
                COMPONENT,
                ASSEMBLY_VALIDATION,
                catalog::DUPLICATE_COMPONENT_URI,
                [uri],
            );
            return;
        }
        let component_id = assembly.add_component(&component.name, &uri);
        assembled.components.push(component_id);

        for service in &component.services {
            let endpoints = self.assemble_service(component_id, &uri, service, assembly, monitor);
            assembled.endpoints.extend(endpoints);
        }
        for reference in &component.references {
            let reference_id = self.assemble_reference(
                component_id,
                &uri,
                component.autowire,
                reference,
                assembly,
                monitor,
            );
            assembled.references.push(reference_id);
        }
    }

    fn assemble_service(
        &self,
        component_id: ComponentId,
        component_uri: &str,
        service: &ComponentService,
        assembly: &mut Assembly,
        monitor: &mut Monitor,
    ) -> Vec<Arc<Endpoint>> {
        let mut bindings = service.bindings.clone();
        if bindings.is_empty() {
            bindings.push(self.default_binding(component_uri, &service.name, monitor));
        }
        let subject = format!("{component_uri}/{}", service.name);
        let required_intents =
            resolve_intents(&service.required_intents, &subject, self.definitions, monitor);
        let policy_sets =
            resolve_policy_sets(&service.policy_sets, &subject, self.definitions, monitor);

        let callback_references = match service
            .interface_contract
            .as_ref()
            .and_then(callback_contract)
        {
            Some(callback) => {
                let callback_bindings = service
                    .callback
                    .as_ref()
                    .map(|callback| callback.bindings.clone())
                    .filter(|bindings| !bindings.is_empty())
                    .unwrap_or_else(|| vec![Binding::sca().with_name(&service.name)]);
                let mut decl = ReferenceDecl::new(component_id, &service.name);
                decl.interface_contract = Some(callback);
                decl.bindings = callback_bindings.clone();
                let callback_reference_id = assembly.add_reference(decl);
                callback_bindings
                    .into_iter()
                    .map(|binding| {
                        EndpointReference::new(
                            component_id,
                            callback_reference_id,
                            component_uri,
                            &service.name,
                        )
                        .with_binding(binding)
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let mut decl = ServiceDecl::new(component_id, &service.name);
        decl.interface_contract = service.interface_contract.clone();
        decl.bindings = bindings.clone();
        let service_id = assembly.add_service(decl);

        let endpoints: Vec<Arc<Endpoint>> = bindings
            .into_iter()
            .map(|binding| {
                let mut endpoint = Endpoint::published(component_uri, &service.name, binding)
                    .owned_by(component_id, service_id);
                endpoint.interface_contract = service.interface_contract.clone();
                endpoint.required_intents = required_intents.clone();
                endpoint.policy_sets = policy_sets.clone();
                endpoint.callback_endpoint_references = callback_references.clone();
                Arc::new(endpoint)
            })
            .collect();
        assembly.service_mut(service_id).endpoints = endpoints.clone();
        endpoints
    }

    fn assemble_reference(
        &self,
        component_id: ComponentId,
        component_uri: &str,
        component_autowire: bool,
        reference: &ComponentReference,
        assembly: &mut Assembly,
        monitor: &mut Monitor,
    ) -> ReferenceId {
        let subject = format!("{component_uri}/{}", reference.name);
        let mut decl = ReferenceDecl::new(component_id, &reference.name);
        decl.multiplicity = reference.multiplicity;
        decl.interface_contract = reference.interface_contract.clone();
        decl.bindings = reference.bindings.clone();
        decl.autowire = reference.autowire.unwrap_or(component_autowire);
        decl.targets = reference.targets.clone();
        decl.required_intents =
            resolve_intents(&reference.required_intents, &subject, self.definitions, monitor);
        decl.policy_sets =
            resolve_policy_sets(&reference.policy_sets, &subject, self.definitions, monitor);
        decl.async_invocation = reference.async_invocation;

        if let Some(callback) = reference
            .interface_contract
            .as_ref()
            .and_then(callback_contract)
        {
            decl.callback_service = Some(self.assemble_callback_service(
                component_id,
                component_uri,
                reference,
                callback,
                assembly,
                monitor,
            ));
        }

        assembly.add_reference(decl)
    }

    /// Service a reference receives callbacks on. Its endpoints stay local.
    fn assemble_callback_service(
        &self,
        component_id: ComponentId,
        component_uri: &str,
        reference: &ComponentReference,
        callback: InterfaceContract,
        assembly: &mut Assembly,
        monitor: &mut Monitor,
    ) -> ServiceId {
        let declared = reference
            .callback
            .as_ref()
            .map(|callback| callback.bindings.clone())
            .unwrap_or_default();
        let bindings: Vec<Binding> = if declared.is_empty() {
            vec![self.default_binding(component_uri, &reference.name, monitor)]
        } else {
            declared
                .into_iter()
                .map(|binding| self.with_binding_uri(component_uri, &reference.name, binding, monitor))
                .collect()
        };

        let mut decl = ServiceDecl::new(component_id, &reference.name);
        decl.interface_contract = Some(callback.clone());
        decl.bindings = bindings.clone();
        decl.is_callback = true;
        let service_id = assembly.add_service(decl);

        let endpoints = bindings
            .into_iter()
            .map(|binding| {
                let mut endpoint = Endpoint::published(component_uri, &reference.name, binding)
                    .owned_by(component_id, service_id)
                    .with_interface_contract(callback.clone());
                endpoint.forward_service = Some(reference.name.clone());
                Arc::new(endpoint)
            })
            .collect();
        assembly.service_mut(service_id).endpoints = endpoints;
        service_id
    }

    fn default_binding(&self, component_uri: &str, contract_name: &str, monitor: &mut Monitor) -> Binding {
        self.with_binding_uri(
            component_uri,
            contract_name,
            Binding::sca().with_name(contract_name),
            monitor,
        )
    }

    fn with_binding_uri(
        &self,
        component_uri: &str,
        contract_name: &str,
        mut binding: Binding,
        monitor: &mut Monitor,
    ) -> Binding {
        if binding.name.is_none() {
            binding.name = Some(contract_name.to_string());
        }
        match binding_uri_for(Some(component_uri), contract_name, &binding, self.base_uris) {
            Ok(Some(uri)) => binding.uri = Some(uri),
            Ok(None) => {}
            Err(err) => {
                debug!(component = COMPONENT, err = %err, "default binding URI could not be built");
                monitor.error(
                    COMPONENT,
                    ASSEMBLY_VALIDATION,
                    catalog::URL_SYNTAX_EXCEPTION,
                    [
                        component_uri.to_string(),
                        contract_name.to_string(),
                        binding.name.clone().unwrap_or_default(),
                    ],
                );
            }
        }
        binding
    }
}

///
/// Endpoint references a freshly deployed reference starts with.
///
/// - autowired references without targets get one autowire placeholder
/// - each declared target gets a reference in `WIRED_TARGET_NOT_FOUND`
/// - without targets, each binding with a URI gets a reference in
///   `WIRED_TARGET_IN_BINDING_URI`
/// - a mandatory reference with nothing declared gets one `NOT_CONFIGURED`
///   reference so the failure is reported when it is bound
///
pub fn initial_endpoint_references(
    assembly: &Assembly,
    reference_id: ReferenceId,
) -> Vec<EndpointReference> {
    let reference = assembly.reference(reference_id);
    let component = assembly.component(reference.component);

    let mut template = EndpointReference::new(
        reference.component,
        reference_id,
        &component.uri,
        &reference.name,
    );
    template.required_intents = reference.required_intents.clone();
    template.policy_sets = reference.policy_sets.clone();
    template.async_invocation = reference.async_invocation;

    if reference.autowire && reference.targets.is_empty() {
        return vec![template.with_status(Status::AutowirePlaceholder)];
    }

    if !reference.targets.is_empty() {
        let binding = match reference.bindings.as_slice() {
            [binding] if binding.uri.is_none() => Some(binding.clone()),
            _ => None,
        };
        return reference
            .targets
            .iter()
            .map(|target| {
                let mut endpoint_reference = template
                    .clone()
                    .with_status(Status::WiredTargetNotFound)
                    .with_target(Arc::new(Endpoint::unresolved_target(target)));
                endpoint_reference.binding = binding.clone();
                endpoint_reference
            })
            .collect();
    }

    let from_bindings: Vec<EndpointReference> = reference
        .bindings
        .iter()
        .filter_map(|binding| {
            let uri = binding.uri.as_deref()?;
            Some(
                template
                    .clone()
                    .with_status(Status::WiredTargetInBindingUri)
                    .with_binding(binding.clone())
                    .with_target(Arc::new(Endpoint::unresolved_target(uri))),
            )
        })
        .collect();
    if !from_bindings.is_empty() {
        return from_bindings;
    }

    if reference.multiplicity.is_mandatory() {
        return vec![template];
    }
    Vec::new()
}

/// Builds a remote endpoint for a record published by another node.
pub fn endpoint_from_descriptor(
    descriptor: &EndpointDescriptor,
    definitions: &Definitions,
    monitor: &mut Monitor,
) -> Endpoint {
    let subject = format!("{}/{}", descriptor.component_uri, descriptor.service);
    let mut endpoint = Endpoint::published(
        &descriptor.component_uri,
        &descriptor.service,
        descriptor.binding.clone(),
    )
    .remote();
    endpoint.interface_contract = descriptor.interface_contract.clone();
    endpoint.required_intents =
        resolve_intents(&descriptor.required_intents, &subject, definitions, monitor);
    endpoint.policy_sets =
        resolve_policy_sets(&descriptor.policy_sets, &subject, definitions, monitor);
    endpoint
}

/// The callback half of `contract`, as a contract of its own.
fn callback_contract(contract: &InterfaceContract) -> Option<InterfaceContract> {
    contract
        .callback_interface
        .clone()
        .map(|callback| InterfaceContract::new(contract.kind, callback))
}

/// Unqualified names are taken to be in the SCA namespace.
fn definition_name(name: &str) -> Option<QName> {
    let parsed: QName = name.parse().ok()?;
    if parsed.namespace().is_empty() {
        return Some(QName::sca(parsed.local_part()));
    }
    Some(parsed)
}

fn resolve_intents(
    names: &[String],
    subject: &str,
    definitions: &Definitions,
    monitor: &mut Monitor,
) -> Vec<Arc<Intent>> {
    names
        .iter()
        .filter_map(|name| {
            let intent = definition_name(name).and_then(|qname| definitions.intent(&qname));
            if intent.is_none() {
                debug!(
                    event = events::DEFINITION_UNRESOLVED,
                    component = COMPONENT,
                    name = name.as_str(),
                    subject,
                    reason = fields::REASON_UNKNOWN_INTENT,
                    "intent is not defined"
                );
                monitor.warning(
                    COMPONENT,
                    ASSEMBLY_VALIDATION,
                    catalog::INTENT_NOT_FOUND,
                    [name.as_str(), subject],
                );
            }
            intent.cloned()
        })
        .collect()
}

fn resolve_policy_sets(
    names: &[String],
    subject: &str,
    definitions: &Definitions,
    monitor: &mut Monitor,
) -> Vec<Arc<PolicySet>> {
    names
        .iter()
        .filter_map(|name| {
            let policy_set =
                definition_name(name).and_then(|qname| definitions.policy_set(&qname));
            if policy_set.is_none() {
                debug!(
                    event = events::DEFINITION_UNRESOLVED,
                    component = COMPONENT,
                    name = name.as_str(),
                    subject,
                    reason = fields::REASON_UNKNOWN_POLICY_SET,
                    "policy set is not defined"
                );
                monitor.warning(
                    COMPONENT,
                    ASSEMBLY_VALIDATION,
                    catalog::POLICY_SET_NOT_FOUND,
                    [name.as_str(), subject],
                );
            }
            policy_set.cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{endpoint_from_descriptor, initial_endpoint_references, CompositeAssembler};
    use crate::assembly::{
        Assembly, Binding, Callback, Component, ComponentReference, ComponentService, Composite,
        Definitions, EndpointDescriptor, Implementation, Intent, Interface, InterfaceContract,
        InterfaceKind, Multiplicity, Operation, QName, Status,
    };
    use crate::builder::{BindingBaseUris, StructuralUriBuilder};
    use crate::monitor::{catalog, Monitor};
    use std::sync::Arc;

    fn hello() -> InterfaceContract {
        InterfaceContract::new(
            InterfaceKind::Java,
            Interface::new("Hello", vec![Operation::new("hello")]),
        )
    }

    fn deploy(mut composite: Composite, definitions: &Definitions) -> (Assembly, super::AssembledComposite, Monitor) {
        let base_uris = BindingBaseUris::new();
        let mut monitor = Monitor::new();
        StructuralUriBuilder::new().build(&mut composite, &base_uris, &mut monitor);
        let mut assembly = Assembly::new();
        let assembled =
            CompositeAssembler::new(definitions, &base_uris).assemble(&composite, &mut assembly, &mut monitor);
        (assembly, assembled, monitor)
    }

    #[test]
    fn services_without_bindings_get_a_default_sca_endpoint() {
        let composite = Composite::new("Domain").with_component(
            Component::new("Server").with_service(ComponentService {
                interface_contract: Some(hello()),
                ..ComponentService::new("Hello")
            }),
        );

        let (_, assembled, monitor) = deploy(composite, &Definitions::default());

        assert_eq!(assembled.endpoints.len(), 1);
        let endpoint = &assembled.endpoints[0];
        assert_eq!(endpoint.uri, "Server#service-binding(Hello/Hello)");
        assert_eq!(endpoint.binding_uri(), Some("/Server/Hello"));
        assert!(endpoint.interface_contract.is_some());
        assert!(monitor.problems().is_empty());
    }

    #[test]
    fn nested_composites_are_flattened() {
        let inner = Composite::new("Inner").with_component(
            Component::new("Server").with_service(ComponentService {
                bindings: vec![Binding::new(QName::sca("binding.ws"))],
                ..ComponentService::new("Hello")
            }),
        );
        let mut outer = Component::new("Outer");
        outer.implementation = Some(Implementation::Composite(Box::new(inner)));
        let composite = Composite::new("Domain").with_component(outer);

        let (assembly, assembled, _) = deploy(composite, &Definitions::default());

        assert_eq!(assembled.components.len(), 1);
        assert_eq!(assembly.component(assembled.components[0]).uri, "Outer/Server");
        assert_eq!(assembled.endpoints[0].binding_uri(), Some("/Outer/Server/Hello"));
    }

    #[test]
    fn references_start_in_the_status_their_declaration_implies() {
        let composite = Composite::new("Domain").with_component(
            Component::new("Client")
                .with_reference(ComponentReference {
                    targets: vec!["A/Hello".to_string(), "B/Hello".to_string()],
                    multiplicity: Multiplicity::OneN,
                    ..ComponentReference::new("targeted")
                })
                .with_reference(ComponentReference {
                    autowire: Some(true),
                    ..ComponentReference::new("autowired")
                })
                .with_reference(ComponentReference {
                    bindings: vec![Binding::new(QName::sca("binding.ws")).with_uri("http://x/Hello")],
                    ..ComponentReference::new("literal")
                })
                .with_reference(ComponentReference::new("mandatory"))
                .with_reference(ComponentReference {
                    multiplicity: Multiplicity::ZeroOne,
                    ..ComponentReference::new("optional")
                }),
        );

        let (assembly, assembled, _) = deploy(composite, &Definitions::default());
        let statuses: Vec<Vec<Status>> = assembled
            .references
            .iter()
            .map(|reference| {
                initial_endpoint_references(&assembly, *reference)
                    .iter()
                    .map(|epr| epr.status)
                    .collect()
            })
            .collect();

        assert_eq!(
            statuses,
            vec![
                vec![Status::WiredTargetNotFound, Status::WiredTargetNotFound],
                vec![Status::AutowirePlaceholder],
                vec![Status::WiredTargetInBindingUri],
                vec![Status::NotConfigured],
                vec![],
            ]
        );
        let targeted = initial_endpoint_references(&assembly, assembled.references[0]);
        assert_eq!(targeted[1].target_uri(), Some("B/Hello"));
    }

    #[test]
    fn callback_contracts_create_callback_services_and_references() {
        let with_callback = hello().with_callback(Interface::new(
            "HelloCallback",
            vec![Operation::new("done")],
        ));
        let composite = Composite::new("Domain")
            .with_component(Component::new("Server").with_service(ComponentService {
                interface_contract: Some(with_callback.clone()),
                ..ComponentService::new("Hello")
            }))
            .with_component(Component::new("Client").with_reference(ComponentReference {
                interface_contract: Some(with_callback),
                callback: Some(Callback {
                    bindings: vec![Binding::sca().with_name("cb")],
                }),
                ..ComponentReference::new("hello")
            }));

        let (assembly, assembled, _) = deploy(composite, &Definitions::default());

        let endpoint = &assembled.endpoints[0];
        assert_eq!(endpoint.callback_endpoint_references.len(), 1);
        let reference = assembly.reference(assembled.references[0]);
        let callback_service = assembly.service(reference.callback_service.expect("callback service"));
        assert!(callback_service.is_callback);
        assert_eq!(callback_service.endpoints.len(), 1);
        assert_eq!(callback_service.endpoints[0].binding_uri(), Some("/Client/hello/cb"));
        assert_eq!(assembled.endpoints.len(), 1, "callback endpoints are not published");
    }

    #[test]
    fn unknown_definitions_are_warnings() {
        let definitions = Definitions {
            intents: vec![Arc::new(Intent::new(QName::sca("integrity")))],
            ..Definitions::default()
        };
        let composite = Composite::new("Domain").with_component(Component::new("Client").with_reference(
            ComponentReference {
                required_intents: vec!["integrity".to_string(), "bogus".to_string()],
                policy_sets: vec!["{urn:x}missing".to_string()],
                ..ComponentReference::new("hello")
            },
        ));

        let (assembly, assembled, monitor) = deploy(composite, &definitions);

        let reference = assembly.reference(assembled.references[0]);
        assert_eq!(reference.required_intents.len(), 1);
        assert!(reference.policy_sets.is_empty());
        let keys: Vec<_> = monitor.problems().iter().map(|problem| problem.message_key).collect();
        assert_eq!(keys, vec![catalog::INTENT_NOT_FOUND, catalog::POLICY_SET_NOT_FOUND]);
        assert!(monitor.problems().iter().all(|problem| !problem.is_error()));
    }

    #[test]
    fn duplicate_component_uris_are_reported() {
        let composite = Composite::new("Domain")
            .with_component(Component::new("Server"))
            .with_component(Component::new("Server"));

        let (_, assembled, monitor) = deploy(composite, &Definitions::default());

        assert_eq!(assembled.components.len(), 1);
        assert_eq!(
            monitor.last_problem().map(|problem| problem.message_key),
            Some(catalog::DUPLICATE_COMPONENT_URI)
        );
    }

    #[test]
    fn descriptors_become_remote_endpoints() {
        let descriptor = EndpointDescriptor {
            component_uri: "Remote".to_string(),
            service: "Hello".to_string(),
            binding: Binding::sca().with_name("Hello").with_uri("/Remote/Hello"),
            interface_contract: Some(hello()),
            required_intents: Vec::new(),
            policy_sets: Vec::new(),
        };
        let mut monitor = Monitor::new();

        let endpoint = endpoint_from_descriptor(&descriptor, &Definitions::default(), &mut monitor);

        assert!(endpoint.remote);
        assert!(endpoint.component.is_none());
        assert_eq!(endpoint.uri, "Remote#service-binding(Hello/Hello)");
    }
}
