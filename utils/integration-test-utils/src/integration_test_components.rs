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


use crate::integration_test_contracts::hello_contract;
use sca_binder::assembly::{
    Binding, Component, ComponentReference, ComponentService, Definitions, EndpointDescriptor,
    Multiplicity, QName,
};
use sca_binder::builder::BuilderRegistry;
use sca_binder::EndpointReferenceBinder;
use std::sync::Arc;

pub fn ws_binding_type() -> QName {
    QName::sca("binding.ws")
}

pub fn binder(definitions: Definitions) -> EndpointReferenceBinder {
    EndpointReferenceBinder::new(Arc::new(BuilderRegistry::new()), Arc::new(definitions))
}

/// Component `name` offering `Hello` over the default binding.
pub fn server(name: &str) -> Component {
    Component::new(name).with_service(ComponentService {
        interface_contract: Some(hello_contract()),
        ..ComponentService::new("Hello")
    })
}

/// Like [`server`], over `binding.ws` with the given intents and policy sets.
pub fn server_with_policy(name: &str, intents: &[&str], policy_sets: &[&str]) -> Component {
    Component::new(name).with_service(ComponentService {
        interface_contract: Some(hello_contract()),
        bindings: vec![Binding::new(ws_binding_type())],
        required_intents: intents.iter().map(ToString::to_string).collect(),
        policy_sets: policy_sets.iter().map(ToString::to_string).collect(),
        ..ComponentService::new("Hello")
    })
}

/// Component `Client` whose `hello` reference targets `targets`.
pub fn client(targets: &[&str]) -> Component {
    Component::new("Client").with_reference(ComponentReference {
        interface_contract: Some(hello_contract()),
        targets: targets.iter().map(ToString::to_string).collect(),
        multiplicity: if targets.len() > 1 {
            Multiplicity::OneN
        } else {
            Multiplicity::OneOne
        },
        ..ComponentReference::new("hello")
    })
}

pub fn client_with_policy(target: &str, intents: &[&str], policy_sets: &[&str]) -> Component {
    Component::new("Client").with_reference(ComponentReference {
        interface_contract: Some(hello_contract()),
        targets: vec![target.to_string()],
        required_intents: intents.iter().map(ToString::to_string).collect(),
        policy_sets: policy_sets.iter().map(ToString::to_string).collect(),
        ..ComponentReference::new("hello")
    })
}

pub fn autowired_client(multiplicity: Multiplicity) -> Component {
    Component::new("Client").with_reference(ComponentReference {
        interface_contract: Some(hello_contract()),
        autowire: Some(true),
        multiplicity,
        ..ComponentReference::new("hello")
    })
}

/// A `Hello` endpoint published by another node under `component_uri`.
pub fn remote_descriptor(component_uri: &str) -> EndpointDescriptor {
    EndpointDescriptor {
        component_uri: component_uri.to_string(),
        service: "Hello".to_string(),
        binding: Binding::sca()
            .with_name("Hello")
            .with_uri(&format!("/{component_uri}/Hello")),
        interface_contract: Some(hello_contract()),
        required_intents: Vec::new(),
        policy_sets: Vec::new(),
    }
}
