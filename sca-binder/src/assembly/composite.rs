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

//! Declarative composite tree as produced by artifact processing.
//!
//! The tree is what operators write in configuration; [`crate::deployment`]
//! turns it into an [`crate::assembly::Assembly`] once structural URIs are
//! assigned.

use crate::assembly::binding::Binding;
use crate::assembly::interface::InterfaceContract;
use crate::assembly::multiplicity::Multiplicity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContractRole {
    Service,
    Reference,
}

/// Bindings used for the callback direction of a contract.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Callback {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// A service or reference that carries bindings.
pub trait Contract {
    fn name(&self) -> &str;
    fn role(&self) -> ContractRole;
    fn bindings_mut(&mut self) -> &mut Vec<Binding>;
    fn callback_mut(&mut self) -> Option<&mut Callback>;
}

macro_rules! impl_contract {
    ($ty:ty, $role:expr) => {
        impl Contract for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn role(&self) -> ContractRole {
                $role
            }

            fn bindings_mut(&mut self) -> &mut Vec<Binding> {
                &mut self.bindings
            }

            fn callback_mut(&mut self) -> Option<&mut Callback> {
                self.callback.as_mut()
            }
        }
    };
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeService {
    pub name: String,
    pub promote: String,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub callback: Option<Callback>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeReference {
    pub name: String,
    #[serde(default)]
    pub promote: Vec<String>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub callback: Option<Callback>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentService {
    pub name: String,
    #[serde(default)]
    pub interface_contract: Option<InterfaceContract>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub callback: Option<Callback>,
    #[serde(default)]
    pub required_intents: Vec<String>,
    #[serde(default)]
    pub policy_sets: Vec<String>,
}

impl ComponentService {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentReference {
    pub name: String,
    #[serde(default)]
    pub interface_contract: Option<InterfaceContract>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub callback: Option<Callback>,
    #[serde(default)]
    pub multiplicity: Multiplicity,
    #[serde(default)]
    pub targets: Vec<String>,
    /// Overrides the component's autowire setting when present.
    #[serde(default)]
    pub autowire: Option<bool>,
    #[serde(default)]
    pub required_intents: Vec<String>,
    #[serde(default)]
    pub policy_sets: Vec<String>,
    #[serde(default, rename = "async")]
    pub async_invocation: bool,
}

impl ComponentReference {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl_contract!(CompositeService, ContractRole::Service);
impl_contract!(CompositeReference, ContractRole::Reference);
impl_contract!(ComponentService, ContractRole::Service);
impl_contract!(ComponentReference, ContractRole::Reference);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Implementation {
    Composite(Box<Composite>),
    /// Implementation technology handled outside the binder, e.g. `java:com.example.Impl`.
    Opaque(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Component {
    pub name: String,
    /// Assigned by the structural URI builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default)]
    pub autowire: bool,
    #[serde(default)]
    pub services: Vec<ComponentService>,
    #[serde(default)]
    pub references: Vec<ComponentReference>,
    #[serde(default)]
    pub implementation: Option<Implementation>,
}

impl Component {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_service(mut self, service: ComponentService) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_reference(mut self, reference: ComponentReference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn nested_composite(&self) -> Option<&Composite> {
        match &self.implementation {
            Some(Implementation::Composite(composite)) => Some(composite),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Composite {
    pub name: String,
    #[serde(default)]
    pub services: Vec<CompositeService>,
    #[serde(default)]
    pub references: Vec<CompositeReference>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Composite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Component, Composite, Implementation};

    #[test]
    fn nested_composites_are_exposed() {
        let inner = Composite::new("Inner").with_component(Component::new("Leaf"));
        let mut outer = Component::new("Outer");
        outer.implementation = Some(Implementation::Composite(Box::new(inner)));

        let nested = outer.nested_composite().map(|composite| composite.name.as_str());
        assert_eq!(nested, Some("Inner"));
        assert!(Component::new("Leaf").nested_composite().is_none());
    }
}
