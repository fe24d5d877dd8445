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

//! Binding and policy builders, registered per binding type and policy language.

use crate::assembly::{Binding, Endpoint, EndpointReference, InterfaceContract, QName};
use crate::builder::context::BuilderContext;
use crate::error::BuilderError;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// The service or reference a binding is being configured for.
#[derive(Clone, Copy, Debug)]
pub struct BuildSubject<'a> {
    pub component_uri: &'a str,
    pub contract_name: &'a str,
    pub interface_contract: Option<&'a InterfaceContract>,
}

///
/// Fills in transport specific configuration of one binding type.
///
/// `build` must be idempotent: the binder may call it more than once on the
/// same binding.
///
pub trait BindingBuilder: Send + Sync {
    fn binding_type(&self) -> QName;

    fn build(
        &self,
        subject: BuildSubject<'_>,
        binding: &mut Binding,
        context: &BuilderContext,
        is_service: bool,
    ) -> Result<(), BuilderError>;

    /// `true` when the transport carries asynchronous responses itself.
    fn supports_native_async(&self) -> bool {
        false
    }
}

/// Language specific policy matching.
pub trait PolicyBuilder: Send + Sync {
    fn policy_language(&self) -> QName;

    /// Binding types this builder applies to; `None` means every binding.
    fn supported_bindings(&self) -> Option<&HashSet<QName>> {
        None
    }

    fn build(
        &self,
        endpoint_reference: &EndpointReference,
        endpoint: &Endpoint,
        context: &BuilderContext,
    ) -> bool;
}

#[derive(Clone, Default)]
pub struct BuilderRegistry {
    binding_builders: HashMap<QName, Arc<dyn BindingBuilder>>,
    policy_builders: HashMap<QName, Arc<dyn PolicyBuilder>>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `builder`, replacing any builder for the same binding type.
    pub fn register_binding_builder(&mut self, builder: Arc<dyn BindingBuilder>) {
        self.binding_builders.insert(builder.binding_type(), builder);
    }

    /// Registers `builder`, replacing any builder for the same policy language.
    pub fn register_policy_builder(&mut self, builder: Arc<dyn PolicyBuilder>) {
        self.policy_builders.insert(builder.policy_language(), builder);
    }

    pub fn binding_builder(&self, binding_type: &QName) -> Option<&Arc<dyn BindingBuilder>> {
        self.binding_builders.get(binding_type)
    }

    pub fn policy_builder(&self, language: &QName) -> Option<&Arc<dyn PolicyBuilder>> {
        self.policy_builders.get(language)
    }
}

impl Debug for BuilderRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("binding_builders", &self.binding_builders.keys().collect::<Vec<_>>())
            .field("policy_builders", &self.policy_builders.keys().collect::<Vec<_>>())
            .finish()
    }
}
