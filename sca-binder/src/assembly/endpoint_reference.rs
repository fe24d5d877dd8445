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

use crate::assembly::arena::{ComponentId, ReferenceId};
use crate::assembly::binding::Binding;
use crate::assembly::endpoint::Endpoint;
use crate::assembly::policy::{Intent, PolicySet};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Prefix of references a component creates to call its own services.
pub const SELF_REFERENCE_PREFIX: &str = "$self$.";

/// Resolution progress of one endpoint reference.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Status {
    #[default]
    NotConfigured,
    AutowirePlaceholder,
    WiredTargetInBindingUri,
    WiredTargetNotFound,
    WiredTargetFoundReadyForMatching,
    WiredTargetFoundAndMatched,
    ResolvedBinding,
}

impl Status {
    /// The two terminal states a successful bind leaves behind.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Status::WiredTargetFoundAndMatched | Status::ResolvedBinding
        )
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let literal = match self {
            Status::NotConfigured => "NOT_CONFIGURED",
            Status::AutowirePlaceholder => "AUTOWIRE_PLACEHOLDER",
            Status::WiredTargetInBindingUri => "WIRED_TARGET_IN_BINDING_URI",
            Status::WiredTargetNotFound => "WIRED_TARGET_NOT_FOUND",
            Status::WiredTargetFoundReadyForMatching => "WIRED_TARGET_FOUND_READY_FOR_MATCHING",
            Status::WiredTargetFoundAndMatched => "WIRED_TARGET_FOUND_AND_MATCHED",
            Status::ResolvedBinding => "RESOLVED_BINDING",
        };
        write!(f, "{literal}")
    }
}

///
/// One reference's intent to bind to a service.
///
/// `Clone` is the snapshot constructor used when fanning out autowire matches
/// and synthesizing callbacks: binding, status and policy sets are copied,
/// while endpoint records stay shared behind their `Arc`.
///
#[derive(Clone, Debug)]
pub struct EndpointReference {
    pub component: ComponentId,
    pub reference: ReferenceId,
    pub component_uri: String,
    pub reference_name: String,
    pub binding: Option<Binding>,
    pub target_endpoint: Option<Arc<Endpoint>>,
    pub callback_endpoint: Option<Arc<Endpoint>>,
    pub required_intents: Vec<Arc<Intent>>,
    pub policy_sets: Vec<Arc<PolicySet>>,
    pub status: Status,
    pub unresolved: bool,
    pub async_invocation: bool,
}

impl EndpointReference {
    pub fn new(
        component: ComponentId,
        reference: ReferenceId,
        component_uri: &str,
        reference_name: &str,
    ) -> Self {
        Self {
            component,
            reference,
            component_uri: component_uri.to_string(),
            reference_name: reference_name.to_string(),
            binding: None,
            target_endpoint: None,
            callback_endpoint: None,
            required_intents: Vec::new(),
            policy_sets: Vec::new(),
            status: Status::NotConfigured,
            unresolved: true,
            async_invocation: false,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn with_target(mut self, target: Arc<Endpoint>) -> Self {
        self.target_endpoint = Some(target);
        self
    }

    pub fn with_required_intent(mut self, intent: Arc<Intent>) -> Self {
        self.required_intents.push(intent);
        self
    }

    pub fn with_policy_set(mut self, policy_set: Arc<PolicySet>) -> Self {
        self.policy_sets.push(policy_set);
        self
    }

    pub fn is_self_reference(&self) -> bool {
        self.reference_name.starts_with(SELF_REFERENCE_PREFIX)
    }

    pub fn target_uri(&self) -> Option<&str> {
        self.target_endpoint.as_deref().map(|target| target.uri.as_str())
    }

    /// `true` when this reference is already wired to `endpoint`.
    pub fn targets(&self, endpoint: &Endpoint) -> bool {
        self.target_endpoint
            .as_deref()
            .is_some_and(|target| target.same_as(endpoint))
    }
}

impl Display for EndpointReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let binding_name = self
            .binding
            .as_ref()
            .and_then(|binding| binding.name.as_deref())
            .unwrap_or(&self.reference_name);
        write!(
            f,
            "EndpointReference: URI = {}#reference-binding({}/{}) Status = {}",
            self.component_uri, self.reference_name, binding_name, self.status
        )?;
        if let Some(target) = &self.target_endpoint {
            write!(f, " Target = {target}")?;
        }
        Ok(())
    }
}
