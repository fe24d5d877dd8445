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

//! Endpoint reference binding.
//!
//! [`EndpointReferenceBinder::bind`] drives one endpoint reference through its
//! status machine: autowire expansion, forward endpoint selection, callback
//! endpoint selection or synthesis, unknown endpoint delegation and final
//! interface validation. Problems are collected in a per call [`Monitor`]; at
//! run time an unresolved reference is an error, at build time it is a
//! warning and the reference is left for a later pass.

use crate::assembly::{
    Assembly, Binding, Definitions, Endpoint, EndpointReference, InterfaceContract, ReferenceId,
    ServiceId, Status,
};
use crate::builder::{BuildSubject, BuilderContext, BuilderRegistry};
use crate::error::{BindError, RegistryError};
use crate::monitor::catalog::{self, ENDPOINT_VALIDATION};
use crate::monitor::{Monitor, Problem};
use crate::observability::{events, fields};
use crate::registry::{matches_target, DomainRegistry};
use crate::resolution::audit::Audit;
use crate::resolution::interface_match::{
    compare_contracts, have_matching_interface_contracts, DefaultInterfaceContractMapper,
    InterfaceContractMapper,
};
use crate::resolution::policy_match::have_matching_policy;
use crate::runtime::{CompositeActivator, NoopCompositeActivator, UnknownEndpointHandler};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "endpoint_reference_binder";

const ASYNC_CALLBACK_SUFFIX: &str = "_asyncCallback";

/// Whether a bind happens while building a composite or while the domain runs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindMode {
    BuildTime,
    RunTime,
}

impl BindMode {
    pub fn is_run_time(self) -> bool {
        self == BindMode::RunTime
    }

    fn as_field(self) -> &'static str {
        match self {
            BindMode::BuildTime => fields::MODE_BUILD_TIME,
            BindMode::RunTime => fields::MODE_RUN_TIME,
        }
    }
}

/// Outcome of a bind call that did not fail.
#[derive(Clone, Debug)]
pub struct BindReport {
    pub status: Status,
    /// Problems recorded during the call. At build time these may include errors.
    pub problems: Vec<Problem>,
    pub audit: Audit,
}

impl BindReport {
    pub fn is_resolved(&self) -> bool {
        self.status.is_success()
    }
}

///
/// Resolves endpoint references against a [`DomainRegistry`].
///
/// The binder holds no per reference state. Callers must serialise binds of
/// the same reference; binds of different references are independent.
///
pub struct EndpointReferenceBinder {
    extensions: Arc<BuilderRegistry>,
    default_context: BuilderContext,
    interface_mapper: Arc<dyn InterfaceContractMapper>,
    unknown_endpoint_handler: Option<Arc<dyn UnknownEndpointHandler>>,
    composite_activator: Arc<dyn CompositeActivator>,
}

impl EndpointReferenceBinder {
    /// `definitions` are used whenever a bind is called without a builder context.
    pub fn new(extensions: Arc<BuilderRegistry>, definitions: Arc<Definitions>) -> Self {
        Self {
            extensions,
            default_context: BuilderContext::new(definitions),
            interface_mapper: Arc::new(DefaultInterfaceContractMapper),
            unknown_endpoint_handler: None,
            composite_activator: Arc::new(NoopCompositeActivator),
        }
    }

    pub fn with_interface_mapper(mut self, mapper: Arc<dyn InterfaceContractMapper>) -> Self {
        self.interface_mapper = mapper;
        self
    }

    pub fn with_unknown_endpoint_handler(
        mut self,
        handler: Arc<dyn UnknownEndpointHandler>,
    ) -> Self {
        self.unknown_endpoint_handler = Some(handler);
        self
    }

    pub fn with_composite_activator(mut self, activator: Arc<dyn CompositeActivator>) -> Self {
        self.composite_activator = activator;
        self
    }

    pub fn extensions(&self) -> &BuilderRegistry {
        &self.extensions
    }

    pub fn definitions(&self) -> &Arc<Definitions> {
        &self.default_context.definitions
    }

    ///
    /// Binds `endpoint_reference`, which belongs to a reference declared in
    /// `assembly`.
    ///
    /// Autowire placeholders are expanded into the reference's endpoint
    /// reference list and the placeholder itself is left untouched; every
    /// other status is resolved in place.
    ///
    /// # Errors
    ///
    /// At run time, [`BindError::Unresolved`] when the reference ends in a
    /// non success state and [`BindError::IncompatibleInterface`] when the
    /// bound target's interface does not fit the reference. Builder,
    /// activation and registry failures propagate in both modes.
    pub fn bind(
        &self,
        registry: &dyn DomainRegistry,
        assembly: &mut Assembly,
        endpoint_reference: &mut EndpointReference,
        context: Option<&BuilderContext>,
        mode: BindMode,
    ) -> Result<BindReport, BindError> {
        let mut pass = BindPass {
            binder: self,
            registry,
            context: context.unwrap_or(&self.default_context),
            mode,
            monitor: Monitor::new(),
            audit: Audit::new(),
        };

        debug!(
            event = events::BIND_START,
            component = COMPONENT,
            endpoint_reference = %endpoint_reference,
            mode = mode.as_field(),
            "binding endpoint reference"
        );

        let result = pass.run(assembly, endpoint_reference);
        if !pass.audit.is_empty() {
            debug!(
                event = events::BIND_MATCH_AUDIT,
                component = COMPONENT,
                reference = endpoint_reference.reference_name.as_str(),
                "{}",
                pass.audit
            );
        }

        match result {
            Ok(()) => {
                let status = endpoint_reference.status;
                if status.is_success() {
                    debug!(
                        event = events::BIND_OK,
                        component = COMPONENT,
                        reference = endpoint_reference.reference_name.as_str(),
                        target = fields::format_endpoint(endpoint_reference.target_endpoint.as_ref()),
                        binding_type = fields::format_binding_type(endpoint_reference.binding.as_ref()),
                        status = %status,
                        "endpoint reference bound"
                    );
                } else {
                    debug!(
                        event = events::BIND_DEFERRED,
                        component = COMPONENT,
                        reference = endpoint_reference.reference_name.as_str(),
                        status = %status,
                        mode = mode.as_field(),
                        "endpoint reference left for a later pass"
                    );
                }
                Ok(BindReport {
                    status,
                    problems: pass.monitor.take_problems(),
                    audit: pass.audit,
                })
            }
            Err(err) => {
                warn!(
                    event = events::BIND_FAILED,
                    component = COMPONENT,
                    reference = endpoint_reference.reference_name.as_str(),
                    mode = mode.as_field(),
                    err = %err,
                    "endpoint reference bind failed"
                );
                Err(err)
            }
        }
    }

    pub fn bind_build_time(
        &self,
        registry: &dyn DomainRegistry,
        assembly: &mut Assembly,
        endpoint_reference: &mut EndpointReference,
        context: Option<&BuilderContext>,
    ) -> Result<BindReport, BindError> {
        self.bind(registry, assembly, endpoint_reference, context, BindMode::BuildTime)
    }

    pub fn bind_run_time(
        &self,
        registry: &dyn DomainRegistry,
        assembly: &mut Assembly,
        endpoint_reference: &mut EndpointReference,
        context: Option<&BuilderContext>,
    ) -> Result<BindReport, BindError> {
        self.bind(registry, assembly, endpoint_reference, context, BindMode::RunTime)
    }

    /// `true` when the reference's resolved target is no longer among the
    /// registry's matches for it.
    pub fn is_out_of_date(
        &self,
        registry: &dyn DomainRegistry,
        endpoint_reference: &EndpointReference,
    ) -> Result<bool, RegistryError> {
        let Some(target) = endpoint_reference.target_endpoint.as_deref() else {
            return Ok(false);
        };
        if target.unresolved
            || target.uri.is_empty()
            || endpoint_reference.status == Status::ResolvedBinding
        {
            return Ok(false);
        }

        let current = registry.find_endpoint(endpoint_reference)?;
        let out_of_date = !current.iter().any(|endpoint| endpoint.same_as(target));
        if out_of_date {
            info!(
                event = events::REFERENCE_OUT_OF_DATE,
                component = COMPONENT,
                reference = endpoint_reference.reference_name.as_str(),
                target = target.uri.as_str(),
                reason = fields::REASON_TARGET_GONE,
                "endpoint reference target is no longer published"
            );
        }
        Ok(out_of_date)
    }
}

impl Debug for EndpointReferenceBinder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointReferenceBinder")
            .field("extensions", &self.extensions)
            .field(
                "unknown_endpoint_handler",
                &self.unknown_endpoint_handler.is_some(),
            )
            .finish_non_exhaustive()
    }
}

/// State of one bind call.
struct BindPass<'a> {
    binder: &'a EndpointReferenceBinder,
    registry: &'a dyn DomainRegistry,
    context: &'a BuilderContext,
    mode: BindMode,
    monitor: Monitor,
    audit: Audit,
}

impl<'a> BindPass<'a> {
    fn run(
        &mut self,
        assembly: &mut Assembly,
        endpoint_reference: &mut EndpointReference,
    ) -> Result<(), BindError> {
        match endpoint_reference.status {
            Status::AutowirePlaceholder => return self.autowire(assembly, endpoint_reference),
            Status::WiredTargetFoundAndMatched | Status::ResolvedBinding => {
                let callback_missing = endpoint_reference
                    .callback_endpoint
                    .as_deref()
                    .map_or(true, |callback| callback.unresolved);
                if callback_missing && has_callback(assembly, endpoint_reference) {
                    self.select_callback_endpoint(assembly, endpoint_reference)?;
                }
            }
            Status::WiredTargetFoundReadyForMatching => {
                let candidates = target_service_endpoints(assembly, endpoint_reference);
                self.select_forward_endpoint(assembly, endpoint_reference, &candidates)?;
                if has_callback(assembly, endpoint_reference) {
                    self.select_callback_endpoint(assembly, endpoint_reference)?;
                }
            }
            Status::WiredTargetInBindingUri
            | Status::WiredTargetNotFound
            | Status::NotConfigured => {
                let endpoints = self.find_endpoints(endpoint_reference)?;
                if !endpoints.is_empty() {
                    self.select_forward_endpoint(assembly, endpoint_reference, &endpoints)?;
                    if endpoint_reference.status == Status::WiredTargetFoundAndMatched
                        && has_callback(assembly, endpoint_reference)
                    {
                        self.select_callback_endpoint(assembly, endpoint_reference)?;
                    }
                } else if self.mode.is_run_time() {
                    if endpoint_reference.status == Status::WiredTargetInBindingUri {
                        resolve_binding_uri_target(endpoint_reference);
                    } else {
                        self.process_unknown_endpoint(endpoint_reference);
                        if endpoint_reference.status != Status::WiredTargetFoundAndMatched {
                            let problem = self
                                .monitor
                                .error(
                                    COMPONENT,
                                    ENDPOINT_VALIDATION,
                                    catalog::NO_ENDPOINTS_FOUND,
                                    [endpoint_reference.to_string()],
                                )
                                .clone();
                            return Err(self.unresolved(problem));
                        }
                    }
                } else {
                    self.process_unknown_endpoint(endpoint_reference);
                }
            }
        }

        if !endpoint_reference.status.is_success() {
            debug!(
                event = events::FORWARD_ENDPOINT_NOT_FOUND,
                component = COMPONENT,
                reference = endpoint_reference.reference_name.as_str(),
                status = %endpoint_reference.status,
                reason = fields::REASON_NO_MATCHING_CANDIDATE,
                "no endpoint matched"
            );
            if self.mode.is_run_time() {
                let problem = self
                    .monitor
                    .error(
                        COMPONENT,
                        ENDPOINT_VALIDATION,
                        catalog::ENDPOINT_REFERENCE_CANT_BE_MATCHED,
                        [endpoint_reference.to_string(), self.audit.to_string()],
                    )
                    .clone();
                return Err(self.unresolved(problem));
            }
            let target = endpoint_reference
                .target_uri()
                .unwrap_or(&endpoint_reference.reference_name)
                .to_string();
            self.monitor.warning(
                COMPONENT,
                ENDPOINT_VALIDATION,
                catalog::COMPONENT_REFERENCE_TARGET_NOT_FOUND,
                [target],
            );
            return Ok(());
        }

        self.validate_reference_interface(assembly, endpoint_reference)?;
        self.create_async_callback_endpoint(assembly, endpoint_reference)?;
        Ok(())
    }

    fn find_endpoints(
        &self,
        endpoint_reference: &EndpointReference,
    ) -> Result<Vec<Arc<Endpoint>>, BindError> {
        Ok(self.registry.find_endpoint(endpoint_reference)?)
    }

    fn unresolved(&self, problem: Problem) -> BindError {
        BindError::Unresolved {
            problem,
            audit: self.audit.to_string(),
        }
    }

    fn autowire(
        &mut self,
        assembly: &mut Assembly,
        placeholder: &mut EndpointReference,
    ) -> Result<(), BindError> {
        let reference_id = placeholder.reference;
        let Some(reference) = assembly.get_reference(reference_id) else {
            return Ok(());
        };
        let multiplicity = reference.multiplicity;
        let reference_name = reference.name.clone();
        let already_wired = reference.endpoint_references.len();

        let mut wired = Vec::new();
        for endpoint in self.registry.endpoints()? {
            if endpoint.component_uri == placeholder.component_uri {
                continue;
            }
            if multiplicity.is_single() && already_wired + wired.len() >= 1 {
                break;
            }
            let known = assembly.reference(reference_id).endpoint_references.iter();
            if known.chain(wired.iter()).any(|epr: &EndpointReference| epr.targets(&endpoint)) {
                continue;
            }

            let mut candidate = placeholder.clone();
            if have_matching_policy(
                &mut candidate,
                &endpoint,
                &mut self.audit,
                &self.binder.extensions,
                self.context,
            ) && have_matching_interface_contracts(
                self.binder.interface_mapper.as_ref(),
                assembly,
                &candidate,
                &endpoint,
                &mut self.audit,
            ) {
                candidate.binding = endpoint.binding.clone();
                candidate.target_endpoint = Some(endpoint.clone());
                candidate.status = Status::WiredTargetFoundAndMatched;
                candidate.unresolved = false;
                debug!(
                    event = events::AUTOWIRE_CANDIDATE_WIRED,
                    component = COMPONENT,
                    reference = reference_name.as_str(),
                    target = endpoint.uri.as_str(),
                    "autowire candidate wired"
                );
                wired.push(candidate);
            }
        }

        let reference = assembly.reference_mut(reference_id);
        reference.endpoint_references.extend(wired);

        if multiplicity.is_mandatory() && reference.endpoint_references.is_empty() {
            let problem = self
                .monitor
                .error(
                    COMPONENT,
                    ENDPOINT_VALIDATION,
                    catalog::NO_COMPONENT_REFERENCE_TARGET,
                    [reference_name.clone()],
                )
                .clone();
            if self.mode.is_run_time() {
                return Err(self.unresolved(problem));
            }
            self.monitor.warning(
                COMPONENT,
                ENDPOINT_VALIDATION,
                catalog::COMPONENT_REFERENCE_TARGET_NOT_FOUND,
                [reference_name],
            );
            return Ok(());
        }

        select_single_autowire_target(assembly, reference_id);
        Ok(())
    }

    fn select_forward_endpoint(
        &mut self,
        assembly: &Assembly,
        endpoint_reference: &mut EndpointReference,
        endpoints: &[Arc<Endpoint>],
    ) -> Result<(), BindError> {
        let matched = if endpoint_reference.is_self_reference() {
            match endpoint_reference.target_endpoint.as_ref() {
                Some(target) if !target.unresolved => Some(target.clone()),
                _ => endpoints.first().cloned(),
            }
        } else {
            let mut matched = None;
            for endpoint in endpoints {
                if have_matching_policy(
                    endpoint_reference,
                    endpoint,
                    &mut self.audit,
                    &self.binder.extensions,
                    self.context,
                ) && have_matching_interface_contracts(
                    self.binder.interface_mapper.as_ref(),
                    assembly,
                    endpoint_reference,
                    endpoint,
                    &mut self.audit,
                ) {
                    matched = Some(endpoint.clone());
                    break;
                }
            }
            matched
        };

        let Some(endpoint) = matched else {
            return Ok(());
        };

        let mut binding = endpoint.binding.clone().unwrap_or_else(Binding::sca);
        if endpoint_reference.policy_sets.is_empty() {
            endpoint_reference
                .policy_sets
                .extend(endpoint.policy_sets.iter().cloned());
        }
        if let Some(builder) = self.binder.extensions.binding_builder(&binding.binding_type) {
            let subject = BuildSubject {
                component_uri: &endpoint_reference.component_uri,
                contract_name: &endpoint_reference.reference_name,
                interface_contract: reference_contract(assembly, endpoint_reference),
            };
            builder.build(subject, &mut binding, self.context, false)?;
        }

        debug!(
            event = events::FORWARD_ENDPOINT_SELECTED,
            component = COMPONENT,
            reference = endpoint_reference.reference_name.as_str(),
            target = endpoint.uri.as_str(),
            binding_type = binding.binding_type.to_string(),
            "forward endpoint selected"
        );
        endpoint_reference.binding = Some(binding);
        endpoint_reference.target_endpoint = Some(endpoint);
        endpoint_reference.status = Status::WiredTargetFoundAndMatched;
        endpoint_reference.unresolved = false;
        Ok(())
    }

    fn select_callback_endpoint(
        &mut self,
        assembly: &mut Assembly,
        endpoint_reference: &mut EndpointReference,
    ) -> Result<(), BindError> {
        let Some(target) = endpoint_reference.target_endpoint.clone() else {
            return Ok(());
        };
        let Some(callback_service_id) = assembly
            .get_reference(endpoint_reference.reference)
            .and_then(|reference| reference.callback_service)
        else {
            return Ok(());
        };
        let callback_endpoints = assembly.service(callback_service_id).endpoints.clone();

        let mut selected = None;
        'search: for callback_reference in &target.callback_endpoint_references {
            for endpoint in &callback_endpoints {
                let mut snapshot = callback_reference.clone();
                if have_matching_policy(
                    &mut snapshot,
                    endpoint,
                    &mut self.audit,
                    &self.binder.extensions,
                    self.context,
                ) && have_matching_interface_contracts(
                    self.binder.interface_mapper.as_ref(),
                    assembly,
                    &snapshot,
                    endpoint,
                    &mut self.audit,
                ) {
                    selected = Some(endpoint.clone());
                    break 'search;
                }
            }
        }

        let forward_is_sca = endpoint_reference
            .binding
            .as_ref()
            .map_or(true, Binding::is_sca);
        let needs_synthesis = match &selected {
            None => true,
            Some(endpoint) => {
                endpoint.binding.as_ref().is_some_and(Binding::is_sca) && !forward_is_sca
            }
        };

        let callback_endpoint = if needs_synthesis {
            self.synthesize_callback_endpoint(
                assembly,
                endpoint_reference,
                &target,
                callback_service_id,
            )?
        } else {
            match selected {
                Some(endpoint) => endpoint,
                None => return Ok(()),
            }
        };

        debug!(
            event = events::CALLBACK_ENDPOINT_SELECTED,
            component = COMPONENT,
            reference = endpoint_reference.reference_name.as_str(),
            callback_endpoint = callback_endpoint.uri.as_str(),
            "callback endpoint selected"
        );
        endpoint_reference.callback_endpoint = Some(callback_endpoint);
        Ok(())
    }

    fn synthesize_callback_endpoint(
        &mut self,
        assembly: &mut Assembly,
        endpoint_reference: &EndpointReference,
        target: &Endpoint,
        callback_service_id: ServiceId,
    ) -> Result<Arc<Endpoint>, BindError> {
        let forward_binding = endpoint_reference.binding.clone().unwrap_or_else(Binding::sca);
        let mut callback_binding = target
            .callback_endpoint_references
            .iter()
            .filter_map(|callback_reference| callback_reference.binding.as_ref())
            .find(|binding| binding.binding_type == forward_binding.binding_type)
            .cloned()
            .unwrap_or_else(|| forward_binding.clone());

        let callback_service = assembly.service(callback_service_id);
        callback_binding.uri = callback_service
            .endpoints
            .iter()
            .filter_map(|endpoint| endpoint.binding.as_ref())
            .filter(|binding| binding.is_sca())
            .next_back()
            .and_then(|binding| binding.uri.clone());
        let service_name = callback_service.name.clone();
        let interface_contract = callback_service.interface_contract.clone();

        if let Some(builder) = self
            .binder
            .extensions
            .binding_builder(&callback_binding.binding_type)
        {
            let subject = BuildSubject {
                component_uri: &endpoint_reference.component_uri,
                contract_name: &service_name,
                interface_contract: interface_contract.as_ref(),
            };
            builder.build(subject, &mut callback_binding, self.context, true)?;
        }

        let mut endpoint = Endpoint::published(
            &endpoint_reference.component_uri,
            &service_name,
            callback_binding.clone(),
        )
        .owned_by(endpoint_reference.component, callback_service_id);
        endpoint.interface_contract = interface_contract;
        endpoint.forward_service = Some(endpoint_reference.reference_name.clone());
        let endpoint = Arc::new(endpoint);

        let callback_service = assembly.service_mut(callback_service_id);
        callback_service.bindings.push(callback_binding);
        callback_service.endpoints.push(endpoint.clone());

        if self.mode.is_run_time() {
            self.binder.composite_activator.activate(&endpoint)?;
            self.binder.composite_activator.start(&endpoint)?;
        }

        info!(
            event = events::CALLBACK_ENDPOINT_SYNTHESIZED,
            component = COMPONENT,
            reference = endpoint_reference.reference_name.as_str(),
            callback_endpoint = endpoint.uri.as_str(),
            binding_uri = fields::format_binding_uri(endpoint.binding.as_ref()),
            mode = self.mode.as_field(),
            "callback endpoint synthesized"
        );
        Ok(endpoint)
    }

    fn process_unknown_endpoint(&mut self, endpoint_reference: &mut EndpointReference) {
        let Some(handler) = self.binder.unknown_endpoint_handler.as_ref() else {
            return;
        };
        let Some(binding) = handler.handle_unknown_endpoint(endpoint_reference) else {
            return;
        };

        let target_uri = binding
            .uri
            .clone()
            .or_else(|| endpoint_reference.target_uri().map(str::to_string))
            .unwrap_or_else(|| endpoint_reference.reference_name.clone());
        let mut endpoint = match endpoint_reference.target_endpoint.as_deref() {
            Some(target) => Endpoint::unresolved_target(&target.uri),
            None => Endpoint::unresolved_target(&target_uri),
        };
        endpoint.uri = target_uri;
        endpoint.binding = Some(binding.clone());
        endpoint.remote = true;
        endpoint.unresolved = false;

        self.audit.append(format!(
            "Match because the UnknownEndpointHandler provided a binding: {binding}"
        ));
        self.audit.append_separator();

        info!(
            event = events::UNKNOWN_ENDPOINT_RESOLVED,
            component = COMPONENT,
            reference = endpoint_reference.reference_name.as_str(),
            target = endpoint.uri.as_str(),
            binding_type = binding.binding_type.to_string(),
            "unknown endpoint handler provided a binding"
        );
        endpoint_reference.target_endpoint = Some(Arc::new(endpoint));
        endpoint_reference.binding = Some(binding);
        endpoint_reference.unresolved = false;
        endpoint_reference.status = Status::WiredTargetFoundAndMatched;
    }

    fn validate_reference_interface(
        &mut self,
        assembly: &Assembly,
        endpoint_reference: &EndpointReference,
    ) -> Result<(), BindError> {
        let Some(source) = reference_contract(assembly, endpoint_reference) else {
            return Ok(());
        };
        let Some(target) = endpoint_reference.target_endpoint.as_deref() else {
            return Ok(());
        };
        let Some(target_contract) = target.interface_contract.as_ref() else {
            return Ok(());
        };
        if target.has_empty_interface() {
            return Ok(());
        }

        if compare_contracts(
            self.binder.interface_mapper.as_ref(),
            source,
            target_contract,
            &mut self.audit,
        ) {
            return Ok(());
        }

        self.monitor.error(
            COMPONENT,
            ENDPOINT_VALIDATION,
            catalog::INCOMPATIBLE_REFERENCE_INTERFACE,
            [endpoint_reference.to_string(), target.uri.clone()],
        );
        if self.mode.is_run_time() {
            return Err(BindError::IncompatibleInterface {
                reference: endpoint_reference.reference_name.clone(),
                target: target.uri.clone(),
                audit: self.audit.to_string(),
            });
        }
        Ok(())
    }

    fn create_async_callback_endpoint(
        &mut self,
        assembly: &Assembly,
        endpoint_reference: &mut EndpointReference,
    ) -> Result<(), BindError> {
        if !endpoint_reference.async_invocation || endpoint_reference.callback_endpoint.is_some() {
            return Ok(());
        }
        let mut binding = endpoint_reference.binding.clone().unwrap_or_else(Binding::sca);
        let builder = self.binder.extensions.binding_builder(&binding.binding_type);
        if builder.is_some_and(|builder| builder.supports_native_async()) {
            return Ok(());
        }

        let service_name = format!(
            "{}{ASYNC_CALLBACK_SUFFIX}",
            endpoint_reference.reference_name
        );
        if let Some(builder) = builder {
            let subject = BuildSubject {
                component_uri: &endpoint_reference.component_uri,
                contract_name: &service_name,
                interface_contract: reference_contract(assembly, endpoint_reference),
            };
            builder.build(subject, &mut binding, self.context, true)?;
        }

        let mut endpoint =
            Endpoint::published(&endpoint_reference.component_uri, &service_name, binding);
        endpoint.component = Some(endpoint_reference.component);
        endpoint.forward_service = Some(endpoint_reference.reference_name.clone());

        if self.mode.is_run_time() {
            self.binder.composite_activator.activate(&endpoint)?;
            self.binder.composite_activator.start(&endpoint)?;
        }

        info!(
            event = events::ASYNC_CALLBACK_SYNTHESIZED,
            component = COMPONENT,
            reference = endpoint_reference.reference_name.as_str(),
            callback_endpoint = endpoint.uri.as_str(),
            "async response endpoint synthesized"
        );
        endpoint_reference.callback_endpoint = Some(Arc::new(endpoint));
        Ok(())
    }
}

/// A forward reference other than a self reference, whose contract declares a callback.
fn has_callback(assembly: &Assembly, endpoint_reference: &EndpointReference) -> bool {
    !endpoint_reference.is_self_reference()
        && assembly
            .get_reference(endpoint_reference.reference)
            .is_some_and(|reference| reference.has_callback())
}

fn reference_contract<'a>(
    assembly: &'a Assembly,
    endpoint_reference: &EndpointReference,
) -> Option<&'a InterfaceContract> {
    assembly
        .get_reference(endpoint_reference.reference)
        .and_then(|reference| reference.interface_contract.as_ref())
}

/// Endpoints of the service that published the current target.
fn target_service_endpoints(
    assembly: &Assembly,
    endpoint_reference: &EndpointReference,
) -> Vec<Arc<Endpoint>> {
    let Some(target) = endpoint_reference.target_endpoint.as_ref() else {
        return Vec::new();
    };
    match target.service.and_then(|service| assembly.get_service(service)) {
        Some(service) if !service.endpoints.is_empty() => service.endpoints.clone(),
        _ => vec![target.clone()],
    }
}

/// Takes the reference's binding URI literally as the target.
fn resolve_binding_uri_target(endpoint_reference: &mut EndpointReference) {
    let mut target = match endpoint_reference.target_endpoint.as_deref() {
        Some(target) => target.clone(),
        None => {
            let uri = endpoint_reference
                .binding
                .as_ref()
                .and_then(|binding| binding.uri.as_deref())
                .unwrap_or_default();
            Endpoint::unresolved_target(uri)
        }
    };
    target.binding = endpoint_reference.binding.clone();
    endpoint_reference.target_endpoint = Some(Arc::new(target));
    endpoint_reference.status = Status::ResolvedBinding;
    endpoint_reference.unresolved = false;
}

/// Keeps only the wired target named by the reference's single binding URI.
fn select_single_autowire_target(assembly: &mut Assembly, reference_id: ReferenceId) {
    let reference = assembly.reference_mut(reference_id);
    if reference.endpoint_references.len() <= 1 || reference.bindings.len() != 1 {
        return;
    }
    let Some(uri) = reference.bindings[0].uri.clone() else {
        return;
    };
    let Some(position) = reference.endpoint_references.iter().position(|epr| {
        epr.target_endpoint
            .as_deref()
            .is_some_and(|target| matches_target(&uri, target))
    }) else {
        return;
    };

    let selected = reference.endpoint_references.swap_remove(position);
    debug!(
        event = events::AUTOWIRE_SINGLE_TARGET_SELECTED,
        component = COMPONENT,
        reference = reference.name.as_str(),
        target = fields::format_endpoint(selected.target_endpoint.as_ref()),
        dropped = reference.endpoint_references.len(),
        "binding URI selected a single autowire target"
    );
    reference.endpoint_references = vec![selected];
}
