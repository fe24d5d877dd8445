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

//! A node's view of an SCA domain: deployed composites, the endpoint registry
//! and the binder that wires them together.

use crate::assembly::{
    Assembly, ComponentId, Composite, Endpoint, EndpointReference, ReferenceId, Status,
};
use crate::builder::{BindingBaseUris, BuilderContext, StructuralUriBuilder};
use crate::deployment::{
    endpoint_from_descriptor, initial_endpoint_references, AssembledComposite, CompositeAssembler,
};
use crate::error::{BindError, DeploymentError};
use crate::monitor::{Monitor, Problem};
use crate::observability::events;
use crate::registry::{DomainRegistry, EndpointDirectory, LocalDomainRegistry};
use crate::resolution::{BindMode, EndpointReferenceBinder};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const COMPONENT: &str = "sca_domain";

/// Outcome of binding one reference during deployment.
#[derive(Clone, Debug)]
pub struct ReferenceReport {
    pub component: String,
    pub reference: String,
    /// Endpoint references the reference ended up with, resolved or not.
    pub endpoint_references: Vec<EndpointReference>,
    pub problems: Vec<Problem>,
}

impl ReferenceReport {
    pub fn is_resolved(&self) -> bool {
        !self.endpoint_references.is_empty()
            && self
                .endpoint_references
                .iter()
                .all(|endpoint_reference| endpoint_reference.status.is_success())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeploymentReport {
    pub composite: String,
    pub components: Vec<String>,
    /// URIs of the endpoints published to the registry.
    pub endpoints: Vec<String>,
    /// Problems found while assembling the composite.
    pub problems: Vec<Problem>,
    pub references: Vec<ReferenceReport>,
}

impl DeploymentReport {
    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .chain(self.references.iter().flat_map(|reference| reference.problems.iter()))
            .any(Problem::is_error)
    }

    /// Every problem, assembly problems first.
    pub fn all_problems(&self) -> impl Iterator<Item = &Problem> {
        self.problems
            .iter()
            .chain(self.references.iter().flat_map(|reference| reference.problems.iter()))
    }
}

/// Outcome of [`ScaDomain::refresh_endpoints`].
#[derive(Clone, Debug, Default)]
pub struct RefreshReport {
    /// Foreign endpoints published to the registry.
    pub endpoints: Vec<Arc<Endpoint>>,
    /// Records skipped because the component is deployed locally.
    pub skipped: usize,
    /// Problems found in the records, such as unknown intents.
    pub problems: Vec<Problem>,
}

/// Endpoint references as declared, before autowire expansion.
struct DeclaredReference {
    context: Arc<BuilderContext>,
    endpoint_references: Vec<EndpointReference>,
}

#[derive(Default)]
struct DomainState {
    assembly: Assembly,
    declared: IndexMap<ReferenceId, DeclaredReference>,
    /// Components of each deployed composite, by composite name.
    composites: IndexMap<String, Vec<ComponentId>>,
}

impl DomainState {
    /// Declared references minus placeholders, followed by autowired ones.
    fn effective_endpoint_references(&self, reference_id: ReferenceId) -> Vec<EndpointReference> {
        let declared = self
            .declared
            .get(&reference_id)
            .map(|declared| declared.endpoint_references.as_slice())
            .unwrap_or_default();
        declared
            .iter()
            .filter(|endpoint_reference| endpoint_reference.status != Status::AutowirePlaceholder)
            .chain(self.assembly.reference(reference_id).endpoint_references.iter())
            .cloned()
            .collect()
    }
}

///
/// Deploys composites into a domain and resolves their references.
///
/// All operations on one domain are serialised, so two callers resolving the
/// same reference never rebind it concurrently. The registry may be shared
/// with other domains or nodes.
///
pub struct ScaDomain {
    name: String,
    binder: EndpointReferenceBinder,
    registry: Arc<dyn DomainRegistry>,
    state: Mutex<DomainState>,
}

impl ScaDomain {
    pub fn new(
        name: &str,
        binder: EndpointReferenceBinder,
        registry: Arc<dyn DomainRegistry>,
    ) -> Self {
        Self {
            name: name.to_string(),
            binder,
            registry,
            state: Mutex::new(DomainState::default()),
        }
    }

    /// A domain backed by an in-process [`LocalDomainRegistry`].
    pub fn with_local_registry(name: &str, binder: EndpointReferenceBinder) -> Self {
        Self::new(name, binder, Arc::new(LocalDomainRegistry::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binder(&self) -> &EndpointReferenceBinder {
        &self.binder
    }

    pub fn registry(&self) -> &Arc<dyn DomainRegistry> {
        &self.registry
    }

    ///
    /// Deploys `composite`: assigns structural URIs, assembles its components,
    /// publishes their endpoints and binds every reference at build time.
    ///
    /// Unresolved references are not an error here; they are reported in the
    /// returned [`DeploymentReport`] and retried by
    /// [`ScaDomain::resolve_reference`].
    ///
    /// # Errors
    ///
    /// Registry failures, a composite deployed twice, and binding or policy
    /// builder failures.
    pub async fn deploy(
        &self,
        mut composite: Composite,
        base_uris: BindingBaseUris,
    ) -> Result<DeploymentReport, DeploymentError> {
        info!(
            event = events::DEPLOY_START,
            component = COMPONENT,
            domain = self.name.as_str(),
            composite = composite.name.as_str(),
            "deploying composite"
        );

        let result = self.deploy_composite(&mut composite, base_uris).await;
        match &result {
            Ok(report) => info!(
                event = events::DEPLOY_OK,
                component = COMPONENT,
                domain = self.name.as_str(),
                composite = composite.name.as_str(),
                components = report.components.len(),
                endpoints = report.endpoints.len(),
                references = report.references.len(),
                problems = report.all_problems().count(),
                "composite deployed"
            ),
            Err(err) => warn!(
                event = events::DEPLOY_FAILED,
                component = COMPONENT,
                domain = self.name.as_str(),
                composite = composite.name.as_str(),
                err = %err,
                "composite deployment failed"
            ),
        }
        result
    }

    async fn deploy_composite(
        &self,
        composite: &mut Composite,
        base_uris: BindingBaseUris,
    ) -> Result<DeploymentReport, DeploymentError> {
        self.registry.install_contribution(&composite.name)?;

        let mut monitor = Monitor::new();
        StructuralUriBuilder::new().build(composite, &base_uris, &mut monitor);

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let definitions = self.binder.definitions().clone();
        let assembled = CompositeAssembler::new(&definitions, &base_uris).assemble(
            composite,
            &mut state.assembly,
            &mut monitor,
        );

        let mut report = DeploymentReport {
            composite: composite.name.clone(),
            components: assembled
                .components
                .iter()
                .map(|id| state.assembly.component(*id).uri.clone())
                .collect(),
            problems: monitor.take_problems(),
            ..DeploymentReport::default()
        };

        let context = Arc::new(BuilderContext::new(definitions).with_binding_base_uris(base_uris));
        match self.publish_and_bind(state, &assembled, &context, &mut report) {
            Ok(()) => {
                state
                    .composites
                    .insert(composite.name.clone(), assembled.components);
                Ok(report)
            }
            Err(err) => {
                self.roll_back(state, &composite.name, &assembled, &report.endpoints);
                Err(err)
            }
        }
    }

    fn publish_and_bind(
        &self,
        state: &mut DomainState,
        assembled: &AssembledComposite,
        context: &Arc<BuilderContext>,
        report: &mut DeploymentReport,
    ) -> Result<(), DeploymentError> {
        for endpoint in &assembled.endpoints {
            self.registry.add_endpoint(endpoint.clone())?;
            debug!(
                event = events::ENDPOINT_PUBLISHED,
                component = COMPONENT,
                endpoint = endpoint.uri.as_str(),
                "service endpoint published"
            );
            report.endpoints.push(endpoint.uri.clone());
        }

        for &reference_id in &assembled.references {
            let mut endpoint_references = initial_endpoint_references(&state.assembly, reference_id);
            let mut problems = Vec::new();
            for endpoint_reference in &mut endpoint_references {
                let bound = self.binder.bind(
                    self.registry.as_ref(),
                    &mut state.assembly,
                    endpoint_reference,
                    Some(context),
                    BindMode::BuildTime,
                );
                match bound {
                    Ok(bind_report) => problems.extend(bind_report.problems),
                    Err(source) => return Err(bind_failed(&state.assembly, reference_id, source)),
                }
            }
            state.declared.insert(
                reference_id,
                DeclaredReference {
                    context: context.clone(),
                    endpoint_references,
                },
            );

            let reference = state.assembly.reference(reference_id);
            report.references.push(ReferenceReport {
                component: state.assembly.component(reference.component).uri.clone(),
                reference: reference.name.clone(),
                endpoint_references: state.effective_endpoint_references(reference_id),
                problems,
            });
        }
        Ok(())
    }

    /// Undoes a failed deployment so the composite can be deployed again.
    fn roll_back(
        &self,
        state: &mut DomainState,
        composite_name: &str,
        assembled: &AssembledComposite,
        published: &[String],
    ) {
        for uri in published {
            if let Err(err) = self.registry.remove_endpoint(uri) {
                warn!(
                    component = COMPONENT,
                    endpoint = uri.as_str(),
                    err = %err,
                    "unable to withdraw endpoint of failed deployment"
                );
            }
        }
        for reference_id in &assembled.references {
            state.declared.shift_remove(reference_id);
        }
        for &component_id in &assembled.components {
            state.assembly.retire_component(component_id);
        }
        self.registry.uninstall_contribution(composite_name);

        warn!(
            event = events::DEPLOY_ROLLED_BACK,
            component = COMPONENT,
            domain = self.name.as_str(),
            composite = composite_name,
            endpoints = published.len(),
            "failed deployment rolled back"
        );
    }

    ///
    /// Binds a deployed reference at run time and returns its endpoint
    /// references.
    ///
    /// References whose target has left the registry are regenerated from
    /// their declaration and bound again; autowired references are dropped
    /// and the autowire search rerun.
    ///
    /// # Errors
    ///
    /// [`DeploymentError::Bind`] when an endpoint reference cannot be resolved,
    /// or when the component or reference is unknown.
    pub async fn resolve_reference(
        &self,
        component_uri: &str,
        reference_name: &str,
    ) -> Result<Vec<EndpointReference>, DeploymentError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let component_id = state
            .assembly
            .find_component(component_uri)
            .ok_or_else(|| DeploymentError::UnknownComponent(component_uri.to_string()))?;
        let reference_id = state
            .assembly
            .find_reference(component_id, reference_name)
            .ok_or_else(|| DeploymentError::UnknownReference {
                component: component_uri.to_string(),
                reference: reference_name.to_string(),
            })?;
        let Some(declared) = state.declared.get_mut(&reference_id) else {
            return Err(DeploymentError::UnknownReference {
                component: component_uri.to_string(),
                reference: reference_name.to_string(),
            });
        };

        let mut stale = Vec::new();
        for (index, endpoint_reference) in
            state.assembly.reference(reference_id).endpoint_references.iter().enumerate()
        {
            if self.binder.is_out_of_date(self.registry.as_ref(), endpoint_reference)? {
                stale.push(index);
            }
        }
        let autowired = &mut state.assembly.reference_mut(reference_id).endpoint_references;
        for index in stale.into_iter().rev() {
            autowired.remove(index);
        }

        let regenerated = initial_endpoint_references(&state.assembly, reference_id);
        for (index, endpoint_reference) in declared.endpoint_references.iter_mut().enumerate() {
            if self.binder.is_out_of_date(self.registry.as_ref(), endpoint_reference)? {
                if let Some(fresh) = regenerated.get(index) {
                    *endpoint_reference = fresh.clone();
                }
            }
            if endpoint_reference.status.is_success() {
                continue;
            }
            self.binder
                .bind(
                    self.registry.as_ref(),
                    &mut state.assembly,
                    endpoint_reference,
                    Some(&declared.context),
                    BindMode::RunTime,
                )
                .map_err(|source| bind_failed(&state.assembly, reference_id, source))?;
        }

        Ok(state.effective_endpoint_references(reference_id))
    }

    ///
    /// Publishes the endpoints `directory` knows about.
    ///
    /// Records for components deployed in this domain are skipped; the local
    /// declaration wins. Undeployed components no longer count as local.
    ///
    /// # Errors
    ///
    /// Directory and registry failures.
    pub async fn refresh_endpoints(
        &self,
        directory: &dyn EndpointDirectory,
    ) -> Result<RefreshReport, DeploymentError> {
        info!(
            event = events::DIRECTORY_FETCH_START,
            component = COMPONENT,
            domain = self.name.as_str(),
            "fetching endpoints from directory"
        );
        let descriptors = directory.fetch_endpoints().await.map_err(|err| {
            warn!(
                event = events::DIRECTORY_FETCH_FAILED,
                component = COMPONENT,
                domain = self.name.as_str(),
                err = %err,
                "endpoint directory fetch failed"
            );
            err
        })?;

        let state = self.state.lock().await;
        let mut monitor = Monitor::new();
        let mut report = RefreshReport::default();
        for descriptor in &descriptors {
            if state.assembly.find_component(&descriptor.component_uri).is_some() {
                debug!(
                    component = COMPONENT,
                    component_uri = descriptor.component_uri.as_str(),
                    service = descriptor.service.as_str(),
                    "directory record shadows a local component, skipped"
                );
                report.skipped += 1;
                continue;
            }
            let endpoint = Arc::new(endpoint_from_descriptor(
                descriptor,
                self.binder.definitions(),
                &mut monitor,
            ));
            self.registry.add_endpoint(endpoint.clone())?;
            report.endpoints.push(endpoint);
        }
        report.problems = monitor.take_problems();

        info!(
            event = events::DIRECTORY_FETCH_OK,
            component = COMPONENT,
            domain = self.name.as_str(),
            fetched = descriptors.len(),
            published = report.endpoints.len(),
            skipped = report.skipped,
            problems = report.problems.len(),
            "directory endpoints published"
        );
        Ok(report)
    }

    ///
    /// Withdraws every endpoint of a deployed component and returns them.
    ///
    /// The component stops being local to this domain, so a later
    /// [`ScaDomain::refresh_endpoints`] may publish its foreign copy.
    ///
    pub async fn undeploy(&self, component_uri: &str) -> Result<Vec<Arc<Endpoint>>, DeploymentError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let component_id = state
            .assembly
            .find_component(component_uri)
            .ok_or_else(|| DeploymentError::UnknownComponent(component_uri.to_string()))?;

        let removed = self.withdraw_component(state, component_id)?;
        for components in state.composites.values_mut() {
            components.retain(|id| *id != component_id);
        }

        info!(
            event = events::UNDEPLOY_OK,
            component = COMPONENT,
            domain = self.name.as_str(),
            component_uri,
            endpoints = removed.len(),
            "component undeployed"
        );
        Ok(removed)
    }

    /// Stops a deployed composite: withdraws the endpoints of its remaining
    /// components and uninstalls its contribution.
    pub async fn undeploy_composite(
        &self,
        composite_name: &str,
    ) -> Result<Vec<Arc<Endpoint>>, DeploymentError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(components) = state.composites.get(composite_name).cloned() else {
            return Err(DeploymentError::UnknownComposite(composite_name.to_string()));
        };

        let mut removed = Vec::new();
        for component_id in components {
            removed.extend(self.withdraw_component(state, component_id)?);
        }
        state.composites.shift_remove(composite_name);
        self.registry.uninstall_contribution(composite_name);

        info!(
            event = events::UNDEPLOY_COMPOSITE_OK,
            component = COMPONENT,
            domain = self.name.as_str(),
            composite = composite_name,
            endpoints = removed.len(),
            "composite undeployed"
        );
        Ok(removed)
    }

    fn withdraw_component(
        &self,
        state: &mut DomainState,
        component_id: ComponentId,
    ) -> Result<Vec<Arc<Endpoint>>, DeploymentError> {
        let mut removed = Vec::new();
        for service_id in state.assembly.service_ids() {
            let service = state.assembly.service(service_id);
            if service.component != component_id || service.is_callback {
                continue;
            }
            for endpoint in &service.endpoints {
                if let Some(endpoint) = self.registry.remove_endpoint(&endpoint.uri)? {
                    removed.push(endpoint);
                }
            }
        }

        let references: Vec<_> = state
            .assembly
            .reference_ids()
            .filter(|id| state.assembly.reference(*id).component == component_id)
            .collect();
        for reference_id in references {
            state.declared.shift_remove(&reference_id);
        }
        state.assembly.retire_component(component_id);
        Ok(removed)
    }
}

fn bind_failed(
    assembly: &Assembly,
    reference_id: ReferenceId,
    source: BindError,
) -> DeploymentError {
    let reference = assembly.reference(reference_id);
    DeploymentError::Bind {
        component: assembly.component(reference.component).uri.clone(),
        reference: reference.name.clone(),
        source,
    }
}
