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

//! Runtime collaborators the binder calls out to.

use crate::assembly::{Binding, Endpoint, EndpointReference};
use crate::error::ActivationError;
use tracing::debug;

const COMPONENT: &str = "runtime";

/// Last resort for references whose target is not in the registry.
pub trait UnknownEndpointHandler: Send + Sync {
    /// Returns a binding that reaches the target outside the domain, if one is known.
    fn handle_unknown_endpoint(&self, endpoint_reference: &EndpointReference) -> Option<Binding>;
}

/// Lifecycle hooks for endpoints the binder creates while the domain runs.
pub trait CompositeActivator: Send + Sync {
    fn activate(&self, endpoint: &Endpoint) -> Result<(), ActivationError>;

    fn start(&self, endpoint: &Endpoint) -> Result<(), ActivationError>;
}

/// Activator for nodes that do not host transports in-process.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCompositeActivator;

impl CompositeActivator for NoopCompositeActivator {
    fn activate(&self, endpoint: &Endpoint) -> Result<(), ActivationError> {
        debug!(component = COMPONENT, endpoint = %endpoint.uri, "activate");
        Ok(())
    }

    fn start(&self, endpoint: &Endpoint) -> Result<(), ActivationError> {
        debug!(component = COMPONENT, endpoint = %endpoint.uri, "start");
        Ok(())
    }
}
