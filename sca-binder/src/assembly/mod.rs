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

//! Assembly model: composites, endpoints, endpoint references and policy.

pub mod arena;
pub mod binding;
pub mod composite;
pub mod endpoint;
pub mod endpoint_reference;
pub mod interface;
pub mod multiplicity;
pub mod policy;
pub mod qname;

pub use arena::{
    Assembly, ComponentDecl, ComponentId, ReferenceDecl, ReferenceId, ServiceDecl, ServiceId,
};
pub use binding::{sca_binding_type, Binding};
pub use composite::{
    Callback, Component, ComponentReference, ComponentService, Composite, CompositeReference,
    CompositeService, Contract, ContractRole, Implementation,
};
pub use endpoint::{structural_endpoint_uri, Endpoint, EndpointDescriptor};
pub use endpoint_reference::{EndpointReference, Status, SELF_REFERENCE_PREFIX};
pub use interface::{Interface, InterfaceContract, InterfaceKind, Operation};
pub use multiplicity::Multiplicity;
pub use policy::{
    BindingType, Definitions, Intent, IntentMap, PolicyExpression, PolicySet, Qualifier,
};
pub use qname::{QName, QNameError};
