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

//! Endpoint reference resolution: binder, policy and interface matching.

pub mod audit;
pub mod binder;
pub mod interface_match;
pub mod policy_match;

pub use audit::Audit;
pub use binder::{BindMode, BindReport, EndpointReferenceBinder};
pub use interface_match::{
    have_matching_interface_contracts, DefaultInterfaceContractMapper, InterfaceContractMapper,
};
pub use policy_match::{have_matching_policy, mutually_exclusive};
