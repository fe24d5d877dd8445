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

//! # sca-binder
//!
//! `sca-binder` resolves the references of Service Component Architecture
//! components against the service endpoints published in a domain.
//!
//! Typical usage goes through [`ScaDomain`]: deploy a [`Composite`], then
//! resolve references at run time. The lower layers ([`EndpointReferenceBinder`],
//! [`StructuralUriBuilder`], the registry and the matching functions) are
//! public for hosts that manage their own assembly.
//!
//! ## Deploy and resolve
//!
//! ```
//! use std::sync::Arc;
//! use sca_binder::assembly::{
//!     Component, ComponentReference, ComponentService, Composite, Definitions,
//! };
//! use sca_binder::builder::{BindingBaseUris, BuilderRegistry};
//! use sca_binder::{EndpointReferenceBinder, ScaDomain};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let binder = EndpointReferenceBinder::new(
//!     Arc::new(BuilderRegistry::new()),
//!     Arc::new(Definitions::default()),
//! );
//! let domain = ScaDomain::with_local_registry("quick-start", binder);
//!
//! let composite = Composite::new("HelloWorld")
//!     .with_component(Component::new("Client").with_reference(ComponentReference {
//!         targets: vec!["Server/Hello".to_string()],
//!         ..ComponentReference::new("hello")
//!     }))
//!     .with_component(Component::new("Server").with_service(ComponentService::new("Hello")));
//!
//! let report = domain.deploy(composite, BindingBaseUris::new()).await.unwrap();
//! assert!(!report.has_errors());
//!
//! let bound = domain.resolve_reference("Client", "hello").await.unwrap();
//! assert_eq!(
//!     bound[0].target_endpoint.as_ref().map(|endpoint| endpoint.uri.as_str()),
//!     Some("Server#service-binding(Hello/Hello)")
//! );
//! # });
//! ```
//!
//! ## Build time and run time
//!
//! At build time a reference that cannot be matched is left in its current
//! state and the problems are returned in the report. At run time the same
//! situation is an error carrying the match audit, so the caller can see why
//! every candidate was rejected.
//!
//! ## Observability model
//!
//! Library code emits `tracing` events with canonical event names and does not
//! initialize a subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

pub mod assembly;
pub mod builder;
pub mod deployment;
pub mod error;
pub mod monitor;
pub mod registry;
pub mod resolution;
pub mod runtime;

mod domain;
pub use domain::{DeploymentReport, ReferenceReport, RefreshReport, ScaDomain};

mod observability;

pub use assembly::{Composite, Endpoint, EndpointReference, Status};
pub use builder::StructuralUriBuilder;
pub use error::{BindError, DeploymentError};
pub use resolution::{BindMode, BindReport, EndpointReferenceBinder};
