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


mod support;

use integration_test_utils::{
    client_with_policy, definitions_with_security, init_logging, server, server_with_policy,
};
use sca_binder::assembly::{Composite, Status};
use sca_binder::monitor::catalog;
use sca_binder::{BindError, DeploymentError};

#[tokio::test]
async fn mutually_exclusive_intents_never_match() {
    init_logging();
    let domain = support::make_domain("policy", definitions_with_security());
    let composite = Composite::new("Exclusive")
        .with_component(client_with_policy("Server/Hello", &["integrity"], &[]))
        .with_component(server_with_policy("Server", &["authentication"], &[]));

    let report = support::deploy_ok(&domain, composite).await;
    let reference = &report.references[0];
    assert!(!reference.is_resolved());
    assert!(reference
        .problems
        .iter()
        .any(|problem| problem.message_key == catalog::COMPONENT_REFERENCE_TARGET_NOT_FOUND));

    let err = domain
        .resolve_reference("Client", "hello")
        .await
        .expect_err("exclusive intents cannot bind");
    let DeploymentError::Bind { source, .. } = &err else {
        panic!("expected a bind error, got {err:?}");
    };
    assert!(matches!(source, BindError::Unresolved { .. }));
    let audit = source.audit().expect("matching failures carry an audit");
    assert!(audit.contains("mutually exclusive"), "audit was: {audit}");
}

#[tokio::test]
async fn binding_type_provides_required_intent() {
    init_logging();
    let domain = support::make_domain("policy", definitions_with_security());
    let composite = Composite::new("Provided")
        .with_component(client_with_policy("Server/Hello", &["integrity"], &[]))
        .with_component(server_with_policy("Server", &[], &[]));

    let report = support::deploy_ok(&domain, composite).await;

    assert!(report.references[0].is_resolved());
    let bound = &report.references[0].endpoint_references[0];
    assert_eq!(bound.status, Status::WiredTargetFoundAndMatched);
    assert_eq!(
        bound.binding.as_ref().map(|binding| binding.binding_type.local_part()),
        Some("binding.ws")
    );
}

#[tokio::test]
async fn qualified_intent_is_provided_by_the_endpoint_policy_set() {
    init_logging();
    let domain = support::make_domain("policy", definitions_with_security());
    let composite = Composite::new("Qualified")
        .with_component(client_with_policy("Server/Hello", &["confidentiality.message"], &[]))
        .with_component(server_with_policy(
            "Server",
            &[],
            &["{urn:test:security}EncryptedTransport"],
        ));

    let report = support::deploy_ok(&domain, composite).await;

    assert!(!report.has_errors());
    assert!(report.references[0].is_resolved());
}

#[tokio::test]
async fn unresolved_intents_are_reported_at_build_time_and_fail_at_run_time() {
    init_logging();
    let domain = support::make_domain("policy", definitions_with_security());
    let composite = Composite::new("Unresolved")
        .with_component(client_with_policy("Server/Hello", &["confidentiality"], &[]))
        .with_component(server("Server"));

    let report = support::deploy_ok(&domain, composite).await;
    assert!(!report.references[0].is_resolved());

    let err = domain
        .resolve_reference("Client", "hello")
        .await
        .expect_err("nothing provides confidentiality over the SCA binding");
    let audit = match &err {
        DeploymentError::Bind { source, .. } => source.audit().unwrap_or_default().to_string(),
        other => panic!("expected a bind error, got {other:?}"),
    };
    assert!(audit.contains("unresolved intents"), "audit was: {audit}");
}

#[tokio::test]
async fn unknown_definitions_are_deployment_warnings() {
    init_logging();
    let domain = support::make_domain("policy", definitions_with_security());
    let composite = Composite::new("Unknown")
        .with_component(client_with_policy("Server/Hello", &["{urn:nowhere}bogus"], &[]))
        .with_component(server("Server"));

    let report = support::deploy_ok(&domain, composite).await;

    let problem = report
        .problems
        .iter()
        .find(|problem| problem.message_key == catalog::INTENT_NOT_FOUND)
        .expect("unknown intent is reported");
    assert!(!problem.is_error());
    assert!(report.references[0].is_resolved());
}
