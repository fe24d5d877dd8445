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
    autowired_client, client, hello_with_callback_contract, init_logging, remote_descriptor,
    server,
};
use sca_binder::assembly::{
    Component, ComponentReference, ComponentService, Composite, Definitions, Multiplicity,
};
use sca_binder::error::DirectoryError;
use sca_binder::DeploymentError;
use support::{FixedDirectory, UnavailableDirectory};

fn target_components(bound: &[sca_binder::EndpointReference]) -> Vec<String> {
    bound
        .iter()
        .filter_map(|endpoint_reference| endpoint_reference.target_endpoint.as_ref())
        .map(|endpoint| endpoint.component_uri.clone())
        .collect()
}

#[tokio::test]
async fn multiple_targets_bind_in_declaration_order() {
    init_logging();
    let domain = support::make_domain("lifecycle", Definitions::default());
    let composite = Composite::new("Fanout")
        .with_component(client(&["B/Hello", "A/Hello"]))
        .with_component(server("A"))
        .with_component(server("B"));

    let report = support::deploy_ok(&domain, composite).await;
    assert!(report.references[0].is_resolved());

    let bound = domain
        .resolve_reference("Client", "hello")
        .await
        .expect("both targets are deployed");
    assert_eq!(target_components(&bound), vec!["B", "A"]);
}

#[tokio::test]
async fn autowire_picks_up_foreign_endpoints_after_refresh() {
    init_logging();
    let domain = support::make_domain("lifecycle", Definitions::default());
    let composite = Composite::new("Autowire")
        .with_component(autowired_client(Multiplicity::ZeroN))
        .with_component(server("Local"));

    let report = support::deploy_ok(&domain, composite).await;
    assert_eq!(target_components(&report.references[0].endpoint_references), vec!["Local"]);

    let published = domain
        .refresh_endpoints(&FixedDirectory(vec![
            remote_descriptor("RemoteA"),
            remote_descriptor("Local"),
        ]))
        .await
        .expect("directory is available");
    assert_eq!(published.endpoints.len(), 1);
    assert_eq!(published.skipped, 1, "records for local components are skipped");

    let bound = domain
        .resolve_reference("Client", "hello")
        .await
        .expect("autowire rebinds");
    assert_eq!(target_components(&bound), vec!["Local", "RemoteA"]);
}

#[tokio::test]
async fn single_multiplicity_autowire_keeps_its_first_target() {
    init_logging();
    let domain = support::make_domain("lifecycle", Definitions::default());
    let composite = Composite::new("Autowire")
        .with_component(autowired_client(Multiplicity::OneOne))
        .with_component(server("First"))
        .with_component(server("Second"));

    let report = support::deploy_ok(&domain, composite).await;

    assert_eq!(target_components(&report.references[0].endpoint_references), vec!["First"]);
}

#[tokio::test]
async fn mandatory_autowire_without_candidates_is_an_error() {
    init_logging();
    let domain = support::make_domain("lifecycle", Definitions::default());
    let composite = Composite::new("Lonely").with_component(autowired_client(Multiplicity::OneN));

    let report = support::deploy_ok(&domain, composite).await;
    assert!(report.has_errors());

    let err = domain
        .resolve_reference("Client", "hello")
        .await
        .expect_err("no candidate exists");
    assert!(matches!(err, DeploymentError::Bind { .. }));
}

#[tokio::test]
async fn callback_endpoint_is_selected_from_the_client() {
    init_logging();
    let domain = support::make_domain("lifecycle", Definitions::default());
    let composite = Composite::new("Callback")
        .with_component(Component::new("Client").with_reference(ComponentReference {
            interface_contract: Some(hello_with_callback_contract()),
            targets: vec!["Server/Hello".to_string()],
            ..ComponentReference::new("hello")
        }))
        .with_component(Component::new("Server").with_service(ComponentService {
            interface_contract: Some(hello_with_callback_contract()),
            ..ComponentService::new("Hello")
        }));

    let report = support::deploy_ok(&domain, composite).await;

    let bound = &report.references[0].endpoint_references[0];
    assert!(bound.status.is_success());
    let callback = bound.callback_endpoint.as_ref().expect("callback endpoint selected");
    assert_eq!(callback.uri, "Client#service-binding(hello/hello)");
    assert_eq!(callback.forward_service.as_deref(), Some("hello"));
}

#[tokio::test]
async fn directory_failures_surface_as_deployment_errors() {
    init_logging();
    let domain = support::make_domain("lifecycle", Definitions::default());

    let err = domain
        .refresh_endpoints(&UnavailableDirectory)
        .await
        .expect_err("directory is down");

    assert!(matches!(
        err,
        DeploymentError::Directory(DirectoryError::Unavailable { .. })
    ));
}
