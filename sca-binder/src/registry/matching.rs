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

//! Matching of reference targets against published endpoint URIs.

use crate::assembly::Endpoint;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct StructuralTarget<'a> {
    component: &'a str,
    service: Option<&'a str>,
    binding: Option<&'a str>,
}

/// Parses `component#service-binding(service/binding)` and `component#service(service)`.
fn parse_structural(target: &str) -> Option<StructuralTarget<'_>> {
    let (component, fragment) = target.split_once('#')?;
    if let Some(inner) = fragment
        .strip_prefix("service-binding(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let (service, binding) = inner.split_once('/')?;
        return Some(StructuralTarget {
            component,
            service: Some(service),
            binding: Some(binding),
        });
    }
    let service = fragment
        .strip_prefix("service(")
        .and_then(|rest| rest.strip_suffix(')'))?;
    Some(StructuralTarget {
        component,
        service: Some(service),
        binding: None,
    })
}

///
/// `true` when `target` names `endpoint`.
///
/// A target may name the component, `component/service` or
/// `component/service/binding`, or use the structural endpoint form. Component
/// URIs may themselves contain `/`, so the slash forms are compared as whole
/// strings rather than split.
///
pub fn matches_target(target: &str, endpoint: &Endpoint) -> bool {
    if target == endpoint.uri {
        return true;
    }

    let binding_name = endpoint.binding_name().unwrap_or(&endpoint.service_name);

    if let Some(structural) = parse_structural(target) {
        return structural.component == endpoint.component_uri
            && structural
                .service
                .map_or(true, |service| service == endpoint.service_name)
            && structural
                .binding
                .map_or(true, |binding| binding == binding_name);
    }

    let Some(rest) = target.strip_prefix(endpoint.component_uri.as_str()) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let Some(rest) = rest
        .strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(endpoint.service_name.as_str()))
    else {
        return false;
    };
    match rest.strip_prefix('/') {
        None => rest.is_empty(),
        Some(binding) => binding == binding_name,
    }
}
