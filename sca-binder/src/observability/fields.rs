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

//! Canonical structured field values and value-format helpers.

use crate::assembly::{Binding, Endpoint};
use std::sync::Arc;

pub const NONE: &str = "none";
pub const MODE_BUILD_TIME: &str = "build_time";
pub const MODE_RUN_TIME: &str = "run_time";

pub const REASON_NO_CANDIDATES: &str = "no_candidates";
pub const REASON_NO_MATCHING_CANDIDATE: &str = "no_matching_candidate";
pub const REASON_TARGET_GONE: &str = "target_gone";
pub const REASON_UNKNOWN_INTENT: &str = "unknown_intent";
pub const REASON_UNKNOWN_POLICY_SET: &str = "unknown_policy_set";

pub fn format_binding_type(binding: Option<&Binding>) -> String {
    binding
        .map(|binding| binding.binding_type.to_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_binding_uri(binding: Option<&Binding>) -> String {
    binding
        .and_then(|binding| binding.uri.clone())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_endpoint(endpoint: Option<&Arc<Endpoint>>) -> String {
    endpoint
        .map(|endpoint| endpoint.uri.clone())
        .unwrap_or_else(|| NONE.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_binding_type, format_binding_uri, format_endpoint, NONE};
    use crate::assembly::{Binding, Endpoint};
    use std::sync::Arc;

    #[test]
    fn absent_values_format_as_none() {
        assert_eq!(format_binding_type(None), NONE);
        assert_eq!(format_binding_uri(Some(&Binding::sca())), NONE);
        assert_eq!(format_endpoint(None), NONE);
    }

    #[test]
    fn endpoint_formats_as_its_uri() {
        let endpoint = Arc::new(Endpoint::published("A", "S", Binding::sca()));

        assert_eq!(format_endpoint(Some(&endpoint)), "A#service-binding(S/S)");
    }
}
