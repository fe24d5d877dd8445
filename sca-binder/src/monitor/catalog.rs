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

//! Message catalogs problems are keyed against.
//!
//! Templates use positional `{0}`, `{1}`, ... placeholders.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MessageCatalog {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl MessageCatalog {
    pub fn template(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(entry_key, _)| *entry_key == key)
            .map(|(_, template)| *template)
    }

    /// Renders `key` with `params`; unknown keys render as the key followed by the params.
    pub fn render(&self, key: &str, params: &[String]) -> String {
        match self.template(key) {
            Some(template) => params
                .iter()
                .enumerate()
                .fold(template.to_string(), |message, (index, param)| {
                    message.replace(&format!("{{{index}}}"), param)
                }),
            None if params.is_empty() => key.to_string(),
            None => format!("{key}: {}", params.join(", ")),
        }
    }
}

pub const NO_COMPONENT_REFERENCE_TARGET: &str = "NoComponentReferenceTarget";
pub const NO_ENDPOINTS_FOUND: &str = "NoEndpointsFound";
pub const ENDPOINT_REFERENCE_CANT_BE_MATCHED: &str = "EndpointReferenceCantBeMatched";
pub const COMPONENT_REFERENCE_TARGET_NOT_FOUND: &str = "ComponentReferenceTargetNotFound";
pub const INCOMPATIBLE_REFERENCE_INTERFACE: &str = "IncompatibleReferenceInterface";

pub const MULTIPLE_BINDINGS_FOR_SERVICE: &str = "MultipleBindingsForService";
pub const MULTIPLE_BINDINGS_FOR_REFERENCE: &str = "MultipleBindingsForReference";
pub const MULTIPLE_BINDINGS_FOR_SERVICE_CALLBACK: &str = "MultipleBindingsForServiceCallback";
pub const MULTIPLE_BINDINGS_FOR_REFERENCE_CALLBACK: &str = "MultipleBindingsForReferenceCallback";
pub const URL_SYNTAX_EXCEPTION: &str = "URLSyntaxException";
pub const INTENT_NOT_FOUND: &str = "IntentNotFound";
pub const POLICY_SET_NOT_FOUND: &str = "PolicySetNotFound";
pub const DUPLICATE_COMPONENT_URI: &str = "DuplicateComponentURI";

pub const ENDPOINT_VALIDATION: MessageCatalog = MessageCatalog {
    name: "endpoint-validation-messages",
    entries: &[
        (
            NO_COMPONENT_REFERENCE_TARGET,
            "No targets have been found for component reference {0}",
        ),
        (
            NO_ENDPOINTS_FOUND,
            "No endpoints found in the domain that match the reference {0}",
        ),
        (
            ENDPOINT_REFERENCE_CANT_BE_MATCHED,
            "Unable to match the endpoint reference {0} with the policy of the service to which it refers, matching process was {1}",
        ),
        (
            COMPONENT_REFERENCE_TARGET_NOT_FOUND,
            "Component reference target not found, it might be a remote service running elsewhere in the SCA Domain: {0}",
        ),
        (
            INCOMPATIBLE_REFERENCE_INTERFACE,
            "The interface of reference {0} is incompatible with the interface of its target {1}",
        ),
    ],
};

pub const ASSEMBLY_VALIDATION: MessageCatalog = MessageCatalog {
    name: "assembly-validation-messages",
    entries: &[
        (
            MULTIPLE_BINDINGS_FOR_SERVICE,
            "Multiple bindings with the same name for a service: Service = {0} Binding name = {1}",
        ),
        (
            MULTIPLE_BINDINGS_FOR_REFERENCE,
            "Multiple bindings with the same name for a reference: Reference = {0} Binding name = {1}",
        ),
        (
            MULTIPLE_BINDINGS_FOR_SERVICE_CALLBACK,
            "Multiple callback bindings with the same name for a service: Service = {0} Binding name = {1}",
        ),
        (
            MULTIPLE_BINDINGS_FOR_REFERENCE_CALLBACK,
            "Multiple callback bindings with the same name for a reference: Reference = {0} Binding name = {1}",
        ),
        (
            URL_SYNTAX_EXCEPTION,
            "URI syntax error while building binding URI: Component = {0} Service = {1} Binding = {2}",
        ),
        (
            INTENT_NOT_FOUND,
            "Intent {0} required by {1} is not defined in the domain definitions",
        ),
        (
            POLICY_SET_NOT_FOUND,
            "Policy set {0} attached to {1} is not defined in the domain definitions",
        ),
        (
            DUPLICATE_COMPONENT_URI,
            "More than one component is deployed with the URI {0}",
        ),
    ],
};

#[cfg(test)]
mod tests {
    use super::{ASSEMBLY_VALIDATION, ENDPOINT_VALIDATION, MULTIPLE_BINDINGS_FOR_SERVICE};

    #[test]
    fn renders_positional_parameters() {
        let message = ASSEMBLY_VALIDATION.render(
            MULTIPLE_BINDINGS_FOR_SERVICE,
            &["Hello".to_string(), "ws".to_string()],
        );

        assert_eq!(
            message,
            "Multiple bindings with the same name for a service: Service = Hello Binding name = ws"
        );
    }

    #[test]
    fn unknown_keys_fall_back_to_key_and_params() {
        assert_eq!(
            ENDPOINT_VALIDATION.render("Missing", &["a".to_string()]),
            "Missing: a"
        );
        assert_eq!(ENDPOINT_VALIDATION.render("Missing", &[]), "Missing");
    }
}
