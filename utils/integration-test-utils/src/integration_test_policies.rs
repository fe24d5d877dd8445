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


use sca_binder::assembly::{BindingType, Definitions, Intent, PolicySet, QName};
use std::sync::Arc;

pub const SECURITY_NS: &str = "urn:test:security";

pub fn ws_policy_language() -> QName {
    QName::new("http://schemas.xmlsoap.org/ws/2004/09/policy", "Policy")
}

pub fn confidentiality() -> QName {
    QName::sca("confidentiality")
}

pub fn confidentiality_message() -> QName {
    QName::sca("confidentiality.message")
}

pub fn integrity() -> QName {
    QName::sca("integrity")
}

pub fn authentication() -> QName {
    QName::sca("authentication")
}

pub fn encrypted_transport_policy_set() -> QName {
    QName::new(SECURITY_NS, "EncryptedTransport")
}

///
/// Security vocabulary used across binder tests.
///
/// - `confidentiality.message` qualifies `confidentiality`
/// - `integrity` and `authentication` exclude each other
/// - the `binding.ws` type always provides `integrity`
/// - `EncryptedTransport` provides `confidentiality` in the WS-Policy language
///
pub fn definitions_with_security() -> Definitions {
    Definitions {
        intents: vec![
            Arc::new(Intent::new(confidentiality())),
            Arc::new(Intent::new(confidentiality_message()).qualifying(confidentiality())),
            Arc::new(Intent::new(integrity()).excluding(authentication())),
            Arc::new(Intent::new(authentication()).excluding(integrity())),
        ],
        policy_sets: vec![Arc::new(
            PolicySet::new(encrypted_transport_policy_set())
                .with_policy(ws_policy_language(), "<wsp:Policy/>")
                .providing(confidentiality()),
        )],
        binding_types: vec![BindingType {
            always_provided_intents: vec![integrity()],
            ..BindingType::new(crate::ws_binding_type())
        }],
    }
}
