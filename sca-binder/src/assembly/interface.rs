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

//! Interface contracts exposed by services and required by references.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    #[default]
    Java,
    Wsdl,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub input_types: Vec<String>,
    #[serde(default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub faults: Vec<String>,
}

impl Operation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, type_name: &str) -> Self {
        self.input_types.push(type_name.to_string());
        self
    }

    pub fn with_output(mut self, type_name: &str) -> Self {
        self.output_type = Some(type_name.to_string());
        self
    }

    pub fn with_fault(mut self, fault: &str) -> Self {
        self.faults.push(fault.to_string());
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interface {
    pub name: String,
    #[serde(default = "remotable_default")]
    pub remotable: bool,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

fn remotable_default() -> bool {
    true
}

impl Interface {
    pub fn new(name: &str, operations: Vec<Operation>) -> Self {
        Self {
            name: name.to_string(),
            remotable: true,
            operations,
        }
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|operation| operation.name == name)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceContract {
    #[serde(default)]
    pub kind: InterfaceKind,
    pub interface: Interface,
    #[serde(default)]
    pub callback_interface: Option<Interface>,
    #[serde(default)]
    pub normalized_wsdl_contract: Option<Box<InterfaceContract>>,
}

impl InterfaceContract {
    pub fn new(kind: InterfaceKind, interface: Interface) -> Self {
        Self {
            kind,
            interface,
            callback_interface: None,
            normalized_wsdl_contract: None,
        }
    }

    pub fn with_callback(mut self, callback_interface: Interface) -> Self {
        self.callback_interface = Some(callback_interface);
        self
    }

    /// Returns the WSDL form of this contract, preferring an explicitly normalized one.
    pub fn generated_wsdl_contract(&self) -> InterfaceContract {
        if let Some(normalized) = &self.normalized_wsdl_contract {
            return normalized.as_ref().clone();
        }
        if self.kind == InterfaceKind::Wsdl {
            return self.clone();
        }
        InterfaceContract {
            kind: InterfaceKind::Wsdl,
            interface: self.interface.clone(),
            callback_interface: self.callback_interface.clone(),
            normalized_wsdl_contract: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Interface, InterfaceContract, InterfaceKind, Operation};

    #[test]
    fn generated_contract_prefers_normalized_form() {
        let normalized = InterfaceContract::new(
            InterfaceKind::Wsdl,
            Interface::new("NormalizedPortType", vec![Operation::new("ping")]),
        );
        let mut contract = InterfaceContract::new(
            InterfaceKind::Java,
            Interface::new("Ping", vec![Operation::new("ping")]),
        );
        contract.normalized_wsdl_contract = Some(Box::new(normalized.clone()));

        assert_eq!(contract.generated_wsdl_contract(), normalized);
    }

    #[test]
    fn generated_contract_keeps_operations() {
        let contract = InterfaceContract::new(
            InterfaceKind::Java,
            Interface::new("Ping", vec![Operation::new("ping").with_input("string")]),
        );

        let generated = contract.generated_wsdl_contract();

        assert_eq!(generated.kind, InterfaceKind::Wsdl);
        assert_eq!(generated.interface.operations, contract.interface.operations);
    }
}
