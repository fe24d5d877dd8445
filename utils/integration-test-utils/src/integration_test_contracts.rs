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


use sca_binder::assembly::{Interface, InterfaceContract, InterfaceKind, Operation};

/// A Java contract named `name` whose operations take and return a string.
pub fn contract(name: &str, operations: &[&str]) -> InterfaceContract {
    InterfaceContract::new(
        InterfaceKind::Java,
        Interface::new(
            name,
            operations
                .iter()
                .map(|operation| {
                    Operation::new(operation)
                        .with_input("xs:string")
                        .with_output("xs:string")
                })
                .collect(),
        ),
    )
}

pub fn hello_contract() -> InterfaceContract {
    contract("Hello", &["hello"])
}

pub fn hello_with_callback_contract() -> InterfaceContract {
    hello_contract().with_callback(Interface::new(
        "HelloCallback",
        vec![Operation::new("helloDone").with_input("xs:string")],
    ))
}
