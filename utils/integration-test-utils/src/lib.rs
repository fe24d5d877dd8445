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


mod integration_test_logging;
pub use integration_test_logging::init_logging;

mod integration_test_contracts;
pub use integration_test_contracts::{contract, hello_contract, hello_with_callback_contract};

mod integration_test_policies;
pub use integration_test_policies::{
    authentication, confidentiality, confidentiality_message, definitions_with_security,
    encrypted_transport_policy_set, integrity, ws_policy_language, SECURITY_NS,
};

mod integration_test_components;
pub use integration_test_components::{
    autowired_client, binder, client, client_with_policy, remote_descriptor, server,
    server_with_policy, ws_binding_type,
};
