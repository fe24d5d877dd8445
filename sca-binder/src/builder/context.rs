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

use crate::assembly::Definitions;
use crate::builder::uri::BindingBaseUris;
use std::sync::Arc;

/// Build-time inputs shared by the structural builder, binding builders and policy builders.
#[derive(Clone, Debug, Default)]
pub struct BuilderContext {
    pub definitions: Arc<Definitions>,
    pub binding_base_uris: BindingBaseUris,
}

impl BuilderContext {
    pub fn new(definitions: Arc<Definitions>) -> Self {
        Self {
            definitions,
            binding_base_uris: BindingBaseUris::new(),
        }
    }

    pub fn with_binding_base_uris(mut self, binding_base_uris: BindingBaseUris) -> Self {
        self.binding_base_uris = binding_base_uris;
        self
    }
}
