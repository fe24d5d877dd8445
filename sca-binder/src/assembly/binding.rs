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

use crate::assembly::qname::QName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const SCA_BINDING_LOCAL_NAME: &str = "binding.sca";

/// Type name of the default SCA binding.
pub fn sca_binding_type() -> QName {
    QName::sca(SCA_BINDING_LOCAL_NAME)
}

///
/// A transport configuration attached to a service or reference.
///
/// `config` holds the transport specific settings a binding builder fills in;
/// cloning a binding copies all of it so a clone can be reconfigured freely.
///
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub binding_type: QName,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl Binding {
    pub fn new(binding_type: QName) -> Self {
        Self {
            name: None,
            uri: None,
            binding_type,
            config: BTreeMap::new(),
        }
    }

    pub fn sca() -> Self {
        Self::new(sca_binding_type())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_uri(mut self, uri: &str) -> Self {
        self.uri = Some(uri.to_string());
        self
    }

    pub fn is_sca(&self) -> bool {
        self.binding_type == sca_binding_type()
    }
}

impl Display for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} uri: {}",
            self.binding_type,
            self.uri.as_deref().unwrap_or("null")
        )
    }
}
