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

//! Namespace-qualified names in Clark notation (`{namespace}local`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub const SCA_NS: &str = "http://docs.oasis-open.org/ns/opencsa/sca/200912";
pub const TUSCANY_NS: &str = "http://tuscany.apache.org/xmlns/sca/1.1";

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QName {
    namespace: String,
    local_part: String,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum QNameError {
    #[error("qualified name is empty")]
    Empty,
    #[error("unterminated namespace in qualified name '{0}'")]
    UnterminatedNamespace(String),
}

impl QName {
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }

    /// A name in the SCA assembly namespace.
    pub fn sca(local_part: impl Into<String>) -> Self {
        Self::new(SCA_NS, local_part)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }
}

impl FromStr for QName {
    type Err = QNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(QNameError::Empty);
        }
        match s.strip_prefix('{') {
            Some(rest) => {
                let (namespace, local_part) = rest
                    .split_once('}')
                    .ok_or_else(|| QNameError::UnterminatedNamespace(s.to_string()))?;
                if local_part.is_empty() {
                    return Err(QNameError::Empty);
                }
                Ok(Self::new(namespace, local_part))
            }
            None => Ok(Self::new("", s)),
        }
    }
}

impl TryFrom<String> for QName {
    type Error = QNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QName> for String {
    fn from(value: QName) -> Self {
        value.to_string()
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_part)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_part)
        }
    }
}
