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

//! Error types surfaced by the binder, the builders and the domain facade.

use crate::assembly::QName;
use crate::monitor::Problem;
use thiserror::Error;

/// Failure raised by a binding builder while configuring a binding.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("binding builder for {binding_type} failed on {subject}: {reason}")]
pub struct BuilderError {
    pub binding_type: QName,
    pub subject: String,
    pub reason: String,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ActivationError {
    #[error("failed to activate endpoint {endpoint}: {reason}")]
    Activate { endpoint: String, reason: String },

    #[error("failed to start endpoint {endpoint}: {reason}")]
    Start { endpoint: String, reason: String },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum UriError {
    #[error("illegal character {character:?} at index {index} in '{uri}'")]
    IllegalCharacter {
        uri: String,
        character: char,
        index: usize,
    },

    #[error("malformed escape pair at index {index} in '{uri}'")]
    MalformedEscape { uri: String, index: usize },

    #[error("'{uri}' is not a valid absolute URI: {reason}")]
    Parse { uri: String, reason: String },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RegistryError {
    #[error("endpoint registry unavailable: {0}")]
    Unavailable(String),

    #[error("contribution {0} is already installed")]
    ContributionAlreadyInstalled(String),
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DirectoryError {
    #[error("endpoint directory {directory} unavailable: {reason}")]
    Unavailable { directory: String, reason: String },

    #[error("endpoint directory {directory} is malformed: {reason}")]
    Malformed { directory: String, reason: String },
}

#[derive(Clone, Debug, Error)]
pub enum BindError {
    /// The reference could not be resolved while the domain is running.
    #[error("Unable to bind {problem}")]
    Unresolved { problem: Problem, audit: String },

    #[error("Unable to bind {reference}: interface is incompatible with target {target}")]
    IncompatibleInterface {
        reference: String,
        target: String,
        audit: String,
    },

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl BindError {
    /// Match audit recorded up to the failure, when the failure came from matching.
    pub fn audit(&self) -> Option<&str> {
        match self {
            BindError::Unresolved { audit, .. } | BindError::IncompatibleInterface { audit, .. } => {
                Some(audit)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("component {0} is not deployed")]
    UnknownComponent(String),

    #[error("composite {0} is not deployed")]
    UnknownComposite(String),

    #[error("component {component} has no reference named {reference}")]
    UnknownReference { component: String, reference: String },

    #[error("reference {reference} of component {component} failed to bind")]
    Bind {
        component: String,
        reference: String,
        #[source]
        source: BindError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
