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

//! Problem sink for validation and resolution diagnostics.
//!
//! Problems are catalog keyed, never free text. Every problem is also emitted
//! as a `tracing` event so a node's log carries the same diagnostics the
//! caller receives.

pub mod catalog;

use crate::observability::events;
use catalog::MessageCatalog;
use std::fmt::{Display, Formatter};
use tracing::{error, warn};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Problem {
    /// Component that reported the problem.
    pub source: &'static str,
    pub catalog: MessageCatalog,
    pub severity: Severity,
    /// Innermost monitor context active when the problem was reported.
    pub context: Option<String>,
    pub message_key: &'static str,
    pub params: Vec<String>,
}

impl Problem {
    pub fn message(&self) -> String {
        self.catalog.render(self.message_key, &self.params)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} [{}] {}", self.severity, context, self.message()),
            None => write!(f, "{} {}", self.severity, self.message()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Monitor {
    problems: Vec<Problem>,
    contexts: Vec<String>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_context(&mut self, context: impl Into<String>) {
        self.contexts.push(context.into());
    }

    pub fn pop_context(&mut self) -> Option<String> {
        self.contexts.pop()
    }

    pub fn error<I, S>(
        &mut self,
        source: &'static str,
        catalog: MessageCatalog,
        message_key: &'static str,
        params: I,
    ) -> &Problem
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report(source, catalog, Severity::Error, message_key, params)
    }

    pub fn warning<I, S>(
        &mut self,
        source: &'static str,
        catalog: MessageCatalog,
        message_key: &'static str,
        params: I,
    ) -> &Problem
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report(source, catalog, Severity::Warning, message_key, params)
    }

    fn report<I, S>(
        &mut self,
        source: &'static str,
        catalog: MessageCatalog,
        severity: Severity,
        message_key: &'static str,
        params: I,
    ) -> &Problem
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let problem = Problem {
            source,
            catalog,
            severity,
            context: self.contexts.last().cloned(),
            message_key,
            params: params.into_iter().map(Into::into).collect(),
        };

        let context = problem.context.as_deref().unwrap_or("");
        match severity {
            Severity::Warning => warn!(
                event = events::MONITOR_PROBLEM,
                component = source,
                catalog = catalog.name,
                message_key,
                context,
                "{}",
                problem.message()
            ),
            Severity::Error => error!(
                event = events::MONITOR_PROBLEM,
                component = source,
                catalog = catalog.name,
                message_key,
                context,
                "{}",
                problem.message()
            ),
        }

        self.problems.push(problem);
        &self.problems[self.problems.len() - 1]
    }

    pub fn last_problem(&self) -> Option<&Problem> {
        self.problems.last()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(Problem::is_error)
    }

    pub fn take_problems(&mut self) -> Vec<Problem> {
        std::mem::take(&mut self.problems)
    }
}
