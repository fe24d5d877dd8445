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

use std::fmt::{Display, Formatter};

/// Append-only trace of match decisions for one bind attempt.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Audit {
    entries: Vec<String>,
    current: String,
}

impl Audit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl AsRef<str>) {
        self.current.push_str(text.as_ref());
    }

    /// Closes the current entry.
    pub fn append_separator(&mut self) {
        self.entries.push(std::mem::take(&mut self.current));
    }

    /// Closed entries followed by the open one, if it has text.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(String::as_str)
            .chain(Some(self.current.as_str()).filter(|current| !current.is_empty()))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().any(|entry| entry.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.current.is_empty()
    }
}

impl Display for Audit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, entry) in self.entries().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", entry.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Audit;

    #[test]
    fn separators_close_entries() {
        let mut audit = Audit::new();
        audit.append("Match policy of a to b ");
        audit.append("Match because there are no intents or policies ");
        audit.append_separator();
        audit.append("Match interface of a to b ");

        let entries: Vec<_> = audit.entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(audit.contains("no intents or policies"));
        assert_eq!(
            audit.to_string(),
            "Match policy of a to b Match because there are no intents or policies\nMatch interface of a to b"
        );
    }
}
