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

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// How many endpoint references a single reference may carry.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Multiplicity {
    #[serde(rename = "0..1")]
    ZeroOne,
    #[default]
    #[serde(rename = "1..1")]
    OneOne,
    #[serde(rename = "0..n")]
    ZeroN,
    #[serde(rename = "1..n")]
    OneN,
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("'{0}' is not a multiplicity, expected one of 0..1, 1..1, 0..n, 1..n")]
pub struct MultiplicityParseError(String);

impl Multiplicity {
    /// At most one target may be wired.
    pub fn is_single(self) -> bool {
        matches!(self, Multiplicity::ZeroOne | Multiplicity::OneOne)
    }

    /// At least one target must be wired.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Multiplicity::OneOne | Multiplicity::OneN)
    }
}

impl FromStr for Multiplicity {
    type Err = MultiplicityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0..1" => Ok(Multiplicity::ZeroOne),
            "1..1" => Ok(Multiplicity::OneOne),
            "0..n" => Ok(Multiplicity::ZeroN),
            "1..n" => Ok(Multiplicity::OneN),
            other => Err(MultiplicityParseError(other.to_string())),
        }
    }
}

impl Display for Multiplicity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let literal = match self {
            Multiplicity::ZeroOne => "0..1",
            Multiplicity::OneOne => "1..1",
            Multiplicity::ZeroN => "0..n",
            Multiplicity::OneN => "1..n",
        };
        write!(f, "{literal}")
    }
}

#[cfg(test)]
mod tests {
    use super::Multiplicity;

    #[test]
    fn single_and_mandatory_classification() {
        assert!(Multiplicity::ZeroOne.is_single());
        assert!(Multiplicity::OneOne.is_single());
        assert!(!Multiplicity::ZeroN.is_single());

        assert!(Multiplicity::OneOne.is_mandatory());
        assert!(Multiplicity::OneN.is_mandatory());
        assert!(!Multiplicity::ZeroN.is_mandatory());
    }

    #[test]
    fn parses_literals() {
        assert_eq!("0..n".parse(), Ok(Multiplicity::ZeroN));
        assert!("2..n".parse::<Multiplicity>().is_err());
        assert_eq!(Multiplicity::OneN.to_string(), "1..n");
    }
}
