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

//! Intents, policy sets and the binding types that provide them.
//!
//! Intents reference each other by name only (exclusions may be mutual), so
//! anything that needs the full record of a related intent looks it up in
//! [`Definitions`].

use crate::assembly::qname::QName;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Intent {
    pub name: QName,
    #[serde(default)]
    pub excluded_intents: Vec<QName>,
    /// Set when this intent is a qualified form such as `confidentiality.message`.
    #[serde(default)]
    pub qualifiable_intent: Option<QName>,
    #[serde(default)]
    pub constrained_types: Vec<QName>,
}

impl Intent {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            excluded_intents: Vec::new(),
            qualifiable_intent: None,
            constrained_types: Vec::new(),
        }
    }

    pub fn excluding(mut self, other: QName) -> Self {
        self.excluded_intents.push(other);
        self
    }

    pub fn qualifying(mut self, qualifiable: QName) -> Self {
        self.qualifiable_intent = Some(qualifiable);
        self
    }

    pub fn constrained_to(mut self, extension_type: QName) -> Self {
        self.constrained_types.push(extension_type);
        self
    }

    pub fn excludes(&self, other: &QName) -> bool {
        self.excluded_intents.contains(other)
    }

    /// `true` when `self` is the qualified form of `qualifiable`.
    pub fn is_qualified_form_of(&self, qualifiable: &QName) -> bool {
        self.qualifiable_intent.as_ref() == Some(qualifiable)
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One concrete policy assertion; `name` is the QName of its root element,
/// which identifies the policy language.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyExpression {
    pub name: QName,
    #[serde(default)]
    pub body: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Qualifier {
    pub intent: QName,
    #[serde(default)]
    pub policies: Vec<PolicyExpression>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntentMap {
    pub provided_intent: QName,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
}

///
/// A named bundle of policy expressions in a single language.
///
/// Equality and hashing only consider the name, matching how policy sets are
/// compared when two sides of a wire are checked for identical policy.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySet {
    pub name: QName,
    #[serde(default)]
    pub policies: Vec<PolicyExpression>,
    #[serde(default)]
    pub provided_intents: Vec<QName>,
    #[serde(default)]
    pub intent_maps: Vec<IntentMap>,
}

impl PolicySet {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            policies: Vec::new(),
            provided_intents: Vec::new(),
            intent_maps: Vec::new(),
        }
    }

    pub fn with_policy(mut self, language: QName, body: &str) -> Self {
        self.policies.push(PolicyExpression {
            name: language,
            body: body.to_string(),
        });
        self
    }

    pub fn providing(mut self, intent: QName) -> Self {
        self.provided_intents.push(intent);
        self
    }

    pub fn with_intent_map(mut self, intent_map: IntentMap) -> Self {
        self.intent_maps.push(intent_map);
        self
    }

    pub fn has_policies(&self) -> bool {
        !self.policies.is_empty()
    }

    /// Language of the first policy expression, if there is one.
    pub fn language(&self) -> Option<&QName> {
        self.policies.first().map(|policy| &policy.name)
    }

    pub fn qualifies_through_intent_map(&self, intent: &QName) -> bool {
        self.intent_maps
            .iter()
            .flat_map(|map| map.qualifiers.iter())
            .any(|qualifier| &qualifier.intent == intent)
    }
}

impl PartialEq for PolicySet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PolicySet {}

impl Hash for PolicySet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Display for PolicySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingType {
    #[serde(rename = "type")]
    pub type_name: QName,
    #[serde(default)]
    pub base_type: Option<QName>,
    #[serde(default)]
    pub always_provided_intents: Vec<QName>,
    #[serde(default)]
    pub may_provided_intents: Vec<QName>,
}

impl BindingType {
    pub fn new(type_name: QName) -> Self {
        Self {
            type_name,
            base_type: None,
            always_provided_intents: Vec::new(),
            may_provided_intents: Vec::new(),
        }
    }

    pub fn provides(&self, intent: &QName) -> bool {
        self.always_provided_intents.contains(intent) || self.may_provided_intents.contains(intent)
    }

    /// `true` when `extension_type` names this binding type or its base type.
    pub fn is_of_type(&self, extension_type: &QName) -> bool {
        &self.type_name == extension_type || self.base_type.as_ref() == Some(extension_type)
    }
}

/// Domain-wide policy definitions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    #[serde(default)]
    pub intents: Vec<Arc<Intent>>,
    #[serde(default)]
    pub policy_sets: Vec<Arc<PolicySet>>,
    #[serde(default)]
    pub binding_types: Vec<BindingType>,
}

impl Definitions {
    pub fn intent(&self, name: &QName) -> Option<&Arc<Intent>> {
        self.intents.iter().find(|intent| &intent.name == name)
    }

    pub fn policy_set(&self, name: &QName) -> Option<&Arc<PolicySet>> {
        self.policy_sets.iter().find(|policy_set| &policy_set.name == name)
    }

    pub fn binding_type(&self, type_name: &QName) -> Option<&BindingType> {
        self.binding_types
            .iter()
            .find(|binding_type| &binding_type.type_name == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{BindingType, Intent, IntentMap, PolicySet, Qualifier};
    use crate::assembly::qname::QName;
    use std::collections::HashSet;

    fn q(local: &str) -> QName {
        QName::sca(local)
    }

    #[test]
    fn policy_sets_compare_by_name() {
        let a = PolicySet::new(q("ps1")).with_policy(q("wsp"), "<a/>");
        let b = PolicySet::new(q("ps1"));
        let c = PolicySet::new(q("ps2"));

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<PolicySet> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn intent_map_qualifiers_are_searched() {
        let policy_set = PolicySet::new(q("ps")).with_intent_map(IntentMap {
            provided_intent: q("confidentiality"),
            qualifiers: vec![Qualifier {
                intent: q("confidentiality.message"),
                policies: Vec::new(),
            }],
        });

        assert!(policy_set.qualifies_through_intent_map(&q("confidentiality.message")));
        assert!(!policy_set.qualifies_through_intent_map(&q("confidentiality")));
    }

    #[test]
    fn qualified_intents_know_their_parent() {
        let qualified = Intent::new(q("confidentiality.message")).qualifying(q("confidentiality"));

        assert!(qualified.is_qualified_form_of(&q("confidentiality")));
        assert!(!qualified.is_qualified_form_of(&q("integrity")));
    }

    #[test]
    fn binding_type_matches_base_type() {
        let mut binding_type = BindingType::new(q("binding.ws.axis2"));
        binding_type.base_type = Some(q("binding.ws"));

        assert!(binding_type.is_of_type(&q("binding.ws")));
        assert!(binding_type.is_of_type(&q("binding.ws.axis2")));
        assert!(!binding_type.is_of_type(&q("binding.jms")));
    }
}
