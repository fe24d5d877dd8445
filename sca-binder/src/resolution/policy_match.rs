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

//! Policy compatibility between an endpoint reference and a candidate endpoint.
//!
//! Rules are applied in order and the first one that applies decides. Every
//! decision is written to the audit trail followed by a separator.

use crate::assembly::{
    Binding, BindingType, Definitions, Endpoint, EndpointReference, Intent, PolicySet, QName,
};
use crate::builder::{BuilderContext, BuilderRegistry};
use crate::resolution::audit::Audit;
use std::collections::HashSet;
use std::sync::Arc;

/// `true` when `a` and `b` can never be required on the same wire.
pub fn mutually_exclusive(a: &Intent, b: &Intent) -> bool {
    if a.excludes(&b.name) || b.excludes(&a.name) {
        return true;
    }
    if let Some(qualifiable) = &a.qualifiable_intent {
        if b.excludes(qualifiable) {
            return true;
        }
    }
    if let Some(qualifiable) = &b.qualifiable_intent {
        if a.excludes(qualifiable) {
            return true;
        }
    }
    false
}

///
/// Decides whether `endpoint_reference` may be wired to `endpoint` as far as
/// intents and policy sets are concerned.
///
/// May rewrite the reference: intents constrained to other binding types are
/// dropped, and when a language specific builder accepts the match the
/// reference's policy sets are replaced by the ones applicable to the binding.
///
pub fn have_matching_policy(
    endpoint_reference: &mut EndpointReference,
    endpoint: &Endpoint,
    audit: &mut Audit,
    extensions: &BuilderRegistry,
    context: &BuilderContext,
) -> bool {
    audit.append(format!("Match policy of {endpoint_reference} to {endpoint} "));

    for reference_intent in &endpoint_reference.required_intents {
        for endpoint_intent in &endpoint.required_intents {
            if mutually_exclusive(reference_intent, endpoint_intent) {
                audit.append(format!(
                    "No match because the following intents are mutually exclusive {reference_intent} {endpoint_intent} "
                ));
                audit.append_separator();
                return false;
            }
        }
    }

    let binding = endpoint_reference
        .binding
        .as_ref()
        .or(endpoint.binding.as_ref())
        .cloned();
    let binding_type_name = binding.as_ref().map(|binding| &binding.binding_type);

    let mut reference_policy_sets =
        applicable_policy_sets(&endpoint_reference.policy_sets, binding_type_name, extensions);
    if reference_policy_sets.is_empty() {
        reference_policy_sets =
            applicable_policy_sets(&endpoint.policy_sets, binding_type_name, extensions);
    }

    let no_reference_policies = !reference_policy_sets.iter().any(|ps| ps.has_policies());
    let no_endpoint_policies = !endpoint.policy_sets.iter().any(|ps| ps.has_policies());

    if endpoint_reference.required_intents.is_empty()
        && endpoint.required_intents.is_empty()
        && no_reference_policies
        && no_endpoint_policies
    {
        audit.append("Match because there are no intents or policies ");
        audit.append_separator();
        return true;
    }

    let definitions = &context.definitions;
    let binding_type = binding_type_name.and_then(|name| definitions.binding_type(name));
    remove_constrained_intents(
        endpoint_reference,
        binding.as_ref(),
        binding_type,
        definitions,
    );

    let unresolved: Vec<&Arc<Intent>> = endpoint_reference
        .required_intents
        .iter()
        .filter(|intent| !is_intent_resolved(intent, binding_type, &reference_policy_sets))
        .collect();
    if !unresolved.is_empty() {
        let names: Vec<String> = unresolved.iter().map(|intent| intent.to_string()).collect();
        audit.append(format!(
            "No match because there are unresolved intents [{}] ",
            names.join(", ")
        ));
        audit.append_separator();
        return false;
    }

    if no_reference_policies && no_endpoint_policies {
        audit.append("Match because the intents are resolved and there are no policy sets ");
        audit.append_separator();
        return true;
    }
    if no_reference_policies {
        audit.append(
            "No match because there are policy sets at the endpoint but not at the endpoint reference ",
        );
        audit.append_separator();
        return false;
    }
    if no_endpoint_policies {
        audit.append(
            "No match because there are policy sets at the endpoint reference but not at the endpoint ",
        );
        audit.append_separator();
        return false;
    }

    let reference_names: HashSet<&QName> = reference_policy_sets.iter().map(|ps| &ps.name).collect();
    let endpoint_names: HashSet<&QName> = endpoint.policy_sets.iter().map(|ps| &ps.name).collect();
    if reference_names == endpoint_names {
        audit.append("Match because the policy sets on both sides are eactly the same ");
        audit.append_separator();
        return true;
    }

    let reference_language = dominant_language(&reference_policy_sets);
    let endpoint_language = dominant_language(&endpoint.policy_sets);
    if reference_language != endpoint_language {
        audit.append(format!(
            "No match because the policy sets on either side have policies in differnt languages {} and {} ",
            display_language(reference_language),
            display_language(endpoint_language)
        ));
        audit.append_separator();
        return false;
    }

    let policy_builder = reference_language.and_then(|language| extensions.policy_builder(language));
    let matched = match policy_builder {
        Some(policy_builder) => {
            let original =
                std::mem::replace(&mut endpoint_reference.policy_sets, reference_policy_sets);
            let matched = policy_builder.build(endpoint_reference, endpoint, context);
            if !matched {
                endpoint_reference.policy_sets = original;
            }
            matched
        }
        None => false,
    };

    if matched {
        audit.append("Match because the language specific matching succeeded ");
    } else {
        audit.append("No match because the language specific matching failed ");
    }
    audit.append_separator();
    matched
}

/// Policy sets whose language builder applies to `binding_type`.
fn applicable_policy_sets(
    policy_sets: &[Arc<PolicySet>],
    binding_type: Option<&QName>,
    extensions: &BuilderRegistry,
) -> Vec<Arc<PolicySet>> {
    policy_sets
        .iter()
        .filter(|policy_set| {
            let builder = policy_set
                .language()
                .and_then(|language| extensions.policy_builder(language));
            match builder.map(|builder| builder.supported_bindings()) {
                None | Some(None) => true,
                Some(Some(supported)) => binding_type.is_some_and(|name| supported.contains(name)),
            }
        })
        .cloned()
        .collect()
}

/// Drops required intents whose constrained types exclude the binding.
fn remove_constrained_intents(
    endpoint_reference: &mut EndpointReference,
    binding: Option<&Binding>,
    binding_type: Option<&BindingType>,
    definitions: &Definitions,
) {
    endpoint_reference.required_intents.retain(|intent| {
        let constrained_types = if intent.constrained_types.is_empty() {
            intent
                .qualifiable_intent
                .as_ref()
                .and_then(|qualifiable| definitions.intent(qualifiable))
                .map(|qualifiable| qualifiable.constrained_types.as_slice())
                .unwrap_or_default()
        } else {
            intent.constrained_types.as_slice()
        };
        if constrained_types.is_empty() {
            return true;
        }
        constrained_types.iter().any(|constrained| match binding_type {
            Some(binding_type) => binding_type.is_of_type(constrained),
            None => binding.is_some_and(|binding| &binding.binding_type == constrained),
        })
    });
}

fn is_intent_resolved(
    intent: &Intent,
    binding_type: Option<&BindingType>,
    policy_sets: &[Arc<PolicySet>],
) -> bool {
    if binding_type.is_some_and(|binding_type| binding_type.provides(&intent.name)) {
        return true;
    }
    policy_sets.iter().any(|policy_set| {
        policy_set
            .provided_intents
            .iter()
            .any(|provided| provided == &intent.name || intent.is_qualified_form_of(provided))
            || policy_set.qualifies_through_intent_map(&intent.name)
    })
}

/// Language of the first policy in the first policy set that has one.
fn dominant_language(policy_sets: &[Arc<PolicySet>]) -> Option<&QName> {
    policy_sets
        .iter()
        .find(|policy_set| policy_set.has_policies())
        .and_then(|policy_set| policy_set.language())
}

fn display_language(language: Option<&QName>) -> String {
    language.map(ToString::to_string).unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::{have_matching_policy, mutually_exclusive};
    use crate::assembly::{
        Assembly, Binding, BindingType, Definitions, Endpoint, EndpointReference, Intent,
        IntentMap, PolicySet, QName, Qualifier, ReferenceDecl,
    };
    use crate::builder::{BuilderContext, BuilderRegistry, PolicyBuilder};
    use crate::resolution::audit::Audit;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn q(local: &str) -> QName {
        QName::sca(local)
    }

    fn reference() -> EndpointReference {
        let mut assembly = Assembly::new();
        let component = assembly.add_component("Client", "Client");
        let reference = assembly.add_reference(ReferenceDecl::new(component, "hello"));
        EndpointReference::new(component, reference, "Client", "hello")
    }

    fn endpoint() -> Endpoint {
        Endpoint::published("Server", "Hello", Binding::sca().with_uri("/Server/Hello"))
    }

    fn check(
        epr: &mut EndpointReference,
        endpoint: &Endpoint,
        extensions: &BuilderRegistry,
        definitions: Definitions,
    ) -> (bool, Audit) {
        let mut audit = Audit::new();
        let context = BuilderContext::new(Arc::new(definitions));
        let matched = have_matching_policy(epr, endpoint, &mut audit, extensions, &context);
        (matched, audit)
    }

    struct LanguageBuilder {
        language: QName,
        accept: bool,
        supported: Option<HashSet<QName>>,
    }

    impl PolicyBuilder for LanguageBuilder {
        fn policy_language(&self) -> QName {
            self.language.clone()
        }

        fn supported_bindings(&self) -> Option<&HashSet<QName>> {
            self.supported.as_ref()
        }

        fn build(
            &self,
            _endpoint_reference: &EndpointReference,
            _endpoint: &Endpoint,
            _context: &BuilderContext,
        ) -> bool {
            self.accept
        }
    }

    #[test]
    fn exclusion_is_symmetric() {
        let a = Arc::new(Intent::new(q("A")).excluding(q("B")));
        let b = Arc::new(Intent::new(q("B")));
        let extensions = BuilderRegistry::new();

        let mut epr = reference().with_required_intent(a.clone());
        let forward = endpoint().with_required_intent(b.clone());
        let (forward_match, forward_audit) =
            check(&mut epr, &forward, &extensions, Definitions::default());

        let mut epr = reference().with_required_intent(b);
        let backward = endpoint().with_required_intent(a);
        let (backward_match, backward_audit) =
            check(&mut epr, &backward, &extensions, Definitions::default());

        assert!(!forward_match);
        assert!(!backward_match);
        assert!(forward_audit.contains("mutually exclusive"));
        assert!(backward_audit.contains("mutually exclusive"));
    }

    #[test]
    fn exclusion_through_qualification() {
        let qualified = Intent::new(q("confidentiality.message")).qualifying(q("confidentiality"));
        let excluding = Intent::new(q("noConfidentiality")).excluding(q("confidentiality"));

        assert!(mutually_exclusive(&qualified, &excluding));
        assert!(mutually_exclusive(&excluding, &qualified));
    }

    #[test]
    fn exclusion_wins_over_matching_policy_sets() {
        let policy_set = Arc::new(
            PolicySet::new(q("ps"))
                .with_policy(q("wsp"), "<p/>")
                .providing(q("A"))
                .providing(q("B")),
        );
        let mut epr = reference()
            .with_required_intent(Arc::new(Intent::new(q("A")).excluding(q("B"))))
            .with_policy_set(policy_set.clone());
        let target = endpoint()
            .with_required_intent(Arc::new(Intent::new(q("B"))))
            .with_policy_set(policy_set);

        let (matched, _) = check(&mut epr, &target, &BuilderRegistry::new(), Definitions::default());

        assert!(!matched);
    }

    #[test]
    fn nothing_declared_matches_every_time() {
        let mut epr = reference();
        let target = endpoint();
        let extensions = BuilderRegistry::new();

        for _ in 0..2 {
            let (matched, audit) = check(&mut epr, &target, &extensions, Definitions::default());
            assert!(matched);
            assert!(audit.contains("Match because there are no intents or policies"));
        }
    }

    #[test]
    fn unresolved_intents_fail() {
        let mut epr = reference().with_required_intent(Arc::new(Intent::new(q("integrity"))));

        let (matched, audit) = check(
            &mut epr,
            &endpoint(),
            &BuilderRegistry::new(),
            Definitions::default(),
        );

        assert!(!matched);
        assert!(audit.contains("unresolved intents"));
    }

    #[test]
    fn intents_provided_by_binding_type_resolve() {
        let mut binding_type = BindingType::new(Binding::sca().binding_type);
        binding_type.may_provided_intents.push(q("integrity"));
        let definitions = Definitions {
            binding_types: vec![binding_type],
            ..Definitions::default()
        };
        let mut epr = reference().with_required_intent(Arc::new(Intent::new(q("integrity"))));

        let (matched, audit) = check(&mut epr, &endpoint(), &BuilderRegistry::new(), definitions);

        assert!(matched);
        assert!(audit.contains("intents are resolved and there are no policy sets"));
    }

    #[test]
    fn qualified_and_intent_map_intents_resolve_through_policy_sets() {
        let provides_parent = Arc::new(PolicySet::new(q("parent")).providing(q("confidentiality")));
        let mut epr = reference()
            .with_required_intent(Arc::new(
                Intent::new(q("confidentiality.message")).qualifying(q("confidentiality")),
            ))
            .with_policy_set(provides_parent);
        let (matched, _) = check(&mut epr, &endpoint(), &BuilderRegistry::new(), Definitions::default());
        assert!(matched);

        let mapped = Arc::new(PolicySet::new(q("mapped")).with_intent_map(IntentMap {
            provided_intent: q("confidentiality"),
            qualifiers: vec![Qualifier {
                intent: q("confidentiality.transport"),
                policies: Vec::new(),
            }],
        }));
        let mut epr = reference()
            .with_required_intent(Arc::new(Intent::new(q("confidentiality.transport"))))
            .with_policy_set(mapped);
        let (matched, _) = check(&mut epr, &endpoint(), &BuilderRegistry::new(), Definitions::default());
        assert!(matched);
    }

    #[test]
    fn intents_constrained_to_other_bindings_are_dropped() {
        let mut epr = reference().with_required_intent(Arc::new(
            Intent::new(q("soapOnly")).constrained_to(q("binding.ws")),
        ));

        let (matched, _) = check(
            &mut epr,
            &endpoint(),
            &BuilderRegistry::new(),
            Definitions::default(),
        );

        assert!(matched);
        assert!(epr.required_intents.is_empty());
    }

    #[test]
    fn one_sided_policy_sets_fail() {
        let policy_set = Arc::new(PolicySet::new(q("ps")).with_policy(q("wsp"), "<p/>"));

        let mut epr = reference().with_policy_set(policy_set.clone());
        let (matched, audit) = check(&mut epr, &endpoint(), &BuilderRegistry::new(), Definitions::default());
        assert!(!matched);
        assert!(audit.contains("at the endpoint reference but not at the endpoint"));

        let mut epr = reference();
        let target = endpoint().with_policy_set(policy_set);
        let (matched, _) = check(&mut epr, &target, &BuilderRegistry::new(), Definitions::default());
        assert!(matched, "reference falls back to the endpoint's applicable sets");
    }

    #[test]
    fn identical_policy_sets_match() {
        let ps1 = Arc::new(PolicySet::new(q("ps1")).with_policy(q("wsp"), "<a/>"));
        let ps2 = Arc::new(PolicySet::new(q("ps2")).with_policy(q("wsp"), "<b/>"));
        let mut epr = reference()
            .with_policy_set(ps1.clone())
            .with_policy_set(ps2.clone());
        let target = endpoint().with_policy_set(ps2).with_policy_set(ps1);

        let (matched, audit) = check(&mut epr, &target, &BuilderRegistry::new(), Definitions::default());

        assert!(matched);
        assert!(audit.contains("eactly the same"));
    }

    #[test]
    fn different_languages_fail() {
        let mut epr = reference()
            .with_policy_set(Arc::new(PolicySet::new(q("a")).with_policy(q("wsp"), "<a/>")));
        let target = endpoint()
            .with_policy_set(Arc::new(PolicySet::new(q("b")).with_policy(q("jaas"), "<b/>")));

        let (matched, audit) = check(&mut epr, &target, &BuilderRegistry::new(), Definitions::default());

        assert!(!matched);
        assert!(audit.contains("differnt languages"));
    }

    #[test]
    fn language_builder_decides_and_policy_sets_are_restored_on_failure() {
        let supported: HashSet<QName> = [q("binding.ws")].into_iter().collect();
        let unsupported = Arc::new(PolicySet::new(q("jms")).with_policy(q("jmsp"), "<j/>"));
        let applicable = Arc::new(PolicySet::new(q("a")).with_policy(q("wsp"), "<a/>"));
        let target = endpoint()
            .with_policy_set(Arc::new(PolicySet::new(q("b")).with_policy(q("wsp"), "<b/>")));

        for accept in [false, true] {
            let mut extensions = BuilderRegistry::new();
            extensions.register_policy_builder(Arc::new(LanguageBuilder {
                language: q("wsp"),
                accept,
                supported: None,
            }));
            extensions.register_policy_builder(Arc::new(LanguageBuilder {
                language: q("jmsp"),
                accept,
                supported: Some(supported.clone()),
            }));
            let mut epr = reference()
                .with_policy_set(unsupported.clone())
                .with_policy_set(applicable.clone());

            let (matched, audit) = check(&mut epr, &target, &extensions, Definitions::default());

            assert_eq!(matched, accept);
            if accept {
                assert_eq!(epr.policy_sets, vec![applicable.clone()]);
                assert!(audit.contains("language specific matching succeeded"));
            } else {
                assert_eq!(epr.policy_sets.len(), 2);
                assert!(audit.contains("language specific matching failed"));
            }
        }
    }
}
