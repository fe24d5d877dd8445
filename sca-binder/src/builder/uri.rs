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

//! Binding URI composition.
//!
//! Base URIs are joined by concatenation after being forced to end in `/` or
//! `#`, so the last path segment of a base is kept. Component relative parts
//! are resolved as URI references. Absolute URIs are parsed with `url`;
//! relative ones are handled as plain paths.

use crate::assembly::{Binding, QName};
use crate::error::UriError;
use std::collections::HashMap;
use url::Url;

/// Default base URIs per binding type; the first entry of a list wins.
pub type BindingBaseUris = HashMap<QName, Vec<String>>;

const ILLEGAL_CHARACTERS: &[char] = &[' ', '"', '<', '>', '\\', '^', '`', '{', '|', '}'];

/// Rejects characters and escapes a URI reference may not contain.
pub fn validate(uri: &str) -> Result<(), UriError> {
    let bytes = uri.as_bytes();
    let mut seen_fragment = false;
    for (index, character) in uri.char_indices() {
        if character.is_control() || ILLEGAL_CHARACTERS.contains(&character) {
            return Err(UriError::IllegalCharacter {
                uri: uri.to_string(),
                character,
                index,
            });
        }
        if character == '#' {
            if seen_fragment {
                return Err(UriError::IllegalCharacter {
                    uri: uri.to_string(),
                    character,
                    index,
                });
            }
            seen_fragment = true;
        }
        if character == '%' {
            let escape = bytes.get(index + 1..index + 3);
            if !escape.is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit)) {
                return Err(UriError::MalformedEscape {
                    uri: uri.to_string(),
                    index,
                });
            }
        }
    }
    Ok(())
}

/// `true` when `uri` starts with a scheme.
pub fn is_absolute(uri: &str) -> bool {
    let Some(colon) = uri.find(':') else {
        return false;
    };
    let scheme = &uri[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Ensures `path` ends in `/` or `#`.
pub fn add_slash_to_path(path: &str) -> String {
    if path.ends_with('/') || path.ends_with('#') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Removes `.` and `..` segments from a relative path.
pub fn remove_dot_segments(path: &str) -> String {
    let leading_slash = path.starts_with('/');
    let trailing_slash = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if leading_slash => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    let mut normalized = segments.join("/");
    if leading_slash {
        normalized.insert(0, '/');
    }
    if trailing_slash && !normalized.is_empty() && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn parse_absolute(uri: &str) -> Result<Url, UriError> {
    Url::parse(uri).map_err(|err| UriError::Parse {
        uri: uri.to_string(),
        reason: err.to_string(),
    })
}

/// Resolves `reference` against `base` as a URI reference.
pub fn resolve(base: &str, reference: &str) -> Result<String, UriError> {
    validate(reference)?;
    if is_absolute(reference) {
        return Ok(reference.to_string());
    }
    if is_absolute(base) {
        let joined = parse_absolute(base)?
            .join(reference)
            .map_err(|err| UriError::Parse {
                uri: reference.to_string(),
                reason: err.to_string(),
            })?;
        return Ok(joined.to_string());
    }
    if reference.starts_with('/') {
        return Ok(remove_dot_segments(reference));
    }
    let base_path = base.split(['#', '?']).next().unwrap_or_default();
    let directory = match base_path.rfind('/') {
        Some(slash) => &base_path[..=slash],
        None => "",
    };
    Ok(remove_dot_segments(&format!("{directory}{reference}")))
}

/// Appends `uri` to `base` unless `uri` is already absolute.
pub fn based_uri(base: &str, uri: &str) -> Result<String, UriError> {
    if is_absolute(uri) {
        return Ok(uri.to_string());
    }
    let relative = uri.strip_prefix('/').unwrap_or(uri);
    let combined = format!("{base}{relative}");
    validate(&combined)?;
    if is_absolute(&combined) {
        Ok(parse_absolute(&combined)?.to_string())
    } else {
        Ok(remove_dot_segments(&combined))
    }
}

/// Inputs of the binding URI algorithm after normalization.
#[derive(Clone, Copy, Debug)]
pub struct BindingUriParts<'a> {
    pub base: Option<&'a str>,
    pub component: Option<&'a str>,
    pub binding_uri: Option<&'a str>,
    pub service_name: &'a str,
    pub include_binding_name: bool,
    pub binding_name: &'a str,
}

/// Concatenates base, component and service parts into one binding URI.
pub fn compose_binding_uri(parts: BindingUriParts<'_>) -> Result<String, UriError> {
    let name = if parts.include_binding_name {
        format!("{}/{}", parts.service_name, parts.binding_name)
    } else {
        parts.service_name.to_string()
    };

    let composed = match (parts.base, parts.component, parts.binding_uri) {
        (None, None, Some(binding_uri)) => format!("{name}/{binding_uri}"),
        (None, None, None) => name,
        (None, Some(component), Some(binding_uri)) if binding_uri.starts_with('/') => {
            resolve(component, binding_uri)?
        }
        (None, Some(component), Some(binding_uri)) => {
            resolve(component, &format!("{name}/{binding_uri}"))?
        }
        (None, Some(component), None) => resolve(component, &name)?,
        (Some(base), None, Some(binding_uri)) => based_uri(base, binding_uri)?,
        (Some(base), None, None) => based_uri(base, &name)?,
        (Some(base), Some(component), Some(binding_uri)) => {
            based_uri(base, &resolve(component, binding_uri)?)?
        }
        (Some(base), Some(component), None) => based_uri(base, &resolve(component, &name)?)?,
    };

    let trimmed = composed.strip_suffix('/').unwrap_or(&composed);
    validate(trimmed)?;
    if is_absolute(trimmed) {
        Ok(trimmed.to_string())
    } else {
        resolve("/", trimmed)
    }
}

///
/// Computes the URI of `binding` on the service `service_name` of the
/// component at `component_uri`.
///
/// Returns `Ok(None)` when the binding already carries an absolute URI, which
/// is left untouched.
///
pub fn binding_uri_for(
    component_uri: Option<&str>,
    service_name: &str,
    binding: &Binding,
    base_uris: &BindingBaseUris,
) -> Result<Option<String>, UriError> {
    let include_binding_name = binding.name.as_deref() != Some(service_name);

    let binding_uri = match binding.uri.as_deref() {
        Some(uri) => {
            validate(uri)?;
            if is_absolute(uri) {
                return Ok(None);
            }
            Some(uri)
        }
        None => None,
    };

    let binding_name = binding.name.as_deref().unwrap_or(service_name);

    let component = match component_uri {
        Some(component_uri) => {
            let component = add_slash_to_path(component_uri);
            validate(&component)?;
            Some(component)
        }
        None => None,
    };

    if let Some(component) = component.as_deref().filter(|c| is_absolute(c)) {
        return compose_binding_uri(BindingUriParts {
            base: None,
            component: Some(component),
            binding_uri,
            service_name,
            include_binding_name,
            binding_name,
        })
        .map(Some);
    }

    let base = match base_uris
        .get(&binding.binding_type)
        .and_then(|uris| uris.first())
    {
        Some(base) => {
            let base = add_slash_to_path(base);
            validate(&base)?;
            Some(base)
        }
        None => None,
    };

    compose_binding_uri(BindingUriParts {
        base: base.as_deref(),
        component: component.as_deref(),
        binding_uri,
        service_name,
        include_binding_name,
        binding_name,
    })
    .map(Some)
}

#[cfg(test)]
mod tests {
    use super::{add_slash_to_path, binding_uri_for, is_absolute, remove_dot_segments, BindingBaseUris};
    use crate::assembly::{Binding, QName};
    use crate::error::UriError;

    fn ws_type() -> QName {
        QName::sca("binding.ws")
    }

    fn base_uris(base: &str) -> BindingBaseUris {
        BindingBaseUris::from([(ws_type(), vec![base.to_string()])])
    }

    fn uri(component: Option<&str>, service: &str, binding: &Binding, bases: &BindingBaseUris) -> String {
        binding_uri_for(component, service, binding, bases)
            .expect("binding URI should build")
            .expect("binding URI should be assigned")
    }

    #[test]
    fn base_component_and_service_concatenate() {
        let bases = base_uris("http://x/");
        let binding = Binding::new(ws_type()).with_name("S");

        assert_eq!(uri(Some("a/b"), "S", &binding, &bases), "http://x/a/b/S");
    }

    #[test]
    fn binding_name_segment_only_when_it_differs() {
        let bases = base_uris("http://x/");
        let binding = Binding::new(ws_type()).with_name("B");

        assert_eq!(uri(Some("a/b"), "S", &binding, &bases), "http://x/a/b/S/B");
    }

    #[test]
    fn base_without_trailing_slash_keeps_last_segment() {
        let bases = base_uris("http://x/ctx");
        let binding = Binding::new(ws_type()).with_name("S");

        assert_eq!(uri(Some("C"), "S", &binding, &bases), "http://x/ctx/C/S");
    }

    #[test]
    fn base_ending_in_hash_is_not_extended_with_slash() {
        let bases = base_uris("http://x/svc#");
        let binding = Binding::new(ws_type()).with_name("S");

        assert_eq!(uri(Some("C"), "S", &binding, &bases), "http://x/svc#C/S");
    }

    #[test]
    fn without_base_the_uri_is_component_relative_with_leading_slash() {
        let binding = Binding::sca().with_name("S");

        assert_eq!(
            uri(Some("a/b"), "S", &binding, &BindingBaseUris::new()),
            "/a/b/S"
        );
    }

    #[test]
    fn relative_binding_uri_is_appended_below_the_service() {
        let binding = Binding::sca().with_name("S").with_uri("x/");

        assert_eq!(
            uri(Some("a/b"), "S", &binding, &BindingBaseUris::new()),
            "/a/b/S/x"
        );
    }

    #[test]
    fn rooted_binding_uri_replaces_the_component_path() {
        let binding = Binding::sca().with_name("S").with_uri("/x");

        assert_eq!(uri(Some("a/b"), "S", &binding, &BindingBaseUris::new()), "/x");
    }

    #[test]
    fn absolute_binding_uri_is_left_untouched() {
        let binding = Binding::new(ws_type()).with_uri("http://elsewhere/S");

        let assigned = binding_uri_for(Some("a"), "S", &binding, &base_uris("http://x/"));
        assert_eq!(assigned, Ok(None));
    }

    #[test]
    fn absolute_component_uri_wins_over_base() {
        let bases = base_uris("http://x/");
        let binding = Binding::new(ws_type()).with_name("S");

        assert_eq!(uri(Some("http://h/c"), "S", &binding, &bases), "http://h/c/S");
    }

    #[test]
    fn no_component_falls_back_to_name_only() {
        let binding = Binding::sca().with_name("S");

        assert_eq!(uri(None, "S", &binding, &BindingBaseUris::new()), "/S");
    }

    #[test]
    fn illegal_characters_are_reported() {
        let binding = Binding::sca().with_name("S");

        let result = binding_uri_for(Some("a b"), "S", &binding, &BindingBaseUris::new());
        assert!(matches!(
            result,
            Err(UriError::IllegalCharacter { character: ' ', .. })
        ));
    }

    #[test]
    fn helpers_behave_like_uri_references() {
        assert!(is_absolute("http://x"));
        assert!(is_absolute("urn:a"));
        assert!(!is_absolute("a/b:c"));
        assert!(!is_absolute("/a"));
        assert_eq!(add_slash_to_path("a"), "a/");
        assert_eq!(add_slash_to_path("a#"), "a#");
        assert_eq!(remove_dot_segments("a/./b/../c"), "a/c");
        assert_eq!(remove_dot_segments("/a/../../b"), "/b");
    }
}
