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

//! Interface contract compatibility between a reference and an endpoint.

use crate::assembly::{Assembly, Endpoint, EndpointReference, Interface, InterfaceContract};
use crate::resolution::audit::Audit;

/// Decides whether `source` can be wired to `target`.
pub trait InterfaceContractMapper: Send + Sync {
    fn is_compatible_subset(
        &self,
        source: &InterfaceContract,
        target: &InterfaceContract,
        audit: &mut Audit,
    ) -> bool;
}

///
/// Structural operation comparison.
///
/// Every source operation must exist on the target with the same input and
/// output types, and the target may not raise faults the source does not
/// declare. Callback interfaces are compared in the opposite direction.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultInterfaceContractMapper;

impl DefaultInterfaceContractMapper {
    fn is_subset(source: &Interface, target: &Interface, audit: &mut Audit) -> bool {
        if source.remotable != target.remotable {
            audit.append(format!(
                "Interface {} remotable={} does not match interface {} remotable={} ",
                source.name, source.remotable, target.name, target.remotable
            ));
            return false;
        }

        for operation in &source.operations {
            let Some(target_operation) = target.operation(&operation.name) else {
                audit.append(format!(
                    "Operation {} not found on interface {} ",
                    operation.name, target.name
                ));
                return false;
            };
            if operation.input_types != target_operation.input_types
                || operation.output_type != target_operation.output_type
            {
                audit.append(format!(
                    "Operation {} signatures differ between {} and {} ",
                    operation.name, source.name, target.name
                ));
                return false;
            }
            if let Some(fault) = target_operation
                .faults
                .iter()
                .find(|fault| !operation.faults.contains(fault))
            {
                audit.append(format!(
                    "Operation {} on {} raises fault {} not declared by {} ",
                    operation.name, target.name, fault, source.name
                ));
                return false;
            }
        }
        true
    }
}

impl InterfaceContractMapper for DefaultInterfaceContractMapper {
    fn is_compatible_subset(
        &self,
        source: &InterfaceContract,
        target: &InterfaceContract,
        audit: &mut Audit,
    ) -> bool {
        if !Self::is_subset(&source.interface, &target.interface, audit) {
            return false;
        }
        match (&source.callback_interface, &target.callback_interface) {
            (None, None) => true,
            (Some(source_callback), Some(target_callback)) => {
                Self::is_subset(target_callback, source_callback, audit)
            }
            _ => {
                audit.append(format!(
                    "Callback interfaces of {} and {} do not match ",
                    source.interface.name, target.interface.name
                ));
                false
            }
        }
    }
}

/// Runs the mapper, comparing generated WSDL forms when the two contracts are of
/// different kinds or either one carries a normalized form.
pub fn compare_contracts(
    mapper: &dyn InterfaceContractMapper,
    source: &InterfaceContract,
    target: &InterfaceContract,
    audit: &mut Audit,
) -> bool {
    if source.kind != target.kind
        || source.normalized_wsdl_contract.is_some()
        || target.normalized_wsdl_contract.is_some()
    {
        mapper.is_compatible_subset(
            &source.generated_wsdl_contract(),
            &target.generated_wsdl_contract(),
            audit,
        )
    } else {
        mapper.is_compatible_subset(source, target, audit)
    }
}

/// Checks the reference's contract against the endpoint's service contract.
pub fn have_matching_interface_contracts(
    mapper: &dyn InterfaceContractMapper,
    assembly: &Assembly,
    endpoint_reference: &EndpointReference,
    endpoint: &Endpoint,
    audit: &mut Audit,
) -> bool {
    audit.append(format!(
        "Match interface of {endpoint_reference} to {endpoint} "
    ));

    let reference_contract = assembly
        .get_reference(endpoint_reference.reference)
        .and_then(|reference| reference.interface_contract.as_ref());
    let Some(reference_contract) = reference_contract else {
        audit.append("Match because there is no interface contract on the reference ");
        audit.append_separator();
        return true;
    };

    let endpoint_contract = match &endpoint.interface_contract {
        Some(contract) if !contract.interface.operations.is_empty() => contract,
        _ => {
            audit.append(
                "Match because the endpoint is remote and we don't have a copy of it's interface contract ",
            );
            audit.append_separator();
            return true;
        }
    };

    let matched = compare_contracts(mapper, reference_contract, endpoint_contract, audit);
    if matched {
        audit.append("Match because the interface contract mapper succeeded ");
    } else {
        audit.append("Match failed because the interface contract mapper failed ");
    }
    audit.append_separator();
    matched
}

#[cfg(test)]
mod tests {
    use super::{DefaultInterfaceContractMapper, InterfaceContractMapper};
    use crate::assembly::{Interface, InterfaceContract, InterfaceKind, Operation};
    use crate::resolution::audit::Audit;

    fn contract(operations: Vec<Operation>) -> InterfaceContract {
        InterfaceContract::new(InterfaceKind::Java, Interface::new("Hello", operations))
    }

    #[test]
    fn source_operations_must_exist_on_target() {
        let source = contract(vec![Operation::new("hello").with_input("string")]);
        let target = contract(vec![
            Operation::new("hello").with_input("string"),
            Operation::new("bye"),
        ]);
        let mut audit = Audit::new();

        assert!(DefaultInterfaceContractMapper.is_compatible_subset(&source, &target, &mut audit));
        assert!(!DefaultInterfaceContractMapper.is_compatible_subset(&target, &source, &mut audit));
        assert!(audit.contains("Operation bye not found"));
    }

    #[test]
    fn target_faults_must_be_declared_by_source() {
        let source = contract(vec![Operation::new("hello")]);
        let target = contract(vec![Operation::new("hello").with_fault("Busy")]);
        let mut audit = Audit::new();

        assert!(!DefaultInterfaceContractMapper.is_compatible_subset(&source, &target, &mut audit));
        assert!(audit.contains("raises fault Busy"));
    }

    #[test]
    fn callbacks_compare_in_reverse() {
        let source = contract(vec![Operation::new("hello")]).with_callback(Interface::new(
            "HelloCallback",
            vec![Operation::new("done"), Operation::new("progress")],
        ));
        let target = contract(vec![Operation::new("hello")])
            .with_callback(Interface::new("HelloCallback", vec![Operation::new("done")]));
        let mut audit = Audit::new();

        assert!(DefaultInterfaceContractMapper.is_compatible_subset(&source, &target, &mut audit));

        let no_callback = contract(vec![Operation::new("hello")]);
        assert!(!DefaultInterfaceContractMapper.is_compatible_subset(
            &no_callback,
            &target,
            &mut audit
        ));
    }
}
