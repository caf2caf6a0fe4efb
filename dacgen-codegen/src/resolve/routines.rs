//! Stored procedure and function signatures.

use dacgen_ir::{Routine, RoutineKind, RoutineParam};
use dacgen_schema::{ElementType, SchemaTree};

fn element_type(kind: RoutineKind) -> ElementType {
    match kind {
        RoutineKind::Procedure => ElementType::Procedure,
        RoutineKind::ScalarFunction => ElementType::ScalarFunction,
        RoutineKind::InlineTableFunction => ElementType::InlineTableValuedFunction,
        RoutineKind::TableFunction => ElementType::MultiStatementTableValuedFunction,
    }
}

/// Every routine of one kind, in declaration order, with its parameters.
pub fn resolve_routines(tree: &SchemaTree, kind: RoutineKind) -> Vec<Routine> {
    tree.model_elements(element_type(kind))
        .into_iter()
        .filter_map(|element| {
            let name = element.object_name()?;
            let params = element
                .related("Parameters", ElementType::SubroutineParameter)
                .into_iter()
                .filter_map(|param| {
                    Some(RoutineParam {
                        name: param.object_name()?.to_string(),
                        sql_type: param.type_reference("Type").unwrap_or_default().to_string(),
                    })
                })
                .collect();
            Some(Routine {
                kind,
                name: name.to_string(),
                params,
            })
        })
        .collect()
}

/// All four routine kinds, grouped by kind.
pub fn resolve_all_routines(tree: &SchemaTree) -> Vec<Routine> {
    RoutineKind::ALL
        .into_iter()
        .flat_map(|kind| resolve_routines(tree, kind))
        .collect()
}
