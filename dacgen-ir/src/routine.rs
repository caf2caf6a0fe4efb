/// Kind of a stored routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    Procedure,
    ScalarFunction,
    InlineTableFunction,
    TableFunction,
}

impl RoutineKind {
    pub const ALL: [RoutineKind; 4] = [
        RoutineKind::Procedure,
        RoutineKind::ScalarFunction,
        RoutineKind::InlineTableFunction,
        RoutineKind::TableFunction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineKind::Procedure => "stored procedure",
            RoutineKind::ScalarFunction => "scalar function",
            RoutineKind::InlineTableFunction => "inline table function",
            RoutineKind::TableFunction => "table function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineParam {
    /// Qualified parameter name, e.g. `[dbo].[Proc1].[@Id]`
    pub name: String,
    /// SQL type as declared, e.g. `[int]`
    pub sql_type: String,
}

/// A stored procedure or function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub kind: RoutineKind,
    pub name: String,
    pub params: Vec<RoutineParam>,
}
