/// Type discriminators of the model objects the generator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Table,
    SimpleColumn,
    PrimaryKeyConstraint,
    ForeignKeyConstraint,
    Index,
    IndexedColumnSpecification,
    Procedure,
    ScalarFunction,
    InlineTableValuedFunction,
    MultiStatementTableValuedFunction,
    SubroutineParameter,
    TypeSpecifier,
}

impl ElementType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "SqlTable",
            Self::SimpleColumn => "SqlSimpleColumn",
            Self::PrimaryKeyConstraint => "SqlPrimaryKeyConstraint",
            Self::ForeignKeyConstraint => "SqlForeignKeyConstraint",
            Self::Index => "SqlIndex",
            Self::IndexedColumnSpecification => "SqlIndexedColumnSpecification",
            Self::Procedure => "SqlProcedure",
            Self::ScalarFunction => "SqlScalarFunction",
            Self::InlineTableValuedFunction => "SqlInlineTableValuedFunction",
            Self::MultiStatementTableValuedFunction => "SqlMultiStatementTableValuedFunction",
            Self::SubroutineParameter => "SqlSubroutineParameter",
            Self::TypeSpecifier => "SqlTypeSpecifier",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
