use crate::{Entity, Method, MethodId, Routine, RoutineKind};

/// Everything resolved from one schema package.
///
/// Methods live in a single arena and reference each other (and are
/// referenced from entities) by [`MethodId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataModel {
    pub entities: Vec<Entity>,
    pub methods: Vec<Method>,
    pub routines: Vec<Routine>,
}

impl DataModel {
    pub fn entity(&self, table_name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.table_name == table_name)
    }

    pub fn entity_mut(&mut self, table_name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.table_name == table_name)
    }

    pub fn method(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(id.0)
    }

    /// Add a method to the arena.
    pub fn push_method(&mut self, method: Method) -> MethodId {
        let id = MethodId(self.methods.len());
        self.methods.push(method);
        id
    }

    /// Methods with their ids, in resolution order.
    pub fn methods_with_ids(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (MethodId(i), m))
    }

    /// Resolve a list of ids, skipping any that are out of range.
    pub fn methods_by_id<'a>(&'a self, ids: &'a [MethodId]) -> impl Iterator<Item = &'a Method> {
        ids.iter().filter_map(|id| self.method(*id))
    }

    pub fn routines_of(&self, kind: RoutineKind) -> impl Iterator<Item = &Routine> {
        self.routines.iter().filter(move |r| r.kind == kind)
    }

    /// Unique accessors whose save is a plain non-query.
    pub fn non_query_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods
            .iter()
            .filter(|m| m.unique && m.identity_columns.is_empty())
    }

    /// Accessors whose save returns the generated identity.
    pub fn scalar_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods
            .iter()
            .filter(|m| !m.identity_columns.is_empty())
    }

    pub fn unique_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.unique)
    }

    pub fn multiple_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| !m.unique)
    }
}

#[cfg(test)]
mod tests {
    use dacgen_core::MappedType;

    use super::*;
    use crate::{AsyncFlags, EntityProperty, MethodKind};

    fn method(unique: bool, identity: bool) -> Method {
        let id = EntityProperty {
            name: "[dbo].[T].[Id]".to_string(),
            sql_type: "[int]".to_string(),
            ty: MappedType::unknown(),
            nullable: false,
            identity: true,
            foreign_name: None,
            annotations: Vec::new(),
        };
        Method {
            kind: MethodKind::Index,
            key_name: "[dbo].[IX]".to_string(),
            table_name: "[dbo].[T]".to_string(),
            entity_name: "T".to_string(),
            params: Vec::new(),
            columns: Vec::new(),
            identity_columns: if identity { vec![id] } else { Vec::new() },
            unique,
            asyncs: AsyncFlags::default(),
            foreigns: Vec::new(),
        }
    }

    #[test]
    fn test_aggregate_partitions() {
        let mut model = DataModel::default();
        model.push_method(method(true, false));
        model.push_method(method(true, true));
        model.push_method(method(false, false));
        model.push_method(method(false, true));

        assert_eq!(model.non_query_methods().count(), 1);
        assert_eq!(model.scalar_methods().count(), 2);
        assert_eq!(model.unique_methods().count(), 2);
        assert_eq!(model.multiple_methods().count(), 2);
    }

    #[test]
    fn test_method_ids_are_arena_positions() {
        let mut model = DataModel::default();
        let first = model.push_method(method(true, false));
        let second = model.push_method(method(false, false));

        assert_eq!(first, MethodId(0));
        assert_eq!(second, MethodId(1));
        assert!(!model.method(second).unwrap().unique);
        assert!(model.method(MethodId(7)).is_none());
        assert_eq!(model.methods_by_id(&[second, MethodId(9)]).count(), 1);
    }
}
