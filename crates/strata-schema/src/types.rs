//! Scalar type definitions used by columns.
//!
//! Types are interned by name for the lifetime of one [`Schema`](crate::Schema);
//! every registry belongs to exactly one load.

use std::collections::HashMap;
use std::sync::Arc;

use strata_common::error::{StrataError, StrataResult};

/// A registered scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    /// Type name, unique within a registry.
    name: String,
    /// Number of type parameters (e.g. 1 for `VARCHAR(n)`).
    parameters: u32,
    /// Whether values of this type have a fixed encoded size.
    fixed_size: bool,
    /// Largest encoded size in bytes.
    max_size_bytes: u64,
}

impl Type {
    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of type parameters.
    pub fn parameters(&self) -> u32 {
        self.parameters
    }

    /// Returns true if values of this type have a fixed size.
    pub fn fixed_size(&self) -> bool {
        self.fixed_size
    }

    /// Returns the maximum encoded size in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}

/// Registry of interned types.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TypeRegistry {
    /// Types by name.
    by_name: HashMap<String, Arc<Type>>,
    /// Types in registration order.
    ordered: Vec<Arc<Type>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type.
    ///
    /// Fails with `DuplicateType` if the name is already interned.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        parameters: u32,
        fixed_size: bool,
        max_size_bytes: u64,
    ) -> StrataResult<Arc<Type>> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(StrataError::DuplicateType { name });
        }

        let ty = Arc::new(Type {
            name: name.clone(),
            parameters,
            fixed_size,
            max_size_bytes,
        });
        self.by_name.insert(name, Arc::clone(&ty));
        self.ordered.push(Arc::clone(&ty));
        Ok(ty)
    }

    /// Looks up a type by name.
    pub fn lookup(&self, name: &str) -> StrataResult<Arc<Type>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| StrataError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Returns the registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Type>> {
        self.ordered.iter()
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
