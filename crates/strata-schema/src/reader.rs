//! Artifact to schema graph pipeline.
//!
//! Loading runs six fixed phases over the decoded artifact:
//!
//! 1. types
//! 2. empty groups, keyed by root table name
//! 3. tables with their columns and table indexes
//! 4. parent joins
//! 5. group roots, storage ids, and membership
//! 6. group indexes
//!
//! Joins and group membership are deferred so that tables may reference
//! tables declared later in the artifact. Every record is checked for
//! required fields before anything is built from it. Any failure abandons
//! the whole load; the partially built graph is dropped with the context.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use tracing::{debug, info};

use strata_common::config::LoaderConfig;
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{IndexId, Ordinal, TableId};

use crate::artifact::required::field;
use crate::artifact::{
    check_required, check_required_as, decode_artifact, ArtifactRecord, CharCollationRecord,
    GroupRecord, IndexRecord, RecordKind, SchemaRecord, TableNameRecord, TableRecord,
};
use crate::model::{
    CharsetAndCollation, Column, GroupId, Index, IndexColumn, IndexConstraint, IndexJoinType,
    IndexScope, Join, Schema, TableName,
};

/// Builds a [`Schema`] from a serialized metadata artifact.
///
/// # Example
///
/// ```rust,ignore
/// use strata_schema::SchemaReader;
///
/// let schema = SchemaReader::default().load_file("catalog.bin")?;
/// for table in schema.tables() {
///     println!("{} -> {:?}", table.name(), table.group());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaReader {
    config: LoaderConfig,
}

impl SchemaReader {
    /// Creates a reader with the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads a length-prefixed artifact.
    pub fn load(&self, data: &[u8]) -> StrataResult<Schema> {
        let artifact = decode_artifact(data, self.config.max_artifact_bytes)?;
        self.load_artifact(&artifact)
    }

    /// Loads a length-prefixed artifact from a file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> StrataResult<Schema> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("Read {} artifact bytes from {:?}", data.len(), path);
        self.load(&data)
    }

    /// Builds a schema from an already decoded artifact.
    pub fn load_artifact(&self, artifact: &ArtifactRecord) -> StrataResult<Schema> {
        check_required(artifact)?;

        let mut ctx = LoadContext::new(&self.config);
        ctx.load_types(artifact)?;
        ctx.load_groups(artifact)?;
        ctx.load_tables(artifact)?;
        ctx.load_joins(artifact)?;
        ctx.resolve_groups()?;
        ctx.load_group_indexes()?;

        let schema = ctx.schema;
        info!(
            "Loaded schema: {} types, {} tables, {} joins, {} groups",
            schema.types().len(),
            schema.table_count(),
            schema.joins().len(),
            schema.groups().len()
        );
        Ok(schema)
    }
}

/// A group record together with the namespace it was declared in.
struct DeclaredGroup<'a> {
    id: GroupId,
    schema_name: &'a str,
    record: &'a GroupRecord,
}

/// Mutable state of one load. Dropped on failure.
struct LoadContext<'a> {
    config: &'a LoaderConfig,
    schema: Schema,
    groups: Vec<DeclaredGroup<'a>>,
}

impl<'a> LoadContext<'a> {
    fn new(config: &'a LoaderConfig) -> Self {
        Self {
            config,
            schema: Schema::new(),
            groups: Vec::new(),
        }
    }

    // =========================================================================
    // Phase 1: Types
    // =========================================================================

    fn load_types(&mut self, artifact: &ArtifactRecord) -> StrataResult<()> {
        const KIND: RecordKind = RecordKind::Type;

        for record in &artifact.types {
            check_required(record)?;
            self.schema.types_mut().register(
                field(&record.type_name, KIND, "type_name")?.as_str(),
                *field(&record.parameters, KIND, "parameters")?,
                *field(&record.fixed_size, KIND, "fixed_size")?,
                *field(&record.max_size_bytes, KIND, "max_size_bytes")?,
            )?;
        }

        debug!("Phase 1: registered {} types", self.schema.types().len());
        Ok(())
    }

    // =========================================================================
    // Phase 2: Groups
    // =========================================================================

    fn load_groups(&mut self, artifact: &'a ArtifactRecord) -> StrataResult<()> {
        for schema_record in &artifact.schemas {
            check_required(schema_record)?;
            let schema_name = field(&schema_record.schema_name, RecordKind::Schema, "schema_name")?;

            for record in &schema_record.groups {
                check_required(record)?;
                let root = field(&record.root_table_name, RecordKind::Group, "root_table_name")?;
                let id = self
                    .schema
                    .create_group(TableName::new(schema_name.as_str(), root.as_str()))?;
                self.groups.push(DeclaredGroup {
                    id,
                    schema_name,
                    record,
                });
            }
        }

        debug!("Phase 2: declared {} groups", self.groups.len());
        Ok(())
    }

    // =========================================================================
    // Phase 3: Tables
    // =========================================================================

    fn load_tables(&mut self, artifact: &ArtifactRecord) -> StrataResult<()> {
        let mut ids = TableIdAllocator::collect(artifact)?;

        for schema_record in &artifact.schemas {
            let schema_name = field(&schema_record.schema_name, RecordKind::Schema, "schema_name")?;
            for record in &schema_record.tables {
                self.load_table(schema_name, record, &mut ids)?;
            }
        }

        debug!("Phase 3: created {} tables", self.schema.table_count());
        Ok(())
    }

    fn load_table(
        &mut self,
        schema_name: &str,
        record: &TableRecord,
        ids: &mut TableIdAllocator,
    ) -> StrataResult<()> {
        const KIND: RecordKind = RecordKind::Table;

        check_required(record)?;
        let name = TableName::new(schema_name, field(&record.table_name, KIND, "table_name")?.as_str());
        let id = match record.table_id {
            Some(id) => TableId::new(id),
            None => ids.next_generated()?,
        };
        let table_charset = charset(record.char_coll.as_ref())?;

        let table = self
            .schema
            .create_table(name, id, record.ordinal.map(Ordinal::new))?;
        table.charset = table_charset;
        table.description = record.description.clone();
        table.protected = record.protected.unwrap_or(false);

        for column in &record.columns {
            const KIND: RecordKind = RecordKind::Column;

            check_required(column)?;
            let ty = self
                .schema
                .types()
                .lookup(field(&column.type_name, KIND, "type_name")?)?;
            let column = Column::new(
                id,
                field(&column.column_name, KIND, "column_name")?.as_str(),
                *field(&column.position, KIND, "position")?,
                ty,
                *field(&column.is_nullable, KIND, "is_nullable")?,
            )
            .with_type_params(column.type_param1, column.type_param2)
            .with_init_auto_inc(column.init_auto_inc)
            .with_default_value(column.default_value.clone())
            .with_charset(charset(column.char_coll.as_ref())?)
            .with_description(column.description.clone());
            self.schema.add_column(column)?;
        }

        for index in &record.indexes {
            check_required(index)?;
            let index = self.build_index(index, IndexScope::Table(id), RecordKind::Index)?;
            self.schema.add_table_index(id, index)?;
        }

        Ok(())
    }

    /// Builds an index and resolves its columns.
    ///
    /// Each column is owned by its explicit table, or else by the previous
    /// column's table. The first column of a table index defaults to the
    /// table itself; the first column of a group index has no default.
    /// Join types are only read for group indexes.
    fn build_index(
        &self,
        record: &IndexRecord,
        scope: IndexScope,
        kind: RecordKind,
    ) -> StrataResult<Index> {
        let constraint = IndexConstraint::classify(
            *field(&record.is_pk, kind, "is_pk")?,
            *field(&record.is_ak_fk, kind, "is_ak_fk")?,
            *field(&record.is_unique, kind, "is_unique")?,
        );
        let join_type = match scope {
            IndexScope::Group(_) => record.join_type.map(IndexJoinType::from_raw).transpose()?,
            IndexScope::Table(_) => None,
        };

        let mut index = Index::new(
            IndexId::new(*field(&record.index_id, kind, "index_id")?),
            field(&record.index_name, kind, "index_name")?.as_str(),
            scope,
            *field(&record.is_unique, kind, "is_unique")?,
            constraint,
        )
        .with_join_type(join_type)
        .with_tree_name(record.tree_name.clone())
        .with_description(record.description.clone());

        let mut owner = match scope {
            IndexScope::Table(table) => Some(table),
            IndexScope::Group(_) => None,
        };
        for column in &record.columns {
            const KIND: RecordKind = RecordKind::IndexColumn;

            check_required(column)?;
            if let Some(table_name) = &column.table_name {
                let name = table_name_of(table_name)?;
                let table = self.schema.table_by_qualified(&name).ok_or_else(|| {
                    StrataError::UnresolvedTable {
                        kind: "IndexColumn",
                        table: name.to_string(),
                    }
                })?;
                owner = Some(table.id());
            }

            index.push_column(IndexColumn::resolve(
                &self.schema,
                owner,
                field(&column.column_name, KIND, "column_name")?,
                *field(&column.position, KIND, "position")?,
                *field(&column.is_ascending, KIND, "is_ascending")?,
            )?);
        }

        Ok(index)
    }

    // =========================================================================
    // Phase 4: Joins
    // =========================================================================

    fn load_joins(&mut self, artifact: &ArtifactRecord) -> StrataResult<()> {
        for schema_record in &artifact.schemas {
            let schema_name = field(&schema_record.schema_name, RecordKind::Schema, "schema_name")?;

            for record in &schema_record.tables {
                let Some(join) = &record.parent_table else {
                    continue;
                };
                check_required(join)?;

                let child_name = TableName::new(
                    schema_name.as_str(),
                    field(&record.table_name, RecordKind::Table, "table_name")?.as_str(),
                );
                let parent_name = table_name_of(field(&join.parent_table, RecordKind::Join, "parent_table")?)?;

                let child = self.table_id(&child_name)?;
                let parent = self
                    .schema
                    .table_by_qualified(&parent_name)
                    .map(|t| t.id())
                    .ok_or_else(|| StrataError::UnresolvedParent {
                        child: child_name.to_string(),
                        parent: parent_name.to_string(),
                    })?;

                let join_id =
                    self.schema
                        .create_join(format!("{parent_name}/{child_name}"), parent, child)?;
                for column in &join.columns {
                    const KIND: RecordKind = RecordKind::JoinColumn;

                    check_required(column)?;
                    self.schema.add_join_column(
                        join_id,
                        field(&column.parent_column, KIND, "parent_column")?,
                        field(&column.child_column, KIND, "child_column")?,
                    )?;
                }
            }
        }

        debug!("Phase 4: created {} joins", self.schema.joins().len());
        Ok(())
    }

    // =========================================================================
    // Phase 5: Group Resolution
    // =========================================================================

    fn resolve_groups(&mut self) -> StrataResult<()> {
        let mut storage_id = self.schema.max_table_id();

        for declared in &self.groups {
            let root_name = TableName::new(
                declared.schema_name,
                field(&declared.record.root_table_name, RecordKind::Group, "root_table_name")?
                    .as_str(),
            );
            let root = self.table_id(&root_name).map_err(|_| StrataError::UnresolvedTable {
                kind: "Group",
                table: root_name.to_string(),
            })?;

            storage_id = storage_id.checked_next().ok_or_else(exhausted)?;
            self.schema.attach_group_root(
                declared.id,
                root,
                storage_id,
                format!("{}{}", self.config.group_table_prefix, root_name.table()),
                declared.record.tree_name.clone(),
            )?;
            debug!("Group {} assigned storage table id {}", root_name, storage_id);

            let mut members = 1;
            let mut queue: VecDeque<_> = self.schema.child_joins(root).map(Join::id).collect();
            while let Some(join) = queue.pop_front() {
                let child = self
                    .schema
                    .join(join)
                    .map(Join::child)
                    .ok_or_else(|| StrataError::internal(format!("join {} is missing", join.as_usize())))?;
                if self.schema.table(child).and_then(|t| t.group()) == Some(declared.id) {
                    continue;
                }

                self.schema.assign_join_group(join, declared.id)?;
                members += 1;
                queue.extend(self.schema.child_joins(child).map(Join::id));
            }
            debug!("Group {} has {} member tables", root_name, members);
        }

        debug!("Phase 5: resolved {} groups", self.groups.len());
        Ok(())
    }

    // =========================================================================
    // Phase 6: Group Indexes
    // =========================================================================

    fn load_group_indexes(&mut self) -> StrataResult<()> {
        let mut count = 0;
        for declared in &self.groups {
            for record in &declared.record.indexes {
                check_required_as(record, RecordKind::GroupIndex)?;
                let index =
                    self.build_index(record, IndexScope::Group(declared.id), RecordKind::GroupIndex)?;
                self.schema.add_group_index(declared.id, index)?;
                count += 1;
            }
        }

        debug!("Phase 6: created {} group indexes", count);
        Ok(())
    }

    fn table_id(&self, name: &TableName) -> StrataResult<TableId> {
        self.schema
            .table_by_qualified(name)
            .map(|t| t.id())
            .ok_or_else(|| StrataError::UnresolvedTable {
                kind: "Table",
                table: name.to_string(),
            })
    }
}

/// Hands out table ids: explicit ids as declared, generated ids as the
/// smallest positive integers no table claims.
struct TableIdAllocator {
    claimed: HashSet<u32>,
    next: Option<u32>,
}

impl TableIdAllocator {
    fn collect(artifact: &ArtifactRecord) -> StrataResult<Self> {
        let mut claimed = HashSet::new();
        for schema_record in &artifact.schemas {
            for record in &schema_record.tables {
                let Some(id) = record.table_id else {
                    continue;
                };
                if !claimed.insert(id) {
                    return Err(StrataError::DuplicateTable {
                        table: format!(
                            "{}.{}",
                            schema_record.schema_name.as_deref().unwrap_or_default(),
                            record.table_name.as_deref().unwrap_or_default()
                        ),
                        reason: format!("id {id} is declared more than once"),
                    });
                }
            }
        }

        Ok(Self {
            claimed,
            next: Some(TableId::FIRST.as_u32()),
        })
    }

    fn next_generated(&mut self) -> StrataResult<TableId> {
        let mut id = self.next.ok_or_else(exhausted)?;
        while self.claimed.contains(&id) {
            id = id.checked_add(1).ok_or_else(exhausted)?;
        }
        self.claimed.insert(id);
        self.next = id.checked_add(1);
        Ok(TableId::new(id))
    }
}

fn exhausted() -> StrataError {
    StrataError::invalid_argument("table id space exhausted")
}

fn table_name_of(record: &TableNameRecord) -> StrataResult<TableName> {
    const KIND: RecordKind = RecordKind::TableName;

    check_required(record)?;
    Ok(TableName::new(
        field(&record.schema_name, KIND, "schema_name")?.as_str(),
        field(&record.table_name, KIND, "table_name")?.as_str(),
    ))
}

fn charset(record: Option<&CharCollationRecord>) -> StrataResult<Option<CharsetAndCollation>> {
    const KIND: RecordKind = RecordKind::CharCollation;

    let Some(record) = record else {
        return Ok(None);
    };
    check_required(record)?;
    Ok(Some(CharsetAndCollation::new(
        field(&record.character_set_name, KIND, "character_set_name")?.as_str(),
        field(&record.collation_order_name, KIND, "collation_order_name")?.as_str(),
    )))
}
