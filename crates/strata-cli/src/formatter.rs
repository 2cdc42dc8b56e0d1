//! Table rendering for schema listings.

use comfy_table::{Cell, ContentArrangement, Table};

use strata_schema::{HKey, Schema};

fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_header(header);
    table
}

/// Formats every table with its identity and placement.
pub fn format_tables(schema: &Schema) -> String {
    let mut out = new_table(["id", "ordinal", "table", "parent", "group", "columns"]);

    for table in schema.tables() {
        let parent = schema
            .parent_join(table.id())
            .and_then(|join| schema.table(join.parent()))
            .map_or_else(String::new, |p| p.name().to_string());
        let group = schema
            .group_of(table.id())
            .map_or_else(String::new, |g| g.name().to_string());
        let columns = table
            .columns()
            .iter()
            .map(|c| format!("{} {}", c.name(), c.ty().name()))
            .collect::<Vec<_>>()
            .join(", ");

        out.add_row(vec![
            Cell::new(table.id()),
            Cell::new(table.ordinal()),
            Cell::new(table.name()),
            Cell::new(parent),
            Cell::new(group),
            Cell::new(columns),
        ]);
    }

    out.to_string()
}

/// Formats an HKey one segment per row, with column names resolved.
pub fn format_hkey(schema: &Schema, hkey: &HKey) -> String {
    let mut out = new_table(["segment", "table", "ordinal", "columns"]);

    for (i, segment) in hkey.segments().iter().enumerate() {
        let Some(table) = schema.table(segment.table()) else {
            continue;
        };
        let columns = segment
            .columns()
            .iter()
            .filter_map(|c| schema.column(*c))
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ");

        out.add_row(vec![
            Cell::new(i),
            Cell::new(table.name()),
            Cell::new(table.ordinal()),
            Cell::new(columns),
        ]);
    }

    out.to_string()
}

/// Formats every group with its storage table and members.
pub fn format_groups(schema: &Schema) -> String {
    let mut out = new_table(["group", "storage id", "storage table", "tree", "members", "indexes"]);

    for group in schema.groups() {
        let members = schema
            .group_members(group.id())
            .into_iter()
            .filter_map(|id| schema.table(id))
            .map(|t| t.name().table().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let indexes = group
            .indexes()
            .iter()
            .map(|i| i.name())
            .collect::<Vec<_>>()
            .join(", ");

        out.add_row(vec![
            Cell::new(group.name()),
            Cell::new(group.storage_table_id()),
            Cell::new(group.storage_table_name()),
            Cell::new(group.tree_name().unwrap_or("")),
            Cell::new(members),
            Cell::new(indexes),
        ]);
    }

    out.to_string()
}
