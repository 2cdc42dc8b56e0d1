//! Materialized row representation.

use std::fmt;

use super::{TableId, Value};

/// A materialized row: one value per column of its table, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    /// Table the row belongs to.
    table: TableId,
    /// The values in this row.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given values.
    pub fn new(table: TableId, values: Vec<Value>) -> Self {
        Self { table, values }
    }

    /// Returns the table this row belongs to.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the number of columns in this row.
    pub fn num_columns(&self) -> usize {
        self.values.len()
    }

    /// Returns the value at the given index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Returns the values as a slice.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row and returns its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.table)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessors() {
        let row = Row::new(TableId::new(2), vec![Value::Int(1), Value::string("a")]);
        assert_eq!(row.table(), TableId::new(2));
        assert_eq!(row.num_columns(), 2);
        assert_eq!(row.get(1), Some(&Value::string("a")));
        assert_eq!(row.get(2), None);
        assert_eq!(row.to_string(), "2(1, 'a')");
    }
}
