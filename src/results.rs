mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::Record;

pub(crate) type ColumnIndex = std::sync::Arc<std::collections::HashMap<String, usize>>;

pub(crate) fn build_column_index(column_names: &[String]) -> ColumnIndex {
    std::sync::Arc::new(
        column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect(),
    )
}
