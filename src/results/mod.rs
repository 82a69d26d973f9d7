mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::DataRow;

#[cfg(test)]
pub(crate) fn result_set_from(columns: &[&str], rows: Vec<Vec<crate::types::SqlValue>>) -> ResultSet {
    let mut rs = ResultSet::with_columns(columns.iter().map(|c| (*c).to_string()).collect(), rows.len());
    for row in rows {
        rs.push_row(row).expect("row width matches columns");
    }
    rs
}
