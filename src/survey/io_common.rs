use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// The columns holding questions, as (column index, question).
///
/// All the columns from `first_col` are questions, except for the id column.
pub fn question_columns(
    header: &[String],
    first_col: usize,
    id_col: Option<usize>,
) -> Vec<(usize, String)> {
    header
        .iter()
        .enumerate()
        .skip(first_col)
        .filter(|(idx, _)| Some(*idx) != id_col)
        .map(|(idx, q)| (idx, q.trim().to_string()))
        .filter(|(_, q)| !q.is_empty())
        .collect()
}
