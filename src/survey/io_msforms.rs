use calamine::{open_workbook, DataType, Reader, Xlsx};
use std::collections::HashSet;

use crate::survey::{io_common::make_default_id, *};

/// Reads the answers exported by Microsoft Forms or Google Forms.
///
/// The first row holds the questions, every other row is one respondent. Only the
/// columns named after a question of the questionnaire are read: the forms also
/// export the start time, the email, etc.
pub fn read_msforms_likert(
    path: &str,
    cfs: &FileSource,
    questions: &[String],
) -> SurveyResult<Vec<ParsedSubmission>> {
    let default_id = make_default_id(path);

    let wrange = get_range(path, cfs)?;

    let header = wrange.rows().next().context(EmptyExcelSnafu {})?;
    debug!("read_msforms_likert: header: {:?}", header);

    let id_idx_o = cfs.id_column_index_int()?;
    let col_indexes = get_col_index(questions, header);
    debug!("read_msforms_likert: col_indexes: {:?}", col_indexes);
    ensure!(
        !col_indexes.is_empty(),
        ExcelNoQuestionInHeaderSnafu { path }
    );

    let first_row = cfs.first_response_row_index()?;
    let mut res: Vec<ParsedSubmission> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        let lineno = idx + 1;
        debug!("read_msforms_likert: lineno: {:?} row: {:?}", lineno, &row);

        let id = match id_idx_o.and_then(|id_idx| row.get(id_idx)) {
            Some(cell) => match read_cell(cell) {
                Some(s) if !s.is_empty() => s,
                _ => default_id(lineno),
            },
            None => default_id(lineno),
        };

        let mut answers: Vec<(String, String)> = Vec::new();
        for (col_idx, question) in col_indexes.iter() {
            // Trailing empty cells may be cut from the row.
            let content = match row.get(*col_idx) {
                Some(cell) => read_cell(cell).context(ExcelWrongCellTypeSnafu {
                    lineno,
                    content: format!("{:?} IN {:?}", cell, row),
                })?,
                None => String::new(),
            };
            answers.push((question.clone(), content));
        }

        res.push(ParsedSubmission {
            id: Some(id),
            answers,
        });
    }
    Ok(res)
}

fn read_cell(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.trim().to_string()),
        DataType::Int(i) => Some(i.to_string()),
        // Excel stores all the numbers as floats.
        DataType::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Empty => Some(String::new()),
        _ => None,
    }
}

/// Given the header of a file (names of each of the columns), and the questions,
/// finds the column of each question. Unknown columns are skipped.
fn get_col_index(questions: &[String], header: &[DataType]) -> Vec<(usize, String)> {
    let known: HashSet<&str> = questions.iter().map(|q| q.trim()).collect();
    header
        .iter()
        .enumerate()
        .filter_map(|(idx, dt)| match dt {
            DataType::String(s) if known.contains(s.trim()) => Some((idx, s.trim().to_string())),
            DataType::String(s) => {
                debug!("get_col_index: column {:?} ({}) is not a question", s, idx);
                None
            }
            _ => None,
        })
        .collect()
}

fn get_range(path: &str, cfs: &FileSource) -> SurveyResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu {}.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}
