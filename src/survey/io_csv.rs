// Primitives for reading CSV files.

use std::fs::File;

use crate::survey::{
    io_common::{make_default_id, question_columns, simplify_file_name},
    *,
};

/// Reads one submission written as `question,score` rows.
pub fn read_csv_responses(path: &str, cfs: &FileSource) -> SurveyResult<Vec<ParsedSubmission>> {
    let question_col = cfs.first_question_column_index()?;
    let (records, row_offset) = get_records(path, cfs)?;

    let mut answers: Vec<(String, String)> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_responses: lineno: {:?} line: {:?}", lineno, line);
        let question = line
            .get(question_col)
            .context(CsvLineTooShortSnafu { lineno })?
            .trim();
        if question.is_empty() {
            continue;
        }
        // A missing score cell is an unanswered question.
        let score = line.get(question_col + 1).unwrap_or("");
        answers.push((question.to_string(), score.to_string()));
    }

    Ok(vec![ParsedSubmission {
        id: Some(simplify_file_name(path)),
        answers,
    }])
}

/// Reads submissions with one row per submission and the questions in the first row.
pub fn read_csv_likert(path: &str, cfs: &FileSource) -> SurveyResult<Vec<ParsedSubmission>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index_int()?;
    let first_col = cfs.first_question_column_index()?;

    let header: Vec<String> = {
        let rdr = open_reader(path)?;
        let mut records = rdr.into_records();
        match records.next() {
            Some(line_r) => {
                let line = line_r.context(CsvLineParseSnafu {})?;
                line.iter().map(|s| s.to_string()).collect()
            }
            None => whatever!("read_csv_likert: {} is empty", path),
        }
    };
    let columns = question_columns(&header, first_col, id_idx_o);
    debug!("read_csv_likert: columns: {:?}", columns);

    let (records, row_offset) = get_records(path, cfs)?;
    let mut res: Vec<ParsedSubmission> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_likert: lineno: {:?} line: {:?}", lineno, line);

        let id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .to_string()
        } else {
            default_id(lineno)
        };

        // Short lines leave the last questions unanswered.
        let answers: Vec<(String, String)> = columns
            .iter()
            .map(|(col, q)| (q.clone(), line.get(*col).unwrap_or("").to_string()))
            .collect();

        res.push(ParsedSubmission {
            id: Some(id),
            answers,
        });
    }
    Ok(res)
}

fn open_reader(path: &str) -> SurveyResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })
}

fn get_records(
    path: &str,
    cfs: &FileSource,
) -> SurveyResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_response_row_index()?;
    let rdr = open_reader(path)?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_path(name: &str) -> String {
        format!("{}/{}", test_dir(), name)
    }

    #[test]
    fn long_format() {
        let path = data_path("long_csv/long_csv_responses.csv");
        let cfs = FileSource::from_input(&path, "csv");
        let res = read_csv_responses(&path, &cfs).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, Some("long_csv_responses.csv".to_string()));
        assert_eq!(res[0].answers.len(), 6);
        assert_eq!(res[0].answers[5], ("Domanda sconosciuta".to_string(), "4".to_string()));
    }

    #[test]
    fn wide_format() {
        let path = data_path("csv_likert_custom_questionnaire/responses.csv");
        let config: SurveyConfig = serde_json::from_str(
            r#"{"outputSettings": {"modelName": "m"},
                "responseSources": [{"provider": "csv_likert", "filePath": "responses.csv",
                                     "idColumnIndex": 1, "firstQuestionColumnIndex": 2}]}"#,
        )
        .unwrap();
        let res = read_csv_likert(&path, &config.response_sources[0]).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].id, Some("alice".to_string()));
        let questions: Vec<&str> = res[1].answers.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(res[1].answers[2].1, "");
    }
}
