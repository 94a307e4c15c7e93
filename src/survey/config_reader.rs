use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "modelName")]
    pub model_name: String,
    #[serde(rename = "modelDescription")]
    pub model_description: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "firstQuestionColumnIndex")]
    _first_question_column_index: Option<JSValue>,
    #[serde(rename = "firstResponseRowIndex")]
    _first_response_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    /// The labels of the answers, from the bottom to the top of the scale.
    #[serde(rename = "choices")]
    pub choices: Option<Vec<String>>,
}

impl FileSource {
    /// A source with the default settings, as given on the command line.
    pub fn from_input(path: &str, provider: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: path.to_string(),
            id_column_index: None,
            _first_question_column_index: None,
            _first_response_row_index: None,
            excel_worksheet_name: None,
            choices: None,
        }
    }

    /// The first column holding questions, starting at 0.
    pub fn first_question_column_index(&self) -> SurveyResult<usize> {
        read_js_index(&self._first_question_column_index, 1)
    }

    /// The first row holding responses, starting at 0.
    ///
    /// Files in the long format have no header by default. The other formats have
    /// the questions in the first row.
    pub fn first_response_row_index(&self) -> SurveyResult<usize> {
        let default = if self.provider == "csv" { 1 } else { 2 };
        read_js_index(&self._first_response_row_index, default)
    }

    pub fn id_column_index_int(&self) -> SurveyResult<Option<usize>> {
        if self.id_column_index.is_some() {
            read_js_index(&self.id_column_index, 1).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScaleSettings {
    pub min: i64,
    pub max: i64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveSettings {
    pub name: String,
    pub questions: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalQuestion {
    pub question: String,
    pub objective: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSettings {
    pub aspect: String,
    pub question: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "responseSources", default)]
    pub response_sources: Vec<FileSource>,
    pub scale: Option<ScaleSettings>,
    pub objectives: Option<Vec<ObjectiveSettings>>,
    #[serde(rename = "additionalQuestions")]
    pub additional_questions: Option<Vec<AdditionalQuestion>>,
    #[serde(rename = "easeQuestions")]
    pub ease_questions: Option<Vec<String>>,
    pub highlights: Option<Vec<HighlightSettings>>,
    #[serde(rename = "catalogFilePath")]
    pub catalog_file_path: Option<String>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            output_settings: OutputSettings {
                model_name: "Modello AI".to_string(),
                model_description: None,
                output_directory: None,
            },
            response_sources: Vec::new(),
            scale: None,
            objectives: None,
            additional_questions: None,
            ease_questions: None,
            highlights: None,
            catalog_file_path: None,
        }
    }
}

impl SurveyConfig {
    pub fn likert_scale(&self) -> SurveyResult<LikertScale> {
        match &self.scale {
            Some(s) => LikertScale::new(s.min, s.max).context(InvalidScaleSnafu {}),
            None => Ok(LikertScale::default()),
        }
    }

    /// The questionnaire described by the configuration.
    ///
    /// Without objectives, this is the built-in questionnaire. Its ease questions and
    /// highlights can still be replaced.
    pub fn questionnaire(&self) -> Questionnaire {
        let mut q = match &self.objectives {
            Some(objectives) => Questionnaire {
                objectives: objectives
                    .iter()
                    .map(|o| Objective {
                        name: o.name.clone(),
                        questions: o.questions.clone(),
                    })
                    .collect(),
                ..Default::default()
            },
            None => Questionnaire::default_ai_value(),
        };
        if let Some(additional) = &self.additional_questions {
            q.additional_questions = additional
                .iter()
                .map(|a| (a.question.clone(), a.objective.clone()))
                .collect();
        }
        if let Some(ease) = &self.ease_questions {
            q.ease_questions = ease.clone();
        }
        if let Some(highlights) = &self.highlights {
            q.highlights = highlights
                .iter()
                .map(|h| Highlight {
                    aspect: h.aspect.clone(),
                    question: h.question.clone(),
                })
                .collect();
        }
        q
    }
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Reads an index that starts at 1.
fn read_js_int(x: &Option<JSValue>) -> SurveyResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        // Parsing the Excel-style columns: A is 1, Z is 26, AA is 27.
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase()
                .chars()
                .try_fold(0usize, |acc, c| {
                    acc.checked_mul(26)?
                        .checked_add(c as usize - 'a' as usize + 1)
                })
                .context(ParsingJsonNumberSnafu {})
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None::<usize>.context(ParsingJsonNumberSnafu {}),
    }
}

// Reads an index that starts at 1 and returns it starting at 0.
fn read_js_index(x: &Option<JSValue>, default: usize) -> SurveyResult<usize> {
    let idx = if x.is_some() { read_js_int(x)? } else { default };
    idx.checked_sub(1).context(ParsingJsonNumberSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes() {
        assert_eq!(read_js_index(&Some(json!(3)), 1).unwrap(), 2);
        assert_eq!(read_js_index(&Some(json!("3")), 1).unwrap(), 2);
        assert_eq!(read_js_index(&Some(json!("A")), 1).unwrap(), 0);
        assert_eq!(read_js_index(&Some(json!("c")), 1).unwrap(), 2);
        assert_eq!(read_js_index(&Some(json!("AA")), 1).unwrap(), 26);
        assert_eq!(read_js_index(&None, 2).unwrap(), 1);
        assert!(read_js_index(&Some(json!(0)), 1).is_err());
        assert!(read_js_index(&Some(json!("1.5")), 1).is_err());
        assert!(read_js_index(&Some(json!(true)), 1).is_err());
        assert!(matches!(
            read_js_index(&Some(json!("ZZZZZZZZZZZZZZZZ")), 1),
            Err(SurveyError::ParsingJsonNumber {})
        ));
        assert_eq!(read_js_index(&Some(json!("ZZ")), 1).unwrap(), 701);
    }

    #[test]
    fn source_defaults() {
        let long = FileSource::from_input("a.csv", "csv");
        assert_eq!(long.first_response_row_index().unwrap(), 0);
        assert_eq!(long.first_question_column_index().unwrap(), 0);
        assert_eq!(long.id_column_index_int().unwrap(), None);
        let wide = FileSource::from_input("a.csv", "csv_likert");
        assert_eq!(wide.first_response_row_index().unwrap(), 1);
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": {"modelName": "Churn"},
            "responseSources": [{"provider": "csv_likert", "filePath": "r.csv", "idColumnIndex": "A"}],
            "scale": {"min": 1, "max": 5},
            "easeQuestions": ["Q1"]
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.model_name, "Churn");
        assert_eq!(config.response_sources[0].id_column_index_int().unwrap(), Some(0));
        assert_eq!(config.likert_scale().unwrap(), LikertScale::FIVE_POINT);

        // No objectives: the built-in questionnaire, with the ease questions replaced.
        let q = config.questionnaire();
        assert_eq!(q.objectives.len(), 4);
        assert_eq!(q.ease_questions, vec!["Q1".to_string()]);
        assert_eq!(q.highlights.len(), 3);
    }

    #[test]
    fn invalid_scale() {
        let mut config = SurveyConfig::default();
        config.scale = Some(ScaleSettings { min: 7, max: 1 });
        assert!(matches!(
            config.likert_scale(),
            Err(SurveyError::InvalidScale { .. })
        ));
    }
}
