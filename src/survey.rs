use log::{debug, info, warn};

use objective_scoring::builder::Builder;
use objective_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

mod catalog;
mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_msforms;

use crate::survey::catalog::*;
use crate::survey::config_reader::*;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet has no usable worksheet"))]
    EmptyExcel {},
    #[snafu(display("Several worksheets found in {path}, the worksheet name must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Worksheet {name} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Line {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("None of the questions was found in the header of {path}"))]
    ExcelNoQuestionInHeader { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read an index (number, numeric string or column letter, starting at 1)"))]
    ParsingJsonNumber {},
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Submission {id}: could not read score {content:?} for question {question:?}"))]
    InvalidScore {
        id: String,
        question: String,
        content: String,
    },
    #[snafu(display("Submission {id}: invalid response"))]
    InvalidResponse {
        id: String,
        source: ScoringError,
    },
    #[snafu(display("Invalid scale"))]
    InvalidScale { source: ScoringError },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No input: provide a configuration with response sources or an input file"))]
    MissingInput {},
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// A submission, as parsed by the readers.
/// This is before checking the scores against the scale.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedSubmission {
    pub id: Option<String>,
    /// (question, raw cell content). An empty cell is an unanswered question.
    pub answers: Vec<(String, String)>,
}

/// Everything computed for one submission.
#[derive(PartialEq, Debug, Clone)]
pub struct Evaluation {
    pub id: String,
    pub submission: Submission,
    pub aggregation: AggregationResult,
    pub axes: AxisScores,
    pub highlights: Vec<(String, i64)>,
}

/// Scores one submission.
pub fn evaluate(
    submission: &Submission,
    questionnaire: &Questionnaire,
    scale: &LikertScale,
) -> Evaluation {
    let aggregation = aggregate_submission(submission, questionnaire);
    let axes = axis_scores(
        &submission.responses,
        &questionnaire.ease_questions,
        scale,
    );
    let highlights = questionnaire.highlight_scores(submission, scale);
    Evaluation {
        id: submission.id.clone().unwrap_or_default(),
        submission: submission.clone(),
        aggregation,
        axes,
        highlights,
    }
}

fn read_response_data(
    path: &str,
    cfs: &FileSource,
    questionnaire: &Questionnaire,
) -> SurveyResult<Vec<ParsedSubmission>> {
    info!("Attempting to read response file {:?}", path);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_responses(path, cfs),
        "csv_likert" => io_csv::read_csv_likert(path, cfs),
        "msforms_likert" => io_msforms::read_msforms_likert(path, cfs, &questionnaire.questions()),
        "json" => io_json::read_json_submissions(path),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn validate_submissions(
    parsed: &[ParsedSubmission],
    cfs: &FileSource,
    scale: &LikertScale,
) -> SurveyResult<Vec<Submission>> {
    let choices: Vec<String> = cfs.choices.clone().unwrap_or_default();
    let mut res: Vec<Submission> = Vec::new();
    for (idx, ps) in parsed.iter().enumerate() {
        let id = ps.id.clone().unwrap_or_else(|| format!("{:08}", idx + 1));
        let mut builder = Builder::new(scale).id(&id);
        for (question, content) in ps.answers.iter() {
            let content = content.trim();
            if content.is_empty() {
                debug!("validate_submissions: {}: {:?} not answered", id, question);
                continue;
            }
            let score = match read_score(content, &choices, scale) {
                Some(x) => x,
                None => {
                    return InvalidScoreSnafu {
                        id: id.clone(),
                        question: question.clone(),
                        content,
                    }
                    .fail();
                }
            };
            builder
                .add_response(question, score)
                .context(InvalidResponseSnafu { id: id.clone() })?;
        }
        let submission = builder.build();
        if submission.responses.is_empty() {
            warn!("validate_submissions: submission {} has no answer, skipping", id);
        } else {
            res.push(submission);
        }
    }
    Ok(res)
}

// A score is either a number or one of the choice labels. The first label is the
// bottom of the scale.
fn read_score(content: &str, choices: &[String], scale: &LikertScale) -> Option<i64> {
    if let Ok(x) = content.parse::<i64>() {
        return Some(x);
    }
    choices
        .iter()
        .position(|c| c.trim() == content)
        .map(|idx| scale.min() + idx as i64)
}

fn evaluation_to_json(
    ev: &Evaluation,
    questionnaire: &Questionnaire,
    catalog: &Catalog,
) -> JSValue {
    let category_totals: Vec<JSValue> = ev
        .aggregation
        .category_totals
        .iter()
        .map(|(category, total)| json!({"category": category, "total": total}))
        .collect();
    let highlights: Vec<JSValue> = ev
        .highlights
        .iter()
        .map(|(aspect, score)| json!({"aspect": aspect, "score": score}))
        .collect();

    // Objectives of the questionnaire first, then the categories that only come
    // from additional questions.
    let mut objectives: Vec<String> = questionnaire.objective_names();
    for (category, _) in ev.aggregation.category_totals.iter() {
        if !objectives.contains(category) {
            objectives.push(category.clone());
        }
    }
    let indicators: Vec<JSValue> = objectives
        .iter()
        .map(|objective| {
            let by_kind = |kind: IndicatorKind| -> Vec<JSValue> {
                relevant_indicators(&catalog.indicators, &ev.aggregation.relevant_categories, kind)
                    .into_iter()
                    .filter(|ind| &ind.business_objective == objective)
                    .map(indicator_to_json)
                    .collect()
            };
            json!({
                "objective": objective,
                "relevant": ev.aggregation.is_relevant(objective),
                "kpi": by_kind(IndicatorKind::Kpi),
                "kqi": by_kind(IndicatorKind::Kqi),
                "kri": by_kind(IndicatorKind::Kri),
            })
        })
        .collect();

    json!({
        "id": ev.id,
        "answered": ev.submission.responses.len(),
        "categoryTotals": category_totals,
        "meanScore": ev.aggregation.mean_score,
        "relevantCategories": ev.aggregation.relevant_categories,
        "axes": {
            "value": ev.axes.value_score,
            "ease": ev.axes.ease_score,
            "tangibility": ev.axes.tangibility_score,
        },
        "highlights": highlights,
        "indicators": indicators,
    })
}

fn indicator_to_json(ind: &Indicator) -> JSValue {
    let metrics: Vec<JSValue> = ind
        .metric_names()
        .iter()
        .map(|name| {
            let f = metric_formula(name);
            json!({"name": name, "formula": f.formula, "example": f.example})
        })
        .collect();
    json!({"category": ind.category, "focus": ind.focus, "metrics": metrics})
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub model: String,
    pub description: Option<String>,
    pub scale: ScaleSettings,
    #[serde(rename = "catalogWarning")]
    pub catalog_warning: Option<String>,
}

fn build_summary_js(
    config: &SurveyConfig,
    scale: &LikertScale,
    questionnaire: &Questionnaire,
    catalog: &Catalog,
    evaluations: &[Evaluation],
) -> JSValue {
    let c = OutputConfig {
        model: config.output_settings.model_name.clone(),
        description: config.output_settings.model_description.clone(),
        scale: ScaleSettings {
            min: scale.min(),
            max: scale.max(),
        },
        catalog_warning: catalog.warning.clone(),
    };
    let evs: Vec<JSValue> = evaluations
        .iter()
        .map(|ev| evaluation_to_json(ev, questionnaire, catalog))
        .collect();
    json!({
        "config": c,
        "evaluations": evs,
    })
}

fn resolve_path(root: Option<&Path>, file_path: &str) -> String {
    let p: PathBuf = match root {
        Some(r) => r.join(file_path),
        None => PathBuf::from(file_path),
    };
    p.as_path().display().to_string()
}

fn read_config(config_path: &str) -> SurveyResult<SurveyConfig> {
    let config_str = fs::read_to_string(config_path).context(OpeningJsonSnafu {
        path: config_path,
    })?;
    let config: SurveyConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Runs all the submissions of a survey and returns the JSON summary.
///
/// The arguments of the command line take precedence over the configuration file.
pub fn run_survey(args: &Args) -> SurveyResult<JSValue> {
    // The configuration and the directory its relative paths start from.
    let (mut config, root_p): (SurveyConfig, Option<PathBuf>) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .context(MissingParentDirSnafu {})?;
            (config, Some(root_p))
        }
        None => (SurveyConfig::default(), None),
    };
    info!("config: {:?}", config);

    let root = root_p.as_deref();
    let mut sources: Vec<(String, FileSource)> = config
        .response_sources
        .iter()
        .map(|cfs| (resolve_path(root, &cfs.file_path), cfs.clone()))
        .collect();
    if let Some(input) = &args.input {
        let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
        let cfs = FileSource::from_input(input, &provider);
        sources = vec![(input.clone(), cfs)];
    }
    for (_, cfs) in sources.iter_mut() {
        if args.choices.is_some() {
            cfs.choices = args.choices.clone();
        }
        if args.excel_worksheet_name.is_some() {
            cfs.excel_worksheet_name = args.excel_worksheet_name.clone();
        }
    }
    ensure!(!sources.is_empty(), MissingInputSnafu {});

    if let Some(max) = args.scale_max {
        let min = config.scale.as_ref().map(|s| s.min).unwrap_or(1);
        config.scale = Some(ScaleSettings { min, max });
    }
    let scale = config.likert_scale()?;
    let questionnaire = config.questionnaire();
    info!(
        "Scale {}..{}, {} objectives, {} questions",
        scale.min(),
        scale.max(),
        questionnaire.objectives.len(),
        questionnaire.questions().len()
    );

    let mut submissions: Vec<Submission> = Vec::new();
    for (path, cfs) in sources.iter() {
        let parsed = read_response_data(path, cfs, &questionnaire)?;
        debug!("run_survey: parsed: {:?}", parsed);
        let mut checked = validate_submissions(&parsed, cfs, &scale)?;
        submissions.append(&mut checked);
    }
    info!("Processing {} submissions", submissions.len());

    let catalog_path: Option<String> = match &args.catalog {
        Some(p) => Some(p.clone()),
        None => config
            .catalog_file_path
            .as_ref()
            .map(|p| resolve_path(root, p)),
    };
    let catalog = load_catalog(catalog_path.as_deref());

    let evaluations: Vec<Evaluation> = submissions
        .iter()
        .map(|s| evaluate(s, &questionnaire, &scale))
        .collect();
    for ev in evaluations.iter() {
        info!(
            "Submission {}: totals {:?} mean {} relevant {:?}",
            ev.id,
            ev.aggregation.category_totals,
            ev.aggregation.mean_score,
            ev.aggregation.relevant_categories
        );
    }

    let summary_js = build_summary_js(&config, &scale, &questionnaire, &catalog, &evaluations);
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    let out_path: Option<String> = match &args.out {
        Some(p) if p == "stdout" => None,
        Some(p) => Some(p.clone()),
        None => config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| resolve_path(root, &format!("{}/summary.json", d))),
    };
    match out_path {
        Some(p) => {
            info!("Writing summary to {:?}", p);
            fs::write(&p, pretty_js_stats.as_bytes()).context(WritingOutputSnafu { path: p.clone() })?;
        }
        None => {
            println!("{}", pretty_js_stats);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(summary_js)
}

#[cfg(test)]
fn test_args() -> Args {
    Args {
        config: None,
        reference: None,
        out: None,
        input: None,
        input_type: None,
        catalog: None,
        choices: None,
        excel_worksheet_name: None,
        scale_max: None,
        verbose: false,
    }
}

#[cfg(test)]
fn test_dir() -> String {
    option_env!("SURVEY_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests"))
        .to_string()
}

#[cfg(test)]
fn run_survey_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    let mut args = test_args();
    args.config = Some(format!("{}/{}/{}", test_dir, test_name, config_lpath));
    args.reference = Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath));
    args.out = Some("stdout".to_string());
    let res = run_survey(&args);
    if let Err(e) = &res {
        eprintln!("An error occured {}", e);
    }
    assert!(res.is_ok(), "test {} failed", test_name);
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_survey_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}
