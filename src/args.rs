use clap::Parser;

/// Scores the answers to an AI value questionnaire and recommends the KPI, KQI and
/// KRI of the relevant business objectives.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the survey: response files, scale,
    /// questionnaire and catalog. Without it, the built-in questionnaire is used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, kpiscore checks that
    /// the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON
    /// format to the given location. Setting this option overrides the output directory
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the file with the responses. Setting this option
    /// overrides the response sources of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, csv_likert, msforms_likert or json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path) A CSV catalog of indicators. If it cannot be read, the default catalog
    /// is used and a warning is added to the summary.
    #[clap(long, value_parser)]
    pub catalog: Option<String>,

    /// (list of comma-separated values or not specified) The labels of the answers, from the
    /// bottom to the top of the scale. This is useful for forms that export the labels
    /// ("Per niente", "Poco", ...) instead of the scores.
    #[clap(long, value_parser, use_value_delimiter = true)]
    pub choices: Option<Vec<String>>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 7) The top of the Likert scale. The bottom is 1 unless the configuration
    /// says otherwise.
    #[clap(long, value_parser)]
    pub scale_max: Option<i64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
