// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One answered question of a submission.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Response {
    pub question: String,
    pub score: i64,
}

impl Response {
    pub fn new(question: &str, score: i64) -> Response {
        Response {
            question: question.to_string(),
            score,
        }
    }
}

/// The answers of a single evaluator, as collected by the builder.
///
/// Responses keep the order in which the questions were first answered. A question
/// only appears once.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Submission {
    pub id: Option<String>,
    pub responses: Vec<Response>,
}

impl Submission {
    pub fn score(&self, question: &str) -> Option<i64> {
        self.responses
            .iter()
            .find(|r| r.question == question)
            .map(|r| r.score)
    }
}

// ******** Output data structures *********

/// The outcome of aggregating one submission by category.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregationResult {
    /// Totals per category, in the order the categories were first seen.
    pub category_totals: Vec<(String, i64)>,
    /// Mean of the totals, 0 if there is no total.
    pub mean_score: f64,
    /// The categories with a total at or above the mean, in the order of the totals.
    pub relevant_categories: Vec<String>,
}

impl AggregationResult {
    pub const EMPTY: AggregationResult = AggregationResult {
        category_totals: Vec::new(),
        mean_score: 0.0,
        relevant_categories: Vec::new(),
    };

    pub fn total(&self, category: &str) -> Option<i64> {
        self.category_totals
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, t)| *t)
    }

    pub fn is_relevant(&self, category: &str) -> bool {
        self.relevant_categories.iter().any(|c| c == category)
    }
}

/// Scalar scores on a 0-100 scale.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct AxisScores {
    pub value_score: f64,
    pub ease_score: f64,
    /// Average of the value and the ease scores.
    pub tangibility_score: f64,
}

/// Errors raised while collecting the responses.
///
/// The aggregation itself never fails.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringError {
    InvalidScale { min: i64, max: i64 },
    ScoreOutOfRange { question: String, score: i64 },
    EmptyQuestion,
}

impl Error for ScoringError {}

impl Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::InvalidScale { min, max } => {
                write!(f, "invalid Likert scale {}..{}", min, max)
            }
            ScoringError::ScoreOutOfRange { question, score } => {
                write!(f, "score {} out of range for question {:?}", score, question)
            }
            ScoringError::EmptyQuestion => write!(f, "empty question identifier"),
        }
    }
}

// ********* Configuration **********

/// The closed range of the Likert scale.
///
/// The maximum of the scale is mapped to 100 by the axis scores, hence it must be
/// positive.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct LikertScale {
    min: i64,
    max: i64,
}

impl LikertScale {
    /// 1: strongly disagree, 7: strongly agree.
    pub const SEVEN_POINT: LikertScale = LikertScale { min: 1, max: 7 };
    pub const FIVE_POINT: LikertScale = LikertScale { min: 1, max: 5 };

    /// Largest magnitude accepted for the bounds of a scale.
    pub const MAX_BOUND: i64 = 1_000;

    pub fn new(min: i64, max: i64) -> Result<LikertScale, ScoringError> {
        if min >= max || max <= 0 || min < -Self::MAX_BOUND || max > Self::MAX_BOUND {
            return Err(ScoringError::InvalidScale { min, max });
        }
        Ok(LikertScale { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min <= score && score <= self.max
    }

    /// The neutral answer. Not necessarily an integer (1..4 gives 2.5).
    pub fn midpoint(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }

    /// Linear factor that maps the top of the scale to 100.
    pub fn scale_factor(&self) -> f64 {
        100.0 / self.max as f64
    }

    /// Rescales a mean answer to the 0-100 axis.
    pub fn rescale(&self, mean: f64) -> f64 {
        // Multiplied first: the top of the scale gives exactly 100.
        mean * 100.0 / self.max as f64
    }
}

impl Default for LikertScale {
    fn default() -> Self {
        LikertScale::SEVEN_POINT
    }
}
