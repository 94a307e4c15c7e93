mod config;
pub mod builder;
pub mod manual;
mod questionnaire;

use log::{debug, info};

use std::{
    collections::{HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;
pub use crate::questionnaire::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CategoryId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct ScoreTotal(i64);

impl ScoreTotal {
    const EMPTY: ScoreTotal = ScoreTotal(0);
}

impl std::iter::Sum for ScoreTotal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ScoreTotal::EMPTY, |acc, st| ScoreTotal(acc.0.saturating_add(st.0)))
    }
}

impl AddAssign for ScoreTotal {
    fn add_assign(&mut self, rhs: ScoreTotal) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

// A response that survived the checks: the question is answered only once.
#[derive(Eq, PartialEq, Debug, Clone)]
struct CheckedResponse<'a> {
    question: &'a str,
    score: ScoreTotal,
}

/// Sums the responses by category and finds the categories that score at or
/// above the mean.
///
/// Arguments:
/// * `responses` the answers of one submission, in the order they were given
/// * `question_to_category` the category of each question. Questions that are not in
/// this mapping are ignored.
///
/// This function does not check the scores against a scale (see the builder for this),
/// and it never fails: missing data leads to an empty result. Totals saturate at
/// `i64::MAX`.
///
/// ```
/// use std::collections::HashMap;
/// use objective_scoring::{aggregate, Response};
///
/// let responses = vec![
///     Response::new("Q1", 7),
///     Response::new("Q2", 1),
///     Response::new("Q3", 4),
/// ];
/// let mapping: HashMap<String, String> = [("Q1", "A"), ("Q2", "A"), ("Q3", "B")]
///     .iter()
///     .map(|(q, c)| (q.to_string(), c.to_string()))
///     .collect();
///
/// let res = aggregate(&responses, &mapping);
/// assert_eq!(res.category_totals, vec![("A".to_string(), 8), ("B".to_string(), 4)]);
/// assert_eq!(res.mean_score, 6.0);
/// assert_eq!(res.relevant_categories, vec!["A".to_string()]);
/// ```
pub fn aggregate(
    responses: &[Response],
    question_to_category: &HashMap<String, String>,
) -> AggregationResult {
    debug!(
        "aggregate: {:?} responses, {:?} mapped questions",
        responses.len(),
        question_to_category.len()
    );
    let checked = checks(responses);

    // The categories, in the order they are first seen.
    let mut categories: Vec<(String, CategoryId)> = Vec::new();
    let mut tally: HashMap<CategoryId, ScoreTotal> = HashMap::new();
    for r in checked.iter() {
        let category = match question_to_category.get(r.question) {
            Some(c) => c,
            None => {
                debug!("aggregate: unmapped question {:?} skipped", r.question);
                continue;
            }
        };
        let cid = match categories.iter().find(|(name, _)| name == category) {
            Some((_, cid)) => *cid,
            None => {
                let cid = CategoryId(categories.len() as u32 + 1);
                categories.push((category.clone(), cid));
                cid
            }
        };
        *tally.entry(cid).or_insert(ScoreTotal::EMPTY) += r.score;
    }

    if categories.is_empty() {
        return AggregationResult::EMPTY;
    }

    let grand_total: ScoreTotal = tally.values().cloned().sum();
    let mean_score = get_mean(grand_total, categories.len());

    let category_totals: Vec<(String, i64)> = categories
        .iter()
        .map(|(name, cid)| {
            let total = tally.get(cid).cloned().unwrap_or(ScoreTotal::EMPTY);
            (name.clone(), total.0)
        })
        .collect();
    let relevant_categories: Vec<String> = category_totals
        .iter()
        .filter(|(_, total)| (*total as f64) >= mean_score)
        .map(|(name, _)| name.clone())
        .collect();

    debug!(
        "aggregate: totals: {:?} mean: {:?} relevant: {:?}",
        category_totals, mean_score, relevant_categories
    );
    AggregationResult {
        category_totals,
        mean_score,
        relevant_categories,
    }
}

/// Aggregates a submission with the questions of a questionnaire.
pub fn aggregate_submission(
    submission: &Submission,
    questionnaire: &Questionnaire,
) -> AggregationResult {
    info!(
        "Aggregating submission {:?} ({} responses)",
        submission.id,
        submission.responses.len()
    );
    aggregate(&submission.responses, &questionnaire.question_mapping())
}

/// Computes the value, ease and tangibility scores, from 0 to 100.
///
/// The value score is the mean of all the answers. The ease score is the mean of the
/// answers to the ease questions; an ease question without an answer counts as the
/// midpoint of the scale. Both are rescaled so that the top of the scale gives 100.
///
/// ```
/// use objective_scoring::{axis_scores, LikertScale, Response};
///
/// let responses = vec![Response::new("Q1", 7), Response::new("Q2", 7)];
/// let axes = axis_scores(&responses, &["Q1".to_string()], &LikertScale::SEVEN_POINT);
/// assert_eq!(axes.value_score, 100.0);
/// assert_eq!(axes.ease_score, 100.0);
/// assert_eq!(axes.tangibility_score, 100.0);
/// ```
pub fn axis_scores(
    responses: &[Response],
    ease_questions: &[String],
    scale: &LikertScale,
) -> AxisScores {
    let checked = checks(responses);

    let value_mean = if checked.is_empty() {
        0.0
    } else {
        let total: ScoreTotal = checked.iter().map(|r| r.score).sum();
        total.0 as f64 / checked.len() as f64
    };

    let mut ease_seen: HashSet<&str> = HashSet::new();
    let mut ease_values: Vec<f64> = Vec::new();
    for q in ease_questions.iter() {
        if !ease_seen.insert(q.as_str()) {
            continue;
        }
        let v = match checked.iter().find(|r| r.question == q.as_str()) {
            Some(r) => r.score.0 as f64,
            None => {
                debug!("axis_scores: ease question {:?} not answered, using midpoint", q);
                scale.midpoint()
            }
        };
        ease_values.push(v);
    }
    let ease_mean = if ease_values.is_empty() {
        0.0
    } else {
        ease_values.iter().sum::<f64>() / ease_values.len() as f64
    };

    let value_score = scale.rescale(value_mean);
    let ease_score = scale.rescale(ease_mean);
    AxisScores {
        value_score,
        ease_score,
        tangibility_score: (value_score + ease_score) / 2.0,
    }
}

fn get_mean(total: ScoreTotal, num_categories: usize) -> f64 {
    if num_categories == 0 {
        0.0
    } else {
        total.0 as f64 / num_categories as f64
    }
}

// Responses are returned in the same order. A question answered several times keeps
// its first position and its last score.
fn checks(responses: &[Response]) -> Vec<CheckedResponse<'_>> {
    let mut res: Vec<CheckedResponse> = Vec::with_capacity(responses.len());
    for r in responses.iter() {
        if let Some(prev) = res.iter_mut().find(|c| c.question == r.question) {
            debug!("checks: question {:?} answered twice", r.question);
            prev.score = ScoreTotal(r.score);
        } else {
            res.push(CheckedResponse {
                question: r.question.as_str(),
                score: ScoreTotal(r.score),
            });
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn responses(data: &[(&str, i64)]) -> Vec<Response> {
        data.iter().map(|(q, s)| Response::new(q, *s)).collect()
    }

    fn mapping(data: &[(&str, &str)]) -> HashMap<String, String> {
        data.iter()
            .map(|(q, c)| (q.to_string(), c.to_string()))
            .collect()
    }

    fn totals(data: &[(&str, i64)]) -> Vec<(String, i64)> {
        data.iter().map(|(c, t)| (c.to_string(), *t)).collect()
    }

    fn assert_close(x: f64, y: f64) {
        assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
    }

    #[test]
    fn two_categories() {
        init();
        let res = aggregate(
            &responses(&[("Q1", 7), ("Q2", 1), ("Q3", 4)]),
            &mapping(&[("Q1", "A"), ("Q2", "A"), ("Q3", "B")]),
        );
        assert_eq!(res.category_totals, totals(&[("A", 8), ("B", 4)]));
        assert_eq!(res.mean_score, 6.0);
        assert_eq!(res.relevant_categories, vec!["A".to_string()]);
        assert!(res.is_relevant("A"));
        assert!(!res.is_relevant("B"));
        assert_eq!(res.total("B"), Some(4));
        assert_eq!(res.total("C"), None);
    }

    #[test]
    fn tie_at_mean_is_relevant() {
        init();
        let res = aggregate(
            &responses(&[("Q1", 5), ("Q2", 5)]),
            &mapping(&[("Q1", "A"), ("Q2", "B")]),
        );
        assert_eq!(res.category_totals, totals(&[("A", 5), ("B", 5)]));
        assert_eq!(res.mean_score, 5.0);
        assert_eq!(
            res.relevant_categories,
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn empty_responses() {
        init();
        let res = aggregate(&[], &mapping(&[("Q1", "A")]));
        assert_eq!(res, AggregationResult::EMPTY);
        assert_eq!(res.mean_score, 0.0);
        assert!(res.relevant_categories.is_empty());
    }

    #[test]
    fn nothing_mapped() {
        init();
        let res = aggregate(&responses(&[("Q1", 3), ("Q2", 4)]), &HashMap::new());
        assert_eq!(res, AggregationResult::EMPTY);
    }

    #[test]
    fn single_category_is_relevant() {
        init();
        let res = aggregate(
            &responses(&[("Q1", 1), ("Q2", 1)]),
            &mapping(&[("Q1", "A"), ("Q2", "A")]),
        );
        assert_eq!(res.category_totals, totals(&[("A", 2)]));
        assert_eq!(res.relevant_categories, vec!["A".to_string()]);
    }

    #[test]
    fn categories_in_first_seen_order() {
        init();
        let res = aggregate(
            &responses(&[("Q3", 2), ("Q1", 2), ("Q2", 6), ("Q4", 1)]),
            &mapping(&[("Q1", "A"), ("Q2", "B"), ("Q3", "C"), ("Q4", "A")]),
        );
        assert_eq!(res.category_totals, totals(&[("C", 2), ("A", 3), ("B", 6)]));
        assert_close(res.mean_score, 11.0 / 3.0);
        assert_eq!(res.relevant_categories, vec!["B".to_string()]);
    }

    #[test]
    fn unmapped_questions_are_excluded() {
        init();
        let m = mapping(&[("Q1", "A"), ("Q2", "A"), ("Q3", "B")]);
        let base = responses(&[("Q1", 7), ("Q2", 1), ("Q3", 4)]);
        let mut extended = base.clone();
        extended.insert(1, Response::new("unknown", 7));
        extended.push(Response::new("other", 1));
        assert_eq!(aggregate(&base, &m), aggregate(&extended, &m));
    }

    #[test]
    fn duplicate_question_keeps_last_score() {
        init();
        let res = aggregate(
            &responses(&[("Q1", 1), ("Q2", 3), ("Q1", 6)]),
            &mapping(&[("Q1", "A"), ("Q2", "B")]),
        );
        assert_eq!(res.category_totals, totals(&[("A", 6), ("B", 3)]));
    }

    #[test]
    fn totals_and_mean_properties() {
        init();
        let m = mapping(&[
            ("Q1", "A"),
            ("Q2", "B"),
            ("Q3", "C"),
            ("Q4", "A"),
            ("Q5", "D"),
            ("Q6", "B"),
        ]);
        let cases: Vec<Vec<Response>> = vec![
            responses(&[("Q1", 1)]),
            responses(&[("Q1", 7), ("Q2", 7), ("Q3", 7)]),
            responses(&[("Q1", 2), ("Q2", 5), ("Q3", 1), ("Q4", 4), ("Q5", 3)]),
            responses(&[("Q6", 3), ("Q5", 2), ("Q4", 1), ("Q3", 7), ("Q2", 6), ("Q1", 4)]),
            responses(&[("Q2", 4), ("Q6", 4), ("Q5", 7), ("Q1", 1)]),
        ];
        for rs in cases.iter() {
            let res = aggregate(rs, &m);
            // Conservation of the total score, all the questions are mapped.
            let sum_totals: i64 = res.category_totals.iter().map(|p| p.1).sum();
            let sum_responses: i64 = rs.iter().map(|r| r.score).sum();
            assert_eq!(sum_totals, sum_responses);

            let expected_mean = sum_totals as f64 / res.category_totals.len() as f64;
            assert_close(res.mean_score, expected_mean);

            for (c, t) in res.category_totals.iter() {
                let relevant = res.relevant_categories.contains(c);
                assert_eq!(relevant, (*t as f64) >= res.mean_score, "{:?}", res);
            }
            // Idempotence
            assert_eq!(res, aggregate(rs, &m));
        }
    }

    #[test]
    fn aggregate_submission_uses_questionnaire() {
        init();
        let q = Questionnaire {
            objectives: vec![
                Objective {
                    name: "A".to_string(),
                    questions: vec!["Q1".to_string(), "Q2".to_string()],
                },
                Objective {
                    name: "B".to_string(),
                    questions: vec!["Q3".to_string()],
                },
            ],
            ..Default::default()
        };
        let submission = Submission {
            id: Some("s1".to_string()),
            responses: responses(&[("Q1", 7), ("Q2", 1), ("Q3", 4)]),
        };
        let res = aggregate_submission(&submission, &q);
        assert_eq!(res.relevant_categories, vec!["A".to_string()]);
    }

    #[test]
    fn axes_at_top_of_scale() {
        init();
        let axes = axis_scores(
            &responses(&[("Q1", 7), ("Q2", 7)]),
            &["Q1".to_string()],
            &LikertScale::SEVEN_POINT,
        );
        assert_close(axes.value_score, 100.0);
        assert_close(axes.ease_score, 100.0);
        assert_close(axes.tangibility_score, 100.0);
    }

    #[test]
    fn axes_default_missing_ease_to_midpoint() {
        init();
        let scale = LikertScale::FIVE_POINT;
        let axes = axis_scores(
            &responses(&[("Q1", 5), ("Q2", 2)]),
            &["Q1".to_string(), "E".to_string()],
            &scale,
        );
        // value: mean 3.5, ease: mean(5, 3) = 4
        assert_close(axes.value_score, 70.0);
        assert_close(axes.ease_score, 80.0);
        assert_close(axes.tangibility_score, 75.0);
    }

    #[test]
    fn axes_without_responses() {
        init();
        let scale = LikertScale::SEVEN_POINT;
        let axes = axis_scores(&[], &["E".to_string()], &scale);
        assert_close(axes.value_score, 0.0);
        assert_close(axes.ease_score, scale.midpoint() * scale.scale_factor());
        let no_ease = axis_scores(&responses(&[("Q1", 7)]), &[], &scale);
        assert_close(no_ease.ease_score, 0.0);
        assert_close(no_ease.tangibility_score, 50.0);
    }

    #[test]
    fn scale_checks() {
        assert!(LikertScale::new(1, 7).is_ok());
        assert_eq!(
            LikertScale::new(5, 5),
            Err(ScoringError::InvalidScale { min: 5, max: 5 })
        );
        assert!(LikertScale::new(-3, 0).is_err());
        let s = LikertScale::new(1, 4).unwrap();
        assert_close(s.midpoint(), 2.5);
        assert_close(LikertScale::SEVEN_POINT.scale_factor(), 100.0 / 7.0);
        assert_eq!(LikertScale::SEVEN_POINT.rescale(7.0), 100.0);
        assert!(s.contains(1) && s.contains(4) && !s.contains(0) && !s.contains(5));
    }

    #[test]
    fn scale_bounds_are_limited() {
        assert!(LikertScale::new(1, LikertScale::MAX_BOUND).is_ok());
        assert!(LikertScale::new(-LikertScale::MAX_BOUND, 1).is_ok());
        assert_eq!(
            LikertScale::new(1, i64::MAX),
            Err(ScoringError::InvalidScale {
                min: 1,
                max: i64::MAX
            })
        );
        assert!(LikertScale::new(i64::MIN, 7).is_err());
        assert!(LikertScale::new(i64::MAX - 1, i64::MAX).is_err());
    }

    #[test]
    fn large_scores_saturate() {
        init();
        let rs = responses(&[("Q1", i64::MAX), ("Q2", 1), ("Q3", 3)]);
        let res = aggregate(&rs, &mapping(&[("Q1", "A"), ("Q2", "A"), ("Q3", "B")]));
        assert_eq!(res.category_totals, totals(&[("A", i64::MAX), ("B", 3)]));
        assert_eq!(res.relevant_categories, vec!["A".to_string()]);

        let axes = axis_scores(&rs, &["Q2".to_string()], &LikertScale::SEVEN_POINT);
        assert!(axes.value_score.is_finite());
        assert_close(axes.ease_score, 100.0 / 7.0);
    }
}
