pub use crate::config::*;

/// A builder for collecting the responses of one evaluator.
///
/// This is the place where the scores are checked against the scale. The
/// aggregation functions trust their input.
///
/// ```
/// pub use objective_scoring::builder::Builder;
/// pub use objective_scoring::LikertScale;
/// # use objective_scoring::ScoringError;
///
/// let mut builder = Builder::new(&LikertScale::SEVEN_POINT).id("evaluator-1");
///
/// builder.add_response("Q1", 7)?;
/// builder.add_response("Q2", 3)?;
/// assert!(builder.add_response("Q3", 8).is_err());
///
/// let submission = builder.build();
/// assert_eq!(submission.responses.len(), 2);
///
/// # Ok::<(), ScoringError>(())
/// ```
pub struct Builder {
    pub(crate) _scale: LikertScale,
    pub(crate) _id: Option<String>,
    pub(crate) _responses: Vec<Response>,
}

impl Builder {
    pub fn new(scale: &LikertScale) -> Builder {
        Builder {
            _scale: *scale,
            _id: None,
            _responses: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Builder {
        Builder {
            _scale: self._scale,
            _id: Some(id.to_string()),
            _responses: self._responses,
        }
    }

    /// Records the answer to a question.
    ///
    /// Answering the same question again replaces the score but the question keeps
    /// its original position.
    pub fn add_response(&mut self, question: &str, score: i64) -> Result<(), ScoringError> {
        if question.is_empty() {
            return Err(ScoringError::EmptyQuestion);
        }
        if !self._scale.contains(score) {
            return Err(ScoringError::ScoreOutOfRange {
                question: question.to_string(),
                score,
            });
        }
        if let Some(r) = self._responses.iter_mut().find(|r| r.question == question) {
            r.score = score;
        } else {
            self._responses.push(Response::new(question, score));
        }
        Ok(())
    }

    pub fn add_responses(&mut self, responses: &[(String, i64)]) -> Result<(), ScoringError> {
        for (question, score) in responses {
            self.add_response(question, *score)?;
        }
        Ok(())
    }

    pub fn scale(&self) -> LikertScale {
        self._scale
    }

    pub fn build(self) -> Submission {
        Submission {
            id: self._id,
            responses: self._responses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_answer_keeps_first_position() {
        let mut b = Builder::new(&LikertScale::FIVE_POINT);
        b.add_response("Q1", 1).unwrap();
        b.add_response("Q2", 2).unwrap();
        b.add_response("Q1", 5).unwrap();
        let s = b.build();
        assert_eq!(
            s.responses,
            vec![Response::new("Q1", 5), Response::new("Q2", 2)]
        );
    }

    #[test]
    fn rejects_scores_outside_the_scale() {
        let mut b = Builder::new(&LikertScale::FIVE_POINT);
        assert_eq!(
            b.add_response("Q1", 0),
            Err(ScoringError::ScoreOutOfRange {
                question: "Q1".to_string(),
                score: 0
            })
        );
        assert!(b.add_response("Q1", 6).is_err());
        assert!(b.add_response("Q1", 5).is_ok());
        assert_eq!(b.add_response("", 3), Err(ScoringError::EmptyQuestion));
    }

    #[test]
    fn id_is_kept() {
        let b = Builder::new(&LikertScale::default()).id("row-3");
        assert_eq!(b.build().id, Some("row-3".to_string()));
    }
}
