use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct JsonResponse {
    question: String,
    score: JSValue,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct JsonSubmission {
    id: Option<String>,
    responses: Vec<JsonResponse>,
}

pub fn read_json_submissions(path: &str) -> SurveyResult<Vec<ParsedSubmission>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let submissions: Vec<JsonSubmission> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_json_submissions: {} submissions", submissions.len());

    let res = submissions
        .iter()
        .map(|js| ParsedSubmission {
            id: js.id.clone(),
            answers: js
                .responses
                .iter()
                .map(|r| (r.question.clone(), score_content(&r.score)))
                .collect(),
        })
        .collect();
    Ok(res)
}

fn score_content(score: &JSValue) -> String {
    match score {
        JSValue::Null => String::new(),
        JSValue::String(s) => s.clone(),
        x => x.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores() {
        assert_eq!(score_content(&json!(5)), "5");
        assert_eq!(score_content(&json!("Poco")), "Poco");
        assert_eq!(score_content(&JSValue::Null), "");
        // Rejected later when checking the scores.
        assert_eq!(score_content(&json!(4.5)), "4.5");
    }
}
