/*!

This is the long-form manual for `objective_scoring` and `kpiscore`.

## Scoring

Each question of the questionnaire belongs to one business objective. For a
submission, the scores of the answered questions are summed per objective. The
objectives whose total is at or above the mean of all the totals are
*relevant*: the indicators (KPI, KQI, KRI) of the catalog attached to these
objectives are the ones recommended for the model.

Some rules to keep in mind:
- questions that are not part of the questionnaire are ignored;
- an objective without any answered question does not count in the mean;
- with a single answered objective, this objective is always relevant;
- when all the objectives have the same total, they are all relevant.

The two-axis scores rescale the answers from 0 to 100, the top of the scale
being 100:
- the *value* score is the mean of all the answers;
- the *ease* score is the mean of the answers to the ease questions. An ease
question that was not answered counts as the midpoint of the scale;
- the *tangibility* score is the average of the two.

A scale must have `min < max`, a positive `max`, and bounds within
±1000.

## Input formats

The following formats are supported:
* `csv` one submission as `question,score` rows
* `csv_likert` one submission per row, the questions in the first row
* `msforms_likert` Excel export of Microsoft Forms or Google Forms
* `json` submissions in JSON

### `csv`

```text
question,score
Il modello AI riduce significativamente i tempi di processo.,6
Il modello AI è facilmente comprensibile e misurabile.,4
```

Use `firstResponseRowIndex` (see below) to skip the header.

### `csv_likert`

```text
id,Q1,Q2,Q3
alice,7,1,4
bob,2,,5
```

The `id` column is optional. Empty cells are unanswered questions.

### `msforms_likert`

The spreadsheet of the answers, as created by the form products. The first row
holds the questions, each following row is one respondent. A cell is either a
number or one of the labels passed with `--choices` (or `choices` in the
configuration). The first label is the lowest score of the scale.

### `json`

```text
[{"id": "alice", "responses": [{"question": "Q1", "score": 7}]}]
```

## Configuration

`kpiscore` comes with the built-in AI-value questionnaire. A configuration file
in JSON controls the questionnaire, the scale and the sources:

```text
{
  "outputSettings": {"modelName": "Churn", "modelDescription": "..."},
  "responseSources": [{"provider": "csv_likert", "filePath": "answers.csv",
                       "idColumnIndex": 1, "firstQuestionColumnIndex": 2}],
  "scale": {"min": 1, "max": 5},
  "objectives": [{"name": "A", "questions": ["Q1", "Q2"]}],
  "additionalQuestions": [{"question": "Q9", "objective": "A"}],
  "easeQuestions": ["Q2"],
  "highlights": [{"aspect": "Cost", "question": "Q1"}],
  "catalogFilePath": "indicators.csv"
}
```

Indexes start at 1 and may be numbers, strings or a spreadsheet column letter.
When `objectives` is missing, the built-in questionnaire is used.

## Indicator catalog

A CSV file with the columns `Business Objective,Tipo,Categoria,Focus,Metriche`.
If the file cannot be read, the built-in catalog is used instead and the
summary carries a `catalogWarning`.

 */
