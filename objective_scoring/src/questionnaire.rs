use std::collections::HashMap;

use crate::config::*;

/// A business objective and the questions that are scored towards it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Objective {
    pub name: String,
    pub questions: Vec<String>,
}

/// A single question reported as is in the evaluation summary.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Highlight {
    pub aspect: String,
    pub question: String,
}

/// The set of questions asked to the evaluator.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Questionnaire {
    pub objectives: Vec<Objective>,
    /// Questions asked after the objective groups, as (question, objective).
    pub additional_questions: Vec<(String, String)>,
    /// The questions that measure how easy the model is to adopt.
    pub ease_questions: Vec<String>,
    pub highlights: Vec<Highlight>,
}

impl Questionnaire {
    /// The mapping from each question to its objective.
    ///
    /// A question listed under several objectives stays with the first one.
    pub fn question_mapping(&self) -> HashMap<String, String> {
        let mut mapping: HashMap<String, String> = HashMap::new();
        let grouped = self
            .objectives
            .iter()
            .flat_map(|o| o.questions.iter().map(move |q| (q, &o.name)));
        let additional = self.additional_questions.iter().map(|(q, o)| (q, o));
        for (q, o) in grouped.chain(additional) {
            mapping.entry(q.clone()).or_insert_with(|| o.clone());
        }
        mapping
    }

    /// All the questions, in the order they are asked. No duplicates.
    pub fn questions(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        let grouped = self.objectives.iter().flat_map(|o| o.questions.iter());
        let additional = self.additional_questions.iter().map(|(q, _)| q);
        for q in grouped.chain(additional) {
            if !res.contains(q) {
                res.push(q.clone());
            }
        }
        res
    }

    pub fn objective_names(&self) -> Vec<String> {
        self.objectives.iter().map(|o| o.name.clone()).collect()
    }

    /// The score of each highlighted aspect. Unanswered questions count as the
    /// midpoint of the scale, rounded down.
    pub fn highlight_scores(
        &self,
        submission: &Submission,
        scale: &LikertScale,
    ) -> Vec<(String, i64)> {
        let neutral = scale.midpoint().floor() as i64;
        self.highlights
            .iter()
            .map(|h| {
                let score = submission.score(&h.question).unwrap_or(neutral);
                (h.aspect.clone(), score)
            })
            .collect()
    }

    /// The built-in questionnaire assessing the business value of an AI model.
    pub fn default_ai_value() -> Questionnaire {
        let objectives: Vec<Objective> = DEFAULT_OBJECTIVES
            .iter()
            .map(|(name, qs)| Objective {
                name: name.to_string(),
                questions: qs.iter().map(|q| q.to_string()).collect(),
            })
            .collect();
        Questionnaire {
            objectives,
            additional_questions: DEFAULT_ADDITIONAL
                .iter()
                .map(|(q, o)| (q.to_string(), o.to_string()))
                .collect(),
            ease_questions: vec![Q_INTEGRATION.to_string(), Q_MEASURABLE.to_string()],
            highlights: vec![
                Highlight {
                    aspect: "Comprensibilità e Misurabilità".to_string(),
                    question: Q_MEASURABLE.to_string(),
                },
                Highlight {
                    aspect: "Contributo alla Riduzione dei Costi".to_string(),
                    question: Q_COSTS.to_string(),
                },
                Highlight {
                    aspect: "Contributo all'Aumento dei Ricavi".to_string(),
                    question: Q_REVENUE.to_string(),
                },
            ],
        }
    }
}

pub const OBJ_NEW_VALUE: &str = "Nuove Fonti di Creazione di Valore";
pub const OBJ_CUSTOMER: &str = "Coinvolgimento del Cliente";
pub const OBJ_EFFICIENCY: &str = "Efficienza Operativa";
pub const OBJ_WORKFORCE: &str = "Coinvolgimento della Forza Lavoro";

const Q_INTEGRATION: &str = "Il modello AI è facilmente integrabile con i sistemi esistenti.";
const Q_MEASURABLE: &str = "Il modello AI è facilmente comprensibile e misurabile.";
const Q_COSTS: &str = "Il modello AI contribuisce significativamente alla riduzione dei costi.";
const Q_REVENUE: &str = "Il modello AI contribuisce significativamente all'aumento dei ricavi.";

const DEFAULT_OBJECTIVES: [(&str, &[&str]); 4] = [
    (
        OBJ_NEW_VALUE,
        &[
            "Il modello AI facilita l'innovazione all'interno dell'azienda.",
            "Il modello AI contribuisce a migliorare la soddisfazione del cliente.",
            Q_INTEGRATION,
        ],
    ),
    (
        OBJ_CUSTOMER,
        &[
            "Il coinvolgimento del cliente è aumentato grazie all'implementazione del modello AI.",
            "Il modello AI supporta efficacemente gli obiettivi di sostenibilità.",
            "Le raccomandazioni generate dall'AI sono azionabili e rilevanti per gli obiettivi aziendali.",
        ],
    ),
    (
        OBJ_EFFICIENCY,
        &[
            "Il modello AI riduce significativamente i tempi di processo.",
            "Il modello AI aumenta la qualità dei servizi/prodotti offerti.",
            Q_COSTS,
            Q_REVENUE,
            Q_MEASURABLE,
        ],
    ),
    (
        OBJ_WORKFORCE,
        &["Il modello AI ha un impatto positivo sulla produttività della forza lavoro e sulla gestione dei talenti."],
    ),
];

const DEFAULT_ADDITIONAL: [(&str, &str); 3] = [
    (
        "Il modello AI raggiunge efficacemente l'obiettivo aziendale previsto.",
        OBJ_NEW_VALUE,
    ),
    (
        "I KQI suggeriti forniscono preziose intuizioni sulla qualità del modello AI.",
        OBJ_WORKFORCE,
    ),
    (
        "I KRI aiutano a mitigare i rischi associati all'applicazione AI.",
        OBJ_WORKFORCE,
    ),
];
