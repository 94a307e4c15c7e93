// The catalog of the indicators (KPI, KQI, KRI) recommended per business objective.

use crate::survey::{io_common::simplify_file_name, *};

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "KPI")]
    Kpi,
    #[serde(rename = "KQI")]
    Kqi,
    #[serde(rename = "KRI")]
    Kri,
}

/// One row of the catalog. The column names follow the spreadsheet of the default
/// catalog.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    #[serde(rename = "Business Objective")]
    pub business_objective: String,
    #[serde(rename = "Tipo")]
    pub kind: IndicatorKind,
    #[serde(rename = "Categoria")]
    pub category: String,
    #[serde(rename = "Focus")]
    pub focus: String,
    /// Comma-separated list of metrics.
    #[serde(rename = "Metriche")]
    pub metrics: String,
}

impl Indicator {
    pub fn metric_names(&self) -> Vec<String> {
        self.metrics
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Catalog {
    pub indicators: Vec<Indicator>,
    /// Set when the requested catalog could not be used.
    pub warning: Option<String>,
}

/// Loads the catalog from a CSV file, or the default catalog.
///
/// This never fails: an unreadable file falls back to the default catalog and the
/// reason is kept in the warning.
pub fn load_catalog(path: Option<&str>) -> Catalog {
    let p = match path {
        Some(p) => p,
        None => {
            return Catalog {
                indicators: default_catalog(),
                warning: None,
            }
        }
    };
    info!("Attempting to read indicator catalog {:?}", p);
    match read_catalog_csv(p) {
        Ok(indicators) => Catalog {
            indicators,
            warning: None,
        },
        Err(e) => {
            warn!("load_catalog: {}: {:?}, using the default catalog", p, e);
            Catalog {
                indicators: default_catalog(),
                warning: Some(format!(
                    "Errore nel caricamento del file {}. Utilizzo dei dati KPI predefiniti.",
                    simplify_file_name(p)
                )),
            }
        }
    }
}

fn read_catalog_csv(path: &str) -> SurveyResult<Vec<Indicator>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut res: Vec<Indicator> = Vec::new();
    for record in rdr.deserialize() {
        let indicator: Indicator = record.context(CsvLineParseSnafu {})?;
        res.push(indicator);
    }
    if res.is_empty() {
        whatever!("The catalog {} has no indicator", path)
    }
    debug!("read_catalog_csv: {} indicators", res.len());
    Ok(res)
}

/// The indicators of a given kind attached to one of the relevant objectives.
pub fn relevant_indicators<'a>(
    indicators: &'a [Indicator],
    relevant_objectives: &[String],
    kind: IndicatorKind,
) -> Vec<&'a Indicator> {
    indicators
        .iter()
        .filter(|ind| ind.kind == kind && relevant_objectives.contains(&ind.business_objective))
        .collect()
}

pub fn default_catalog() -> Vec<Indicator> {
    DEFAULT_CATALOG
        .iter()
        .map(|(objective, kind, category, focus, metrics)| Indicator {
            business_objective: objective.to_string(),
            kind: *kind,
            category: category.to_string(),
            focus: focus.to_string(),
            metrics: metrics.to_string(),
        })
        .collect()
}

const DEFAULT_CATALOG: [(&str, IndicatorKind, &str, &str, &str); 10] = [
    (
        OBJ_NEW_VALUE,
        IndicatorKind::Kpi,
        "Canali Digitali",
        "Ricavi & Profitti",
        "Ordini, Ricavi, Traffico Clienti, Transazioni, Ordini Sociali",
    ),
    (
        OBJ_NEW_VALUE,
        IndicatorKind::Kpi,
        "Ecosistema Digitale",
        "Ricavi & Profitti",
        "Partner & Reti, Referral & Profitti",
    ),
    (
        OBJ_NEW_VALUE,
        IndicatorKind::Kpi,
        "Integrazione Fisica",
        "Ricavi & Profitti",
        "Prodotti Digitali, Prezzi, Promozioni, Nuovi Modelli di Business",
    ),
    (
        OBJ_CUSTOMER,
        IndicatorKind::Kqi,
        "Tempo Risparmiato dal Cliente",
        "Tempo Risparmiato",
        "Ore Risparmiate, Tempo per Completare, Per Richiesta",
    ),
    (
        OBJ_EFFICIENCY,
        IndicatorKind::Kpi,
        "Velocità di Risposta, Consegna",
        "Tempo & Conformità",
        "Riduzione del Tempo di Consegna, % Conformità, Tempo di Attesa, Lavoro Completato",
    ),
    (
        OBJ_WORKFORCE,
        IndicatorKind::Kri,
        "Diversità, Equità & Inclusione",
        "Performance & Inclusione",
        "Indice DEI %, Ore di Formazione, Miglioramento %",
    ),
    (
        OBJ_WORKFORCE,
        IndicatorKind::Kqi,
        "Gestione del Talento",
        "Performance & Ritenzione",
        "Produttività & Efficienza, % Ritenzione Talenti, % Turnover",
    ),
    (
        "Innovazione",
        IndicatorKind::Kqi,
        "Sviluppo Prodotto",
        "Innovazione",
        "Numero di Nuovi Prodotti, Tempo di Sviluppo, Percentuale di Innovazione",
    ),
    (
        "Soddisfazione del Cliente",
        IndicatorKind::Kqi,
        "Feedback Cliente",
        "Soddisfazione",
        "Net Promoter Score, Recensioni Positive, Tasso di Ritorno",
    ),
    (
        "Sostenibilità",
        IndicatorKind::Kri,
        "Impatto Ambientale",
        "Sostenibilità",
        "Emissioni di CO2, Consumo Energetico, Uso di Risorse Rinnovabili",
    ),
];

/// How a metric is computed, with a worked example.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MetricFormula {
    pub formula: &'static str,
    pub example: &'static str,
}

/// Returned for the metrics that are not in the table.
pub const DEFAULT_FORMULA: MetricFormula = MetricFormula {
    formula: "Formula non disponibile",
    example: "Esempio non disponibile",
};

pub fn metric_formula(name: &str) -> &'static MetricFormula {
    METRIC_FORMULAS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, f)| f)
        .unwrap_or(&DEFAULT_FORMULA)
}

static METRIC_FORMULAS: [(&str, MetricFormula); 20] = [
    (
        "Ordini",
        MetricFormula {
            formula: "Numero di ordini ricevuti nel periodo",
            example: "1.200 ordini nel mese",
        },
    ),
    (
        "Ricavi",
        MetricFormula {
            formula: "Somma dei ricavi generati nel periodo",
            example: "250.000 € nel trimestre",
        },
    ),
    (
        "Traffico Clienti",
        MetricFormula {
            formula: "Visitatori unici sui canali digitali nel periodo",
            example: "45.000 visitatori unici nel mese",
        },
    ),
    (
        "Transazioni",
        MetricFormula {
            formula: "Numero di transazioni completate nel periodo",
            example: "8.500 transazioni nel mese",
        },
    ),
    (
        "Ore Risparmiate",
        MetricFormula {
            formula: "Ore impiegate prima - Ore impiegate dopo l'adozione del modello",
            example: "400 - 280 = 120 ore al mese",
        },
    ),
    (
        "Tempo per Completare",
        MetricFormula {
            formula: "Tempo medio dall'apertura alla chiusura di una richiesta",
            example: "2,5 giorni per pratica",
        },
    ),
    (
        "Riduzione del Tempo di Consegna",
        MetricFormula {
            formula: "(Tempo prima - Tempo dopo) / Tempo prima × 100",
            example: "(8 - 6) / 8 × 100 = 25%",
        },
    ),
    (
        "% Conformità",
        MetricFormula {
            formula: "Pratiche conformi / Pratiche totali × 100",
            example: "950 / 1.000 × 100 = 95%",
        },
    ),
    (
        "Tempo di Attesa",
        MetricFormula {
            formula: "Tempo medio tra la richiesta e la presa in carico",
            example: "15 minuti",
        },
    ),
    (
        "Indice DEI %",
        MetricFormula {
            formula: "Punteggio medio dell'indagine DEI / Punteggio massimo × 100",
            example: "3,9 / 5 × 100 = 78%",
        },
    ),
    (
        "Ore di Formazione",
        MetricFormula {
            formula: "Ore di formazione erogate / Numero di dipendenti",
            example: "1.600 / 80 = 20 ore per dipendente",
        },
    ),
    (
        "% Ritenzione Talenti",
        MetricFormula {
            formula: "(Dipendenti a fine periodo - Nuovi assunti) / Dipendenti a inizio periodo × 100",
            example: "(105 - 15) / 100 × 100 = 90%",
        },
    ),
    (
        "% Turnover",
        MetricFormula {
            formula: "Uscite nel periodo / Organico medio × 100",
            example: "12 / 100 × 100 = 12%",
        },
    ),
    (
        "Numero di Nuovi Prodotti",
        MetricFormula {
            formula: "Prodotti lanciati nel periodo",
            example: "4 prodotti nell'anno",
        },
    ),
    (
        "Tempo di Sviluppo",
        MetricFormula {
            formula: "Tempo medio dall'idea al lancio",
            example: "7 mesi",
        },
    ),
    (
        "Net Promoter Score",
        MetricFormula {
            formula: "% Promotori - % Detrattori",
            example: "60% - 15% = 45",
        },
    ),
    (
        "Tasso di Ritorno",
        MetricFormula {
            formula: "Clienti che riacquistano / Clienti totali × 100",
            example: "300 / 1.000 × 100 = 30%",
        },
    ),
    (
        "Emissioni di CO2",
        MetricFormula {
            formula: "Somma delle emissioni del periodo in tonnellate di CO2 equivalente",
            example: "120 tCO2e nell'anno",
        },
    ),
    (
        "Consumo Energetico",
        MetricFormula {
            formula: "Energia consumata nel periodo",
            example: "85.000 kWh nel trimestre",
        },
    ),
    (
        "Uso di Risorse Rinnovabili",
        MetricFormula {
            formula: "Energia da fonti rinnovabili / Energia totale × 100",
            example: "34.000 / 85.000 × 100 = 40%",
        },
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_used_without_file() {
        let c = load_catalog(None);
        assert_eq!(c.indicators.len(), 10);
        assert_eq!(c.warning, None);
    }

    #[test]
    fn fallback_on_missing_file() {
        let c = load_catalog(Some("/does/not/exist/indicators.csv"));
        assert_eq!(c.indicators, default_catalog());
        assert!(c.warning.unwrap().contains("indicators.csv"));
    }

    #[test]
    fn reads_csv_catalog() {
        let path = format!(
            "{}/csv_likert_custom_questionnaire/indicators.csv",
            test_dir()
        );
        let c = load_catalog(Some(&path));
        assert_eq!(c.warning, None);
        assert_eq!(c.indicators.len(), 4);
        assert_eq!(c.indicators[0].kind, IndicatorKind::Kpi);
        assert_eq!(
            c.indicators[0].metric_names(),
            vec!["Ordini".to_string(), "Ricavi".to_string()]
        );
    }

    #[test]
    fn filter_by_objective_and_kind() {
        let all = default_catalog();
        let relevant = vec![OBJ_WORKFORCE.to_string(), "Innovazione".to_string()];
        let kqis = relevant_indicators(&all, &relevant, IndicatorKind::Kqi);
        let categories: Vec<&str> = kqis.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["Gestione del Talento", "Sviluppo Prodotto"]);
        assert!(relevant_indicators(&all, &relevant, IndicatorKind::Kpi).is_empty());
        assert!(relevant_indicators(&all, &[], IndicatorKind::Kri).is_empty());
    }

    #[test]
    fn formulas() {
        assert_eq!(
            metric_formula("Net Promoter Score").formula,
            "% Promotori - % Detrattori"
        );
        assert_eq!(metric_formula(" net promoter score ").example, "60% - 15% = 45");
        assert_eq!(metric_formula("Metrica Sconosciuta"), &DEFAULT_FORMULA);
    }
}
