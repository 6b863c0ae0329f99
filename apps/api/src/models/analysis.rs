use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::normalize::NormalizationError;

/// A score as the workflow reported it. Numbers are the norm and keep their
/// JSON representation (`82` stays `82`); text that did not parse and any
/// other JSON are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Score {
    Number(Number),
    Text(String),
    Other(Value),
}

impl Score {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Score::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<Value> for Score {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => Score::Number(n),
            Value::String(s) => Score::Text(s),
            other => Score::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Score::from)
    }
}

/// Canonical analysis returned by the scoring workflow, after normalization.
///
/// Only `total_score` is required. Optional fields that arrive null or with
/// the wrong JSON type read as absent; unknown fields land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    pub total_score: Score,
    #[serde(default, deserialize_with = "lenient")]
    pub grade_verdict: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub routing_status: Option<String>,
    /// Category → percentage, in the order the workflow sent them.
    #[serde(default, deserialize_with = "lenient_breakdown")]
    pub scores_breakdown: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    /// Typed view over an object produced by `normalize::normalize`.
    pub fn from_normalized(object: Map<String, Value>) -> Result<Self, NormalizationError> {
        serde_json::from_value(Value::Object(object))
            .map_err(|e| NormalizationError::MalformedResult(e.to_string()))
    }

    /// `"Strong Fit"` → `"strong-fit"`.
    pub fn verdict_slug(&self) -> Option<String> {
        self.grade_verdict.as_deref().map(|verdict| {
            verdict
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        })
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_breakdown<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Colour band of a breakdown percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,   // > 70
    Moderate, // > 40
    Weak,
}

impl ScoreBand {
    pub fn for_percent(percent: f64) -> Self {
        if percent > 70.0 {
            ScoreBand::Strong
        } else if percent > 40.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub category: String,
    pub label: String,
    pub percent: Score,
    pub band: Option<ScoreBand>,
}

/// What `/api/analyze/result` hands back: the result plus display-ready rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub result: AnalysisResult,
    pub verdict_slug: Option<String>,
    pub breakdown: Vec<BreakdownRow>,
}

impl From<AnalysisResult> for ScoreReport {
    fn from(result: AnalysisResult) -> Self {
        let breakdown = result
            .scores_breakdown
            .iter()
            .map(|(category, percent)| {
                let percent = Score::from(percent.clone());
                BreakdownRow {
                    category: category.clone(),
                    label: category.replace('_', " "),
                    band: percent.as_f64().map(ScoreBand::for_percent),
                    percent,
                }
            })
            .collect();

        ScoreReport {
            verdict_slug: result.verdict_slug(),
            breakdown,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_normalized_full_result() {
        let result = AnalysisResult::from_normalized(object(json!({
            "full_name": "Grace Hopper",
            "total_score": 82,
            "grade_verdict": "Strong Fit",
            "routing_status": "Send to hiring manager",
            "scores_breakdown": { "experience": 90, "hard_skills": 75 },
            "ai_summary": "Deep compiler experience.",
            "workflow_run": "abc123"
        })))
        .unwrap();

        assert_eq!(result.full_name.as_deref(), Some("Grace Hopper"));
        assert_eq!(result.total_score, Score::Number(82.into()));
        assert_eq!(result.scores_breakdown["experience"], json!(90));
        assert_eq!(result.extra["workflow_run"], "abc123");
        assert_eq!(result.verdict_slug().as_deref(), Some("strong-fit"));
    }

    #[test]
    fn test_from_normalized_keeps_unparsed_score_text() {
        let result = AnalysisResult::from_normalized(object(json!({
            "total_score": "n/a",
            "scores_breakdown": {}
        })))
        .unwrap();
        assert_eq!(result.total_score, Score::Text("n/a".to_string()));
        assert!(result.grade_verdict.is_none());
        assert!(result.verdict_slug().is_none());
    }

    #[test]
    fn test_from_normalized_null_score_is_other() {
        let result =
            AnalysisResult::from_normalized(object(json!({ "total_score": null }))).unwrap();
        assert_eq!(result.total_score, Score::Other(Value::Null));
    }

    #[test]
    fn test_from_normalized_tolerates_null_breakdown() {
        let result = AnalysisResult::from_normalized(object(json!({
            "total_score": 80,
            "grade_verdict": "Strong Fit",
            "scores_breakdown": null
        })))
        .unwrap();
        assert!(result.scores_breakdown.is_empty());
        assert!(ScoreReport::from(result).breakdown.is_empty());
    }

    #[test]
    fn test_from_normalized_reads_mistyped_optionals_as_absent() {
        let result = AnalysisResult::from_normalized(object(json!({
            "total_score": 80,
            "full_name": ["not", "a", "name"],
            "grade_verdict": null,
            "routing_status": 2,
            "ai_summary": { "text": "nested" },
            "scores_breakdown": "n/a"
        })))
        .unwrap();
        assert!(result.full_name.is_none());
        assert!(result.grade_verdict.is_none());
        assert!(result.routing_status.is_none());
        assert!(result.ai_summary.is_none());
        assert!(result.scores_breakdown.is_empty());
    }

    #[test]
    fn test_from_normalized_requires_total_score() {
        let err = AnalysisResult::from_normalized(object(json!({ "grade_verdict": "Reject" })))
            .unwrap_err();
        assert!(matches!(err, NormalizationError::MalformedResult(_)));
    }

    #[test]
    fn test_serialized_result_keeps_numbers_order_and_extra_fields() {
        let result = AnalysisResult::from_normalized(object(json!({
            "total_score": 82,
            "grade_verdict": "Strong Fit",
            "scores_breakdown": { "tools": 70, "experience": 90, "domain": 65.5 },
            "extra": 1
        })))
        .unwrap();

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["total_score"], json!(82));
        assert_eq!(value["scores_breakdown"]["experience"], json!(90));
        assert_eq!(value["scores_breakdown"]["domain"], json!(65.5));
        assert_eq!(value["extra"], json!(1));

        let categories: Vec<_> = value["scores_breakdown"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(categories, ["tools", "experience", "domain"]);
    }

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::for_percent(71.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::for_percent(70.0), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_percent(41.0), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_percent(40.0), ScoreBand::Weak);
        assert_eq!(ScoreBand::for_percent(0.0), ScoreBand::Weak);
    }

    #[test]
    fn test_score_report_rows() {
        let result = AnalysisResult::from_normalized(object(json!({
            "total_score": 60,
            "grade_verdict": "Needs  Review",
            "scores_breakdown": { "hard_skills": 80, "domain": "unknown", "tools": 35 }
        })))
        .unwrap();

        let report = ScoreReport::from(result);
        assert_eq!(report.verdict_slug.as_deref(), Some("needs-review"));

        let by_category: BTreeMap<_, _> = report
            .breakdown
            .iter()
            .map(|row| (row.category.as_str(), row))
            .collect();
        assert_eq!(by_category["hard_skills"].label, "hard skills");
        assert_eq!(by_category["hard_skills"].band, Some(ScoreBand::Strong));
        assert_eq!(by_category["tools"].band, Some(ScoreBand::Weak));
        assert_eq!(by_category["domain"].band, None);
    }

    #[test]
    fn test_score_report_serializes_band_lowercase() {
        let report = ScoreReport::from(
            AnalysisResult::from_normalized(object(json!({
                "total_score": 50,
                "scores_breakdown": { "experience": 55 }
            })))
            .unwrap(),
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["breakdown"][0]["band"], "moderate");
        assert_eq!(value["result"]["total_score"], json!(50));
        assert_eq!(value["breakdown"][0]["percent"], json!(55));
    }
}
