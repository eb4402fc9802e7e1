//! End-to-end scoring through the public library API.

use chrono::NaiveDate;
use linares_digital::assessment::{DimensionAverages, ScoringEngine};
use linares_digital::narrative::{NarrativeService, NarrativeSource};
use linares_digital::questionnaire::Questionnaire;
use linares_digital::reporter::{write_report, ReportFormat};
use linares_digital::responses::AnswerSheet;
use linares_digital::{evaluate_sheet, AssessmentError, Tier};
use std::path::Path;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn load(fixture: &str) -> AnswerSheet {
    AnswerSheet::load(Path::new(fixture)).unwrap()
}

#[test]
fn scenario_sheet_scores_aware() {
    let engine = ScoringEngine::builtin();
    let narrator = NarrativeService::offline(engine.questionnaire());
    let report = evaluate_sheet(
        &load("tests/fixtures/scenario.json"),
        &engine,
        &narrator,
        date(),
    )
    .unwrap();

    let result = &report.result;
    assert!((result.global_index - 2.30).abs() < 1e-9);
    assert_eq!(result.tier, Tier::Aware);
    assert_eq!(result.strongest, "Technology & Infrastructure");
    assert_eq!(result.weakest, "Customers & Products");

    let narrative = result.narrative.as_ref().unwrap();
    assert_eq!(
        narrative.source,
        NarrativeSource::Generated {
            provider: "template".to_string()
        }
    );
    assert!(narrative.text.contains("Diagnosis for Talleres Ejemplo"));
    assert_eq!(report.evaluated_on, date());
}

#[test]
fn incomplete_sheet_is_rejected_before_narration() {
    let engine = ScoringEngine::builtin();
    let narrator = NarrativeService::offline(engine.questionnaire());
    let err = evaluate_sheet(
        &load("tests/fixtures/incomplete.json"),
        &engine,
        &narrator,
        date(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AssessmentError::IncompleteAssessment { ref dimension, .. } if dimension == "Customers & Products"
    ));
}

#[test]
fn invalid_rating_fails_to_load() {
    let err = AnswerSheet::load(Path::new("tests/fixtures/invalid_rating.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("rating 6 is outside the 1-5 scale"));
}

#[test]
fn global_index_uses_builtin_weights() {
    let q = Questionnaire::builtin();
    let averages = DimensionAverages::from_pairs(&[
        ("Strategy & Leadership", 5.0),
        ("People & Culture", 1.0),
        ("Operations & Processes", 1.0),
        ("Customers & Products", 1.0),
        ("Technology & Infrastructure", 1.0),
    ]);
    let index = ScoringEngine::compute_global_index(&averages, &q.weights()).unwrap();
    assert!((index - 2.2).abs() < 1e-9);
}

#[test]
fn every_report_format_writes() {
    let engine = ScoringEngine::builtin();
    let narrator = NarrativeService::offline(engine.questionnaire());
    let report = evaluate_sheet(
        &load("tests/fixtures/advanced.json"),
        &engine,
        &narrator,
        date(),
    )
    .unwrap();
    assert_eq!(report.result.tier, Tier::Managed);

    let dir = tempfile::TempDir::new().unwrap();
    for (file, format) in [
        ("r.html", ReportFormat::Html),
        ("r.txt", ReportFormat::Text),
        ("r.json", ReportFormat::Json),
    ] {
        let path = dir.path().join(file);
        write_report(&report, &path, format).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0, "{} is empty", file);
    }
}
