//! Command-level tests over temporary fixture files.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use sportmetry::cli::{
    OutputFormat, OutputOptions, build_request, cmd_anthro, cmd_lookup, cmd_motivation,
    cmd_readiness, cmd_sociogram, cmd_verify, load_json, parse_column_pair, questionnaire_of,
};
use sportmetry::config::AppConfig;
use sportmetry::labels::Lang;
use sportmetry_core::{
    ChoiceResponse, QuestionId, SociometricReport, SportmetryError, import_canonical,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// FIXTURES
// =============================================================================

fn write(dir: &TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path
}

fn tables(dir: &TempDir) -> PathBuf {
    let rows: Vec<serde_json::Value> = (11..=16)
        .map(|age| {
            let age = f64::from(age);
            serde_json::json!({
                "age": age,
                "plx_ref": 40.0 + age * 2.5,
                "weight_ref": age * 3.5,
                "height_ref": 90.0 + age * 5.0,
                "%": 60.0 + age * 2.0,
            })
        })
        .collect();
    write(dir, "tables.json", &serde_json::json!({ "boys": rows, "girls": rows }))
}

fn records(dir: &TempDir) -> PathBuf {
    write(
        dir,
        "records.json",
        &serde_json::json!([
            {
                "Név": "Kiss Péter",
                "Nem": "fiú",
                "Születési dátum": "2011-05-01",
                "Mérés dátuma": "2024-09-01",
                "TTS": 45.0, "TTM": 160.0, "ÜLŐ": 82.0,
                "TR": 8, "LPR": 7, "BR": 4, "eCSR": 6, "HR": 9, "COR": 12, "MSR": 8,
                "FFK": 25, "AKK": 22, "KZK": 19, "ASK": 31, "VAS": 33, "HUS": 6.3, "TDS": 9.1
            },
            {
                "Name": "Unknown Sex",
                "Sex": "?",
                "Birth date": "2011-05-01",
                "Measurement date": "2024-09-01"
            }
        ]),
    )
}

fn roster(dir: &TempDir) -> PathBuf {
    write(dir, "roster.json", &serde_json::json!(["Anna", "Bence", "Csilla", "Dani"]))
}

fn responses(dir: &TempDir) -> PathBuf {
    let everyone = ["Anna", "Bence", "Csilla", "Dani"];
    let answers: Vec<serde_json::Value> = everyone
        .iter()
        .map(|me| {
            let others: Vec<&str> = everyone.iter().copied().filter(|n| n != me).collect();
            serde_json::json!({
                "respondent": me,
                "choices": { "1": others, "2": others },
            })
        })
        .chain(std::iter::once(serde_json::json!({
            "respondent": "Anna",
            "choices": { "1": ["Bence", "Csilla", "Dani"], "2": ["Bence", "Csilla", "Dani"] },
        })))
        .collect();
    write(dir, "responses.json", &serde_json::Value::Array(answers))
}

fn options(output: Option<PathBuf>, format: OutputFormat) -> OutputOptions {
    OutputOptions {
        output,
        format,
        lang: Lang::En,
    }
}

// =============================================================================
// ANTHRO
// =============================================================================

#[test]
fn test_anthro_exports_verifiable_canonical_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("cohort.spmx");

    cmd_anthro(
        &AppConfig::default(),
        true,
        &records(&dir),
        &tables(&dir),
        &options(Some(output.clone()), OutputFormat::Canonical),
    )
    .unwrap();

    assert!(output.exists());
    cmd_verify(false, &output, None).unwrap();

    let data = std::fs::read(&output).unwrap();
    let hash = sportmetry_core::export::canonical_crypto_hash(&data);
    cmd_verify(true, &output, Some(&hash.to_uppercase())).unwrap();
    assert!(cmd_verify(false, &output, Some("00")).is_err());
}

#[test]
fn test_anthro_json_report_keeps_failures() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("cohort.json");

    cmd_anthro(
        &AppConfig::default(),
        false,
        &records(&dir),
        &tables(&dir),
        &options(Some(output.clone()), OutputFormat::Json),
    )
    .unwrap();

    let report: serde_json::Value = load_json(&output).unwrap();
    assert_eq!(report["subjects"].as_array().unwrap().len(), 1);
    assert_eq!(report["subjects"][0]["name"], "Kiss Péter");
    assert_eq!(report["failures"][0]["index"], 1);
}

#[test]
fn test_anthro_missing_records_file() {
    let dir = TempDir::new().unwrap();
    let result = cmd_anthro(
        &AppConfig::default(),
        false,
        Path::new("/nonexistent/records.json"),
        &tables(&dir),
        &options(None, OutputFormat::Json),
    );
    assert!(matches!(result, Err(SportmetryError::IoError(_))));
}

// =============================================================================
// SOCIOGRAM
// =============================================================================

#[test]
fn test_sociogram_round_trips_through_canonical_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("team.spmx");
    let request = build_request(&[1, 2], &[1], &[2], true);

    cmd_sociogram(
        &AppConfig::default(),
        false,
        &roster(&dir),
        &responses(&dir),
        &request,
        &options(Some(output.clone()), OutputFormat::Canonical),
    )
    .unwrap();

    let report: SociometricReport = import_canonical(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(report.members.len(), 4);
    // The duplicate second response from Anna is rejected.
    assert_eq!(report.metrics.edge_count, 12);
    assert_eq!(report.metrics.reciprocity, 1.0);
    assert_eq!(report.significance.len(), 4);
    assert_eq!(report.significance[0].score, 2 * 3 + 3);
    assert_eq!(report.per_question.len(), 2);
    assert!(report.per_question.contains_key(&QuestionId(2)));
}

#[test]
fn test_sociogram_analyzes_subset_of_answered_questions() {
    let dir = TempDir::new().unwrap();
    let everyone = ["Anna", "Bence", "Csilla", "Dani"];
    let answers: Vec<serde_json::Value> = everyone
        .iter()
        .map(|me| {
            let others: Vec<&str> = everyone.iter().copied().filter(|n| n != me).collect();
            serde_json::json!({
                "respondent": me,
                "choices": { "1": others, "2": others, "3": others },
            })
        })
        .collect();
    let answered = write(&dir, "answered.json", &serde_json::Value::Array(answers));
    let output = dir.path().join("subset.spmx");

    cmd_sociogram(
        &AppConfig::default(),
        false,
        &roster(&dir),
        &answered,
        &build_request(&[1], &[], &[], false),
        &options(Some(output.clone()), OutputFormat::Canonical),
    )
    .unwrap();

    let report: SociometricReport = import_canonical(&std::fs::read(&output).unwrap()).unwrap();
    // Answers to questions outside the request keep the response valid.
    assert_eq!(report.metrics.edge_count, 12);
    assert!(report.metrics.isolates.is_empty());
    assert_eq!(report.questions.into_iter().collect::<Vec<_>>(), vec![QuestionId(1)]);
}

#[test]
fn test_questionnaire_is_union_of_answered_questions() {
    let responses = vec![
        ChoiceResponse::new("Anna").with_choices(QuestionId(1), ["Bence", "Csilla", "Dani"]),
        ChoiceResponse::new("Bence").with_choices(QuestionId(3), ["Anna", "Csilla", "Dani"]),
    ];
    let questionnaire: Vec<QuestionId> = questionnaire_of(&responses).into_iter().collect();
    assert_eq!(questionnaire, vec![QuestionId(1), QuestionId(3)]);
    assert!(questionnaire_of(&[]).is_empty());
}

#[test]
fn test_sociogram_overlapping_groups_fail() {
    let dir = TempDir::new().unwrap();
    let request = build_request(&[1, 2], &[1], &[1], false);
    let result = cmd_sociogram(
        &AppConfig::default(),
        true,
        &roster(&dir),
        &responses(&dir),
        &request,
        &options(None, OutputFormat::Json),
    );
    assert!(matches!(
        result,
        Err(SportmetryError::OverlappingQuestionGroups(QuestionId(1)))
    ));
}

#[test]
fn test_sociogram_small_roster_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let small = write(&dir, "small.json", &serde_json::json!(["A", "B", "a"]));
    let result = cmd_sociogram(
        &AppConfig::default(),
        false,
        &small,
        &responses(&dir),
        &build_request(&[1], &[], &[], false),
        &options(None, OutputFormat::Json),
    );
    assert!(matches!(result, Err(SportmetryError::DeserializationError(_))));
}

// =============================================================================
// LOOKUP
// =============================================================================

#[test]
fn test_lookup_command() {
    let dir = TempDir::new().unwrap();
    cmd_lookup(true, &tables(&dir), "lány", "height_ref:age", 151.0).unwrap();
    cmd_lookup(false, &tables(&dir), "boy", "age:missing", 12.0).unwrap();
    assert!(matches!(
        cmd_lookup(false, &tables(&dir), "x", "age:%", 12.0),
        Err(SportmetryError::UnknownSex(_))
    ));
}

#[test]
fn test_parse_column_pair() {
    let pair = parse_column_pair(" plx_ref : age ").unwrap();
    assert_eq!(pair.key, "plx_ref");
    assert_eq!(pair.value, "age");
    assert!(parse_column_pair("plx_ref").is_err());
    assert!(parse_column_pair(":age").is_err());
}

// =============================================================================
// QUESTIONNAIRES
// =============================================================================

#[test]
fn test_readiness_command() {
    let dir = TempDir::new().unwrap();
    let complete = write(
        &dir,
        "readiness.json",
        &serde_json::json!({ "iprrs": [9, 9, 9, 9, 9, 9], "afaq": [1, 2, 1, 2, 1, 2, 1, 2, 1, 2] }),
    );
    cmd_readiness(true, &complete, Lang::Hu).unwrap();

    let partial = write(
        &dir,
        "partial.json",
        &serde_json::json!({ "iprrs": [9, null, 9, 9, 9, 9], "afaq": [1, 2, 1, 2, 1, 2, 1, 2, 1, 2] }),
    );
    assert!(matches!(
        cmd_readiness(false, &partial, Lang::En),
        Err(SportmetryError::IncompleteQuestionnaire(missing)) if missing == vec![2]
    ));
}

#[test]
fn test_motivation_command() {
    let dir = TempDir::new().unwrap();
    let items = write(
        &dir,
        "items.json",
        &serde_json::json!([
            { "first": "intrinsic_knowledge", "second": "extrinsic" },
            { "first": "Amotiváció", "second": "Introjected" },
        ]),
    );
    let answers = write(&dir, "answers.json", &serde_json::json!([1, 1]));
    cmd_motivation(false, &items, &answers, Lang::En).unwrap();

    let invalid = write(&dir, "invalid.json", &serde_json::json!([1, 3]));
    assert!(matches!(
        cmd_motivation(true, &items, &invalid, Lang::Hu),
        Err(SportmetryError::InvalidAnswer { item: 2, .. })
    ));
}

// =============================================================================
// OPTIONS
// =============================================================================

#[test]
fn test_output_options() {
    let config = AppConfig::default();
    let opts = OutputOptions::new(None, "canonical", Some("en"), &config).unwrap();
    assert_eq!(opts.format, OutputFormat::Canonical);
    assert_eq!(opts.lang, Lang::En);

    let opts = OutputOptions::new(None, "json", None, &config).unwrap();
    assert_eq!(opts.lang, Lang::Hu);

    assert!(OutputOptions::new(None, "xml", None, &config).is_err());
    assert!(OutputOptions::new(None, "json", Some("fr"), &config).is_err());
}
