//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::AppConfig;
use crate::labels::{Label, Lang, optional_label, readiness_label};
use serde::de::DeserializeOwned;
use sportmetry_core::export::{canonical_crypto_hash, verify_crypto_hash};
use sportmetry_core::{
    CanonicalCohort, CanonicalReport, ChoiceResponse, ColumnPair, ForcedChoiceItem, QuestionId,
    RawRecord, ReadinessAnswers, ReferenceTables, Roster, Sex, SociogramRequest,
    SociometricReport, SportmetryError, Submissions, analyze, compute_cohort, export_canonical,
    inspect_canonical, score_motivation, score_readiness,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a JSON input file (50 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_INPUT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum size of a canonical report file (500 MB).
const MAX_CANONICAL_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SportmetryError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SportmetryError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SportmetryError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it
/// names an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, SportmetryError> {
    let canonical = path.canonicalize().map_err(|e| {
        SportmetryError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SportmetryError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: its parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, SportmetryError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        SportmetryError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(SportmetryError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| SportmetryError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Read a validated file into memory.
fn read_input(path: &Path, max_size: u64) -> Result<Vec<u8>, SportmetryError> {
    let validated_path = validate_file_path(path)?;
    validate_file_size(&validated_path, max_size)?;
    std::fs::read(&validated_path)
        .map_err(|e| SportmetryError::IoError(format!("Read file: {}", e)))
}

/// Load and deserialize a JSON input file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, SportmetryError> {
    let contents = read_input(path, MAX_INPUT_FILE_SIZE)?;
    let value = serde_json::from_slice(&contents).map_err(|e| {
        SportmetryError::DeserializationError(format!("{}: {}", path.display(), e))
    })?;
    tracing::debug!("Loaded {:?} ({} bytes)", path, contents.len());
    Ok(value)
}

// =============================================================================
// OUTPUT OPTIONS
// =============================================================================

/// Report file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Canonical,
}

impl std::str::FromStr for OutputFormat {
    type Err = SportmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "canonical" => Ok(OutputFormat::Canonical),
            other => Err(SportmetryError::SerializationError(format!(
                "Unknown format: {}. Use: canonical, json",
                other
            ))),
        }
    }
}

/// Where and how a report command writes its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub lang: Lang,
}

impl OutputOptions {
    pub fn new(
        output: Option<PathBuf>,
        format: &str,
        lang: Option<&str>,
        config: &AppConfig,
    ) -> Result<Self, SportmetryError> {
        Ok(Self {
            output,
            format: format.parse()?,
            lang: resolve_lang(lang, config)?,
        })
    }
}

/// `--lang` or the configured default.
pub fn resolve_lang(lang: Option<&str>, config: &AppConfig) -> Result<Lang, SportmetryError> {
    lang.map_or(Ok(config.lang), |l| l.parse())
}

/// Assemble a sociogram request from raw question numbers.
#[must_use]
pub fn build_request(
    questions: &[u32],
    sympathy: &[u32],
    functional: &[u32],
    per_question: bool,
) -> SociogramRequest {
    let set = |ids: &[u32]| ids.iter().copied().map(QuestionId).collect::<BTreeSet<_>>();
    SociogramRequest {
        questions: set(questions),
        sympathy: set(sympathy),
        functional: set(functional),
        per_question,
    }
}

/// Write a report in the requested format. Returns the byte count.
fn write_report<R: CanonicalReport>(
    report: &R,
    path: &Path,
    format: OutputFormat,
) -> Result<usize, SportmetryError> {
    let validated_output = validate_output_path(path)?;

    let data = match format {
        OutputFormat::Canonical => {
            let data = export_canonical(report)?;
            tracing::info!("BLAKE3: {}", canonical_crypto_hash(&data));
            data
        }
        OutputFormat::Json => serde_json::to_vec_pretty(report)
            .map_err(|e| SportmetryError::SerializationError(e.to_string()))?,
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| SportmetryError::IoError(format!("Write file: {}", e)))?;

    tracing::info!("Exported {} bytes to {:?}", data.len(), validated_output);
    Ok(data.len())
}

/// Two decimals, or `n/a` for a value that could not be computed.
fn fmt_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "n/a".to_string()
    }
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), fmt_value)
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// ANTHRO COMMAND
// =============================================================================

/// Compute anthropometric metrics for a cohort.
pub fn cmd_anthro(
    config: &AppConfig,
    json_mode: bool,
    records: &Path,
    tables: &Path,
    options: &OutputOptions,
) -> Result<(), SportmetryError> {
    let raw: Vec<RawRecord> = load_json(records)?;
    let tables: ReferenceTables = load_json(tables)?;
    tracing::info!(
        "Computing {} records ({} boy rows, {} girl rows)",
        raw.len(),
        tables.boys.len(),
        tables.girls.len()
    );

    let report = compute_cohort(&raw, &tables, &config.engine);

    for failure in &report.failures {
        tracing::warn!("Rejected {}", failure);
    }
    for subject in &report.subjects {
        if subject.metrics.predicted_adult_stature.is_none() {
            tracing::warn!(
                "Record {}: predicted adult stature unavailable",
                subject.index
            );
        }
        let missing = subject.metrics.missing_fields();
        if !missing.is_empty() {
            tracing::debug!("Record {}: not computable: {:?}", subject.index, missing);
        }
    }
    tracing::info!(
        "Computed {} of {} records",
        report.subjects.len(),
        report.total()
    );

    let canonical = CanonicalCohort::from(&report);
    if let Some(path) = &options.output {
        write_report(&canonical, path, options.format)?;
    }

    let lang = options.lang;
    if json_mode {
        let subjects: Vec<serde_json::Value> = canonical
            .subjects
            .iter()
            .map(|s| {
                let m = &s.metrics;
                serde_json::json!({
                    "index": s.index,
                    "name": s.name,
                    "sport": s.sport,
                    "team": s.team,
                    "sex": s.sex.label(lang),
                    "metrics": m,
                    "labels": {
                        "bmi": optional_label(m.bmi_category.as_ref(), lang),
                        "phv": m.phv_category.label(lang),
                        "endomorphy": optional_label(m.endomorphy_class.as_ref(), lang),
                        "mesomorphy": optional_label(m.mesomorphy_class.as_ref(), lang),
                        "ectomorphy": optional_label(m.ectomorphy_class.as_ref(), lang),
                    },
                    "missing": m.missing_fields(),
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "subjects": subjects,
            "failures": canonical.failures,
        }));
        return Ok(());
    }

    for s in &canonical.subjects {
        let m = &s.metrics;
        println!(
            "#{} {} ({})",
            s.index,
            s.name.as_deref().unwrap_or("?"),
            s.sex.label(lang)
        );
        println!("  Chronological age:   {}", fmt_value(m.chronological_age));
        println!("  Skeletal age:        {}", fmt_value(m.skeletal_age));
        println!(
            "  Predicted stature:   {}",
            fmt_optional(m.predicted_adult_stature)
        );
        println!("  Body fat %:          {}", fmt_value(m.body_fat_percent));
        println!(
            "  Somatotype:          {} / {} / {}",
            fmt_value(m.endomorphy),
            fmt_value(m.mesomorphy),
            fmt_value(m.ectomorphy)
        );
        println!(
            "  BMI:                 {} {}",
            fmt_value(m.bmi),
            optional_label(m.bmi_category.as_ref(), lang)
        );
        println!(
            "  PHV:                 {} {}",
            fmt_value(m.phv),
            m.phv_category.label(lang)
        );
    }
    for f in &canonical.failures {
        println!("#{} rejected: {}", f.index, f.error);
    }

    Ok(())
}

// =============================================================================
// SOCIOGRAM COMMAND
// =============================================================================

/// Every question answered by at least one response.
///
/// The questionnaire is what respondents filled in, independent of which
/// questions a request aggregates.
#[must_use]
pub fn questionnaire_of(responses: &[ChoiceResponse]) -> BTreeSet<QuestionId> {
    responses
        .iter()
        .flat_map(|r| r.choices.keys().copied())
        .collect()
}

/// Accept responses through the submission rule; rejected ones are logged
/// and left out.
fn accept_responses(roster: &Roster, responses: Vec<ChoiceResponse>) -> Vec<ChoiceResponse> {
    let questionnaire = questionnaire_of(&responses);
    tracing::debug!("Questionnaire: {:?}", questionnaire);
    let mut submissions = Submissions::new(roster.clone(), questionnaire);

    for response in responses {
        if let Err(e) = submissions.submit(response) {
            tracing::warn!("Rejected response: {}", e);
        }
    }
    for member in submissions.pending() {
        tracing::debug!("No response from {:?}", roster.name(member));
    }
    submissions.responses()
}

/// Analyze a sociometric choice network.
pub fn cmd_sociogram(
    config: &AppConfig,
    json_mode: bool,
    roster: &Path,
    responses: &Path,
    request: &SociogramRequest,
    options: &OutputOptions,
) -> Result<(), SportmetryError> {
    let roster: Roster = load_json(roster)?;
    let raw: Vec<ChoiceResponse> = load_json(responses)?;
    let received = raw.len();

    let accepted = accept_responses(&roster, raw);
    tracing::info!(
        "Accepted {} of {} responses from {} members",
        accepted.len(),
        received,
        roster.len()
    );

    let report = analyze(&roster, &accepted, request, &config.engine)?;

    if let Some(path) = &options.output {
        write_report(&report, path, options.format)?;
    }

    if json_mode {
        print_sociogram_json(&report, options.lang);
        return Ok(());
    }

    let m = &report.metrics;
    println!("Sociogram ({} members)", m.member_count);
    println!("===========================");
    println!("Choices:      {}", m.edge_count);
    println!("Density:      {}", fmt_value(m.density));
    println!("Reciprocity:  {}", fmt_value(m.reciprocity));
    println!("Cohesion:     {}", fmt_value(m.cohesion));
    println!("Coverage:     {}", fmt_value(m.coverage));
    println!("Mutual pairs: {}", m.reciprocal_pair_count());
    println!("Isolates:     {}", m.isolate_count());
    println!("SD ratio:     {}", fmt_optional(m.sd_ratio));

    for pair in &m.reciprocal_pairs {
        println!(
            "  {} <-> {} (level {})",
            roster.name(pair.a).unwrap_or("?"),
            roster.name(pair.b).unwrap_or("?"),
            pair.level
        );
    }
    for s in &report.significance {
        println!(
            "  {}: {} ({})",
            roster.name(s.member).unwrap_or("?"),
            s.score,
            s.tier.label(options.lang)
        );
    }
    for (question, metrics) in &report.per_question {
        println!(
            "  {}: density {}, mutual pairs {}",
            question,
            fmt_value(metrics.density),
            metrics.reciprocal_pair_count()
        );
    }

    Ok(())
}

fn print_sociogram_json(report: &SociometricReport, lang: Lang) {
    let name = |id: sportmetry_core::MemberId| report.members.get(id.0).cloned();
    let significance: Vec<serde_json::Value> = report
        .significance
        .iter()
        .map(|s| {
            serde_json::json!({
                "member": name(s.member),
                "score": s.score,
                "tier": s.tier,
                "label": s.tier.label(lang),
            })
        })
        .collect();
    let layout: Vec<serde_json::Value> = report
        .layout
        .iter()
        .map(|(id, p)| serde_json::json!({ "member": name(*id), "x": p.x, "y": p.y }))
        .collect();

    print_json(&serde_json::json!({
        "members": report.members,
        "metrics": report.metrics,
        "layout": layout,
        "significance": significance,
        "per_question": report.per_question,
    }));
}

// =============================================================================
// LOOKUP COMMAND
// =============================================================================

/// Parse `key:value` into a column pair.
pub fn parse_column_pair(raw: &str) -> Result<ColumnPair, SportmetryError> {
    match raw.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok(ColumnPair::new(key.trim(), value.trim()))
        }
        _ => Err(SportmetryError::DeserializationError(format!(
            "Invalid column pair '{}'. Use: key:value",
            raw
        ))),
    }
}

/// Run one reference-table range lookup.
pub fn cmd_lookup(
    json_mode: bool,
    tables: &Path,
    sex: &str,
    column_pair: &str,
    value: f64,
) -> Result<(), SportmetryError> {
    let sex = Sex::parse(sex)?;
    let columns = parse_column_pair(column_pair)?;
    let tables: ReferenceTables = load_json(tables)?;

    let result = tables.for_sex(sex).lookup(value, &columns);
    if result.is_none() {
        tracing::warn!(
            "Lookup {} -> {} unavailable for {}",
            columns.key,
            columns.value,
            value
        );
    }

    if json_mode {
        print_json(&serde_json::json!({
            "sex": sex,
            "key": columns.key,
            "value_column": columns.value,
            "query": value,
            "result": result,
        }));
        return Ok(());
    }

    println!(
        "{}({}) -> {} = {}",
        columns.key,
        value,
        columns.value,
        fmt_optional(result)
    );
    Ok(())
}

// =============================================================================
// QUESTIONNAIRE COMMANDS
// =============================================================================

/// Score I-PRRS readiness and AFAQ fear avoidance.
pub fn cmd_readiness(json_mode: bool, answers: &Path, lang: Lang) -> Result<(), SportmetryError> {
    let answers: ReadinessAnswers = load_json(answers)?;
    let report = score_readiness(&answers)?;
    tracing::info!(
        "I-PRRS total {}, AFAQ total {}",
        report.iprrs.total,
        report.afaq.total
    );

    if json_mode {
        print_json(&serde_json::json!({
            "report": report,
            "labels": {
                "ready": readiness_label(report.ready, lang),
                "fear_avoidance": report.fear_avoidance.label(lang),
            },
        }));
        return Ok(());
    }

    println!(
        "I-PRRS: {} ({})",
        report.iprrs.total,
        readiness_label(report.ready, lang)
    );
    println!("  Lowest items:  {:?}", report.iprrs.lowest_items);
    println!("  Highest items: {:?}", report.iprrs.highest_items);
    println!(
        "AFAQ:   {} ({})",
        report.afaq.total,
        report.fear_avoidance.label(lang)
    );
    println!("  Lowest items:  {:?}", report.afaq.lowest_items);
    println!("  Highest items: {:?}", report.afaq.highest_items);
    Ok(())
}

/// Score a forced-choice sport motivation questionnaire.
pub fn cmd_motivation(
    json_mode: bool,
    items: &Path,
    answers: &Path,
    lang: Lang,
) -> Result<(), SportmetryError> {
    let items: Vec<ForcedChoiceItem> = load_json(items)?;
    let answers: Vec<Option<u8>> = load_json(answers)?;
    let profile = score_motivation(&items, &answers)?;
    tracing::info!("Scored {} motivation items", profile.total);

    if json_mode {
        let labels: Vec<serde_json::Value> = profile
            .scales
            .iter()
            .map(|(scale, score)| {
                serde_json::json!({
                    "scale": scale.label(lang),
                    "level": score.level.label(lang),
                })
            })
            .collect();
        print_json(&serde_json::json!({ "profile": profile, "labels": labels }));
        return Ok(());
    }

    for (scale, score) in &profile.scales {
        println!(
            "{:<28} {:>3} {:>6.1}%  {}",
            scale.label(lang),
            score.count,
            score.percent,
            score.level.label(lang)
        );
    }
    if profile.amotivation_flag {
        println!(
            "{}",
            match lang {
                Lang::Hu => "Amotivációs tendenciák is jellemzőek.",
                Lang::En => "Amotivation tendencies are present.",
            }
        );
    }
    Ok(())
}

// =============================================================================
// VERIFY COMMAND
// =============================================================================

/// Validate a canonical report file and print its BLAKE3 hash.
pub fn cmd_verify(
    json_mode: bool,
    input: &Path,
    expected_hash: Option<&str>,
) -> Result<(), SportmetryError> {
    let data = read_input(input, MAX_CANONICAL_FILE_SIZE)?;
    let header = inspect_canonical(&data)?;
    let hash = canonical_crypto_hash(&data);

    let matches = expected_hash.map(|expected| verify_crypto_hash(&data, expected));
    if matches == Some(false) {
        return Err(SportmetryError::DeserializationError(format!(
            "BLAKE3 mismatch: file hashes to {}",
            hash
        )));
    }

    if json_mode {
        print_json(&serde_json::json!({
            "kind": header.kind.to_string(),
            "version": header.version,
            "item_count": header.item_count,
            "checksum": header.checksum,
            "blake3": hash,
            "hash_verified": matches,
        }));
        return Ok(());
    }

    println!("Valid {} report (version {})", header.kind, header.version);
    println!("Items:    {}", header.item_count);
    println!("Checksum: {}", header.checksum);
    println!("BLAKE3:   {}", hash);
    if matches == Some(true) {
        println!("Hash verified");
    }
    Ok(())
}
