//! risk-assess - Chronic disease risk prediction
//!
//! The main entry point, handling:
//! - One-shot predictions from JSON or flags
//! - The web form server
//! - The interactive terminal form
//! - Settings and model diagnostics

use clap::{Args, Parser, Subcommand};
use ra_common::{
    encode_raw, format_error_human, CategoryMap, OutputFormat, RawSurvey, StructuredError,
    SurveyField, SurveyRecord, FEATURE_NAMES, SCHEMA_VERSION,
};
use ra_config::validate_settings;
use ra_core::config::{load_config, ConfigOptions, ResolvedConfig};
use ra_core::exit_codes::ExitCode;
use ra_core::log_event;
use ra_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use ra_core::prompt::run_form;
use ra_core::web::WebServer;
use ra_core::{AppContext, Assessment, MessageStyle, Predictor};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// Chronic disease risk prediction from a fourteen-question survey
#[derive(Parser)]
#[command(name = "risk-assess")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Override config directory (settings.json, model.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model artifact to load
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log line format on stderr (defaults to jsonl for json output)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one survey and exit 0 (low risk) or 1 (high risk)
    Predict(PredictArgs),

    /// Encode one survey into the feature vector without a model
    Encode(SurveyArgs),

    /// Serve the web form
    Serve(ServeArgs),

    /// Fill in the survey interactively in the terminal
    Form,

    /// Validate settings and the model artifact
    Check,

    /// List the answer options of every categorical question
    Categories,

    /// Print the JSON schema of a survey submission
    Schema,

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// A survey given as a JSON file and/or one flag per question. Flags override
/// the file.
#[derive(Args, Debug, Default)]
struct SurveyArgs {
    /// JSON survey file ('-' for stdin)
    #[arg(long, short = 'i')]
    input: Option<String>,

    #[arg(long)]
    age: Option<String>,

    #[arg(long)]
    marital_status: Option<String>,

    #[arg(long)]
    education_level: Option<String>,

    #[arg(long)]
    number_of_children: Option<String>,

    #[arg(long)]
    smoking_status: Option<String>,

    #[arg(long)]
    physical_activity_level: Option<String>,

    #[arg(long)]
    employment_status: Option<String>,

    #[arg(long)]
    income: Option<String>,

    #[arg(long)]
    alcohol_consumption: Option<String>,

    #[arg(long)]
    dietary_habits: Option<String>,

    #[arg(long)]
    sleep_patterns: Option<String>,

    #[arg(long)]
    mental_illness_history: Option<String>,

    #[arg(long)]
    substance_abuse_history: Option<String>,

    #[arg(long)]
    family_history_depression: Option<String>,
}

impl SurveyArgs {
    fn flags(&self) -> [(SurveyField, Option<&String>); 14] {
        [
            (SurveyField::Age, self.age.as_ref()),
            (SurveyField::MaritalStatus, self.marital_status.as_ref()),
            (SurveyField::EducationLevel, self.education_level.as_ref()),
            (SurveyField::NumberOfChildren, self.number_of_children.as_ref()),
            (SurveyField::SmokingStatus, self.smoking_status.as_ref()),
            (
                SurveyField::PhysicalActivityLevel,
                self.physical_activity_level.as_ref(),
            ),
            (SurveyField::EmploymentStatus, self.employment_status.as_ref()),
            (SurveyField::Income, self.income.as_ref()),
            (SurveyField::AlcoholConsumption, self.alcohol_consumption.as_ref()),
            (SurveyField::DietaryHabits, self.dietary_habits.as_ref()),
            (SurveyField::SleepPatterns, self.sleep_patterns.as_ref()),
            (
                SurveyField::MentalIllnessHistory,
                self.mental_illness_history.as_ref(),
            ),
            (
                SurveyField::SubstanceAbuseHistory,
                self.substance_abuse_history.as_ref(),
            ),
            (
                SurveyField::FamilyHistoryDepression,
                self.family_history_depression.as_ref(),
            ),
        ]
    }

    fn to_raw(&self) -> Result<RawSurvey, ra_common::Error> {
        let mut raw = match self.input.as_deref() {
            Some("-") => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                serde_json::from_str(&text)?
            }
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => RawSurvey::new(),
        };
        for (field, value) in self.flags() {
            if let Some(value) = value {
                raw.remove(field);
                raw.insert(field.label(), value.as_str());
            }
        }
        Ok(raw)
    }
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[command(flatten)]
    survey: SurveyArgs,

    /// Wording of the outcome message
    #[arg(long, value_enum, default_value = "web")]
    style: MessageStyle,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind (overrides settings)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides settings)
    #[arg(long, short = 'p')]
    port: Option<u16>,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|err| exit_usage(err));

    let interactive = matches!(cli.command, None | Some(Commands::Form));
    let log_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet)
        // Keep the terminal form readable
        .or(interactive.then_some(LogLevel::Warn));
    let log_format = cli
        .global
        .log_format
        .or(cli.global.format.is_structured().then_some(LogFormat::Jsonl));
    init_logging(&LogConfig::from_env(log_level, log_format));

    let log = LogContext::new(generate_run_id());
    log_event!(
        log,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "run started",
        version = env!("CARGO_PKG_VERSION")
    );

    let global = &cli.global;
    let exit_code = match &cli.command {
        None | Some(Commands::Form) => run_form_command(global, &log),
        Some(Commands::Predict(args)) => run_predict(global, &log, args),
        Some(Commands::Encode(args)) => run_encode(global, &log, args),
        Some(Commands::Serve(args)) => run_serve(global, &log, args),
        Some(Commands::Check) => run_check(global, &log),
        Some(Commands::Categories) => run_categories(global),
        Some(Commands::Schema) => run_schema(global),
        Some(Commands::Version) => {
            print_version(global);
            ExitCode::Clean
        }
    };

    log_event!(
        log,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "run finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

/// Help and version print normally; any other parse failure exits with
/// `ERR_ARGS` instead of clap's own status.
fn exit_usage(err: clap::Error) -> ! {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            let _ = err.print();
            std::process::exit(ExitCode::ArgsError.as_i32())
        }
    }
}

// ============================================================================
// Shared setup
// ============================================================================

fn config_options(global: &GlobalOpts) -> ConfigOptions {
    ConfigOptions {
        config_dir: global.config.clone(),
        model_path: global.model.clone(),
    }
}

fn load_settings(global: &GlobalOpts, log: &LogContext) -> Result<ResolvedConfig, ra_common::Error> {
    match load_config(&config_options(global)) {
        Ok(config) => {
            match &config.settings_path {
                Some(path) => log_event!(
                    log,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "settings loaded",
                    path = path.display().to_string().as_str(),
                    source = config.settings_source.to_string().as_str()
                ),
                None => log_event!(
                    log,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "no settings file found; using built-in defaults"
                ),
            }
            Ok(config)
        }
        Err(e) => {
            log_event!(
                log,
                ERROR,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "settings rejected",
                error = e.to_string().as_str()
            );
            Err(e.into())
        }
    }
}

fn load_predictor(config: &ResolvedConfig, log: &LogContext) -> Result<Predictor, ra_common::Error> {
    let path = config.model_path.as_ref().ok_or_else(|| {
        ra_common::Error::ModelLoad(
            "no model artifact configured or found in the config directories".to_string(),
        )
    })?;

    match Predictor::load(path) {
        Ok(predictor) => {
            let info = predictor.info();
            log_event!(
                log,
                INFO,
                event_names::MODEL_LOADED,
                Stage::Init,
                "model loaded",
                model_id = info.model_id.as_str(),
                sha256 = info.sha256.as_str(),
                nodes = info.node_count,
                depth = info.depth,
                source = config.model_source.to_string().as_str()
            );
            Ok(predictor)
        }
        Err(e) => {
            log_event!(
                log,
                ERROR,
                event_names::MODEL_ERROR,
                Stage::Init,
                "model rejected",
                path = path.display().to_string().as_str(),
                error = e.to_string().as_str()
            );
            Err(e.into())
        }
    }
}

fn load_context(global: &GlobalOpts, log: &LogContext) -> Result<AppContext, ra_common::Error> {
    let config = load_settings(global, log)?;
    let predictor = load_predictor(&config, log)?;
    Ok(AppContext::new(predictor, config.settings, log.clone()))
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_predict(global: &GlobalOpts, log: &LogContext, args: &PredictArgs) -> ExitCode {
    let raw = match args.survey.to_raw() {
        Ok(raw) => raw,
        Err(e) => return output_error(global, log, &e),
    };
    let ctx = match load_context(global, log) {
        Ok(ctx) => ctx,
        Err(e) => return output_error(global, log, &e),
    };

    let assessment = match ctx.assess(&raw, args.style) {
        Ok(a) => a,
        Err(e) => return output_error(global, log, &e.into()),
    };

    output_assessment(global, log, &ctx, &assessment);
    ExitCode::for_label(assessment.label)
}

fn output_assessment(global: &GlobalOpts, log: &LogContext, ctx: &AppContext, a: &Assessment) {
    let info = ctx.predictor.info();
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": log.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "model": {
                    "model_id": info.model_id,
                    "sha256": info.sha256,
                },
                "label": a.label,
                "class": a.label.class(),
                "message": a.message,
                "features": a.features,
            });
            print_json(&response);
        }
        OutputFormat::Summary => {
            println!("{}: {}", a.label, a.message);
        }
        OutputFormat::Md => {
            let marker = if a.label.is_high() { "⚠️" } else { "✅" };
            println!("# Risk Assessment");
            println!();
            println!("{} **Prediction:** {}", marker, a.message);
            println!();
            print_feature_table(a.features.named());
            println!();
            println!("Model: `{}` (sha256 `{}`)", info.model_id, info.sha256);
        }
    }
}

fn run_encode(global: &GlobalOpts, log: &LogContext, args: &SurveyArgs) -> ExitCode {
    let features = match args
        .to_raw()
        .and_then(|raw| encode_raw(&raw).map_err(ra_common::Error::from)) {
        Ok(f) => f,
        Err(e) => return output_error(global, log, &e),
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "feature_names": FEATURE_NAMES,
                "features": features,
            });
            print_json(&response);
        }
        OutputFormat::Summary => {
            let values: Vec<String> = features.as_slice().iter().map(|v| v.to_string()).collect();
            println!("{}", values.join(","));
        }
        OutputFormat::Md => {
            println!("# Feature Vector");
            println!();
            print_feature_table(features.named());
        }
    }
    ExitCode::Clean
}

fn print_feature_table<'a>(named: impl Iterator<Item = (&'a str, f64)>) {
    println!("| # | Feature | Value |");
    println!("|---|---------|-------|");
    for (i, (name, value)) in named.enumerate() {
        println!("| {} | {} | {} |", i, name, value);
    }
}

fn run_serve(global: &GlobalOpts, log: &LogContext, args: &ServeArgs) -> ExitCode {
    let mut ctx = match load_context(global, log) {
        Ok(ctx) => ctx,
        Err(e) => return output_error(global, log, &e),
    };

    if let Some(bind) = &args.bind {
        ctx.settings.server.bind = bind.clone();
    }
    if let Some(port) = args.port {
        ctx.settings.server.port = port;
    }
    if let Err(e) = validate_settings(&ctx.settings) {
        return output_error(global, log, &e.into());
    }

    let server = match WebServer::start(ctx) {
        Ok(server) => server,
        Err(e) => return output_error(global, log, &e.into()),
    };

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "listening",
            "run_id": log.run_id,
            "url": format!("http://{}/", server.addr()),
        })),
        _ => println!("Serving on http://{}/ (Ctrl-C to stop)", server.addr()),
    }

    server.wait();
    ExitCode::Clean
}

fn run_form_command(global: &GlobalOpts, log: &LogContext) -> ExitCode {
    let ctx = match load_context(global, log) {
        Ok(ctx) => ctx,
        Err(e) => return output_error(global, log, &e),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match run_form(&ctx, stdin.lock(), stdout.lock()) {
        Ok(summary) => {
            log_event!(
                log,
                DEBUG,
                event_names::FORM_FINISHED,
                Stage::Render,
                "form session ended",
                submitted = summary.submitted,
                high = summary.high,
                low = summary.low,
                failed = summary.failed
            );
            ExitCode::Clean
        }
        Err(e) => output_error(global, log, &e.into()),
    }
}

fn run_check(global: &GlobalOpts, log: &LogContext) -> ExitCode {
    let mut results: Vec<serde_json::Value> = Vec::new();
    let mut exit_code = ExitCode::Clean;

    match load_settings(global, log) {
        Ok(config) => {
            results.push(serde_json::json!({
                "check": "settings",
                "status": "ok",
                "using_defaults": config.settings_path.is_none(),
                "snapshot": config.snapshot(),
            }));

            match load_predictor(&config, log) {
                Ok(predictor) => {
                    results.push(serde_json::json!({
                        "check": "model",
                        "status": "ok",
                        "info": predictor.info(),
                    }));
                }
                Err(e) => {
                    exit_code = ExitCode::from(&e);
                    results.push(serde_json::json!({
                        "check": "model",
                        "status": "error",
                        "path": config.model_path,
                        "error": e.to_string(),
                    }));
                }
            }
        }
        Err(e) => {
            exit_code = ExitCode::from(&e);
            results.push(serde_json::json!({
                "check": "settings",
                "status": "error",
                "error": e.to_string(),
            }));
        }
    }

    let all_ok = exit_code == ExitCode::Clean;
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": log.run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": if all_ok { "ok" } else { "error" },
        "checks": results,
    });

    match global.format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Summary => {
            let status = if all_ok { "OK" } else { "FAILED" };
            println!("[{}] check: {}", log.run_id, status);
        }
        OutputFormat::Md => {
            println!("# risk-assess check");
            println!();
            for result in &results {
                let check = result.get("check").and_then(|v| v.as_str()).unwrap_or("?");
                let status = result.get("status").and_then(|v| v.as_str()).unwrap_or("?");
                let symbol = if status == "ok" { "✓" } else { "✗" };
                println!("{} {}: {}", symbol, check, status);
                if let Some(info) = result.get("info") {
                    for key in ["model_id", "sha256", "node_count", "depth"] {
                        if let Some(value) = info.get(key) {
                            println!("  {}: {}", key, value);
                        }
                    }
                }
                if let Some(error) = result.get("error").and_then(|v| v.as_str()) {
                    println!("  Error: {}", error);
                }
            }
        }
    }

    exit_code
}

fn run_categories(global: &GlobalOpts) -> ExitCode {
    let map = CategoryMap::canonical();
    match global.format {
        OutputFormat::Json => print_json(&map),
        OutputFormat::Md => print!("{}", map.to_markdown()),
        OutputFormat::Summary => {
            for entry in &map.fields {
                let labels: Vec<&str> = entry.options.iter().map(|o| o.label.as_str()).collect();
                println!("{}: {}", entry.field, labels.join(" | "));
            }
        }
    }
    ExitCode::Clean
}

fn run_schema(global: &GlobalOpts) -> ExitCode {
    let schema = schemars::schema_for!(SurveyRecord);
    match global.format {
        OutputFormat::Summary => println!("survey record schema, version {}", SCHEMA_VERSION),
        _ => print_json(&schema),
    }
    ExitCode::Clean
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "risk_assess_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json => print_json(&version_info),
        _ => {
            println!("risk-assess {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

/// Report an error on stderr in the requested format and map it to an exit
/// code.
fn output_error(global: &GlobalOpts, log: &LogContext, error: &ra_common::Error) -> ExitCode {
    let exit_code = ExitCode::from(error);

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": log.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": StructuredError::from(error),
            });
            match serde_json::to_string_pretty(&response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", error),
            }
        }
        OutputFormat::Summary => {
            eprintln!("[{}] {}: {}", log.run_id, exit_code.code_name(), error);
        }
        OutputFormat::Md => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(error, use_color));
        }
    }

    exit_code
}
