use clap::{Arg, Command};
use log::LevelFilter;
use mail_triage::{Config, EmailRecord, LoadScan, ScanPipeline};
use std::io::Read;
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("mail-triage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Two-stage email classifier: deterministic pre-filter plus Gemini scan")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("mail-triage.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("basic-only")
                .long("basic-only")
                .help("Run only the deterministic pre-filter stage")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("load")
                .long("load")
                .help("Assess cognitive load instead of classifying")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = Config::default().to_file(generate_path) {
            eprintln!("Error writing configuration: {e}");
            process::exit(1);
        }
        println!("Default configuration written to {generate_path}");
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = if std::path::Path::new(config_path).exists() {
        match Config::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {e}");
                process::exit(1);
            }
        }
    } else {
        log::debug!("no config file at {config_path}, using defaults");
        Config::default()
    };

    if matches.get_flag("test-config") {
        match ScanPipeline::new(&config) {
            Ok(_) => {
                println!(
                    "Configuration OK: {} narrowing rules compiled.",
                    config.rules.len()
                );
            }
            Err(e) => {
                eprintln!("Configuration validation failed: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let email = match read_email_from_stdin() {
        Ok(email) => email,
        Err(e) => {
            eprintln!("Error parsing JSON: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("load") {
        run_load_scan(&config, &email).await;
        return;
    }

    let pipeline = match ScanPipeline::new(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error building scan pipeline: {e}");
            process::exit(1);
        }
    };

    let verdict = if matches.get_flag("basic-only") {
        pipeline.prefilter().narrow(&email)
    } else {
        pipeline.scan(&email).await
    };

    // The verdict is always reported on stdout; it never affects the exit
    // code.
    println!("CATEGORY: {}", verdict.name());
}

fn read_email_from_stdin() -> anyhow::Result<EmailRecord> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    EmailRecord::from_json(&input)
}

async fn run_load_scan(config: &Config, email: &EmailRecord) {
    let scan = LoadScan::new(config);
    match scan.assess(email).await {
        Ok(assessment) => {
            println!("INTENT: {}", assessment.action_intent);
            println!("CLS: {:.1}", assessment.cls_score);
            log::debug!(
                "load reasoning: {}",
                assessment.reasoning.final_justification
            );
        }
        Err(e) => {
            // Degrades like any other model failure: logged, no report.
            log::error!("cognitive load scan failed: {e}");
        }
    }
}
