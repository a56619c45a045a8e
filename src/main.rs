use clap::Parser;
use pdftab::{Cli, OutputFormatter, OutputMode, PdfTab, PdfTabError, UserFriendlyError};
use std::process;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    if cli.generate_config {
        return handle_generate_config(cli);
    }

    let pdftab = match PdfTab::from_cli(cli) {
        Ok(pdftab) => pdftab,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&pdftab);
    }

    match pdftab.run() {
        Ok(report) => {
            pdftab.output_formatter().print_run_report(&report);
            0
        }
        Err(e) => {
            log::error!("Run aborted: {}", e);
            pdftab.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &PdfTabError) -> i32 {
    if error.is_contract_violation() {
        return 70;
    }

    match error {
        PdfTabError::Config { .. } => 2,
        PdfTabError::NoPdfFiles { .. } => 3,
        PdfTabError::PdfParse { .. } => 4,
        PdfTabError::Extraction { .. } => 5,
        PdfTabError::Io(_) | PdfTabError::OutputExists { .. } => 6,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "pdftab.toml".to_string());

    match PdfTab::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  pdftab <directory> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            exit_code_for(&e)
        }
    }
}

fn handle_dry_run(pdftab: &PdfTab) -> i32 {
    let formatter = pdftab.output_formatter();
    formatter.info("DRY RUN MODE - No tables will be extracted");

    let config = pdftab.config();
    formatter.debug(&format!("Pages per part: {}", config.extraction.pages_per_part));
    formatter.debug(&format!(
        "Output directory: {}",
        config.output_directory().display()
    ));

    match pdftab.plan() {
        Ok(plan) => {
            formatter.print_plan(&plan);
            0
        }
        Err(e) => {
            pdftab.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn print_startup_error(error: &PdfTabError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "pdftab=warn",
        1 => "pdftab=info",
        _ => "pdftab=debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
