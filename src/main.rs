//! InterviewCoach CLI entry point

use std::process::ExitCode;

use clap::Parser;

use interview_coach::cli::{
    app::{cli_overrides, load_merged_config, resolve_server_url, run_questions, run_session},
    args::{Cli, Commands, SessionOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
    EXIT_ERROR,
};
use interview_coach::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let presenter = Presenter::new();
    let question = cli.question_choice();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Questions) => {
            let server_url = resolve_server_url(cli.server_url).await;
            return run_questions(&server_url).await;
        }
        None => {}
    }

    // Merge config: defaults < file < CLI flags (env arrives through clap)
    let config = load_merged_config(cli_overrides(
        cli.server_url,
        cli.fragment_millis,
        cli.overlay,
    ))
    .await;

    let options = SessionOptions {
        server_url: config.server_url_or_default().to_string(),
        question,
        overlay: config.overlay_or_default(),
        fragment_millis: config.fragment_millis_or_default(),
    };

    run_session(options).await
}
