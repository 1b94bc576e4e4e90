use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phone_mask::{format_phone, PhoneForm, PhoneInput, PhoneMaskController, SubmitOutcome};
use shared::{
    domain::{FaqTopic, Feedback, ProblemKind},
    protocol::SupportRequest,
};
use support_client::{transport::connectivity_failure, HttpSupportTransport, SupportTransport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod chat_repl;
mod config;

use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "support-cli", about = "Support chat and phone mask from the terminal")]
struct Cli {
    /// Overrides the configured support server.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the masked form of a phone number.
    Format { raw: String },
    /// Run the submit-time check on a phone number.
    Validate { value: String },
    /// Send one problem report.
    Report { problem: ProblemKind },
    /// Send feedback on an FAQ answer.
    Feedback { faq: FaqTopic, feedback: Feedback },
    /// Interactive support chat.
    Chat,
}

fn transport_for(cli: &Cli) -> Result<HttpSupportTransport> {
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = &cli.server_url {
        settings.server_url = server_url.clone();
    }
    info!(server_url = %settings.server_url, "using support server");

    HttpSupportTransport::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("failed to set up support client for '{}'", settings.server_url))
}

async fn submit_once(transport: &HttpSupportTransport, request: SupportRequest) -> ExitCode {
    let reply = match transport.submit(request).await {
        Ok(reply) => reply,
        Err(error) => {
            warn!(%error, "support request failed");
            connectivity_failure()
        }
    };

    println!("{}", reply.message);
    if reply.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate(value: &str) -> ExitCode {
    let mut controller = PhoneMaskController::attach(PhoneForm::new(PhoneInput::new(value)));
    let outcome = controller.on_submit();
    println!("{}", controller.value());

    match outcome {
        SubmitOutcome::Proceed => {
            println!("valid");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Blocked => {
            eprintln!("{}", controller.error_text().unwrap_or_default());
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let code = match &cli.command {
        Command::Format { raw } => {
            println!("{}", format_phone(raw));
            ExitCode::SUCCESS
        }
        Command::Validate { value } => validate(value),
        Command::Report { problem } => {
            let transport = transport_for(&cli)?;
            submit_once(&transport, SupportRequest::ReportProblem { problem: *problem }).await
        }
        Command::Feedback { faq, feedback } => {
            let transport = transport_for(&cli)?;
            let request = SupportRequest::FaqFeedback {
                faq: *faq,
                feedback: *feedback,
            };
            submit_once(&transport, request).await
        }
        Command::Chat => {
            let transport = transport_for(&cli)?;
            chat_repl::run(&transport).await?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
