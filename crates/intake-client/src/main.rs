use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use intake_client::{
    render_form, render_history, render_summary, ClientError, DirectBackend, FollowUpOutcome,
    HttpBackend, IntakeBackend, Session, SummaryState,
};
use intake_core::{FileStore, IntakeError, IntakeField};
use openai_provider::OpenAiProvider;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

#[derive(Debug, Parser)]
#[command(name = "intake")]
#[command(about = "Fill in a symptom intake form, get an educational summary, ask follow-up questions")]
struct Args {
    /// Intake API base URL
    #[arg(long, global = true, env = "INTAKE_SERVER_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Directory holding the persisted form and conversation
    #[arg(long, global = true, env = "INTAKE_DATA_DIR", default_value = "./.intake")]
    data_dir: PathBuf,

    /// Call the completion provider directly instead of the intake API
    #[arg(long, global = true)]
    direct: bool,

    /// HTTP timeout in seconds when talking to the intake API
    #[arg(long, global = true, default_value_t = 90)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show, edit or clear the intake form
    Form {
        #[command(subcommand)]
        action: FormAction,
    },
    /// Generate the educational summary for the current form
    Summary,
    /// Ask a follow-up question about the current form and summary
    Ask {
        /// The question text
        question: Vec<String>,
    },
    /// Show the follow-up conversation
    History {
        /// Delete the whole conversation
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
enum FormAction {
    /// Print every field
    Show,
    /// Set one field, e.g. `intake form set ageGroup "Adult (18-39)"`
    Set { field: String, value: Vec<String> },
    /// Reset the form to empty
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Some(hint) = hint_for(err.as_ref()) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&args.data_dir)?;
    let store_path = args.data_dir.join("storage.json");
    debug!(path = %store_path.display(), "Opening storage");
    let mut session = Session::open(FileStore::open(&store_path)?)?;

    match args.command {
        Command::Form { action } => match action {
            FormAction::Show => print!("{}", render_form(session.form())),
            FormAction::Set { field, value } => {
                let field: IntakeField = field.parse()?;
                session.set_field(field, value.join(" "))?;
                print!("{}", render_form(session.form()));
            }
            FormAction::Clear => {
                session.clear_form()?;
                println!("Form cleared.");
            }
        },
        Command::Summary => {
            let backend = backend(&args.server, args.direct, args.timeout_secs)?;
            eprintln!("Generating summary...");
            match session.request_summary(backend.as_ref()).await? {
                SummaryState::Ready(result) => print!("{}", render_summary(result)),
                SummaryState::Failed(err) => return Err(ClientError::from(err.clone()).into()),
                _ => {}
            }
        }
        Command::Ask { question } => {
            let question = question.join(" ");
            let backend = backend(&args.server, args.direct, args.timeout_secs)?;
            if session.summary_text().is_none() {
                info!("No summary yet, asking without one");
            }
            match session.ask(backend.as_ref(), &question).await? {
                FollowUpOutcome::Answered(entry) => println!("{}", entry.answer),
                FollowUpOutcome::Discarded => {
                    eprintln!("The answer arrived too late and was dropped.")
                }
                FollowUpOutcome::Failed(err) => {
                    eprintln!("Your question was kept: {}", session.draft_question());
                    return Err(ClientError::from(err).into());
                }
            }
        }
        Command::History { clear } => {
            if clear {
                session.clear_history()?;
                println!("Conversation cleared.");
            } else {
                print!("{}", render_history(session.history()));
            }
        }
    }

    Ok(())
}

fn backend(
    server: &str,
    direct: bool,
    timeout_secs: u64,
) -> Result<Box<dyn IntakeBackend>, IntakeError> {
    if direct {
        let provider = OpenAiProvider::from_env()?;
        let model = provider.model().to_string();
        info!(model = %model, "Using provider directly");
        Ok(Box::new(DirectBackend::new(provider, model)))
    } else {
        info!(server = %server, "Using intake API");
        Ok(Box::new(HttpBackend::new(
            server,
            Duration::from_secs(timeout_secs),
        )?))
    }
}

fn hint_for(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    let intake = match err.downcast_ref::<ClientError>() {
        Some(ClientError::Intake(e)) => e,
        Some(ClientError::Storage(_)) => return None,
        None => err.downcast_ref::<IntakeError>()?,
    };
    match intake {
        IntakeError::Validation(_) => {
            Some("Edit the form with `intake form set <field> <value>` and try again.")
        }
        _ if intake.is_retryable() => Some("Run the same command again to retry."),
        _ => None,
    }
}
