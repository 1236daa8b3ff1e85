//! Live check of OpenAiProvider against the real API.
//!
//! Run with: cargo run -p openai-provider --example live_summary
//! Or with custom symptoms: cargo run -p openai-provider --example live_summary -- "sore throat for two days"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - API key for authentication

use intake_core::{generate_summary, IntakeRecord};
use openai_provider::{CompletionProvider, OpenAiProvider};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let symptoms = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "mild headache since this morning".to_string()
    };

    println!("Initializing OpenAiProvider...");
    let provider = OpenAiProvider::from_env()?;

    println!("Provider initialized: {}", provider.name());
    println!("API URL: {}", provider.config().api_url);
    println!("Model: {}", provider.model());
    println!();

    let record = IntakeRecord {
        sex: "Female".to_string(),
        age_group: "Adult (18–39)".to_string(),
        symptoms,
        ..Default::default()
    };

    println!("Symptoms: \"{}\"", record.symptoms);
    println!("Waiting for response...\n");

    let summary = generate_summary(&provider, provider.model(), &record).await?;

    println!("=== Summary ===");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("===============");

    Ok(())
}
