//! readmit-cli: command-line frontend for the readmission risk server
//!
//! Posts a patient row to the server's /predict endpoint and prints the
//! assessment the same way the web form shows it.
//!
//! # Subcommands
//! - `predict [--age N] [--diabetes] [--hypertension] ...` run a prediction
//! - `status` show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8767";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "readmit-cli",
    version,
    about = "Readmission risk prediction from the command line"
)]
struct Cli {
    /// Readmit HTTP server URL (overrides READMIT_HTTP_URL env var)
    #[arg(long, env = "READMIT_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Predict readmission risk for one patient
    Predict {
        /// Patient age in years (18-100)
        #[arg(long, default_value_t = 50)]
        age: u32,

        /// Patient has diabetes
        #[arg(long)]
        diabetes: bool,

        /// Patient has hypertension
        #[arg(long)]
        hypertension: bool,

        /// Number of previous admissions
        #[arg(long, default_value_t = 0)]
        admissions: u32,

        /// Average blood sugar over the last 7 days (mmol/L)
        #[arg(long, default_value_t = 5.0)]
        blood_sugar: f64,

        /// Print the raw server response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show readmit server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

/// The prediction response from POST /predict
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub probability: f64,
    pub formatted: String,
    pub risk: String,
    pub advisory: String,
    pub model: String,
    pub took_ms: Option<u64>,
}

// ============================================================================
// Request / output shaping
// ============================================================================

/// Build the /predict request body with the canonical feature field names.
pub fn patient_body(
    age: u32,
    diabetes: bool,
    hypertension: bool,
    admissions: u32,
    blood_sugar: f64,
) -> serde_json::Value {
    serde_json::json!({
        "age": age,
        "has_diabetes": diabetes,
        "has_hypertension": hypertension,
        "previous_admissions": admissions,
        "avg_blood_sugar_last_7_days": blood_sugar,
    })
}

/// Human-readable prediction output, matching the web form's result block.
pub fn format_prediction(resp: &PredictResponse) -> String {
    format!(
        "Prediction Result:\nThe predicted readmission risk is: {}\n{}",
        resp.formatted, resp.advisory
    )
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

/// Run a prediction against the readmit HTTP server.
fn do_predict(
    server: &str,
    age: u32,
    diabetes: bool,
    hypertension: bool,
    admissions: u32,
    blood_sugar: f64,
    json_output: bool,
) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let url = format!("{}/predict", server);
    let body = patient_body(age, diabetes, hypertension, admissions, blood_sugar);

    let resp = client.post(&url).json(&body).send();

    let resp = match resp {
        Ok(r) => r,
        Err(e) => {
            eprintln!("readmit-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"].as_str().map(|s| s.to_string()))
            .unwrap_or(body);
        eprintln!("readmit-cli: server returned {}: {}", status, message);
        std::process::exit(1);
    }

    if json_output {
        let value: serde_json::Value = match resp.json() {
            Ok(v) => v,
            Err(e) => {
                eprintln!("readmit-cli: failed to parse prediction response: {}", e);
                std::process::exit(1);
            }
        };
        match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("readmit-cli: failed to serialize response: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        let prediction: PredictResponse = match resp.json() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("readmit-cli: failed to parse prediction response: {}", e);
                std::process::exit(1);
            }
        };
        println!("{}", format_prediction(&prediction));
    }

    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);
    let resp = client.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Readmit server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
            println!("Model backend:  {}", body["model"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            let status = r.status();
            eprintln!("readmit-cli: server unhealthy (HTTP {})", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("readmit-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Predict {
            age,
            diabetes,
            hypertension,
            admissions,
            blood_sugar,
            json,
        } => do_predict(
            &server,
            age,
            diabetes,
            hypertension,
            admissions,
            blood_sugar,
            json,
        ),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("readmit-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
