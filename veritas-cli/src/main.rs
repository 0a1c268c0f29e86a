//! veritas-cli: terminal front end for a running Veritas server
//!
//! # Subcommands
//! - `text <claim...> [--json]`  check a claim or classify a pasted article
//! - `url <url> [--json]`        extract and classify a news article
//! - `status`                    show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8770";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "veritas-cli", version, about = "Fake-news checker for claims and articles")]
struct Cli {
    /// Veritas HTTP server URL (overrides VERITAS_HTTP_URL env var)
    #[arg(long, env = "VERITAS_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify a claim or a full article pasted as text
    Text {
        /// Claim text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the raw JSON verdict
        #[arg(long)]
        json: bool,
    },

    /// Verify a news article by URL
    Url {
        url: String,

        /// Print the raw JSON verdict
        #[arg(long)]
        json: bool,
    },

    /// Show Veritas server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClassificationView {
    pub label: String,
    pub probability_real: f64,
    pub probability_fake: f64,
}

/// Verdict body returned by POST /verify/text and POST /verify/url
#[derive(Debug, Deserialize)]
pub struct VerdictResponse {
    pub outcome: String,
    pub message: String,
    pub classification: Option<ClassificationView>,
    pub evidence: Option<Vec<String>>,
    pub url: Option<String>,
    pub preview: Option<String>,
    pub took_ms: Option<u64>,
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render_confidence(c: &ClassificationView) -> String {
    format!(
        "Confidence (Real): {:.2} | (Fake): {:.2}",
        c.probability_real, c.probability_fake
    )
}

/// Human-readable verdict, in the order a reader needs it: what was
/// looked at, then the numbers, then the conclusion.
pub fn render_verdict(v: &VerdictResponse) -> String {
    let mut out = Vec::new();

    if let Some(preview) = &v.preview {
        out.push("Extracted article:".to_string());
        out.push(preview.clone());
        out.push(String::new());
    }

    if let Some(snippets) = &v.evidence {
        out.push("Search snippets:".to_string());
        for s in snippets {
            out.push(format!("> {}", s));
        }
        out.push(String::new());
    }

    if let Some(c) = &v.classification {
        out.push(render_confidence(c));
    }

    out.push(v.message.clone());
    out.join("\n")
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn post_verify(server: &str, endpoint: &str, body: serde_json::Value) -> anyhow::Result<(VerdictResponse, String)> {
    // Article downloads on the server side can take a while.
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    let url = format!("{}{}", server, endpoint);
    let resp = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("veritas-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    let status = resp.status();
    let raw = resp.text().unwrap_or_default();

    // 400 still carries a verdict (blank input); anything else non-2xx is a server fault.
    if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
        eprintln!("veritas-cli: server returned {}: {}", status, raw);
        std::process::exit(1);
    }

    match serde_json::from_str::<VerdictResponse>(&raw) {
        Ok(v) => Ok((v, raw)),
        Err(e) => {
            eprintln!("veritas-cli: failed to parse verdict: {}", e);
            std::process::exit(1);
        }
    }
}

fn do_verify(server: &str, endpoint: &str, body: serde_json::Value, json_output: bool) -> anyhow::Result<()> {
    let (verdict, raw) = post_verify(server, endpoint, body)?;

    if json_output {
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", render_verdict(&verdict));
        if let Some(ms) = verdict.took_ms {
            eprintln!("({} ms)", ms);
        }
    }

    if verdict.outcome == "empty_input" {
        std::process::exit(2);
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
            println!("Veritas server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
            println!(
                "Classifier:     {} ({} features)",
                body["classifier"].as_str().unwrap_or("?"),
                body["features"].as_u64().unwrap_or(0)
            );
            println!(
                "Search:         {}{}",
                body["search"].as_str().unwrap_or("?"),
                if body["search_configured"].as_bool().unwrap_or(false) {
                    ""
                } else {
                    " (no API key)"
                }
            );
            println!("Socket:         {}", body["socket"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            let status = r.status();
            eprintln!("veritas-cli: server unhealthy (HTTP {})", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("veritas-cli: cannot reach {}: {}", url, e);
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
        Commands::Text { text, json } => do_verify(
            &server,
            "/verify/text",
            serde_json::json!({ "text": text.join(" ") }),
            json,
        ),
        Commands::Url { url, json } => do_verify(
            &server,
            "/verify/url",
            serde_json::json!({ "url": url }),
            json,
        ),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("veritas-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
