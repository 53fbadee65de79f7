//! Single request through the authenticated client

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use colored::*;
use log::info;
use std::time::Instant;

use rmi_client::api::Response;
use rmi_client::{ApiClient, ClientOptions, Environment, RequestBody};

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method
    #[arg(value_enum, ignore_case = true)]
    pub method: HttpMethod,

    /// API path appended to the base URL (e.g., "/v1/health")
    pub path: String,

    /// Query parameter as key=value (GET only, repeatable)
    #[arg(long = "query", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,

    /// JSON payload (POST/PUT); wins over --form
    #[arg(long)]
    pub json: Option<String>,

    /// Form field as key=value (POST/PUT, repeatable)
    #[arg(long = "form", value_parser = parse_key_value)]
    pub form: Vec<(String, String)>,

    /// Extra header as "Name: value" (repeatable)
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

pub fn handle_request_command(
    environment: Environment,
    options: ClientOptions,
    args: RequestArgs,
) -> Result<()> {
    info!("Executing request command: {:?} {}", args.method, args.path);

    check_arguments(&args)?;
    let body = build_body(&args)?;
    let query = borrow_pairs(&args.query);
    let headers = borrow_pairs(&args.headers);

    let client = ApiClient::from_environment(environment, options)?;

    let start = Instant::now();
    let response = match args.method {
        HttpMethod::Get => client.get(&args.path, &query, &headers),
        HttpMethod::Post => client.post(&args.path, &body, &headers),
        HttpMethod::Put => client.put(&args.path, &body, &headers),
        HttpMethod::Delete => client.delete(&args.path, &headers),
    }
    .with_context(|| format!("Failed to execute {:?} {}", args.method, args.path))?;
    let elapsed = start.elapsed();

    print_response(response, elapsed.as_secs_f64() * 1000.0)
}

/// Rejects flags the selected method would ignore
fn check_arguments(args: &RequestArgs) -> Result<()> {
    let takes_query = matches!(args.method, HttpMethod::Get);
    let takes_body = matches!(args.method, HttpMethod::Post | HttpMethod::Put);

    if !takes_query && !args.query.is_empty() {
        bail!("--query is only supported with GET, not {:?}", args.method);
    }
    if !takes_body && (args.json.is_some() || !args.form.is_empty()) {
        bail!("--json and --form are only supported with POST and PUT, not {:?}", args.method);
    }

    Ok(())
}

fn build_body(args: &RequestArgs) -> Result<RequestBody> {
    let mut body = RequestBody::empty();

    if !args.form.is_empty() {
        body = body.with_form(args.form.iter().cloned());
    }

    if let Some(raw) = &args.json {
        let value: serde_json::Value = serde_json::from_str(raw).context("--json is not valid JSON")?;
        body = body.with_json(value);
    }

    Ok(body)
}

fn borrow_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

fn print_response(response: Response, elapsed_ms: f64) -> Result<()> {
    let status = response.status();
    let status_text = status.to_string();
    let status_colored = if status.is_success() {
        status_text.bright_green()
    } else if status.is_client_error() || status.is_server_error() {
        status_text.bright_red()
    } else {
        status_text.yellow()
    };

    println!("Status: {} ({:.2}ms)", status_colored, elapsed_ms);

    let text = response.text().context("Failed to read response body")?;
    if text.is_empty() {
        return Ok(());
    }

    println!();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    Ok(())
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{}'", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
