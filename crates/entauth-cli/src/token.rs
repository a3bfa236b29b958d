//! # Token Subcommand
//!
//! Issue and inspect bearer tokens with the service secret.
//!
//! The secret is read from an environment variable (default `JWT_SECRET`),
//! never from a flag, so it does not end up in shell history.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use entauth_core::identity::{CLAIM_REGION_UID, CLAIM_USER_ID, CLAIM_WORKSPACE_ID};
use entauth_core::SystemClock;
use entauth_crypto::{SecretKey, TokenClaims, TokenCodec, TokenError};

/// Arguments for the `entauth token` subcommand.
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Environment variable holding the token secret.
    #[arg(long, default_value = "JWT_SECRET", global = true)]
    pub secret_env: String,

    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Mint a token for a caller.
    Issue(IssueArgs),

    /// Validate a token and print its claims as JSON.
    Inspect {
        /// The token, with or without a `Bearer ` prefix.
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct IssueArgs {
    #[arg(long)]
    pub user_id: Option<String>,
    #[arg(long)]
    pub workspace_id: Option<String>,
    #[arg(long)]
    pub region_uid: Option<String>,
    /// Extra claim as `name=value`. Repeatable.
    #[arg(long = "claim", value_name = "NAME=VALUE", value_parser = parse_claim)]
    pub claims: Vec<(String, String)>,
    /// Lifetime in seconds.
    #[arg(long, default_value_t = 3600)]
    pub ttl: i64,
}

fn parse_claim(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

/// Execute the token subcommand.
pub fn run_token(args: &TokenArgs) -> Result<u8> {
    let secret = SecretKey::from_env(&args.secret_env)
        .with_context(|| format!("reading token secret from {}", args.secret_env))?;
    let codec = TokenCodec::new(secret, Arc::new(SystemClock));

    match &args.command {
        TokenCommand::Issue(issue) => {
            println!("{}", issue_token(&codec, issue)?);
            Ok(0)
        }
        TokenCommand::Inspect { token } => match inspect_token(&codec, token) {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(0)
            }
            Err(err) => {
                println!("INVALID: {err}");
                Ok(2)
            }
        },
    }
}

/// Build the claim set from `args` and mint a token.
pub fn issue_token(codec: &TokenCodec, args: &IssueArgs) -> Result<String> {
    let mut claims = TokenClaims::new();
    for (name, value) in [
        (CLAIM_USER_ID, &args.user_id),
        (CLAIM_WORKSPACE_ID, &args.workspace_id),
        (CLAIM_REGION_UID, &args.region_uid),
    ] {
        if let Some(value) = value {
            claims.insert(name, value.clone());
        }
    }
    for (name, value) in &args.claims {
        claims.insert(name.clone(), value.clone());
    }

    let token = codec
        .issue(&claims, args.ttl)
        .context("issuing token")?;
    tracing::info!(claims = claims.len(), ttl = args.ttl, "issued token");
    Ok(token)
}

/// Validate `token` and describe it.
pub fn inspect_token(codec: &TokenCodec, token: &str) -> Result<Value, TokenError> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    let verified = codec.verify(token)?;
    Ok(json!({
        "claims": verified.claims,
        "issuedAt": verified.issued_at.and_then(rfc3339),
        "expiresAt": rfc3339(verified.expires_at),
        "keyId": verified.key_id,
    }))
}

fn rfc3339(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|t| t.to_rfc3339())
}
