//! Idempotent schema bootstrap.
//!
//! The schema script is split into individual statements and applied over a
//! single administrative connection. Statements that fail because the object
//! already exists are counted as skipped; any other failure is logged as a
//! warning and the remaining statements still run.
//!
//! The splitter understands single, double and backtick quoting (including
//! doubled-quote and backslash escapes), `-- `, `#` and `/* */` comments.
//! It does not understand `DELIMITER` blocks, so stored routines cannot be
//! bootstrapped this way.

use std::path::Path;

use ecotrack_config::DatabaseConfig;
use sqlx::mysql::{MySqlConnection, MySqlDatabaseError};
use sqlx::Connection;
use tracing::{debug, info, instrument, warn};

use crate::error::DbError;
use crate::pool::admin_connect_options;

/// MySQL error numbers meaning "this was already applied":
/// database exists, table exists, duplicate column, duplicate key name,
/// duplicate entry, duplicate foreign key constraint name.
pub const ALREADY_APPLIED_ERROR_CODES: [u16; 6] = [1007, 1050, 1060, 1061, 1062, 1826];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub applied: usize,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Reads the schema file and applies it. See [`apply_schema`].
pub async fn initialize_schema(
    config: &DatabaseConfig,
    path: &Path,
) -> Result<SchemaReport, DbError> {
    let script = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DbError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;

    apply_schema(config, &script).await
}

/// Creates the configured database if needed, selects it, then runs every
/// statement of `script` in order.
///
/// Fails only when the server cannot be reached, the database cannot be
/// created or selected, or the database name is unsafe to interpolate.
#[instrument(skip(config, script), fields(host = %config.host, database = %config.database))]
pub async fn apply_schema(config: &DatabaseConfig, script: &str) -> Result<SchemaReport, DbError> {
    validate_database_name(&config.database)?;

    let mut conn = MySqlConnection::connect_with(&admin_connect_options(config))
        .await
        .map_err(DbError::Connect)?;
    info!("Connected to MySQL server");

    sqlx::raw_sql(&format!(
        "CREATE DATABASE IF NOT EXISTS `{}`",
        config.database
    ))
    .execute(&mut conn)
    .await?;
    sqlx::raw_sql(&format!("USE `{}`", config.database))
        .execute(&mut conn)
        .await?;

    let mut report = SchemaReport::default();
    for statement in split_statements(script) {
        match sqlx::raw_sql(&statement).execute(&mut conn).await {
            Ok(_) => report.applied += 1,
            Err(e) if is_already_applied(&e) => {
                debug!(error = %e, "Schema statement already applied");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(error = %e, statement = %summarize(&statement), "Schema statement warning");
                report.warnings.push(e.to_string());
            }
        }
    }

    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close schema connection cleanly");
    }

    info!(
        applied = report.applied,
        skipped = report.skipped,
        warnings = report.warnings.len(),
        "Database schema initialized"
    );
    Ok(report)
}

/// Whether a statement failure means the object is already in place.
pub fn is_already_applied(err: &sqlx::Error) -> bool {
    let Some(db_err) = err.as_database_error() else {
        return false;
    };

    let known_code = db_err
        .try_downcast_ref::<MySqlDatabaseError>()
        .is_some_and(|e| ALREADY_APPLIED_ERROR_CODES.contains(&e.number()));

    known_code || is_already_applied_message(db_err.message())
}

pub fn is_already_applied_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("already exists") || message.contains("duplicate")
}

/// Database names are interpolated into `CREATE DATABASE` and `USE`.
pub fn validate_database_name(name: &str) -> Result<(), DbError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidDatabaseName(name.to_string()))
    }
}

/// Splits a script on `;` terminators that are outside quotes and comments.
/// Comments are dropped; empty statements are skipped.
pub fn split_statements(script: &str) -> Vec<String> {
    let chars: Vec<char> = script.chars().collect();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            quote @ ('\'' | '"' | '`') => {
                let end = quoted_end(&chars, i, quote);
                current.extend(&chars[i..end]);
                i = end;
            }
            '#' => i = line_end(&chars, i),
            '-' if is_line_comment(&chars, i) => i = line_end(&chars, i),
            '/' if chars.get(i + 1) == Some(&'*') => {
                i = block_comment_end(&chars, i);
                current.push(' ');
            }
            ';' => {
                push_statement(&mut statements, &mut current);
                i += 1;
            }
            c => {
                current.push(c);
                i += 1;
            }
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}

// MySQL requires whitespace (or end of input) after `--`.
fn is_line_comment(chars: &[char], i: usize) -> bool {
    chars.get(i + 1) == Some(&'-') && chars.get(i + 2).is_none_or(|c| c.is_whitespace())
}

/// Index of the newline ending the comment at `i` (the newline is kept).
fn line_end(chars: &[char], i: usize) -> usize {
    chars[i..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |offset| i + offset)
}

fn block_comment_end(chars: &[char], i: usize) -> usize {
    let mut j = i + 2;
    while j + 1 < chars.len() {
        if chars[j] == '*' && chars[j + 1] == '/' {
            return j + 2;
        }
        j += 1;
    }
    chars.len()
}

/// Index just past the closing quote of the literal starting at `start`.
fn quoted_end(chars: &[char], start: usize, quote: char) -> usize {
    let mut j = start + 1;
    while j < chars.len() {
        let c = chars[j];
        if c == '\\' && quote != '`' {
            j += 2;
            continue;
        }
        if c == quote {
            if chars.get(j + 1) == Some(&quote) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    chars.len()
}

fn summarize(statement: &str) -> String {
    let first_line = statement.lines().next().unwrap_or_default();
    if first_line.len() > 80 {
        let cut = first_line
            .char_indices()
            .nth(80)
            .map_or(first_line.len(), |(idx, _)| idx);
        format!("{}...", &first_line[..cut])
    } else {
        first_line.to_string()
    }
}
