//! 用户管理 CLI 命令

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::storage::SeaOrmStorage;
use crate::utils::password::hash_password;

pub const MIN_PASSWORD_LEN: usize = 8;

/// 从不同来源获取密码
fn read_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }
    match password {
        Some(password) => Ok(password),
        None => prompt_password_with_confirm(),
    }
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::ParseError(
            "No password provided. Use --password or --stdin, or run interactively".to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Password: ")?;
    let confirm = read("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::ParseError("Passwords do not match".to_string()));
    }
    Ok(password)
}

fn check_new_user(username: &str, password: &str) -> Result<(), CliError> {
    if username.trim().is_empty() || username.contains(':') {
        return Err(CliError::ParseError(
            "Username must be non-empty and must not contain ':'".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CliError::ParseError(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Hashes the password with Argon2id and stores a new user row.
pub async fn add_user(
    storage: Arc<SeaOrmStorage>,
    username: String,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    let password = read_password(password, stdin)?;
    check_new_user(&username, &password)?;

    let hashed = hash_password(&password)
        .map_err(|e| CliError::CommandError(format!("Failed to hash password: {}", e)))?;

    let id = storage
        .create_user(&username, &hashed)
        .await
        .map_err(|e| crate::errors::map_repo_err("create user", e))?;

    println!(
        "{} User {} created ({})",
        "✓".green().bold(),
        username.cyan(),
        id.to_string().dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_new_user() {
        assert!(check_new_user("alice", "long-enough").is_ok());
        assert!(check_new_user("", "long-enough").is_err());
        assert!(check_new_user("a:b", "long-enough").is_err());
        assert!(check_new_user("alice", "short").is_err());
    }

    #[test]
    fn test_password_flag_is_used_verbatim() {
        assert_eq!(
            read_password(Some("pw with spaces ".to_string()), false).unwrap(),
            "pw with spaces "
        );
    }
}
