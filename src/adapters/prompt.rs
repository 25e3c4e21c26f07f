use crate::domain::model::Credentials;
use crate::domain::ports::CredentialPrompt;
use crate::utils::error::Result;
use std::io::{BufRead, ErrorKind, Write};

pub const PASSWORD_ENV: &str = "SCAN_ORDER_PASSWORD";

/// Terminal prompt. The password comes from `SCAN_ORDER_PASSWORD` when set, otherwise
/// from the controlling terminal with echo disabled.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt {
    username: Option<String>,
}

impl TerminalPrompt {
    pub fn new(username: Option<String>) -> Self {
        Self { username }
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn request_credentials(&self) -> Result<Option<Credentials>> {
        let stdin = std::io::stdin();
        let mut stderr = std::io::stderr();
        read_credentials(stdin.lock(), &mut stderr, self.username.as_deref(), || {
            match std::env::var(PASSWORD_ENV) {
                Ok(password) => Ok(password),
                Err(_) => rpassword::prompt_password("Password: "),
            }
        })
    }
}

fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}: ", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("input closed while waiting for {}", label.to_lowercase()),
        )
        .into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Collect a username/password pair.
///
/// A blank username or password entered by the operator is a cancel (`Ok(None)`).
/// Input that is already closed, or fails, is an error.
pub fn read_credentials<R, W, F>(
    mut input: R,
    output: &mut W,
    username: Option<&str>,
    read_password: F,
) -> Result<Option<Credentials>>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> std::io::Result<String>,
{
    writeln!(output, "🔐 ERP authentication required")?;

    let username = match username {
        Some(name) => name.to_string(),
        None => read_line(&mut input, output, "Username")?,
    };
    let username = username.trim().to_string();
    if username.is_empty() {
        return Ok(None);
    }

    let password = read_password()?;
    let password = password.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Ok(None);
    }

    Ok(Some(Credentials { username, password }))
}
