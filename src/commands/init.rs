use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{BridgeError, Result};

pub async fn run(path: Option<PathBuf>) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => Config::config_path()?,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if config_path.exists() {
        let answer = prompt(
            &mut input,
            &format!(
                "Config file already exists at {}. Overwrite? [y/N] ",
                config_path.display()
            ),
        )?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Issue Bridge Configuration");
    println!("==========================\n");

    let config = read_config(&mut input)?;

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BridgeError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, toml::to_string(&config)?).map_err(|e| {
        BridgeError::ConfigRead {
            path: config_path.clone(),
            source: e,
        }
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now run 'issue-bridge serve'!");

    Ok(())
}

fn read_config(input: &mut impl BufRead) -> Result<Config> {
    let token = prompt(
        input,
        "Enter an access token with repo scope (https://github.com/settings/tokens): ",
    )?;
    if token.is_empty() {
        return Err(BridgeError::MissingToken);
    }

    let owner = prompt(input, "Enter the repository owner (user or organization): ")?;
    let repo = prompt(input, "Enter the repository name: ")?;
    if owner.is_empty() || repo.is_empty() {
        return Err(BridgeError::MissingRepository);
    }

    let port = prompt(input, "Enter the port to listen on [optional, default 3000]: ")?;
    let port = if port.is_empty() {
        None
    } else {
        Some(port.parse().map_err(|_| BridgeError::InvalidSetting {
            field: "port",
            value: port.clone(),
        })?)
    };

    Ok(Config {
        token: Some(token),
        owner: Some(owner),
        repo: Some(repo),
        port,
        ..Config::default()
    })
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
