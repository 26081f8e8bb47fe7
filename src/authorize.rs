use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use reqwest::Client;
use url::Url;

use crate::credentials::{
    CLIENT_ID_VAR, CLIENT_SECRET_VAR, Credentials, REFRESH_TOKEN_VAR, find_credentials,
    write_credentials_file,
};
use crate::spotify_rs::auth::{authorization_url, exchange_code_for_refresh_token};

/// `Some(answer)` for a recognised reply, `default` for an empty one.
fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Accept either the bare code or the whole URL Spotify redirected to.
fn extract_authorization_code(input: &str) -> String {
    let input = input.trim();
    Url::parse(input)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "code")
                .map(|(_, code)| code.into_owned())
        })
        .unwrap_or_else(|| input.to_string())
}

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush().wrap_err("Failed to write prompt")?;

    let mut answer = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut answer)
        .wrap_err("Failed to read from stdin")?;
    if read == 0 {
        bail!("stdin closed before an answer was given");
    }

    Ok(answer.trim().to_string())
}

fn prompt_non_empty(question: &str) -> Result<String> {
    loop {
        let answer = prompt(question)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
    }
}

fn yes_no_prompt(question: &str, default: bool) -> Result<bool> {
    let options = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        let answer = prompt(&format!("{} {} ", question, options))?;
        match parse_yes_no(&answer, default) {
            Some(answer) => return Ok(answer),
            None => println!("Please answer y or n"),
        }
    }
}

/// Walk the user through Spotify's authorization code flow and print the
/// resulting refresh token, optionally saving the credentials file.
pub async fn authorize(
    credentials_path: Option<&Path>,
    redirect_uri: &str,
    timeout: Duration,
) -> Result<()> {
    let existing = find_credentials(credentials_path).wrap_err("Failed to read credentials")?;
    if existing.is_some()
        && !yes_no_prompt(
            "Credentials already exist. Do you want to authorize again?",
            false,
        )?
    {
        return Ok(());
    }

    println!("Create an app at https://developer.spotify.com/dashboard");
    println!("and add {} as a redirect URI.", redirect_uri);
    let client_id = prompt_non_empty("Client ID: ")?;
    let client_secret = prompt_non_empty("Client secret: ")?;

    println!();
    println!("Open this URL in your browser and accept:");
    println!("{}", authorization_url(&client_id, redirect_uri));
    println!();

    let code = extract_authorization_code(&prompt_non_empty(
        "Paste the URL you were redirected to (or just the code): ",
    )?);

    log::debug!("Exchanging authorization code for refresh token");
    let refresh_token = exchange_code_for_refresh_token(
        &Client::new(),
        &client_id,
        &client_secret,
        &code,
        redirect_uri,
        timeout,
    )
    .await
    .wrap_err("Failed to get a refresh token from Spotify")?;

    println!();
    println!("Refresh token: {}", refresh_token);

    let credentials = Credentials {
        client_id,
        client_secret,
        refresh_token,
    };

    let Some(path) = credentials_path else {
        print_env_instructions();
        return Ok(());
    };

    if yes_no_prompt(
        &format!("Save credentials to {}?", path.display()),
        true,
    )? {
        write_credentials_file(path, &credentials).wrap_err("Failed to save credentials")?;
        println!("Saved credentials to {}", path.display());
    } else {
        print_env_instructions();
    }

    Ok(())
}

fn print_env_instructions() {
    println!(
        "Set {}, {} and {} to use these credentials.",
        CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR
    );
}
