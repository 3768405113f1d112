//! Giveaway bot entry point: CLI parsing, env-file loading, authentication
//! (bot token or username/password), JSON config validation and the event
//! loop.

use std::{env, process, sync::Arc};

use giveaway_bot::{
    commands::CommandSurface, handler::GiveawayHandler, revolt_gateway::RevoltGateway, BotConfig,
    ChatGateway, GiveawayEngine,
};
use revolt_api::{types::ResponseLogin, AuthApi, Credentials, RevoltClient, UsersApi};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "https://api.revolt.chat";

#[derive(Debug, Default)]
struct CliArgs {
    env_file: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    proxy: Option<String>,
    verbose: bool,
    config_file: Option<String>,
}

#[derive(Debug)]
enum Auth {
    Token(String),
    Login { username: String, password: String },
}

/// Parse everything except `--help` and `--version`.
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |what: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{arg} requires {what}."))
        };
        match arg.as_str() {
            "--proxy" | "-x" => cli.proxy = Some(value("a proxy URL")?),
            "--env-file" | "-e" => cli.env_file = Some(value("a file name")?),
            "--username" | "-u" => cli.username = Some(value("a username")?),
            "--password" | "-p" => cli.password = Some(value("a password")?),
            "--token" | "-t" => cli.token = Some(value("a token string")?),
            "--verbose" | "-v" => cli.verbose = true,
            val if val.starts_with('-') => return Err(format!("Unknown option '{val}'.")),
            val => {
                if let Some(first) = &cli.config_file {
                    eprintln!(
                        "[WARNING] Multiple config files specified. Using '{first}' and ignoring '{val}'."
                    );
                } else {
                    cli.config_file = Some(val.to_string());
                }
            }
        }
    }
    Ok(cli)
}

/// Pick the credentials to use; CLI flags win over the environment.
fn resolve_auth(
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
) -> Result<Auth, String> {
    match (username, password, token) {
        (None, None, None) => Err(
            "No credentials found. Provide --username/--password or --token or set them via .env"
                .to_string(),
        ),
        (Some(_), None, _) => Err("--username requires --password.".to_string()),
        (None, Some(_), _) => Err("--password requires --username.".to_string()),
        (Some(_), Some(_), Some(_)) => Err(
            "Conflicting credentials: can't use both (username/password) and token at the same time."
                .to_string(),
        ),
        (Some(username), Some(password), None) => Ok(Auth::Login { username, password }),
        (None, None, Some(token)) => Ok(Auth::Token(token)),
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("[ERROR] {msg}");
    process::exit(1);
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "giveaway_bot=debug,revolt_api=debug"
    } else {
        "giveaway_bot=info,revolt_api=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let args = env::args().skip(1).collect::<Vec<String>>();

    if args.iter().any(|a| a == "--help") {
        print_help();
        process::exit(0);
    }
    if args.iter().any(|a| a == "--version") {
        println!("giveaway_bot {}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    let mut cli = parse_args(&args).unwrap_or_else(|e| fail(e));
    init_tracing(cli.verbose);

    if let Some(env_path) = &cli.env_file {
        debug!(path = %env_path, "loading environment file");
        if let Err(e) = dotenvy::from_filename(env_path) {
            fail(format!("Failed to load .env file '{env_path}': {e}"));
        }
    }

    if cli.username.is_none() && cli.password.is_none() && cli.token.is_none() {
        let env_user = env::var("REVOLT_USERNAME").ok();
        let env_pass = env::var("REVOLT_PASSWORD").ok();
        if let (Some(u), Some(p)) = (env_user, env_pass) {
            cli.username = Some(u);
            cli.password = Some(p);
        } else {
            cli.token = env::var("REVOLT_TOKEN").ok();
        }
    }
    let auth = resolve_auth(cli.username, cli.password, cli.token).unwrap_or_else(|e| fail(e));

    let config_file = cli
        .config_file
        .unwrap_or_else(|| fail("No config file provided. Provide a JSON config file as an argument."));
    let config = BotConfig::from_file(&config_file).unwrap_or_else(|e| fail(e));
    let settings = config.settings().unwrap_or_else(|e| fail(e));
    debug!(path = %config_file, "config validated");

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let client = RevoltClient::new(base_url, config.ws_url.clone(), cli.proxy)
        .unwrap_or_else(|e| fail(format!("Failed to build Revolt client: {e}")));

    match auth {
        Auth::Token(token) => {
            debug!("authenticating with bot token");
            client.set_credentials(Some(Credentials::Bot(token))).await;
        }
        Auth::Login { username, password } => {
            debug!("authenticating with username/password");
            match client.login(&username, &password, None).await {
                Ok(ResponseLogin::Success { .. }) => {}
                Ok(ResponseLogin::MfaChallenge { .. }) => {
                    fail("Login requires multi-factor authentication; use a token instead.")
                }
                Ok(ResponseLogin::Disabled { .. }) => fail("This account is disabled."),
                Err(e) => fail(format!("Login failed with username/password: {e}")),
            }
        }
    }

    let me = client
        .fetch_self()
        .await
        .unwrap_or_else(|e| fail(format!("Failed to fetch own user: {e}")));
    info!(user = %me.username, id = %me.id, "authenticated");

    let gateway: Arc<dyn ChatGateway> = Arc::new(RevoltGateway::new(client.clone(), &config.server));
    let engine = Arc::new(GiveawayEngine::new(gateway.clone(), settings, &me.id));
    let commands = Arc::new(CommandSurface::new(engine.clone(), gateway));
    client
        .event_handler(GiveawayHandler::new(engine, commands, &me.id))
        .await;

    if let Err(e) = client.start().await {
        fail(format!("Failed to start Revolt client event loop: {e}"));
    }

    info!("bot is running; press Ctrl+C to stop");
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("shutting down");
            if let Err(e) = client.close_ws(Some("Shutting down")).await {
                error!(error = %e, "error during shutdown");
            }
        }
        Err(e) => error!(error = %e, "error waiting for Ctrl+C"),
    }
}

fn print_help() {
    println!(
        r#"Usage: giveaway_bot [OPTION]... [CONFIG_FILE]
Run the giveaway bot with the specified JSON configuration file.

A valid CONFIG_FILE (in JSON format) is required.

Options:
  -e, --env-file [FILE]        Load environment variables from a .env file.
  -u, --username [USERNAME]    Specify Revolt username (requires --password).
  -p, --password [PASSWORD]    Specify Revolt password (requires --username).
  -t, --token [TOKEN]          Specify Revolt bot token (cannot be used with -u/-p).
  -x, --proxy [PROXY]          Specify HTTP/WS proxy URL (must start with http:// or https://).
  -v, --verbose                Log at debug level (RUST_LOG overrides).
      --help                   Display this help and exit.
      --version                Output version information and exit.

Environment:
  REVOLT_TOKEN, REVOLT_USERNAME, REVOLT_PASSWORD

Examples:
  giveaway_bot -e .env config.json
  giveaway_bot -t MyBotToken config.json
  giveaway_bot -x http://proxy:8080 config.json
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_config() {
        let cli = parse_args(&args(&["-v", "-t", "tok", "-x", "proxy:8080", "config.json"])).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.token.as_deref(), Some("tok"));
        assert_eq!(cli.proxy.as_deref(), Some("proxy:8080"));
        assert_eq!(cli.config_file.as_deref(), Some("config.json"));
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        let err = parse_args(&args(&["config.json", "--token"])).unwrap_err();
        assert_eq!(err, "--token requires a token string.");
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn credentials_must_be_complete_and_unambiguous() {
        let s = |v: &str| Some(v.to_string());
        assert!(matches!(resolve_auth(None, None, s("t")), Ok(Auth::Token(_))));
        assert!(matches!(resolve_auth(s("u"), s("p"), None), Ok(Auth::Login { .. })));
        assert!(resolve_auth(None, None, None).is_err());
        assert!(resolve_auth(s("u"), None, None).is_err());
        assert!(resolve_auth(None, s("p"), s("t")).is_err());
        assert!(resolve_auth(s("u"), s("p"), s("t")).is_err());
    }
}
