use std::process::ExitCode;

use clap::{Parser, Subcommand};

use enlaight_console::commands;
use enlaight_console::config::{Config, TokenStoreKind};
use enlaight_console::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "enlaight-console", version, about = "enlaight admin console client")]
struct Cli {
    /// API base URL (overrides ENLAIGHT_API_URL / VITE_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Token storage: keyring, file or memory (overrides ENLAIGHT_TOKEN_STORE)
    #[arg(long, global = true)]
    token_store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ENLAIGHT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Invalidate the session and clear stored tokens
    Logout,
    /// Show the current user
    Whoami,
    /// Show stored session state without contacting the server
    Status,
    /// List agents
    Agents {
        #[arg(long)]
        search: Option<String>,
    },
    /// List projects
    Projects {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let state = match build_state(&cli) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Using API {}", state.config.api_base_url);

    let result = match &cli.command {
        Command::Login { email, password } => commands::login(&state, email, password).await,
        Command::Logout => commands::logout(&state).await,
        Command::Whoami => commands::whoami(&state).await,
        Command::Status => commands::status(&state),
        Command::Agents { search } => commands::agents(&state, search.as_deref()).await,
        Command::Projects {
            page,
            page_size,
            search,
        } => commands::projects(&state, *page, *page_size, search.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_state(cli: &Cli) -> Result<AppState, enlaight_console::error::ConfigError> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(kind) = &cli.token_store {
        config.token_store = kind.parse::<TokenStoreKind>()?;
    }
    AppState::new(config)
}
