use anyhow::{Context, Result};
use cinelist::app::App;
use cinelist::config::Config;
use cinelist::models::{self, Credentials, MovieId, GENRE_OPTIONS};
use cinelist::render;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cinelist", version, about = "Personal movie watchlist client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account (sign in afterwards with `login`)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "", value_parser = parse_genre)]
        genre: String,
        #[arg(long = "year", default_value = "", value_parser = parse_year)]
        release_year: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Change fields of an existing entry; omitted fields keep their value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_genre)]
        genre: Option<String>,
        #[arg(long = "year", value_parser = parse_year)]
        release_year: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
    },
    Delete {
        id: String,
    },
    /// Flip the watched flag
    Watched {
        id: String,
    },
    /// Flip the favorite flag
    Favorite {
        id: String,
    },
    /// Print the genres and years the form accepts
    Options,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_genre(value: &str) -> Result<String, String> {
    if models::is_known_genre(value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "unknown genre; choose one of: {}",
            GENRE_OPTIONS[1..].join(", ")
        ))
    }
}

fn parse_year(value: &str) -> Result<String, String> {
    let years = models::year_options();
    if years.iter().any(|y| y == value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "year must be between {} and {}",
            models::FIRST_YEAR,
            years.last().map(String::as_str).unwrap_or_default()
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => info!("No .env file loaded ({}) - relying on environment", e),
    }

    let cli = Cli::parse();
    let config = Config::from_env();
    let mut app = App::from_config(&config)?;

    match cli.command {
        Command::Login { username, password } => {
            if let Some(previous) = app.restore() {
                warn!("Replacing existing session for '{}'", previous);
            }
            let username = app.login(&Credentials { username, password }).await?;
            println!("Logged in as {}", username);
        }
        Command::Register { username, password } => {
            let message = app.register(&Credentials { username, password }).await?;
            println!("{}", message);
        }
        Command::Logout => {
            app.logout();
            println!("Logged out");
        }
        Command::Whoami => match app.restore() {
            Some(username) => println!("{}", username),
            None => println!("Not logged in"),
        },
        Command::List => {
            let watchlist = app.open().await?;
            println!("{}", render::render_list(watchlist.movies()));
        }
        Command::Add {
            title,
            genre,
            release_year,
            notes,
            rating,
        } => {
            let watchlist = app.open().await?;
            *watchlist.form_mut() = models::MovieForm {
                title,
                genre,
                release_year,
                notes,
                rating,
            };
            watchlist.submit().await?;
            println!("{}", render::render_list(watchlist.movies()));
        }
        Command::Edit {
            id,
            title,
            genre,
            release_year,
            notes,
            rating,
        } => {
            let watchlist = app.open().await?;
            let movie = watchlist
                .find(&MovieId::from(id.as_str()))
                .cloned()
                .with_context(|| format!("No movie with id {}", id))?;
            watchlist.begin_edit(&movie);
            let form = watchlist.form_mut();
            if let Some(v) = title {
                form.title = v;
            }
            if let Some(v) = genre {
                form.genre = v;
            }
            if let Some(v) = release_year {
                form.release_year = v;
            }
            if let Some(v) = notes {
                form.notes = v;
            }
            if let Some(v) = rating {
                form.rating = v;
            }
            watchlist.submit().await?;
            println!("{}", render::render_list(watchlist.movies()));
        }
        Command::Delete { id } => {
            let watchlist = app.open().await?;
            watchlist.remove(&MovieId::from(id.as_str())).await?;
            println!("{}", render::render_list(watchlist.movies()));
        }
        Command::Watched { id } => {
            let watchlist = app.open().await?;
            let movie = watchlist
                .find(&MovieId::from(id.as_str()))
                .cloned()
                .with_context(|| format!("No movie with id {}", id))?;
            watchlist.toggle_watched(&movie).await?;
            println!("{}", render::render_list(watchlist.movies()));
        }
        Command::Favorite { id } => {
            let watchlist = app.open().await?;
            let movie = watchlist
                .find(&MovieId::from(id.as_str()))
                .cloned()
                .with_context(|| format!("No movie with id {}", id))?;
            watchlist.toggle_favorite(&movie).await?;
            println!("{}", render::render_list(watchlist.movies()));
        }
        Command::Options => {
            println!("Genres: {}", GENRE_OPTIONS[1..].join(", "));
            let years = models::year_options();
            println!(
                "Years: {}-{}",
                models::FIRST_YEAR,
                years.last().map(String::as_str).unwrap_or_default()
            );
        }
    }

    Ok(())
}
