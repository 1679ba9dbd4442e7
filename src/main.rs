//! Home library - command line interface and REST API server

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use home_library::{
    config::{AppConfig, LoggingConfig},
    create_router,
    models::{Book, BookKind, Member},
    repository::Stores,
    services::{metadata::OpenLibraryClient, Services},
    AppState,
};

#[derive(Parser)]
#[command(
    name = "home-library",
    version,
    about = "Personal library catalog: books, members and loans",
    after_help = r#"EXAMPLES
  $ home-library books add "1984" "George Orwell" 978-0451524935
  $ home-library books import 9780743273565
  $ home-library members add "Ada Lovelace" M001 ada@example.com
  $ home-library borrow M001 978-0451524935
  $ home-library serve --port 8000"#,
    arg_required_else_help = true
)]
struct Cli {
    /// Books file (overrides configuration)
    #[arg(long, global = true)]
    books_file: Option<PathBuf>,
    /// Members file (overrides configuration)
    #[arg(long, global = true)]
    members_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the book catalog
    Books {
        #[command(subcommand)]
        command: BooksCommand,
    },
    /// Manage library members
    Members {
        #[command(subcommand)]
        command: MembersCommand,
    },
    /// Borrow a book for a member
    Borrow { member_id: String, isbn: String },
    /// Return a borrowed book
    Return { member_id: String, isbn: String },
    /// Start the REST API server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum BooksCommand {
    /// List all books
    List,
    /// Show one book
    Show { isbn: String },
    /// Add a book by hand (printed unless --ebook or --audio is given)
    Add {
        title: String,
        author: String,
        isbn: String,
        /// Add as an e-book with this file format (e.g. PDF, EPUB)
        #[arg(long, value_name = "FORMAT", conflicts_with = "audio")]
        ebook: Option<String>,
        /// Add as an audiobook with this duration in minutes
        #[arg(long, value_name = "MINUTES")]
        audio: Option<u32>,
    },
    /// Add a book by ISBN using Open Library
    Import { isbn: String },
    /// Remove a book
    Remove { isbn: String },
}

#[derive(Subcommand)]
enum MembersCommand {
    /// List all members
    List,
    /// Show one member and the books they hold
    Show { member_id: String },
    /// Register a member
    Add {
        name: String,
        member_id: String,
        email: String,
    },
    /// Remove a member
    Remove { member_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(path) = cli.books_file {
        config.storage.books_file = path;
    }
    if let Some(path) = cli.members_file {
        config.storage.members_file = path;
    }

    let serving = matches!(cli.command, Command::Serve { .. });
    init_tracing(&config.logging, serving);

    let stores = Stores::open(&config.storage.books_file, &config.storage.members_file);
    let metadata = OpenLibraryClient::new(&config.metadata)?;
    let services = Services::new(stores, Arc::new(metadata));

    match cli.command {
        Command::Books { command } => run_books(&services, command).await?,
        Command::Members { command } => run_members(&services, command).await?,
        Command::Borrow { member_id, isbn } => {
            services.loans.borrow(&member_id, &isbn).await?;
            println!("Book borrowed successfully.");
        }
        Command::Return { member_id, isbn } => {
            services.loans.return_book(&member_id, &isbn).await?;
            println!("Book returned successfully.");
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(AppState::new(config, services)).await?;
        }
    }

    Ok(())
}

async fn run_books(services: &Services, command: BooksCommand) -> anyhow::Result<()> {
    match command {
        BooksCommand::List => {
            let books = services.catalog.list_books().await;
            if books.is_empty() {
                println!("No books in the library.");
            }
            for book in books {
                println!("{}", book);
            }
        }
        BooksCommand::Show { isbn } => {
            let book = services.catalog.get_book(&isbn).await?;
            let status = if book.is_borrowed() { "borrowed" } else { "available" };
            println!("{} - {}", book, status);
        }
        BooksCommand::Add {
            title,
            author,
            isbn,
            ebook,
            audio,
        } => {
            let kind = match (ebook, audio) {
                (Some(file_format), _) => BookKind::Electronic { file_format },
                (None, Some(duration)) => BookKind::Audio { duration },
                (None, None) => BookKind::Plain,
            };
            let book = services
                .catalog
                .add_book(Book::new(title.trim(), author.trim(), isbn.trim(), kind))
                .await?;
            println!("Added: {}", book);
        }
        BooksCommand::Import { isbn } => {
            println!("Fetching book information from Open Library...");
            let book = services.catalog.add_book_from_isbn(&isbn).await?;
            println!("Added: {}", book);
        }
        BooksCommand::Remove { isbn } => {
            let book = services.catalog.delete_book(&isbn).await?;
            println!("Removed: {}", book);
        }
    }
    Ok(())
}

async fn run_members(services: &Services, command: MembersCommand) -> anyhow::Result<()> {
    match command {
        MembersCommand::List => {
            let members = services.members.list_members().await;
            if members.is_empty() {
                println!("No members in the system.");
            }
            for member in members {
                println!("{}", member);
            }
        }
        MembersCommand::Show { member_id } => {
            let member = services.members.get_member(&member_id).await?;
            println!("{}", member);
            for book in services.loans.member_loans(&member_id).await? {
                println!("  {}", book);
            }
        }
        MembersCommand::Add {
            name,
            member_id,
            email,
        } => {
            let member = services
                .members
                .add_member(Member::new(name.trim(), member_id.trim(), email.trim()))
                .await?;
            println!("Member added: {}", member);
        }
        MembersCommand::Remove { member_id } => {
            let member = services.members.delete_member(&member_id).await?;
            println!("Member removed: {}", member);
        }
    }
    Ok(())
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::new(
        state
            .config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        state.config.server.port,
    );

    tracing::info!("Starting home-library v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Books file: {}, members file: {}",
        state.config.storage.books_file.display(),
        state.config.storage.members_file.display()
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log to stderr; CLI commands only show warnings unless RUST_LOG says otherwise
fn init_tracing(logging: &LoggingConfig, serving: bool) {
    let level = if serving { logging.level.as_str() } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("home_library={},tower_http={}", level, level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
