use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use postboard::{
    Credentials, ImageChange, ImageFile, LikePayload, NewPost, PostId, PostUpdate, SessionPostStore, StoreConfig,
    StoreError, storage,
};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read image {path}: {source}")]
    ReadImage { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "postboard", about = "Session and post store client for the posts API")]
struct Cli {
    /// Overrides `POSTBOARD_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `POSTBOARD_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup(CredentialArgs),
    Login(CredentialArgs),
    Logout,
    /// Refresh the persisted session token.
    Relog,
    Posts(PostsCommand),
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "POSTBOARD_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct PostsCommand {
    #[command(subcommand)]
    command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostsSubcommand {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        text: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Update {
        id: String,
        #[arg(long)]
        text: String,
        #[arg(long, conflicts_with = "remove_image")]
        image: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        remove_image: bool,
        /// The post currently has no image.
        #[arg(long, default_value_t = false, conflicts_with = "remove_image")]
        no_existing_image: bool,
    },
    Delete {
        id: String,
    },
    Like {
        id: String,
        #[arg(long, default_value_t = false)]
        unlike: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = StoreConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url.trim_end_matches('/').to_owned();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let store = SessionPostStore::from_config(&config)?;
    match cli.command {
        Command::Signup(args) => {
            let response = store.create_account(&args.into()).await?;
            print_json(&response.body)?;
        }
        Command::Login(args) => {
            let response = store.login(&args.into()).await?;
            print_json(&response.body)?;
        }
        Command::Logout => {
            store.logout().await;
            println!("logged out");
        }
        Command::Relog => run_relog(&store, &config).await?,
        Command::Posts(posts) => run_posts(&store, posts).await?,
    }

    tracing::debug!(status = %store.status().await, "done");
    Ok(())
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Self { email: args.email, password: args.password }
    }
}

async fn run_relog(store: &SessionPostStore, config: &StoreConfig) -> Result<(), CliError> {
    let file = postboard::FileStorage::new(&config.session_file);
    let stored = storage::load_stored_session(&file)?;
    if stored.token.is_empty() {
        return Err(StoreError::NotAuthenticated.into());
    }
    let response = store.relog(&stored).await?;
    print_json(&response.body)
}

async fn run_posts(store: &SessionPostStore, posts: PostsCommand) -> Result<(), CliError> {
    let response = match posts.command {
        PostsSubcommand::List => store.list_posts().await?,
        PostsSubcommand::Get { id } => store.fetch_post(&PostId::from(id.as_str())).await?,
        PostsSubcommand::Create { text, image } => {
            let image = match image {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            store.create_post(NewPost { text, image }).await?
        }
        PostsSubcommand::Update { id, text, image, remove_image, no_existing_image } => {
            let id = PostId::from(id.as_str());
            let image = match image {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            if no_existing_image {
                store.update_post_without_image(&id, &text, image).await?
            } else {
                let image = match (image, remove_image) {
                    (Some(file), _) => ImageChange::Replace(file),
                    (None, true) => ImageChange::Remove,
                    (None, false) => ImageChange::Keep,
                };
                store.update_post_with_image(PostUpdate { id, text, image }).await?
            }
        }
        PostsSubcommand::Delete { id } => store.delete_post(&PostId::from(id.as_str())).await?,
        PostsSubcommand::Like { id, unlike } => {
            store.like_post(&LikePayload { id: PostId::from(id.as_str()), like: !unlike }).await?
        }
    };
    print_json(&response.body)
}

async fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadImage { path: path.to_owned(), source })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_owned();
    Ok(ImageFile { content_type: image_content_type(path).map(ToOwned::to_owned), file_name, bytes })
}

fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
