use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::client::{ConsoleError, GatewayClient};
use crate::features::objects::dtos::StorageLocator;

#[derive(Parser, Debug)]
#[command(name = "bucket-console", about = "Console for the bucket gateway")]
pub struct Cli {
    /// Base URL of the gateway
    #[arg(long, env = "GATEWAY_URL", default_value = "http://localhost:5001")]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Upload a local file to bucket/key
    Upload {
        bucket: String,
        /// Object key, e.g. backup_folder/my_image.png
        key: String,
        /// Local file to upload
        path: PathBuf,
        /// Content type to record (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// List the keys in a bucket
    List { bucket: String },
    /// Download bucket/key to a local file
    Download {
        bucket: String,
        key: String,
        /// Where to save the file (defaults to the last segment of the key)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Delete bucket/key
    Delete { bucket: String, key: String },
    /// Read commands from stdin until `quit`
    Interactive,
}

/// One line typed at the interactive prompt
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct PromptLine {
    #[command(subcommand)]
    command: Commands,
}

pub async fn run(cli: Cli) -> Result<(), ConsoleError> {
    let client = GatewayClient::new(&cli.base_url, Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Interactive => interactive(&client).await,
        command => {
            println!("{}", execute(&client, &command).await?);
            Ok(())
        }
    }
}

/// Run one command and return the text to show on success
pub async fn execute(client: &GatewayClient, command: &Commands) -> Result<String, ConsoleError> {
    match command {
        Commands::Upload {
            bucket,
            key,
            path,
            content_type,
        } => {
            let content = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content_type = content_type.clone().or_else(|| guess_content_type(path));

            client
                .upload(
                    &StorageLocator::new(bucket.as_str(), key.as_str()),
                    &file_name,
                    content,
                    content_type.as_deref(),
                )
                .await
        }
        Commands::List { bucket } => {
            let files = client.list(bucket).await?;
            Ok(render_listing(bucket, &files))
        }
        Commands::Download {
            bucket,
            key,
            output,
        } => {
            let file = client
                .download(&StorageLocator::new(bucket.as_str(), key.as_str()))
                .await?;
            let target = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&file.file_name));
            tokio::fs::write(&target, &file.content).await?;

            Ok(format!(
                "Saved '{}' to {} ({} bytes)",
                key,
                target.display(),
                file.content.len()
            ))
        }
        Commands::Delete { bucket, key } => {
            client
                .delete(&StorageLocator::new(bucket.as_str(), key.as_str()))
                .await
        }
        Commands::Interactive => Ok("Already in interactive mode".to_string()),
    }
}

fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

fn render_listing(bucket: &str, files: &[String]) -> String {
    if files.is_empty() {
        return format!("No files found in bucket '{}'.", bucket);
    }

    let mut out = format!("Files in '{}':", bucket);
    for file in files {
        out.push_str("\n  ");
        out.push_str(file);
    }
    out
}

/// Prompt loop; a failed command is reported and the loop continues
async fn interactive(client: &GatewayClient) -> Result<(), ConsoleError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!(
        "Connected to {}. Commands: upload, list, download, delete, help, quit",
        client.base_url()
    );

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            _ => {}
        }

        match PromptLine::try_parse_from(words.iter().copied()) {
            Ok(prompt) => match execute(client, &prompt.command).await {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("{}", e),
            },
            // clap renders help and usage errors itself
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::client::tests::spawn_gateway;
    use crate::modules::storage::MemoryObjectStore;
    use std::sync::Arc;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from([
            "bucket-console",
            "--base-url",
            "http://gateway:5001",
            "download",
            "mybucket",
            "a/b.png",
            "-o",
            "/tmp/b.png",
        ])
        .unwrap();
        assert_eq!(cli.base_url, "http://gateway:5001");
        assert_eq!(cli.timeout, 15);
        assert_eq!(
            cli.command,
            Commands::Download {
                bucket: "mybucket".to_string(),
                key: "a/b.png".to_string(),
                output: Some(PathBuf::from("/tmp/b.png")),
            }
        );
    }

    #[test]
    fn test_prompt_line_has_no_binary_name() {
        let prompt = PromptLine::try_parse_from(["list", "mybucket"]).unwrap();
        assert_eq!(
            prompt.command,
            Commands::List {
                bucket: "mybucket".to_string()
            }
        );
        assert!(PromptLine::try_parse_from(["rename", "a", "b"]).is_err());
    }

    #[test]
    fn test_render_listing() {
        assert_eq!(
            render_listing("mybucket", &[]),
            "No files found in bucket 'mybucket'."
        );
        assert_eq!(
            render_listing("mybucket", &["a/b.png".to_string(), "c.txt".to_string()]),
            "Files in 'mybucket':\n  a/b.png\n  c.txt"
        );
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(
            guess_content_type(Path::new("photos/b.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(guess_content_type(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_upload_and_download_files() {
        let store = Arc::new(MemoryObjectStore::new());
        store.create_bucket("mybucket").await;
        let client =
            GatewayClient::new(&spawn_gateway(store.clone()).await, Duration::from_secs(5)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("b.png");
        tokio::fs::write(&source, b"\x89PNG data").await.unwrap();

        let output = execute(
            &client,
            &Commands::Upload {
                bucket: "mybucket".to_string(),
                key: "a/b.png".to_string(),
                path: source,
                content_type: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(output, "File b.png uploaded successfully to mybucket/a/b.png");
        assert_eq!(
            store.content_type("mybucket", "a/b.png").await.as_deref(),
            Some("image/png")
        );

        let target = dir.path().join("copy.png");
        let output = execute(
            &client,
            &Commands::Download {
                bucket: "mybucket".to_string(),
                key: "a/b.png".to_string(),
                output: Some(target.clone()),
            },
        )
        .await
        .unwrap();
        assert!(output.starts_with("Saved 'a/b.png' to "));
        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"\x89PNG data");
    }

    #[tokio::test]
    async fn test_delete_error_is_rendered_with_status() {
        let base_url = spawn_gateway(Arc::new(MemoryObjectStore::new())).await;
        let client = GatewayClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let err = execute(
            &client,
            &Commands::Delete {
                bucket: "nobucket".to_string(),
                key: "a.txt".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Request failed (status 500): S3 Client Error: NoSuchBucket"));
    }
}
