use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "notes-cli")]
#[command(about = "Command-line client for the notes service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all notes
    List,
    /// Show one note
    Get { id: i64 },
    /// Create a note
    Create { title: String, content: String },
    /// Replace the title and content of a note
    Update {
        id: i64,
        title: String,
        content: String,
    },
    /// Delete a note
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let notes_url = format!("{}/api/notes", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List => client.get(&notes_url).send().await?,
        Commands::Get { id } => client.get(format!("{}/{}", notes_url, id)).send().await?,
        Commands::Create { title, content } => {
            client
                .post(&notes_url)
                .json(&json!({ "title": title, "content": content }))
                .send()
                .await?
        }
        Commands::Update { id, title, content } => {
            client
                .put(format!("{}/{}", notes_url, id))
                .json(&json!({ "title": title, "content": content }))
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{}/{}", notes_url, id)).send().await?,
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: notes API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("OK");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
