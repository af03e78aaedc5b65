use std::sync::Arc;

use tax_provider::assistant::OpenAiAssistantClient;
use tax_provider::cli::Console;
use tax_provider::conversation::ConversationManager;
use tax_provider::core::Credential;
use tax_provider::logging;
use tax_provider::session::{SessionId, StagedKnowledgeFile};

const DEFAULT_EXPORT_PATH: &str = "conversation.txt";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logging()?;

    tracing::info!("=== Tax Provider Starting ===");

    let console = Console::new();
    console.print_banner();

    // The credential is supplied once per session and kept only in memory
    let credential: Credential = match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key.into(),
        _ => console.read_secret("Enter your OpenAI API key")?.into(),
    };

    let client = Arc::new(OpenAiAssistantClient::from_env()?);
    let manager = ConversationManager::new(client);
    let session_id = SessionId::generate();

    tracing::info!("Session started: {}", session_id);

    // Keeps the staged upload alive for the session's lifetime
    let mut staged: Option<StagedKnowledgeFile> = None;

    loop {
        let input = console.read_input()?;

        match input.as_str() {
            "" => continue,
            "exit" | "quit" => break,
            command if command.starts_with("/upload") => {
                let path = command.trim_start_matches("/upload").trim();
                if path.is_empty() {
                    console.print_error("Usage: /upload <path-to-text-file>");
                    continue;
                }

                if manager.is_provisioned(&session_id).await {
                    console.print_system(
                        "An agent is already bound to the first uploaded file; new uploads are ignored.",
                    );
                    continue;
                }

                let upload = match StagedKnowledgeFile::from_path(path) {
                    Ok(upload) => upload,
                    Err(e) => {
                        console.print_error(&format!("{:#}", e));
                        continue;
                    }
                };

                console.print_system(&format!("Uploading '{}'...", upload.original_name()));
                match manager
                    .provision(&session_id, &credential, upload.path())
                    .await
                {
                    Ok(_) => {
                        console.print_system(&format!(
                            "Uploaded file: {}. The agent is ready.",
                            upload.original_name()
                        ));
                        staged = Some(upload);
                    }
                    Err(e) => console.print_error(&e.to_string()),
                }
            }
            command if command.starts_with("/download") => {
                let path = command.trim_start_matches("/download").trim();
                let path = if path.is_empty() {
                    DEFAULT_EXPORT_PATH
                } else {
                    path
                };

                let transcript = manager.export_transcript(&session_id).await;
                match std::fs::write(path, transcript) {
                    Ok(()) => console.print_system(&format!("Conversation downloaded to {}", path)),
                    Err(e) => console.print_error(&format!("Failed to write {}: {}", path, e)),
                }
            }
            query => {
                match manager.submit(&session_id, query).await {
                    Ok(reply) => {
                        console.print_agent(&reply);
                        console.print_separator();
                    }
                    // Recoverable: the session stays usable for a retry
                    Err(e) => console.print_error(&e.to_string()),
                }
            }
        }
    }

    drop(staged);
    tracing::info!("=== Tax Provider Shutting Down ===");

    Ok(())
}
