//! Chat command handler.
//!
//! Ingests the configured document, then answers questions interactively
//! until the user exits. Per-question failures are reported and the
//! session continues; the store is flushed and closed on every exit path.

use clap::Args;
use ragbox_core::{config::AppConfig, AppResult};
use ragbox_retrieval::loader;
use std::io::{BufRead, Write};
use std::time::Instant;

/// Interactive session: ingest the document, then answer questions
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Skip document ingestion and reuse the existing collection
    #[arg(long)]
    pub no_ingest: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut service = super::build_service(config).await?;

        if !self.no_ingest {
            let chunks = match loader::load_chunks(&config.document.path, config.document.chunk_size)
            {
                Ok(chunks) => chunks,
                Err(e) => {
                    // Without a corpus the session is useless; clean up and
                    // surface the failure.
                    service.close().await;
                    return Err(e);
                }
            };

            println!(
                "Loaded {} chunks from {:?}",
                chunks.len(),
                config.document.path
            );

            if let Err(e) = super::ingest_chunks(&mut service, &chunks).await {
                service.close().await;
                return Err(e);
            }
            println!("Document indexed. Ask away (exit or quit to leave).");
        } else {
            println!("Using existing collection. Ask away (exit or quit to leave).");
        }

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        loop {
            print!("> ");
            if stdout.flush().is_err() {
                break;
            }

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Failed to read input: {}", e);
                    break;
                }
            }

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
                break;
            }

            let started = Instant::now();
            match service.ask(question).await {
                Ok(answer) => {
                    println!("{}", answer);
                    println!("({} ms)", started.elapsed().as_millis());
                }
                Err(e) => {
                    // One bad question should not end the session.
                    eprintln!("Could not answer: {}", e);
                }
            }
        }

        println!("Goodbye.");
        service.close().await;
        Ok(())
    }
}
