//! Ask command handler.
//!
//! Answers a single question against the already-indexed corpus.

use clap::Args;
use ragbox_core::{config::AppConfig, AppError, AppResult};
use std::time::Instant;

/// Ask a single question against the indexed corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Number of chunks to retrieve as context
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let question = self
            .question
            .as_deref()
            .ok_or_else(|| AppError::InvalidInput("No question provided".to_string()))?;

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }

        let service = super::build_service(&config).await?;

        let started = Instant::now();
        let result = service.ask(question).await;
        let elapsed = started.elapsed();

        let outcome = match result {
            Ok(answer) => {
                println!("{}", answer);
                println!("({} ms)", elapsed.as_millis());
                Ok(())
            }
            Err(e) => Err(e),
        };

        service.close().await;
        outcome
    }
}
