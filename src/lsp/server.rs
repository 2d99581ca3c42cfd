use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::Config;

/// Start the LSP server on stdio
pub async fn serve(config: Config) -> Result<()> {
    log::info!(
        "starting mermaid-ls with thresholds simple < {}, moderate < {}",
        config.thresholds.simple,
        config.thresholds.moderate
    );
    for source in &config.sources {
        log::info!("using configuration {}", source.display());
    }

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config.clone())).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
