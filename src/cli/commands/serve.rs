use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::web;

/// Handle `serve` (also the default without a subcommand).
/// `--bind` / `--port` override the configured values.
pub fn handle(cmd: Option<&Commands>, cfg: &Config) -> AppResult<()> {
    let mut cfg = cfg.clone();

    if let Some(Commands::Serve { bind, port }) = cmd {
        if let Some(b) = bind {
            cfg.bind_address = b.clone();
        }
        if let Some(p) = port {
            cfg.port = *p;
        }
    }

    info(format!(
        "Serving on http://{}:{} (Ctrl-C to stop)",
        cfg.bind_address, cfg.port
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(web::serve(&cfg))
}
