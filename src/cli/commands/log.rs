use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// `log --print` dumps the audit table of the configured database.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print } = cmd else {
        return Ok(());
    };

    if !*print {
        info("Nothing to do: use `log --print` to show the internal log.");
        return Ok(());
    }

    let pool = DbPool::new(&cfg.database)?;
    LogLogic::print_log(&pool)
}
