use anyhow::Result;
use clap::Parser;
use orgvault::store::fs::FileVault;
use orgvault::{default_vault_root, OrgApi, VaultConfig};

mod commands;
mod print;
mod setup;

pub fn run() -> Result<()> {
    // RUST_LOG controls verbosity; default keeps the terminal quiet.
    let _ = flexi_logger::Logger::try_with_env_or_str("warn")
        .map(|logger| logger.log_to_stderr().start());

    let cli = setup::Cli::parse();
    let vault_root = cli.vault.clone().unwrap_or_else(default_vault_root);
    log::debug!("vault root: {}", vault_root.display());
    let config = VaultConfig::load(&vault_root)?;
    let store = FileVault::new(&vault_root).with_file_ext(&config.file_ext());
    let api = OrgApi::new(store, config);

    commands::dispatch(api, cli)
}
