//! `foldbench config` – show the config location and effective defaults.

use anyhow::Result;
use foldbench_core::config::{self, FoldbenchConfig};

pub fn run_show_config(cfg: &FoldbenchConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("config file:    {}", path.display());

    let tools = cfg.tools.clone().unwrap_or_default();
    println!("rnasubopt:      {}", tools.rnasubopt);
    println!("trivial safety: {}", tools.trivial_safety);
    println!("safe complete:  {}", tools.safe_complete);
    println!("delta energy:   {}", cfg.delta_energy);
    println!("workers:        {}", cfg.workers);
    println!("timeout hours:  {}", cfg.timeout_hours);
    Ok(())
}
