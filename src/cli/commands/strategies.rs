//! List strategies command.

use anyhow::Result;
use supertrend_strategies::StrategyRegistry;

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {} ({})", info.name, info.key);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!();
        println!("  Defaults:");
        for line in serde_json::to_string_pretty(&info.default_config)?.lines() {
            println!("    {}", line);
        }
        println!();
    }

    println!("Use --strategy <name> to select a strategy and --strategy-config <file.json>");
    println!("to override any of its defaults.");

    Ok(())
}
