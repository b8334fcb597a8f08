use std::path::Path;

use super::load_config;

pub fn run(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let catalog = config.catalog()?;
    println!("Starting balance: {} points\n", config.session.initial_points);
    for item in catalog.items() {
        let adjustable = if item.adjustable { " (adjustable)" } else { "" };
        println!(
            "#{:<3} {:<18} {:>5}  {}{}",
            item.id.0, item.name, item.price, item.category, adjustable
        );
    }
    Ok(())
}
