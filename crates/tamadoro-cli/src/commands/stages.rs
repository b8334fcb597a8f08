use std::path::Path;

use tamadoro_core::progression;

use super::load_config;

pub fn run(experience: Option<u64>, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let table = config.stage_table()?;
    let current = experience.map(|xp| progression(&table, xp));

    for (index, stage) in table.stages().iter().enumerate() {
        let marker = match &current {
            Some(p) if p.stage_index == index => "*",
            _ => " ",
        };
        println!("{marker} {:<12} {:>6} XP", stage.name, stage.min_experience);
    }

    if let Some(p) = current {
        match (&p.next, p.experience_to_next()) {
            (Some(next), Some(remaining)) => println!(
                "\n{} XP: {} ({:.0}% to {}, {} XP to go)",
                p.experience,
                p.current.name,
                p.percent(),
                next.name,
                remaining
            ),
            _ => println!("\n{} XP: {} (max stage)", p.experience, p.current.name),
        }
    }
    Ok(())
}
