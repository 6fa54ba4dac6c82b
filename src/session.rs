//! Interactive flag selection for one package

use anyhow::Result;
use config::FlagStore;
use console::style;
use dialoguer::{Confirm, Input};
use package::selection::HELP;
use package::{parse_command, Command, PackageRecord};
use tracing::info;

/// Show the package's flags and existing entries, then prompt until the
/// user confirms an entry or skips the package.
pub fn select_use_flags(store: &mut FlagStore, record: &PackageRecord) -> Result<()> {
    if record.active_flags().is_empty() {
        info!("{} has no USE flags, skipping", record.name_ver());
        return Ok(());
    }

    println!();
    println!("Select USE flags for {}", style(record.name_ver()).cyan().bold());
    println!("USE=\"{}\"", record.active_flags().join(" "));
    println!();

    for key in [record.name(), record.name_ver()] {
        println!("Current package.use entry for {}", key);
        match store.format_entry(key).as_str() {
            "" => println!("{}", style("<none>").dim()),
            entry => println!("{}", entry),
        }
    }
    println!();

    loop {
        let input: String = Input::new()
            .with_prompt("Enter USE flags (+h for help)")
            .allow_empty(true)
            .interact_text()?;

        let selection = match parse_command(&input, record) {
            Ok(Command::Skip) => return Ok(()),
            Ok(Command::Help) => {
                println!("{}", HELP);
                continue;
            }
            Ok(Command::Apply(selection)) => selection,
            Err(e) => {
                println!("{} {}", style("ERROR:").red().bold(), e);
                println!("{}", HELP);
                continue;
            }
        };

        let previous = selection.apply(store, record);
        let key = selection.key(record);

        println!();
        println!("Entry to write:");
        match store.format_entry(key).as_str() {
            "" => println!("{}", style(format!("<remove entry for {}>", key)).dim()),
            entry => println!("{}", entry),
        }
        println!();

        if Confirm::new()
            .with_prompt("Is this correct?")
            .default(false)
            .interact()?
        {
            return Ok(());
        }

        store.set(key, &previous);
    }
}
