use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::Result;

pub fn execute(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let config_path = Config::create_sample()?;
            println!("Created sample config file at: {}", config_path.display());
            println!("\nPlease edit the file and point it at your records snapshot:");
            println!("  [records]");
            println!("  path = \"/path/to/users.json\"");
        }
        ConfigCommand::Path => {
            let config_path = Config::config_file_path()?;
            println!("Config file path: {}", config_path.display());

            if config_path.exists() {
                println!("Status: File exists");

                // Try to load and show if it's valid
                match Config::load() {
                    Ok(config) => {
                        println!("Valid: Yes");
                        println!("\nSettings:");
                        match config.records_path(None) {
                            Ok(path) => println!("  Records: {}", path),
                            Err(_) => println!("  Records: (not set)"),
                        }
                        println!("  Calendar: {:?}", config.calendar.zone);
                        println!("  Label style: {:?}", config.display.label_style);
                        println!(
                            "  'all' includes unparseable dates: {}",
                            config.classifier.all_includes_unclassifiable
                        );
                    }
                    Err(e) => {
                        println!("Valid: No");
                        println!("Error: {}", e);
                    }
                }
            } else {
                println!("Status: File does not exist");
                println!("\nTo create a sample config file, run:");
                println!("  tenantwatch config init");
            }
        }
        ConfigCommand::Set {
            records_file,
            calendar,
            label_style,
            all_includes_unclassifiable,
        } => {
            let config_path = Config::config_file_path()?;
            // Environment overrides must not leak into the saved file
            let mut config = Config::load_from(&config_path)?;

            if let Some(path) = records_file {
                config.records.path = Some(path);
            }
            if let Some(zone) = calendar {
                config.calendar.zone = zone;
            }
            if let Some(style) = label_style {
                config.display.label_style = style;
            }
            if let Some(include) = all_includes_unclassifiable {
                config.classifier.all_includes_unclassifiable = include;
            }

            config.save_to(&config_path)?;
            println!("✓ Updated {}", config_path.display());
        }
    }

    Ok(())
}
