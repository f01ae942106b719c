use clap::Subcommand;
use pomotrack_core::Settings;

use super::Context;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "durations.pomodoro")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value in minutes
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = ctx.load_settings()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = ctx.load_settings()?;
            settings.set(&key, &value)?;
            ctx.save_settings(&settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = ctx.load_settings()?;
            for key in Settings::KEYS {
                if let Some(value) = settings.get(key) {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {
            ctx.save_settings(&Settings::default())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
