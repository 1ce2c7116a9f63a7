use clap::Subcommand;
use studyplan_core::storage::Config;
use studyplan_core::ConfigError;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Set a configuration value, e.g. `config set timer.max_minutes 90`
    Set { key: String, value: String },
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match key {
        "timer.max_minutes" => {
            config.timer.max_minutes = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "timer.unit_minutes" => {
            config.timer.unit_minutes = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "timer.alarm_mode" => {
            config.timer.alarm_mode = value.parse().map_err(invalid)?;
        }
        "pomodoro.focus_minutes" => {
            config.pomodoro.focus_minutes = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "pomodoro.break_minutes" => {
            config.pomodoro.break_minutes = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        _ => return Err(invalid("unknown configuration key".to_string())),
    }
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            apply(&mut config, &key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_known_keys() {
        let mut config = Config::default();
        apply(&mut config, "timer.max_minutes", "90").unwrap();
        apply(&mut config, "timer.unit_minutes", "5").unwrap();
        apply(&mut config, "timer.alarm_mode", "vibrate").unwrap();
        apply(&mut config, "pomodoro.focus_minutes", "50").unwrap();
        assert_eq!(config.timer.max_minutes, 90);
        assert_eq!(config.timer.unit_minutes, 5);
        assert_eq!(config.pomodoro.focus_minutes, 50);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        let err = apply(&mut config, "timer.volume", "11").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn bad_value_is_rejected() {
        let mut config = Config::default();
        assert!(apply(&mut config, "timer.max_minutes", "ninety").is_err());
        assert!(apply(&mut config, "timer.alarm_mode", "loud").is_err());
    }
}
