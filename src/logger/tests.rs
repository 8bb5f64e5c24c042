use super::*;
use std::path::PathBuf;

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoggerConfig::default().validate().is_ok());
        assert_eq!(FileConfig::default().format, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Full);
    }

    #[test]
    fn test_no_outputs_fail() {
        let config = LoggerConfig {
            console: ConsoleConfig::new(false, false),
            file: FileConfig::default(),
            level: "info".to_string(),
        };
        assert!(matches!(config.validate(), Err(LoggerError::Config { .. })));
    }

    #[test]
    fn test_empty_path_fails_only_when_enabled() {
        assert!(FileConfig::new(false, PathBuf::new(), true, LogFormat::Json).is_ok());
        assert!(FileConfig::new(true, PathBuf::new(), true, LogFormat::Json).is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("FULL".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("json".parse::<LogFormat>().unwrap().as_str(), "json");
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(LoggerError::Format { .. })
        ));
    }
}

#[cfg(test)]
mod config_property_tests {
    use super::*;
    use proptest::prelude::*;

    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

    proptest! {
        #[test]
        fn property_valid_levels_validate(
            idx in 0usize..5,
            upper in any::<bool>(),
            console in any::<bool>(),
        ) {
            let level = if upper { LEVELS[idx].to_uppercase() } else { LEVELS[idx].to_string() };
            let config = LoggerConfig {
                console: ConsoleConfig::new(console, false),
                file: FileConfig { enabled: !console, ..Default::default() },
                level,
            };
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn property_invalid_levels_fail(level in "[a-z]{1,10}") {
            prop_assume!(!LEVELS.contains(&level.as_str()));
            let config = LoggerConfig { level, ..Default::default() };
            prop_assert!(config.validate().is_err());
        }
    }
}

#[cfg(test)]
mod writer_tests {
    use super::*;
    use crate::logger::writer::LogFileWriter;
    use std::io::Write;
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    fn file_config(dir: &TempDir, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path: dir.path().join("nested").join("widgets.log"),
            append,
            format: LogFormat::Compact,
        }
    }

    #[test]
    fn test_writer_creates_directories_and_writes() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);
        let writer = LogFileWriter::new(&config).unwrap();

        writer.make_writer().write_all(b"first line\n").unwrap();

        let content = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(content, "first line\n");
        assert!(!writer.is_in_fallback_mode());
    }

    #[test]
    fn test_writer_append_and_truncate() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);

        LogFileWriter::new(&config)
            .unwrap()
            .make_writer()
            .write_all(b"one\n")
            .unwrap();
        LogFileWriter::new(&config)
            .unwrap()
            .make_writer()
            .write_all(b"two\n")
            .unwrap();
        assert_eq!(std::fs::read_to_string(&config.path).unwrap(), "one\ntwo\n");

        let truncating = file_config(&dir, false);
        LogFileWriter::new(&truncating)
            .unwrap()
            .make_writer()
            .write_all(b"three\n")
            .unwrap();
        assert_eq!(std::fs::read_to_string(&config.path).unwrap(), "three\n");
    }
}

#[cfg(test)]
mod dynamic_level_tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn with_test_handle<F, R>(initial_level: &str, f: F) -> R
    where
        F: FnOnce(&LogLevelHandle) -> R,
    {
        let filter = EnvFilter::try_new(initial_level).unwrap_or_else(|_| EnvFilter::new("info"));
        let (filter_layer, reload_handle) = reload::Layer::new(filter);
        let subscriber = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().with_writer(std::io::sink));

        let handle = LogLevelHandle {
            inner: Arc::new(reload_handle),
        };

        tracing::subscriber::with_default(subscriber, || f(&handle))
    }

    #[test]
    fn test_invalid_directive_rejected() {
        with_test_handle("info", |handle| {
            assert!(handle.set_level("widgets_rs=loud").is_err());
            assert_eq!(handle.current_level().as_deref(), Some("info"));
        });
    }

    proptest! {
        #[test]
        fn property_last_update_wins(levels in prop::collection::vec(0usize..5, 1..5)) {
            let names = ["trace", "debug", "info", "warn", "error"];
            with_test_handle("info", |handle| {
                for &idx in &levels {
                    prop_assert!(handle.set_level(names[idx]).is_ok());
                }
                let expected = names[*levels.last().unwrap()];
                let current = handle.current_level();
                prop_assert_eq!(current.as_deref(), Some(expected));
                Ok(())
            })?;
        }

        #[test]
        fn property_module_directives_accepted(base in 0usize..5, module in 0usize..5) {
            let names = ["trace", "debug", "info", "warn", "error"];
            let directive = format!("{},widgets_rs::api={}", names[base], names[module]);
            with_test_handle("warn", |handle| {
                prop_assert!(handle.set_level(&directive).is_ok());
                Ok(())
            })?;
        }
    }
}
