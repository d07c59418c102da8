//! Tests for validated configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{SourceConfig, ValidatedConfig, expand_home, write_default_config};

/// Helper to create CLI args for the `dump` command
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["dynconf"];
    full_args.extend(args);
    full_args.push("dump");
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod sources {
    use super::*;

    #[test]
    fn no_source_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&[]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "source",
                ..
            })
        ));
    }

    #[test]
    fn registration_order_is_dirs_store_remote() {
        let cli = cli(&[
            "--remote-url",
            "https://config.example.com/",
            "--service",
            "orders",
            "--store",
            "/var/store.json",
            "--dir",
            "/etc/a",
            "--dir",
            "/etc/b",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.sources[0], SourceConfig::Directory("/etc/a".into()));
        assert_eq!(config.sources[1], SourceConfig::Directory("/etc/b".into()));
        assert_eq!(config.sources[2], SourceConfig::Store("/var/store.json".into()));
        assert!(matches!(
            config.sources[3],
            SourceConfig::Remote { ref service, timeout, .. }
                if service == "orders" && timeout == Duration::from_secs(10)
        ));
    }

    #[test]
    fn cli_dirs_replace_toml_dirs() {
        let toml = toml("[sources]\ndirs = [\"/etc/toml\"]");
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/cli"]), Some(&toml)).unwrap();

        assert_eq!(config.sources, vec![SourceConfig::Directory("/etc/cli".into())]);
    }

    #[test]
    fn toml_sources_used_without_cli() {
        let toml = toml(
            r#"
            [sources]
            dirs = ["/etc/app"]
            store = "/var/store.json"
        "#,
        );
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(
            config.sources,
            vec![
                SourceConfig::Directory("/etc/app".into()),
                SourceConfig::Store("/var/store.json".into()),
            ]
        );
    }

    #[test]
    fn remote_without_service_returns_error() {
        let cli = cli(&["--remote-url", "https://config.example.com/"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "remote.service",
                ..
            })
        ));
    }

    #[test]
    fn invalid_remote_url_returns_error() {
        let cli = cli(&["--remote-url", "not a url", "--service", "orders"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn zero_remote_timeout_returns_error() {
        let cli = cli(&[
            "--remote-url",
            "https://config.example.com/",
            "--service",
            "orders",
            "--remote-timeout",
            "0",
        ]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "remote.timeout",
                ..
            })
        ));
    }

    #[test]
    fn service_with_separator_returns_error() {
        let cli = cli(&[
            "--remote-url",
            "https://config.example.com/",
            "--service",
            "a/b",
        ]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidName {
                field: "service",
                ..
            })
        ));
    }
}

mod names {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), None).unwrap();

        assert_eq!(config.profiles, vec!["default"]);
        assert_eq!(config.documents, vec!["application.yaml"]);
    }

    #[test]
    fn cli_profiles_replace_toml_profiles() {
        let toml = toml("[sources]\nprofiles = [\"default\", \"prod\"]");
        let cli = cli(&["--dir", "/etc/app", "-p", "staging"]);
        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.profiles, vec!["staging"]);
    }

    #[test]
    fn toml_documents_used_without_cli() {
        let toml = toml("[sources]\ndocuments = [\"app.toml\"]");
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml)).unwrap();

        assert_eq!(config.documents, vec!["app.toml"]);
    }

    #[test]
    fn traversal_profile_returns_error() {
        let cli = cli(&["--dir", "/etc/app", "-p", ".."]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidName {
                field: "profile",
                ..
            })
        ));
    }

    #[test]
    fn nested_document_returns_error() {
        let cli = cli(&["--dir", "/etc/app", "--document", "../secrets.yaml"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidName {
                field: "document",
                ..
            })
        ));
    }

    #[test]
    fn empty_profile_returns_error() {
        let toml = toml("[sources]\nprofiles = [\"\"]");
        let result = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidName { .. })));
    }
}

mod resolver {
    use super::*;

    #[test]
    fn no_decrypt_by_default() {
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), None).unwrap();

        assert!(config.decrypt.is_none());
        assert!(config.secret_pattern.is_match("db.password"));
    }

    #[test]
    fn decrypt_from_cli() {
        let cli = cli(&[
            "--dir",
            "/etc/app",
            "--decrypt-url",
            "https://vault.example.com/decrypt",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();
        let decrypt = config.decrypt.unwrap();

        assert_eq!(decrypt.url.as_str(), "https://vault.example.com/decrypt");
        assert_eq!(decrypt.timeout, Duration::from_secs(5));
    }

    #[test]
    fn decrypt_timeout_cli_overrides_toml() {
        let toml = toml(
            r#"
            [resolver]
            decrypt_url = "https://vault.example.com/decrypt"
            decrypt_timeout = 9
        "#,
        );
        let cli = cli(&["--dir", "/etc/app", "--decrypt-timeout", "1"]);
        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.decrypt.unwrap().timeout, Duration::from_secs(1));
    }

    #[test]
    fn custom_secret_pattern() {
        let toml = toml("[resolver]\nsecret_pattern = \"(?i)apikey$\"");
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml)).unwrap();

        assert!(config.secret_pattern.is_match("service.ApiKey"));
        assert!(!config.secret_pattern.is_match("service.port"));
    }

    #[test]
    fn invalid_secret_pattern_returns_error() {
        let toml = toml("[resolver]\nsecret_pattern = \"([\"");
        let result = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidRegex { .. })));
    }
}

mod runtime {
    use super::*;

    #[test]
    fn default_reload_interval() {
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), None).unwrap();
        assert_eq!(config.reload_interval, Duration::from_secs(30));
    }

    #[test]
    fn zero_reload_interval_disables() {
        let toml = toml("[reload]\ninterval = 0");
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml)).unwrap();
        assert_eq!(config.reload_interval, Duration::ZERO);
    }

    #[test]
    fn cli_reload_interval_overrides_toml() {
        let toml = toml("[reload]\ninterval = 60");
        let cli = cli(&["--dir", "/etc/app", "--reload-interval", "5"]);
        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();
        assert_eq!(config.reload_interval, Duration::from_secs(5));
    }

    #[test]
    fn verbose_flag_is_carried() {
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app", "-v"]), None).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn display_lists_sources() {
        let cli = cli(&["--dir", "/etc/app", "--store", "/var/store.json"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();
        let shown = config.to_string();

        assert!(shown.contains("dir:/etc/app"));
        assert!(shown.contains("store:/var/store.json"));
        assert!(shown.contains("decrypt: none"));
    }
}

mod retry {
    use super::*;

    #[test]
    fn defaults() {
        let config = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), None).unwrap();
        let policy = config.retry_policy;

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(5));
    }

    #[test]
    fn cli_overrides_toml() {
        let toml = toml("[retry]\nmax_attempts = 7\ninitial_delay_ms = 900");
        let cli = cli(&["--dir", "/etc/app", "--retry-max", "2"]);
        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.retry_policy.max_attempts, 2);
        assert_eq!(config.retry_policy.initial_delay, Duration::from_millis(900));
    }

    #[test]
    fn zero_attempts_returns_error() {
        let cli = cli(&["--dir", "/etc/app", "--retry-max", "0"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn max_delay_below_initial_returns_error() {
        let toml = toml("[retry]\ninitial_delay_ms = 1000\nmax_delay_ms = 10");
        let result = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn non_positive_multiplier_returns_error() {
        let toml = toml("[retry]\nmultiplier = 0.0");
        let result = ValidatedConfig::from_raw(&cli(&["--dir", "/etc/app"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }
}

mod files {
    use super::*;

    #[test]
    fn load_merges_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynconf.toml");
        std::fs::write(&path, "[sources]\ndirs = [\"/etc/app\"]\nprofiles = [\"prod\"]\n").unwrap();

        let cli = cli(&["--config", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.profiles, vec!["prod"]);
        assert_eq!(config.sources, vec![SourceConfig::Directory("/etc/app".into())]);
    }

    #[test]
    fn write_default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");

        write_default_config(&path).unwrap();
        let cli = cli(&["--config", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.sources, vec![SourceConfig::Directory("./config".into())]);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_default_config(&dir.path().join("nope").join("out.toml"));

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        assert_eq!(expand_home(&PathBuf::from("~/app")), home.join("app"));
        assert_eq!(expand_home(&PathBuf::from("/etc/app")), PathBuf::from("/etc/app"));
        assert_eq!(expand_home(&PathBuf::from("a/~/b")), PathBuf::from("a/~/b"));
    }
}
