//! Tests for the run module.

use super::*;

use dynconf::config::Cli;

/// Writes `<dir>/<profile>/application.yaml` and returns a config reading it.
fn config_for(dir: &std::path::Path, extra: &[&str]) -> ValidatedConfig {
    let mut args = vec!["dynconf", "--dir", dir.to_str().unwrap()];
    args.extend(extra);
    args.push("dump");
    ValidatedConfig::from_raw(&Cli::parse_from_iter(args), None).unwrap()
}

fn write_document(dir: &std::path::Path, profile: &str, content: &str) {
    let profile_dir = dir.join(profile);
    std::fs::create_dir_all(&profile_dir).unwrap();
    std::fs::write(profile_dir.join("application.yaml"), content).unwrap();
}

mod run_error {
    use super::*;

    #[test]
    fn reload_disabled_displays_message() {
        let error = RunError::ReloadDisabled;
        assert!(error.to_string().contains("Reloading is disabled"));
    }

    #[test]
    fn provider_error_is_transparent() {
        let error = RunError::from(ProviderError::PropertyNotFound {
            name: "server.port".to_string(),
        });
        assert!(error.to_string().contains("server.port"));
    }
}

mod building {
    use super::*;

    #[tokio::test]
    async fn builds_from_directory_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "default", "server:\n  port: 8080\n");
        write_document(dir.path(), "prod", "server:\n  port: 443\n");

        let config = config_for(dir.path(), &["-p", "default", "-p", "prod"]);
        let provider = build_provider(&config, Duration::ZERO).await.unwrap();

        assert_eq!(provider.property("server.port").unwrap().value(), "443");
        assert!(!provider.is_reloading());
    }

    #[tokio::test]
    async fn later_directory_wins() {
        let low = tempfile::tempdir().unwrap();
        let high = tempfile::tempdir().unwrap();
        write_document(low.path(), "default", "a: low\nb: only-low\n");
        write_document(high.path(), "default", "a: high\n");

        let config = config_for(low.path(), &["--dir", high.path().to_str().unwrap()]);
        let provider = build_provider(&config, Duration::ZERO).await.unwrap();

        assert_eq!(provider.property("a").unwrap().value(), "high");
        assert_eq!(provider.property("b").unwrap().value(), "only-low");
    }

    #[tokio::test]
    async fn empty_directory_fails_to_build() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), &[]);

        let result = build_provider(&config, Duration::ZERO).await;
        assert!(matches!(result, Err(ProviderError::NoDocumentsLoaded { .. })));
    }

    #[tokio::test]
    async fn secret_names_are_masked() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "default", "db:\n  password: hunter2\n  host: db1\n");

        let config = config_for(dir.path(), &[]);
        let provider = build_provider(&config, Duration::ZERO).await.unwrap();

        let password = provider.property("db.password").unwrap();
        assert_eq!(render_value(&password, false), "******");
        assert_eq!(render_value(&password, true), "hunter2");
        assert_eq!(render_value(&provider.property("db.host").unwrap(), false), "db1");
    }

    #[tokio::test]
    async fn dump_lists_properties_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "default", "b: 1\na: 2\ntoken: t\n");

        let config = config_for(dir.path(), &[]);
        let provider = build_provider(&config, Duration::ZERO).await.unwrap();

        assert_eq!(
            render_dump(&provider.properties(), false),
            vec!["b=1", "a=2", "token=******"]
        );
    }

    #[tokio::test]
    async fn store_source_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "default", "a: 1\n");
        let store = dir.path().join("store.json");

        let config = config_for(dir.path(), &["--store", store.to_str().unwrap()]);
        let provider = build_provider(&config, Duration::ZERO).await.unwrap();

        assert_eq!(provider.property("a").unwrap().value(), "1");
        assert!(store.exists());
    }

    #[test]
    fn decrypt_budget_covers_attempts_and_waits() {
        let policy = RetryPolicy::new()
            .with_max_attempts(3)
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(5));

        // 3 x 2s attempts, then 500ms and 1s waits
        assert_eq!(
            decrypt_budget(Duration::from_secs(2), &policy),
            Duration::from_millis(7_500)
        );
    }
}

mod rendering {
    use super::*;

    #[test]
    fn describe_changes_orders_added_changed_removed() {
        let mut changes = ChangeSet::new();
        changes.record(dynconf::provider::ChangeKind::Removed, "old");
        changes.record(dynconf::provider::ChangeKind::Changed, "kept");
        changes.record(dynconf::provider::ChangeKind::Added, "new");

        assert_eq!(describe_changes(&changes), vec!["+ new", "~ kept", "- old"]);
    }

    #[test]
    fn describe_empty_change_set() {
        assert!(describe_changes(&ChangeSet::new()).is_empty());
    }
}
