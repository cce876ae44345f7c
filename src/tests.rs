#[cfg(test)]
mod tests {
    use crate::core::settings::{DocumentFormat, Settings};
    use crate::core::{GitConfig, GitConfigError, Value};
    use crate::utils::{self, ValueKind};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn setup_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_explicit_file_wins_over_settings() {
        let settings = Settings {
            default_file: Some(PathBuf::from("/from/settings")),
            ..Settings::default()
        };
        let path = utils::resolve_config_path(Some(PathBuf::from("/explicit")), &settings).unwrap();
        assert_eq!(path, PathBuf::from("/explicit"));

        let path = utils::resolve_config_path(None, &settings).unwrap();
        assert_eq!(path, PathBuf::from("/from/settings"));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempdir().unwrap();
        let config = utils::load_config(&dir.path().join("absent")).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_set_add_unset_workflow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        utils::set_values(&path, "user.name", ValueKind::String, &["Jane Doe".into()], false)
            .unwrap();
        utils::set_values(
            &path,
            "remote.origin.fetch",
            ValueKind::String,
            &["+refs/heads/*:refs/remotes/origin/*".into()],
            false,
        )
        .unwrap();
        utils::set_values(
            &path,
            "remote.origin.fetch",
            ValueKind::String,
            &["+refs/tags/*:refs/tags/*".into()],
            true,
        )
        .unwrap();
        utils::set_values(&path, "core.autocrlf", ValueKind::Bool, &["false".into()], false)
            .unwrap();

        assert_eq!(utils::get_value(&path, "user.name").unwrap(), "Jane Doe");
        assert_eq!(
            utils::get_all_values(&path, "remote.origin.fetch").unwrap(),
            vec!["+refs/heads/*:refs/remotes/origin/*", "+refs/tags/*:refs/tags/*"]
        );

        let config = utils::load_config(&path).unwrap();
        assert_eq!(config.get("core.autocrlf").unwrap().to_string(), "false");

        utils::unset_key(&path, "user.name").unwrap();
        let err = utils::get_value(&path, "user.name").unwrap_err();
        assert_eq!(
            err.downcast_ref::<GitConfigError>(),
            Some(&GitConfigError::KeyNotFound)
        );
        assert_eq!(
            utils::list_entries(&path, true).unwrap(),
            vec!["remote.origin.fetch", "remote.origin.fetch", "core.autocrlf"]
        );
    }

    #[test]
    fn test_string_values_are_stored_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        let text = r#"!f() { echo "a\b" ; }; f"#;

        utils::set_values(&path, "alias.odd", ValueKind::String, &[text.into()], false).unwrap();
        assert_eq!(utils::get_value(&path, "alias.odd").unwrap(), text);
    }

    #[test]
    fn test_typed_values_reject_bad_text() {
        assert!(utils::parse_value(ValueKind::Int, "ten").is_err());
        assert!(utils::parse_value(ValueKind::Bool, "maybe").is_err());
        assert!(utils::parse_value(ValueKind::Uint, "-1").is_err());
        assert_eq!(
            utils::parse_value(ValueKind::Uint, "18446744073709551615").unwrap(),
            Value::Uint(u64::MAX)
        );
        assert_eq!(
            utils::parse_value(ValueKind::Float, "0.5").unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_check_reports_parse_errors_with_location() {
        let (_dir, path) = setup_config("[core]\n\teditor = vim\n[bad!]\n");
        let err = utils::check_file(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("line 3"), "{message}");

        let (_dir, path) = setup_config("[core]\n\teditor = vim\n\teditor = nano\n");
        let summary = utils::check_file(&path).unwrap();
        assert_eq!((summary.sections, summary.keys, summary.values), (1, 1, 2));
    }

    #[test]
    fn test_check_requires_an_existing_file() {
        let dir = tempdir().unwrap();
        assert!(utils::check_file(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_get_regexp_matches_keys() {
        let (_dir, path) = setup_config(
            "[remote \"origin\"]\n\turl = a\n[remote \"fork\"]\n\turl = b\n[user]\n\tname = x\n",
        );
        assert_eq!(
            utils::find_entries(&path, r"^remote\..*\.url$", false).unwrap(),
            vec!["remote.origin.url a", "remote.fork.url b"]
        );
        assert!(utils::find_entries(&path, "(", false).is_err());
    }

    #[test]
    fn test_export_then_import_into_another_file() {
        let (dir, path) = setup_config(
            "[user]\n\tname = Jane\n[url \"git@github.com:\"]\n\tinsteadOf = https://github.com/\n",
        );
        let export = dir.path().join("profile.json");
        utils::export_config(&path, DocumentFormat::Json, Some(&export)).unwrap();
        assert_eq!(utils::infer_format(&export), Some(DocumentFormat::Json));

        let target = dir.path().join("other");
        fs::write(&target, "[user]\n\tname = John\n").unwrap();

        let count = utils::import_config(&target, &export, DocumentFormat::Json, false).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            utils::get_all_values(&target, "user.name").unwrap(),
            vec!["John", "Jane"]
        );

        utils::import_config(&target, &export, DocumentFormat::Json, true).unwrap();
        assert_eq!(utils::get_all_values(&target, "user.name").unwrap(), vec!["Jane"]);
        assert_eq!(
            utils::get_value(&target, "url.git@github.com:.insteadof").unwrap_err().to_string(),
            "Cannot read 'url.git@github.com:.insteadof'"
        );
        assert_eq!(
            utils::get_value(&target, "url.git@github.com:.insteadOf").unwrap(),
            "https://github.com/"
        );
    }

    #[test]
    fn test_saved_file_parses_back() {
        let (_dir, path) = setup_config(
            "; comment\n[core]\n\tpager = \"less -R\" # trailing\n\tpath = C:\\\\tools\n",
        );
        let config = utils::load_config(&path).unwrap();
        utils::save_config(&path, &config).unwrap();

        let reparsed = GitConfig::parse(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(reparsed.get("core.pager").unwrap().to_string(), "less -R");
        assert_eq!(reparsed.get("core.path").unwrap().to_string(), r"C:\tools");
    }
}
