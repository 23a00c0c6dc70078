// src/cli/handlers.rs
use std::io::Write;

use anyhow::{Context, Result};

use super::commands::{CliCommand, GenerateArgs, SearchArgs, StorageArgs};
use crate::core::config::Config;
use crate::generators::generate_password;
use crate::models::StoredEntry;
use crate::storage::{Backend, PasswordStore};
use crate::utils::{default_label, render_entry};

// Handlers for CLI commands. Each returns the process exit code; storage failures
// propagate as errors and are reported by the caller.

pub fn run(
    command: CliCommand,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    match command {
        CliCommand::Generate(args) => handle_generate(&args, config, out, err),
        CliCommand::Search(args) => handle_search(&args, config, out),
        CliCommand::Remove(args) => handle_remove(&args, config, out, err),
        CliCommand::Clear { yes, storage } => handle_clear(yes, &storage, config, out, err),
    }
}

fn open_backend(config: &Config, storage: &StorageArgs) -> Result<Backend> {
    let backend = config
        .backend(storage.storage_file.as_deref(), storage.storage_dsn.as_deref())
        .context("Cannot open password store")?;
    log::debug!("Using {} store at {}", backend.kind(), backend.location());
    Ok(backend)
}

pub fn handle_generate(
    args: &GenerateArgs,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    let length = args.length.unwrap_or(config.default_length);
    let options = args.pool_options();

    let password = match generate_password(length, &options) {
        Ok(password) => password,
        Err(e) => {
            writeln!(err, "Error: {}", e)?;
            return Ok(1);
        }
    };
    writeln!(out, "{}", password)?;

    if args.save {
        let label = args
            .label
            .clone()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(default_label);

        let backend = open_backend(config, &args.storage)?;
        let entry = backend
            .store(&password, &label, length, options)
            .with_context(|| format!("Cannot save password hash to {}", backend.location()))?;
        writeln!(
            out,
            "Saved hash: label={} location={}",
            entry.label,
            backend.location()
        )?;
    }
    Ok(0)
}

fn find_entries(backend: &Backend, args: &SearchArgs) -> Result<Vec<StoredEntry>> {
    let label = args.label.as_deref();
    let entries = match &args.password {
        Some(password) => backend.verify(password, label),
        None => backend.search(label),
    };
    entries.with_context(|| format!("Cannot read entries from {}", backend.location()))
}

pub fn handle_search(args: &SearchArgs, config: &Config, out: &mut dyn Write) -> Result<i32> {
    let backend = open_backend(config, &args.storage)?;
    let entries = find_entries(&backend, args)?;

    if entries.is_empty() {
        writeln!(out, "Nothing found")?;
        return Ok(0);
    }

    for entry in &entries {
        writeln!(out, "{}", render_entry(entry))?;
    }
    Ok(0)
}

pub fn handle_remove(
    args: &SearchArgs,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    if args.label.as_deref().unwrap_or_default().is_empty() && args.password.is_none() {
        writeln!(
            err,
            "Error: remove needs --label or --password (use `clear --yes` to remove everything)"
        )?;
        return Ok(1);
    }

    let backend = open_backend(config, &args.storage)?;
    let mut removed = 0;
    for entry in find_entries(&backend, args)? {
        if backend
            .delete(&entry)
            .with_context(|| format!("Cannot delete entry '{}'", entry.label))?
        {
            removed += 1;
        }
    }

    writeln!(out, "Removed {} entries", removed)?;
    Ok(0)
}

pub fn handle_clear(
    yes: bool,
    storage: &StorageArgs,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    let backend = open_backend(config, storage)?;
    if !yes {
        writeln!(
            err,
            "Error: refusing to clear {} without --yes",
            backend.location()
        )?;
        return Ok(1);
    }

    let removed = backend
        .clear()
        .with_context(|| format!("Cannot clear {}", backend.location()))?;
    writeln!(out, "Removed {} entries", removed)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash_password;
    use std::path::Path;

    fn config_for(path: &Path) -> Config {
        Config {
            storage_file: path.to_path_buf(),
            storage_dsn: None,
            ..Config::default()
        }
    }

    fn generate(argv: GenerateArgs, config: &Config) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = handle_generate(&argv, config, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn generate_args(length: usize) -> GenerateArgs {
        GenerateArgs {
            length: Some(length),
            digits: false,
            no_digits: false,
            special: false,
            no_special: true,
            uppercase: false,
            no_uppercase: true,
            lowercase: false,
            no_lowercase: false,
            save: false,
            label: None,
            storage: StorageArgs::default(),
        }
    }

    #[test]
    fn generate_saves_and_prints_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let config = config_for(&path);

        let mut args = generate_args(8);
        args.save = true;
        args.label = Some("custom-label".into());
        let (code, out, err) = generate(args, &config);

        assert_eq!(code, 0);
        assert!(err.is_empty());
        let mut lines = out.lines();
        let password = lines.next().unwrap();
        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(
            lines.next().unwrap(),
            format!("Saved hash: label=custom-label location={}", path.display())
        );

        let stored = std::fs::read_to_string(&path).unwrap();
        assert!(stored.contains("custom-label"));
        assert!(stored.contains(&hash_password(password)));
        assert!(!stored.contains(password));
    }

    #[test]
    fn generate_without_label_uses_timestamped_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("store.json"));

        let mut args = generate_args(12);
        args.save = true;
        let (code, out, _) = generate(args, &config);

        assert_eq!(code, 0);
        assert!(out.contains("Saved hash: label=entry-"));
    }

    #[test]
    fn generate_reports_validation_error_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let config = config_for(&path);

        let mut args = generate_args(1);
        args.save = true;
        let (code, out, err) = generate(args, &config);

        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("Error: Length must be at least 2"));
        assert!(!path.exists());
    }

    #[test]
    fn generate_with_every_pool_disabled_fails() {
        let config = Config::default();
        let mut args = generate_args(8);
        args.no_digits = true;
        args.no_lowercase = true;
        let (code, _, err) = generate(args, &config);

        assert_eq!(code, 1);
        assert!(err.contains("At least one character category"));
    }

    #[test]
    fn search_prints_entries_and_verifies_by_hash() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("store.json"));
        let backend = config.backend(None, None).unwrap();
        backend
            .store("Tr0ub4dor", "work", 9, Default::default())
            .unwrap();
        backend.store("other", "home", 5, Default::default()).unwrap();

        let mut out = Vec::new();
        let args = SearchArgs {
            label: Some("WOR".into()),
            ..SearchArgs::default()
        };
        assert_eq!(handle_search(&args, &config, &mut out).unwrap(), 0);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("label: work"));
        assert!(!out.contains("label: home"));
        assert!(out.contains("options: digits, special, uppercase, lowercase"));

        let mut out = Vec::new();
        let args = SearchArgs {
            password: Some("Tr0ub4dor".into()),
            ..SearchArgs::default()
        };
        handle_search(&args, &config, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&hash_password("Tr0ub4dor")));
        assert!(!out.contains("label: home"));
    }

    #[test]
    fn search_handles_no_results() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("store.json"));

        let mut out = Vec::new();
        let args = SearchArgs {
            label: Some("query".into()),
            password: Some("secret".into()),
            ..SearchArgs::default()
        };
        assert_eq!(handle_search(&args, &config, &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Nothing found\n");
    }

    #[test]
    fn search_surfaces_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{broken").unwrap();
        let config = config_for(&path);

        let mut out = Vec::new();
        let err = handle_search(&SearchArgs::default(), &config, &mut out).unwrap_err();
        assert!(format!("{:#}", err).contains("corrupted"));
    }

    #[test]
    fn remove_requires_a_filter_and_deletes_matches() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("store.json"));
        let backend = config.backend(None, None).unwrap();
        backend.store("a", "alpha", 1, Default::default()).unwrap();
        backend.store("b", "beta", 1, Default::default()).unwrap();

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = handle_remove(&SearchArgs::default(), &config, &mut out, &mut err).unwrap();
        assert_eq!(code, 1);
        assert_eq!(backend.search(None).unwrap().len(), 2);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let args = SearchArgs {
            label: Some("alp".into()),
            ..SearchArgs::default()
        };
        assert_eq!(handle_remove(&args, &config, &mut out, &mut err).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Removed 1 entries\n");
        let labels: Vec<_> = backend
            .search(None)
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["beta"]);
    }

    #[test]
    fn clear_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("store.json"));
        let backend = config.backend(None, None).unwrap();
        backend.store("a", "alpha", 1, Default::default()).unwrap();
        backend.store("b", "beta", 1, Default::default()).unwrap();

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let storage = StorageArgs::default();
        assert_eq!(handle_clear(false, &storage, &config, &mut out, &mut err).unwrap(), 1);
        assert_eq!(backend.search(None).unwrap().len(), 2);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(handle_clear(true, &storage, &config, &mut out, &mut err).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Removed 2 entries\n");
        assert!(backend.search(None).unwrap().is_empty());
    }
}
