//! Config discovery through the environment
//!
//! These tests mutate process-wide environment variables, so each one holds
//! `ENV_LOCK` for its whole body.

mod common;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use common::init_tracing;
use sync_bridge::config::{self, BACKEND_ENV, CONFIG_ENV};
use sync_bridge::{Backend, RunnerConfig};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn write_config(name: &str, content: &str) -> PathBuf {
    let path = env::temp_dir().join(format!(
        "sync_bridge_env_{}_{}.toml",
        name,
        std::process::id()
    ));
    fs::write(&path, content).unwrap();
    path
}

fn with_env<T>(config: Option<&PathBuf>, backend: Option<&str>, f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match config {
        Some(path) => env::set_var(CONFIG_ENV, path),
        None => env::remove_var(CONFIG_ENV),
    }
    match backend {
        Some(name) => env::set_var(BACKEND_ENV, name),
        None => env::remove_var(BACKEND_ENV),
    }

    let result = f();

    env::remove_var(CONFIG_ENV);
    env::remove_var(BACKEND_ENV);
    result
}

#[test]
fn test_load_reads_file_named_by_env() {
    init_tracing();
    let path = write_config(
        "valid",
        "backend = \"tokio-multi-thread\"\nworker_threads = 3\nthread_name = \"from-env\"\n",
    );

    let (found, loaded) = with_env(Some(&path), None, || (config::config_path(), config::load()));

    assert_eq!(found, Some(path.clone()));
    assert_eq!(loaded.backend, Backend::TokioMultiThread);
    assert_eq!(loaded.worker_threads, Some(3));
    assert_eq!(loaded.thread_name, "from-env");

    fs::remove_file(path).ok();
}

#[test]
fn test_load_falls_back_on_malformed_file() {
    init_tracing();
    let path = write_config("malformed", "backend = [not toml\n");

    let loaded = with_env(Some(&path), None, config::load);
    assert_eq!(loaded, RunnerConfig::default());

    fs::remove_file(path).ok();
}

#[test]
fn test_load_falls_back_on_missing_file() {
    let path = env::temp_dir().join("sync_bridge_env_absent.toml");
    fs::remove_file(&path).ok();

    let loaded = with_env(Some(&path), None, config::load);
    assert_eq!(loaded, RunnerConfig::default());
}

#[test]
fn test_backend_env_applied_after_file() {
    let path = write_config(
        "override",
        "backend = \"tokio\"\nshutdown_timeout_ms = 100\n",
    );

    let loaded = with_env(Some(&path), Some("futures"), config::load);
    assert_eq!(loaded.backend, Backend::LocalPool);
    // The rest of the file still applies
    assert_eq!(loaded.shutdown_timeout_ms, Some(100));

    let ignored = with_env(Some(&path), Some("asyncio"), config::load);
    assert_eq!(ignored.backend, Backend::Tokio);

    fs::remove_file(path).ok();
}

#[test]
fn test_backend_alias_in_file_keeps_other_options() {
    let path = write_config(
        "alias",
        "backend = \"futures\"\nthread_name = \"aliased\"\nshutdown_timeout_ms = 40\n",
    );

    let loaded = with_env(Some(&path), None, config::load);
    assert_eq!(loaded.backend, Backend::LocalPool);
    assert_eq!(loaded.thread_name, "aliased");
    assert_eq!(loaded.shutdown_timeout_ms, Some(40));

    fs::remove_file(path).ok();
}

#[test]
fn test_config_path_prefers_env_over_xdg() {
    let explicit = PathBuf::from("/tmp/explicit-sync-bridge.toml");

    let (with_explicit, from_xdg) = with_env(Some(&explicit), None, || {
        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-home");

        let with_explicit = config::config_path();
        env::remove_var(CONFIG_ENV);
        let from_xdg = config::config_path();

        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        (with_explicit, from_xdg)
    });

    assert_eq!(with_explicit, Some(explicit));
    assert_eq!(
        from_xdg,
        Some(PathBuf::from("/tmp/xdg-home/sync-bridge/config.toml"))
    );
}
