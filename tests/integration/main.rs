//! Integration tests for tagcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command bound to a file backend and config inside `temp`
    fn tagcache(temp: &TempDir, domain: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("tagcache");
        cmd.env_remove("TAGCACHE_DOMAIN")
            .env_remove("TAGCACHE_BACKEND")
            .env_remove("TAGCACHE_DIR")
            .env("TAGCACHE_CONFIG", temp.path().join("config.toml"))
            .args(["--backend", "file", "--dir"])
            .arg(temp.path().join("store"))
            .args(["--domain", domain]);
        cmd
    }

    #[test]
    fn default_backend_persists_between_runs() {
        let temp = TempDir::new().unwrap();
        let run = || {
            let mut cmd = cargo_bin_cmd!("tagcache");
            cmd.env_remove("TAGCACHE_DOMAIN")
                .env_remove("TAGCACHE_BACKEND")
                .env_remove("TAGCACHE_DIR")
                .env("TAGCACHE_CONFIG", temp.path().join("config.toml"))
                .arg("--dir")
                .arg(temp.path().join("store"))
                .args(["--domain", "myapp"]);
            cmd
        };

        run()
            .args(["store", "k", "kept"])
            .assert()
            .success()
            .stderr(predicate::str::contains("memory").not());

        run()
            .args(["fetch", "k"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kept\""));
        assert!(temp.path().join("store").is_dir());
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("tagcache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Namespaced, tag-aware cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("tagcache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tagcache"));
    }

    #[test]
    fn store_then_fetch() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["store", "k1", "v1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("myapp_k1"));

        tagcache(&temp, "myapp")
            .args(["fetch", "k1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"v1\""));
    }

    #[test]
    fn fetch_missing_key_fails() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["fetch", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Key not found"));
    }

    #[test]
    fn fetch_missing_key_with_default() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["fetch", "nope", "--default", "42"])
            .assert()
            .success()
            .stdout(predicate::str::contains("42"));
    }

    #[test]
    fn domains_do_not_share_keys() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "app1")
            .args(["store", "k", "one"])
            .assert()
            .success();

        tagcache(&temp, "app2")
            .args(["fetch", "k"])
            .assert()
            .failure();
    }

    #[test]
    fn tagged_store_fetch_and_delete() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["store", "bat", "Bruce", "--tag", "heroes"])
            .assert()
            .success();
        tagcache(&temp, "myapp")
            .args(["store", "spd", "Peter", "--tag", "heroes"])
            .assert()
            .success();

        tagcache(&temp, "myapp")
            .args(["fetch-tag", "heroes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"myapp_bat\": \"Bruce\""))
            .stdout(predicate::str::contains("\"myapp_spd\": \"Peter\""));

        tagcache(&temp, "myapp")
            .args(["delete-tag", "heroes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"myapp_heroes#tag\": true"));

        tagcache(&temp, "myapp")
            .args(["fetch-tag", "heroes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("{}"));

        tagcache(&temp, "myapp")
            .args(["fetch", "bat"])
            .assert()
            .failure();
    }

    #[test]
    fn delete_reports_each_key() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["store", "a", "1"])
            .assert()
            .success();

        tagcache(&temp, "myapp")
            .args(["delete", "a", "b"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"a\": true"))
            .stdout(predicate::str::contains("\"b\": false"));
    }

    #[test]
    fn reserved_key_is_rejected() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["store", "heroes#tag", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("reserved id"));
    }

    #[test]
    fn flush_domain_only_spares_other_domains() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "app1")
            .args(["store", "k", "one"])
            .assert()
            .success();
        tagcache(&temp, "app2")
            .args(["store", "k", "two"])
            .assert()
            .success();

        tagcache(&temp, "app1")
            .args(["flush", "--domain-only"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"app1_k\": true"));

        tagcache(&temp, "app2")
            .args(["fetch", "k"])
            .assert()
            .success()
            .stdout(predicate::str::contains("two"));
    }

    #[test]
    fn flush_clears_all_domains() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "app2")
            .args(["store", "k", "two"])
            .assert()
            .success();

        tagcache(&temp, "app1")
            .arg("flush")
            .assert()
            .success()
            .stdout(predicate::str::contains("all domains"));

        tagcache(&temp, "app2")
            .args(["fetch", "k"])
            .assert()
            .failure();
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("domain = \"myapp\""));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();

        tagcache(&temp, "myapp")
            .args(["config", "init"])
            .assert()
            .success();

        assert!(temp.path().join("config.toml").exists());
    }

    #[test]
    fn completions_generate() {
        cargo_bin_cmd!("tagcache")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tagcache"));
    }
}
