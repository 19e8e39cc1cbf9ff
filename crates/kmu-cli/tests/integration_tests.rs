//! End-to-end tests driving the `kmu` binary.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Temporary Portage-like layout plus a config file pointing at it.
struct TestContext {
    temp_dir: TempDir,
    config: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("distfiles")).expect("failed to create distfiles");

        let config = root.join("kmu.toml");
        let toml = format!(
            "keywords = \"{0}/package.keywords/keywords\"\n\
             mask = \"{0}/package.mask/mask\"\n\
             use = \"{0}/package.use/use\"\n\
             unmask = \"{0}/package.unmask/unmask\"\n\
             distfiles = \"{0}/distfiles\"\n\
             repository = \"{0}/repo\"\n",
            root.display()
        );
        fs::write(&config, toml).expect("failed to write config");

        Self { temp_dir, config }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn kmu_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_kmu");
        let mut cmd = Command::new(bin_path);
        cmd.env("HOME", self.root())
            .env("KMU_CONFIG", &self.config)
            .env_remove("EPREFIX")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.kmu_cmd().args(args).output().expect("failed to run kmu")
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap_or_default()
    }

    fn distfile(&self, name: &str, bytes: usize, age_secs: u64) -> PathBuf {
        let path = self.root().join("distfiles").join(name);
        fs::write(&path, vec![0u8; bytes]).expect("failed to write distfile");
        File::options()
            .write(true)
            .open(&path)
            .and_then(|f| f.set_modified(SystemTime::now() - Duration::from_secs(age_secs)))
            .expect("failed to set mtime");
        path
    }
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    assert!(ctx.run(&["--version"]).status.success());
}

#[test]
fn test_add_then_list() {
    let ctx = TestContext::new();

    let output = ctx.run(&["add", "k", "dev-lang/rust"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(ctx.read("package.keywords/keywords"), "dev-lang/rust **\n");

    let output = ctx.run(&["list", "keyword"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dev-lang/rust"));
    assert!(stdout.contains("1 records"));
}

#[test]
fn test_merge_declined_without_terminal() {
    let ctx = TestContext::new();
    assert!(ctx.run(&["add", "use", "media-video/mpv", "lua", "x11"]).status.success());

    // stdin is closed, so the merge prompt declines.
    let output = ctx.run(&["add", "use", "media-video/mpv", "-x11"]);
    assert!(output.status.success());
    assert_eq!(ctx.read("package.use/use"), "media-video/mpv lua x11\n");

    let output = ctx.run(&["-y", "add", "use", "media-video/mpv", "-x11"]);
    assert!(output.status.success());
    assert_eq!(ctx.read("package.use/use"), "media-video/mpv lua -x11\n");
}

#[test]
fn test_add_without_atom_fails() {
    let ctx = TestContext::new();
    let output = ctx.run(&["add", "mask"]);
    assert!(!output.status.success());
}

#[test]
fn test_delete() {
    let ctx = TestContext::new();
    assert!(ctx.run(&["add", "mask", ">=www-client/firefox-130"]).status.success());
    assert!(ctx.run(&["add", "mask", "app-misc/jq"]).status.success());

    let output = ctx.run(&["delete", "m", "firefox"]);
    assert!(output.status.success());
    assert_eq!(ctx.read("package.mask/mask"), "app-misc/jq\n");
}

#[test]
fn test_clean_dry_run_keeps_files() {
    let ctx = TestContext::new();
    let old = ctx.distfile("curl-8.4.0.tar.xz", 100, 3000);
    let new = ctx.distfile("curl-8.5.0.tar.xz", 120, 10);

    let output = ctx.run(&["clean", "--dry-run"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("curl"));
    assert!(old.exists());
    assert!(new.exists());
}

#[test]
fn test_clean_yes_removes_superseded() {
    let ctx = TestContext::new();
    let old = ctx.distfile("curl-8.4.0.tar.xz", 100, 3000);
    let new = ctx.distfile("curl-8.5.0.tar.xz", 120, 10);
    let reserved = ctx.distfile("linux-6.1.tar.xz", 10, 3000);
    ctx.distfile("linux-6.6.tar.xz", 10, 10);

    let output = ctx.run(&["clean", "--yes"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(!old.exists());
    assert!(new.exists());
    assert!(reserved.exists());
}

#[test]
fn test_clean_missing_directory_fails() {
    let ctx = TestContext::new();
    let missing = ctx.root().join("nowhere");
    let output = ctx.run(&["clean", "--distfiles", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_malformed_config_fails() {
    let ctx = TestContext::new();
    fs::write(&ctx.config, "not_a_key = 1\n").unwrap();
    let output = ctx.run(&["list", "use"]);
    assert!(!output.status.success());
}
