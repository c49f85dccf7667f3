//! Integration tests for Stockpot

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn stockpot() -> Command {
        let mut cmd = cargo_bin_cmd!("stockpot");
        cmd.env_remove("STOCKPOT_CONFIG")
            .env_remove("STOCKPOT_CATALOG_URL")
            .env_remove("RUST_LOG")
            .arg("--no-local");
        cmd
    }

    /// Workspace with a config pointing at a local catalog cache
    struct Workspace {
        temp: TempDir,
    }

    impl Workspace {
        fn new(program: &str, add_args: &[&str]) -> Self {
            let temp = TempDir::new().unwrap();
            let cache = temp.path().join("cache");
            let args: Vec<String> = add_args.iter().map(|a| format!("\"{}\"", a)).collect();
            let config = format!(
                "[general]\nhistory_log = false\n\n\
                 [catalog]\nurl = \"file:///nonexistent/catalog.git\"\ncache_dir = \"{}\"\n\n\
                 [package_manager]\nprogram = \"{}\"\nadd_args = [{}]\n",
                cache.display(),
                program,
                args.join(", ")
            );
            fs::write(temp.path().join("config.toml"), config).unwrap();
            Self { temp }
        }

        fn config(&self) -> PathBuf {
            self.temp.path().join("config.toml")
        }

        fn cache(&self) -> PathBuf {
            self.temp.path().join("cache")
        }

        fn unit(&self, namespace: &str, name: &str, manifest: Option<&str>) {
            let dir = self.cache().join(namespace).join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("index.js"), "export default {};\n").unwrap();
            if let Some(content) = manifest {
                fs::write(dir.join("deps.packages"), content).unwrap();
            }
        }

        fn project(&self) -> PathBuf {
            let project = self.temp.path().join("app");
            for dir in ["node_modules", "src", "public"] {
                fs::create_dir_all(project.join(dir)).unwrap();
            }
            project
        }

        fn cmd(&self) -> Command {
            let mut cmd = stockpot();
            cmd.current_dir(self.temp.path())
                .arg("--config")
                .arg(self.config());
            cmd
        }
    }

    #[test]
    fn help_displays() {
        stockpot()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("import catalog modules"));
    }

    #[test]
    fn version_displays() {
        stockpot()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("stockpot"));
    }

    #[test]
    fn config_path() {
        stockpot()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_reflects_file() {
        let ws = Workspace::new("pnpm", &["add"]);
        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[catalog]"))
            .stdout(predicate::str::contains("program = \"pnpm\""));
    }

    #[test]
    fn catalog_url_flag_overrides_config() {
        let ws = Workspace::new("yarn", &["add"]);
        ws.cmd()
            .args(["--catalog-url", "https://example.com/units.git", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://example.com/units.git"));
    }

    #[test]
    fn completions_generate() {
        stockpot()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stockpot"));
    }

    #[test]
    fn add_outside_project_exits_with_precondition_code() {
        let ws = Workspace::new("yarn", &["add"]);
        let not_a_project = ws.temp.path().join("plain");
        fs::create_dir_all(&not_a_project).unwrap();

        ws.cmd()
            .arg("add")
            .arg(&not_a_project)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("does not look like a scaffolded project"))
            .stderr(predicate::str::contains("node_modules"));

        assert!(!not_a_project.join("src").exists());
        assert!(!ws.cache().exists());
    }

    #[test]
    fn add_offline_without_cache_fails() {
        let ws = Workspace::new("yarn", &["add"]);
        let project = ws.project();

        ws.cmd()
            .args(["add", "--offline", "-m", "--select", "auth"])
            .arg(&project)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Catalog path not found"));
    }

    #[test]
    fn add_rejects_select_across_namespaces() {
        let ws = Workspace::new("yarn", &["add"]);
        let project = ws.project();

        ws.cmd()
            .args(["add", "-m", "-c", "--select", "auth", "--offline"])
            .arg(&project)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--select"));
    }

    #[test]
    fn list_offline_plain() {
        let ws = Workspace::new("yarn", &["add"]);
        ws.unit("modules", "forms", None);
        ws.unit("modules", "auth", None);
        ws.unit("components", "button", None);

        ws.cmd()
            .args(["list", "--offline", "--format", "plain"])
            .assert()
            .success()
            .stdout("modules/auth\nmodules/forms\ncomponents/button\n");
    }

    #[test]
    fn list_offline_json() {
        let ws = Workspace::new("yarn", &["add"]);
        ws.unit("modules", "auth", None);

        let output = ws
            .cmd()
            .args(["list", "--offline", "-f", "json", "--namespace", "modules"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["modules"][0]["name"], "auth");
    }

    #[cfg(unix)]
    #[test]
    fn add_offline_end_to_end() {
        let ws = Workspace::new("echo", &["add"]);
        ws.unit("modules", "auth", Some("lodash\nmoment"));
        ws.unit("modules", "forms", Some("moment\nyup"));
        ws.unit("modules", "charts", Some("d3"));
        let project = ws.project();

        ws.cmd()
            .args(["add", "-m", "--offline", "--select", "auth,forms"])
            .arg(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("add lodash moment yup"))
            .stdout(predicate::str::contains("auth, forms"));

        let modules = project.join("src").join("modules");
        assert!(modules.join("auth").join("deps.packages").is_file());
        assert!(modules.join("forms").join("index.js").is_file());
        assert!(!modules.join("charts").exists());
    }

    #[cfg(unix)]
    #[test]
    fn add_across_namespaces_installs_once() {
        let ws = Workspace::new("echo", &["add"]);
        ws.unit("modules", "auth", Some("lodash\nmoment"));
        ws.unit("components", "modal", Some("classnames\nmoment"));
        let project = ws.project();

        let output = ws
            .cmd()
            .args(["add", "-m", "-c", "--offline", "--all"])
            .arg(&project)
            .output()
            .unwrap();
        assert!(output.status.success());

        // `echo` prints its argv once per package manager call
        let stdout = String::from_utf8_lossy(&output.stdout);
        let calls: Vec<&str> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("add "))
            .collect();
        assert_eq!(calls, vec!["add classnames lodash moment"]);
        assert!(project.join("src").join("components").join("modal").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn add_reports_package_manager_failure() {
        let ws = Workspace::new("false", &[]);
        ws.unit("modules", "auth", Some("lodash"));
        let project = ws.project();

        ws.cmd()
            .args(["add", "-m", "--offline", "--all"])
            .arg(&project)
            .assert()
            .code(5)
            .stderr(predicate::str::contains("Dependency install failed"));

        assert!(project.join("src").join("modules").join("auth").is_dir());
    }

    #[test]
    fn add_non_interactive_without_selection_imports_nothing() {
        let ws = Workspace::new("yarn", &["add"]);
        ws.unit("modules", "auth", Some("lodash"));
        let project = ws.project();

        ws.cmd()
            .args(["add", "-m", "--offline"])
            .arg(&project)
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing imported"));

        assert!(!project.join("src").join("modules").exists());
    }
}
