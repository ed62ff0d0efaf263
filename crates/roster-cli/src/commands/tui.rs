use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

pub fn launch(config_path: Option<PathBuf>, api_url: Option<String>, verbose: bool) -> Result<()> {
    let mut command = build_command(config_path, api_url);
    if verbose {
        eprintln!("launching {:?}", command.get_program());
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = command.exec();
        Err(exec_error(err))
    }

    #[cfg(not(unix))]
    {
        let status = command.status().with_context(|| "launch roster-tui")?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

fn build_command(config_path: Option<PathBuf>, api_url: Option<String>) -> Command {
    let mut command = Command::new(find_tui_binary());
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    if let Some(url) = api_url {
        command.arg("--api-url").arg(url);
    }
    command
}

fn find_tui_binary() -> PathBuf {
    let name = format!("roster-tui{}", env::consts::EXE_SUFFIX);
    if let Ok(current) = env::current_exe() {
        if let Some(dir) = current.parent() {
            let candidate = dir.join(&name);
            if candidate.is_file() {
                return candidate;
            }
        }
    }
    PathBuf::from(name)
}

fn exec_error(err: std::io::Error) -> anyhow::Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        return anyhow!(
            "roster-tui binary not found; build it with `cargo build -p roster-tui` or install the package"
        );
    }
    anyhow!("launch roster-tui failed: {}", err)
}

#[cfg(test)]
mod tests {
    use super::build_command;
    use std::path::PathBuf;

    #[test]
    fn build_command_forwards_overrides() {
        let command = build_command(
            Some(PathBuf::from("/tmp/roster.toml")),
            Some("http://127.0.0.1:9000".to_string()),
        );
        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--config",
                "/tmp/roster.toml",
                "--api-url",
                "http://127.0.0.1:9000"
            ]
        );
    }
}
