//! Process launcher for the asset cache and the dispatcher
//!
//! Starts each component as a child process with a chosen working directory
//! and the launcher's own standard streams, then waits. When one child exits,
//! or shutdown is requested, the remaining children are killed.

use anyhow::Context;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// One child process to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
	pub name: String,
	pub args: Vec<OsString>,
}

impl Component {
	pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<OsString>,
	{
		Self {
			name: name.into(),
			args: args.into_iter().map(Into::into).collect(),
		}
	}
}

/// Why the launcher stopped
#[derive(Debug)]
pub enum LaunchOutcome {
	/// A child exited on its own
	Exited { name: String, status: ExitStatus },
	/// Shutdown was requested
	Shutdown,
}

#[derive(Debug, Clone)]
pub struct Launcher {
	program: PathBuf,
	workdir: Option<PathBuf>,
	components: Vec<Component>,
}

impl Launcher {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			workdir: None,
			components: Vec::new(),
		}
	}

	/// A launcher that runs `cache` and then `dispatch` from the current
	/// executable, forwarding the settings file and verbosity.
	pub fn for_current_exe(config: Option<&Path>, verbosity: u8) -> anyhow::Result<Self> {
		let program = std::env::current_exe().context("cannot locate the running executable")?;

		let mut shared: Vec<OsString> = Vec::new();
		if let Some(config) = config {
			// Children may run in another directory.
			let config = std::path::absolute(config)
				.with_context(|| format!("cannot resolve {}", config.display()))?;
			shared.push("--config".into());
			shared.push(config.into_os_string());
		}
		if verbosity > 0 {
			shared.push(format!("-{}", "v".repeat(verbosity as usize)).into());
		}

		let component = |name: &str, subcommand: &str| {
			let mut args = vec![OsString::from(subcommand)];
			args.extend(shared.iter().cloned());
			Component::new(name, args)
		};

		Ok(Self::new(program)
			.with_component(component("asset-cache", "cache"))
			.with_component(component("dispatcher", "dispatch")))
	}

	pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
		self.workdir = Some(workdir.into());
		self
	}

	/// Components start in the order they are added
	pub fn with_component(mut self, component: Component) -> Self {
		self.components.push(component);
		self
	}

	pub fn components(&self) -> &[Component] {
		&self.components
	}

	fn spawn(&self, component: &Component) -> anyhow::Result<Child> {
		let mut command = Command::new(&self.program);
		command
			.args(&component.args)
			.stdin(Stdio::inherit())
			.stdout(Stdio::inherit())
			.stderr(Stdio::inherit())
			.kill_on_drop(true);
		if let Some(workdir) = &self.workdir {
			command.current_dir(workdir);
		}

		let child = command.spawn().with_context(|| {
			format!(
				"cannot start {} ({})",
				component.name,
				self.program.display()
			)
		})?;
		tracing::info!(
			component = %component.name,
			pid = child.id(),
			"component started"
		);
		Ok(child)
	}

	/// Starts every component and waits until one exits or `shutdown`
	/// resolves. All children still running are then killed and reaped.
	pub async fn run<F>(self, shutdown: F) -> anyhow::Result<LaunchOutcome>
	where
		F: Future<Output = ()>,
	{
		anyhow::ensure!(!self.components.is_empty(), "nothing to launch");

		let mut children = Vec::with_capacity(self.components.len());
		for component in &self.components {
			children.push((component.name.clone(), self.spawn(component)?));
		}

		let first_exit = async {
			let waits = children.iter_mut().map(|(name, child)| {
				Box::pin(async move { (name.clone(), child.wait().await) })
			});
			let (first, _, _) = futures::future::select_all(waits).await;
			first
		};

		let outcome = tokio::select! {
			(name, status) = first_exit => {
				let status = status.with_context(|| format!("cannot wait for {}", name))?;
				tracing::warn!(component = %name, %status, "component exited");
				LaunchOutcome::Exited { name, status }
			}
			_ = shutdown => LaunchOutcome::Shutdown,
		};

		for (name, child) in &mut children {
			if let Ok(None) = child.try_wait() {
				tracing::info!(component = %name, "stopping component");
				if let Err(err) = child.kill().await {
					tracing::warn!(component = %name, error = %err, "cannot stop component");
				}
			}
		}

		Ok(outcome)
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::time::Duration;
	use tempfile::TempDir;

	fn sh(name: &str, script: &str) -> Component {
		Component::new(name, ["-c", script])
	}

	#[rstest]
	#[tokio::test]
	async fn test_first_exit_stops_the_others() {
		let launcher = Launcher::new("/bin/sh")
			.with_component(sh("sleeper", "sleep 30"))
			.with_component(sh("quitter", "exit 3"));

		let outcome = tokio::time::timeout(
			Duration::from_secs(10),
			launcher.run(std::future::pending()),
		)
		.await
		.expect("launcher did not stop")
		.unwrap();

		match outcome {
			LaunchOutcome::Exited { name, status } => {
				assert_eq!(name, "quitter");
				assert_eq!(status.code(), Some(3));
			}
			LaunchOutcome::Shutdown => panic!("expected a child exit"),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_shutdown_kills_children() {
		let launcher = Launcher::new("/bin/sh")
			.with_component(sh("a", "sleep 30"))
			.with_component(sh("b", "sleep 30"));

		let outcome = tokio::time::timeout(
			Duration::from_secs(10),
			launcher.run(tokio::time::sleep(Duration::from_millis(100))),
		)
		.await
		.expect("launcher did not stop")
		.unwrap();

		assert!(matches!(outcome, LaunchOutcome::Shutdown));
	}

	#[rstest]
	#[tokio::test]
	async fn test_children_run_in_workdir() {
		let workdir = TempDir::new().unwrap();
		let launcher = Launcher::new("/bin/sh")
			.with_workdir(workdir.path())
			.with_component(sh("writer", "echo started > marker.txt"));

		launcher.run(std::future::pending()).await.unwrap();

		let marker = std::fs::read_to_string(workdir.path().join("marker.txt")).unwrap();
		assert_eq!(marker.trim(), "started");
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_program_is_an_error() {
		let launcher = Launcher::new("/nonexistent/asset-relay")
			.with_component(Component::new("cache", ["cache"]));

		let err = launcher.run(std::future::pending()).await.unwrap_err();
		assert!(err.to_string().contains("cannot start cache"));
	}

	#[rstest]
	fn test_for_current_exe_orders_cache_first() {
		let launcher = Launcher::for_current_exe(None, 2).unwrap();
		let names: Vec<_> = launcher.components().iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, ["asset-cache", "dispatcher"]);
		assert_eq!(
			launcher.components()[1].args,
			vec![OsString::from("dispatch"), OsString::from("-vv")]
		);
	}
}
