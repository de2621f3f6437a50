/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Config;
use crate::itinerary::plan::PackageFile;
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

pub struct Filesystem;

impl Filesystem {
	pub fn new() -> Self {
		Self
	}

	/// Fetches the config from the given path, or default path if none.
	/// The boolean argument indicates whether key commands for rate sources
	/// should be executed, i.e. whether the network will be used.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
		expand_auth: bool,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => {
				let home_dir = home_dir()
					.ok_or_else(|| anyhow!("Unable to determine home directory"))?;
				home_dir.join(".config/tripfx/config.toml")
			},
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(config_path)?;
		let mut config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		if !expand_auth {
			return Ok(config);
		}

		// Execute api_key_cmd if applicable, and put result in api_key
		let sources = config
			.rates
			.as_mut()
			.and_then(|r| r.sources.as_mut());

		for source in sources.into_iter().flatten() {
			let name = source.name.clone().unwrap_or(source.url.clone());

			if source.api_key_cmd.is_some() && source.api_key.is_some() {
				bail!(
					"Only one of api_key and api_key_cmd may be specified for rate source {}",
					name
				)
			}

			if let Some(api_key_cmd) = &source.api_key_cmd {
				source.api_key = Some(run_key_command(&name, api_key_cmd)?);
			}
		}

		Ok(config)
	}

	pub fn load_package(&self, file_path: &str) -> Result<PackageFile, Error> {
		let content = fs::read_to_string(file_path)
			.map_err(|e| anyhow!("failed to read {}: {}", file_path, e))?;
		toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse package {}: {}", file_path, e))
	}
}

fn run_key_command(source: &str, cmd: &str) -> Result<String, Error> {
	let output = Command::new("sh")
		.arg("-c")
		.arg(cmd)
		.output()
		.map_err(|e| anyhow!("failed to execute api_key_cmd: {}", e))?;

	if !output.status.success() {
		bail!(
			"api_key_cmd for {} failed with status {}: {}",
			source,
			output.status,
			String::from_utf8_lossy(&output.stderr)
		);
	}

	Ok(String::from_utf8(output.stdout)
		.map_err(|e| anyhow!("failed to parse command output: {}", e))?
		.trim()
		.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn write_config(content: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	fn path_of(file: &tempfile::NamedTempFile) -> String {
		file.path().to_string_lossy().to_string()
	}

	#[test]
	fn test_empty_config() {
		let file = write_config("");
		let config = Filesystem::new()
			.get_config(Some(&path_of(&file)), true)
			.unwrap();
		assert!(config.locale.is_none());
		assert!(config.rates.is_none());
	}

	#[test]
	fn test_key_command_expanded() {
		let file = write_config(
			r#"
			locale = "en-IN"

			[[rates.sources]]
			name = "host"
			url = "https://api.exchangerate.host/latest"
			api_key_cmd = "echo ' s3cret '"
			"#,
		);

		let config = Filesystem::new()
			.get_config(Some(&path_of(&file)), true)
			.unwrap();
		let sources = config.rates.unwrap().sources.unwrap();
		assert_eq!(sources[0].api_key.as_deref(), Some("s3cret"));
	}

	#[test]
	fn test_key_command_not_run_offline() {
		let file = write_config(
			r#"
			[[rates.sources]]
			url = "https://api.exchangerate.host/latest"
			api_key_cmd = "exit 1"
			"#,
		);

		let config = Filesystem::new()
			.get_config(Some(&path_of(&file)), false)
			.unwrap();
		let sources = config.rates.unwrap().sources.unwrap();
		assert!(sources[0].api_key.is_none());
	}

	#[test]
	fn test_key_and_command_conflict() {
		let file = write_config(
			r#"
			[[rates.sources]]
			url = "https://api.exchangerate.host/latest"
			api_key = "a"
			api_key_cmd = "echo b"
			"#,
		);

		assert!(Filesystem::new()
			.get_config(Some(&path_of(&file)), true)
			.is_err());
	}

	#[test]
	fn test_failing_key_command() {
		let file = write_config(
			r#"
			[[rates.sources]]
			url = "https://api.exchangerate.host/latest"
			api_key_cmd = "exit 3"
			"#,
		);

		assert!(Filesystem::new()
			.get_config(Some(&path_of(&file)), true)
			.is_err());
	}

	#[test]
	fn test_bad_config_is_an_error() {
		let file = write_config("locale = [");
		assert!(Filesystem::new()
			.get_config(Some(&path_of(&file)), false)
			.is_err());
	}

	#[test]
	fn test_missing_package_file() {
		assert!(Filesystem::new()
			.load_package("does/not/exist.toml")
			.is_err());
	}
}
