/*
 * Project::Nitro, a next-day NO2 forecaster with GUI
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::category::typedef::{CategoryPolicy, FixedThresholds};
use crate::error::ForecastError;

pub const DEFAULT_LAG_COUNT: usize = 3;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
	pub data_path: PathBuf,
	pub model_path: PathBuf,
	pub scaler_path: PathBuf,
	pub lag_count: usize,
	pub category_policy: CategoryPolicy,
	pub fixed_thresholds: FixedThresholds,
	pub preview_rows: usize,
}

impl Default for ForecastConfig {
	fn default() -> Self {
		Self {
			data_path: PathBuf::from("data_no2.csv"),
			model_path: PathBuf::from("model_h3.json"),
			scaler_path: PathBuf::from("scaler_h3.json"),
			lag_count: DEFAULT_LAG_COUNT,
			category_policy: CategoryPolicy::default(),
			fixed_thresholds: FixedThresholds::default(),
			preview_rows: DEFAULT_PREVIEW_ROWS,
		}
	}
}

impl ForecastConfig {
	/// Reads the config file if it exists, otherwise starts from defaults.
	/// Relative artifact paths are resolved against the config file's directory.
	pub fn load(path: &Path) -> Result<Self> {
		let config = if path.exists() {
			let contents = fs::read_to_string(path)
				.with_context(|| format!("Failed to read config from {}", path.display()))?;
			let mut config: ForecastConfig = serde_json::from_str(&contents)
				.with_context(|| format!("Failed to parse config in {}", path.display()))?;

			if let Some(base) = path.parent() {
				config.rebase(base);
			}

			config
		} else {
			log::info!(
				"No config at {}, falling back to defaults",
				path.display()
			);
			ForecastConfig::default()
		};

		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ForecastError> {
		if self.lag_count == 0 {
			return Err(ForecastError::invalid_config(
				"Lag count must be at least 1",
			));
		}

		self.fixed_thresholds.validate()
	}

	fn rebase(&mut self, base: &Path) {
		for each in [
			&mut self.data_path,
			&mut self.model_path,
			&mut self.scaler_path,
		] {
			if each.is_relative() {
				*each = base.join(&*each);
			}
		}
	}
}
