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

use serde::Serialize;

/// Lag window fed to the scaler, oldest value first. `h1` names the oldest
/// value and `hN` the newest, matching the column names the model was
/// fitted on.
#[derive(Default, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
	values: Vec<f64>,
}

impl FeatureVector {
	pub(crate) fn new(values: Vec<f64>) -> Self {
		Self { values }
	}

	pub fn values(&self) -> &[f64] {
		&self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn newest(&self) -> Option<f64> {
		self.values.last().copied()
	}

	pub fn column_names(&self) -> Vec<String> {
		(1..=self.values.len()).map(|i| format!("h{}", i)).collect()
	}
}
