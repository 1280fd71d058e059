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

use serde::{Deserialize, Serialize};

use crate::error::ForecastResult;
use crate::preprocess::typedef::FeatureVector;

/// Normalizes a lag window before it reaches the regressor
pub trait Scaler {
	fn width(&self) -> usize;
	fn transform(&self, features: &FeatureVector) -> ForecastResult<Vec<f64>>;
}

/// Maps a scaled lag window to the next-day concentration
pub trait Regressor {
	fn width(&self) -> usize;
	fn predict(&self, scaled: &[f64]) -> ForecastResult<f64>;
}

/// Per-column standardization, `(x - mean) / scale`
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StandardScaler {
	#[serde(default)]
	pub feature_names: Vec<String>,
	pub mean: Vec<f64>,
	pub scale: Vec<f64>,
}

/// Uniform-weight k-nearest-neighbours regression over already scaled samples
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct KnnRegressor {
	pub n_neighbors: usize,
	pub samples: Vec<Vec<f64>>,
	pub targets: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct ModelArtifacts {
	pub scaler: StandardScaler,
	pub regressor: KnnRegressor,
}
