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

use burn::{
	backend::{ndarray::NdArrayDevice, NdArray},
	tensor::{Tensor, TensorData},
};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

use super::typedef::*;
use crate::error::{ForecastError, ForecastResult};
use crate::preprocess::typedef::FeatureVector;

impl StandardScaler {
	pub fn validate(&self) -> ForecastResult<()> {
		if self.mean.is_empty() || self.mean.len() != self.scale.len() {
			return Err(ForecastError::model(format!(
				"Scaler has {} means and {} scales",
				self.mean.len(),
				self.scale.len()
			)));
		}

		if !self.feature_names.is_empty() && self.feature_names.len() != self.mean.len() {
			return Err(ForecastError::model(format!(
				"Scaler names {} features but holds {} columns",
				self.feature_names.len(),
				self.mean.len()
			)));
		}

		if self
			.scale
			.iter()
			.any(|each| !each.is_finite() || *each == 0f64)
		{
			return Err(ForecastError::model("Scaler holds a zero or non-finite scale"));
		}

		Ok(())
	}
}

impl Scaler for StandardScaler {
	fn width(&self) -> usize {
		self.mean.len()
	}

	fn transform(&self, features: &FeatureVector) -> ForecastResult<Vec<f64>> {
		if features.len() != self.width() {
			return Err(ForecastError::model(format!(
				"Scaler expects {} lag values but got {}",
				self.width(),
				features.len()
			)));
		}

		Ok(features
			.values()
			.iter()
			.zip(self.mean.iter().zip(&self.scale))
			.map(|(x, (mean, scale))| (x - mean) / scale)
			.collect())
	}
}

impl KnnRegressor {
	pub fn validate(&self) -> ForecastResult<()> {
		if self.n_neighbors == 0 {
			return Err(ForecastError::model("KNN needs at least one neighbour"));
		}

		if self.samples.is_empty() || self.samples.len() != self.targets.len() {
			return Err(ForecastError::model(format!(
				"KNN has {} samples and {} targets",
				self.samples.len(),
				self.targets.len()
			)));
		}

		let width = self.samples[0].len();
		if width == 0 || self.samples.iter().any(|each| each.len() != width) {
			return Err(ForecastError::model("KNN samples do not share one width"));
		}

		Ok(())
	}
}

impl Regressor for KnnRegressor {
	fn width(&self) -> usize {
		self.samples.first().map(|each| each.len()).unwrap_or_default()
	}

	fn predict(&self, scaled: &[f64]) -> ForecastResult<f64> {
		if scaled.len() != self.width() {
			return Err(ForecastError::model(format!(
				"Model expects {} scaled values but got {}",
				self.width(),
				scaled.len()
			)));
		}

		let distances = euclidean_distances(&self.samples, scaled)?;

		// Closest first, earlier samples win ties
		let mut order = (0..distances.len()).collect::<Vec<_>>();
		order.sort_by(|a, b| distances[*a].total_cmp(&distances[*b]).then(a.cmp(b)));

		let neighbour_count = self.n_neighbors.min(order.len());
		let sum = order
			.iter()
			.take(neighbour_count)
			.fold(0f64, |last_value, each| last_value + self.targets[*each]);

		Ok(sum / neighbour_count as f64)
	}
}

/// Distance from `query` to every row of `samples`, computed on the NdArray backend
pub(super) fn euclidean_distances(samples: &[Vec<f64>], query: &[f64]) -> ForecastResult<Vec<f64>> {
	let device = NdArrayDevice::Cpu;
	let row_count = samples.len();
	let width = query.len();

	let sample_tensor = Tensor::<NdArray<f64>, 2>::from_data(
		TensorData::new(
			samples
				.iter()
				.flatten()
				.copied()
				.collect::<Vec<_>>(),
			[row_count, width],
		),
		&device,
	);

	// One copy of the query per sample row
	let query_tensor = Tensor::<NdArray<f64>, 2>::from_data(
		TensorData::new(
			query
				.iter()
				.cycle()
				.take(row_count * width)
				.copied()
				.collect::<Vec<_>>(),
			[row_count, width],
		),
		&device,
	);

	let difference = sample_tensor.sub(query_tensor);
	difference
		.clone()
		.mul(difference)
		.sum_dim(1)
		.sqrt()
		.into_data()
		.to_vec::<f64>()
		.map_err(|err| ForecastError::model(format!("Cannot read distances: {:?}", err)))
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> ForecastResult<T> {
	let file = File::open(path).map_err(|source| ForecastError::Io {
		path: path.to_path_buf(),
		source,
	})?;

	serde_json::from_reader(BufReader::new(file)).map_err(|err| {
		ForecastError::model(format!("Cannot parse \"{}\": {}", path.display(), err))
	})
}

impl ModelArtifacts {
	pub fn new(scaler: StandardScaler, regressor: KnnRegressor) -> ForecastResult<Self> {
		scaler.validate()?;
		regressor.validate()?;

		if Scaler::width(&scaler) != Regressor::width(&regressor) {
			return Err(ForecastError::model(format!(
				"Scaler width {} does not match model width {}",
				Scaler::width(&scaler),
				Regressor::width(&regressor)
			)));
		}

		Ok(Self { scaler, regressor })
	}

	/// Load the scaler and KNN model exported next to the dataset
	pub fn load(model_path: &Path, scaler_path: &Path) -> ForecastResult<Self> {
		let regressor: KnnRegressor = read_artifact(model_path)?;
		let scaler: StandardScaler = read_artifact(scaler_path)?;
		let artifacts = Self::new(scaler, regressor)?;

		log::info!(
			"Loaded KNN model with {} samples (k = {}) from {}",
			artifacts.regressor.samples.len(),
			artifacts.regressor.n_neighbors,
			model_path.display()
		);

		Ok(artifacts)
	}

	/// Lag count the artifacts were fitted for
	pub fn width(&self) -> usize {
		Scaler::width(&self.scaler)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::preprocess::helper::parse_manual_values;
	use std::fs;

	fn regressor(n_neighbors: usize) -> KnnRegressor {
		KnnRegressor {
			n_neighbors,
			samples: vec![
				vec![0.0, 0.0, 0.0],
				vec![1.0, 1.0, 1.0],
				vec![10.0, 10.0, 10.0],
			],
			targets: vec![1.0, 2.0, 10.0],
		}
	}

	fn scaler() -> StandardScaler {
		StandardScaler {
			feature_names: vec!["h1".into(), "h2".into(), "h3".into()],
			mean: vec![1.0, 2.0, 3.0],
			scale: vec![2.0, 2.0, 4.0],
		}
	}

	#[test]
	fn test_scaler_standardizes_each_column() {
		let features = parse_manual_values(&["3", "2", "7"], 3).unwrap();
		assert_eq!(scaler().transform(&features).unwrap(), vec![1.0, 0.0, 1.0]);
	}

	#[test]
	fn test_scaler_rejects_other_widths() {
		let features = parse_manual_values(&["3", "2"], 2).unwrap();
		assert!(matches!(
			scaler().transform(&features),
			Err(ForecastError::Model { .. })
		));
	}

	#[test]
	fn test_distances() {
		let distances = euclidean_distances(&regressor(1).samples, &[0.0, 0.0, 0.0]).unwrap();

		assert_eq!(distances.len(), 3);
		assert!(distances[0].abs() < 1e-12);
		assert!((distances[1] - 3f64.sqrt()).abs() < 1e-12);
		assert!((distances[2] - 300f64.sqrt()).abs() < 1e-12);
	}

	#[test]
	fn test_knn_averages_nearest_targets() {
		let predicted = regressor(2).predict(&[0.1, 0.1, 0.1]).unwrap();
		assert!((predicted - 1.5).abs() < 1e-12);

		let predicted = regressor(1).predict(&[9.0, 9.0, 9.0]).unwrap();
		assert!((predicted - 10.0).abs() < 1e-12);
	}

	#[test]
	fn test_knn_with_more_neighbours_than_samples() {
		let predicted = regressor(5).predict(&[0.0, 0.0, 0.0]).unwrap();
		assert!((predicted - 13.0 / 3.0).abs() < 1e-12);
	}

	#[test]
	fn test_knn_ties_prefer_earlier_samples() {
		let model = KnnRegressor {
			n_neighbors: 1,
			samples: vec![vec![1.0], vec![-1.0]],
			targets: vec![4.0, 8.0],
		};

		assert_eq!(model.predict(&[0.0]).unwrap(), 4.0);
	}

	#[test]
	fn test_knn_separates_near_equal_samples() {
		let model = KnnRegressor {
			n_neighbors: 1,
			samples: vec![vec![1.00000001], vec![1.0]],
			targets: vec![4.0, 8.0],
		};

		assert_eq!(model.predict(&[0.0]).unwrap(), 8.0);
	}

	#[test]
	fn test_invalid_artifacts() {
		let mut broken = regressor(0);
		assert!(broken.validate().is_err());

		broken.n_neighbors = 1;
		broken.targets.pop();
		assert!(broken.validate().is_err());

		let mut broken = scaler();
		broken.scale[1] = 0.0;
		assert!(broken.validate().is_err());

		let narrow = KnnRegressor {
			n_neighbors: 1,
			samples: vec![vec![0.0, 0.0]],
			targets: vec![1.0],
		};
		assert!(ModelArtifacts::new(scaler(), narrow).is_err());
	}

	#[test]
	fn test_load_from_json() {
		let dir = tempfile::tempdir().unwrap();
		let model_path = dir.path().join("model_h3.json");
		let scaler_path = dir.path().join("scaler_h3.json");
		fs::write(&model_path, serde_json::to_string(&regressor(2)).unwrap()).unwrap();
		fs::write(
			&scaler_path,
			r#"{ "feature_names": ["h1", "h2", "h3"], "mean": [0, 0, 0], "scale": [1, 1, 1] }"#,
		)
		.unwrap();

		let artifacts = ModelArtifacts::load(&model_path, &scaler_path).unwrap();

		assert_eq!(artifacts.width(), 3);
		assert_eq!(artifacts.regressor, regressor(2));
	}

	#[test]
	fn test_load_missing_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let err = ModelArtifacts::load(&dir.path().join("model.json"), &dir.path().join("scaler.json"))
			.unwrap_err();

		assert!(matches!(err, ForecastError::Io { .. }));
	}
}
