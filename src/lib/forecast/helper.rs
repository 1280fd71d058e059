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

use chrono::Days;

use super::typedef::*;
use crate::category::typedef::{CategoryBounds, CategoryPolicy, FixedThresholds};
use crate::config::ForecastConfig;
use crate::data::{helper::load_dataset, typedef::Dataset};
use crate::error::{ForecastError, ForecastResult};
use crate::model::typedef::{KnnRegressor, ModelArtifacts, Regressor, Scaler, StandardScaler};
use crate::preprocess::helper::{build_lag_features, parse_manual_values};
use crate::preprocess::typedef::FeatureVector;

pub type DefaultForecaster = Forecaster<StandardScaler, KnnRegressor>;

/// One interactive session: the loaded series plus the pre-trained scaler
/// and regressor. Nothing in here changes after construction.
pub struct Forecaster<S: Scaler, R: Regressor> {
	dataset: Dataset,
	scaler: S,
	regressor: R,
	lag_count: usize,
	policy: CategoryPolicy,
	thresholds: FixedThresholds,
}

impl<S: Scaler, R: Regressor> Forecaster<S, R> {
	pub fn new(
		dataset: Dataset,
		scaler: S,
		regressor: R,
		config: &ForecastConfig,
	) -> ForecastResult<Self> {
		config.validate()?;

		if scaler.width() != config.lag_count || regressor.width() != config.lag_count {
			return Err(ForecastError::model(format!(
				"Lag count is {} but the scaler takes {} and the model takes {} values",
				config.lag_count,
				scaler.width(),
				regressor.width()
			)));
		}

		if dataset.is_empty() {
			return Err(ForecastError::NoData {
				message: format!("\"{}\" holds no readings", dataset.name),
			});
		}

		Ok(Self {
			dataset,
			scaler,
			regressor,
			lag_count: config.lag_count,
			policy: config.category_policy,
			thresholds: config.fixed_thresholds,
		})
	}

	pub fn dataset(&self) -> &Dataset {
		&self.dataset
	}

	pub fn lag_count(&self) -> usize {
		self.lag_count
	}

	pub fn policy(&self) -> CategoryPolicy {
		self.policy
	}

	/// Both modes end up in the same lag window contract
	pub fn features(&self, mode: &PredictionMode) -> ForecastResult<FeatureVector> {
		match mode {
			PredictionMode::Auto => build_lag_features(&self.dataset.readings, self.lag_count),
			PredictionMode::Manual { values } => {
				parse_manual_values(values.as_slice(), self.lag_count)
			}
		}
	}

	/// Category bounds under the session's policy, computed over the whole series
	pub fn bounds(&self) -> ForecastResult<CategoryBounds> {
		self.policy
			.bounds(&self.dataset.concentrations(), &self.thresholds)
	}

	pub fn predict(&self, mode: &PredictionMode) -> ForecastResult<ForecastReport> {
		let features = self.features(mode)?;
		let scaled = self.scaler.transform(&features)?;
		let predicted = self.regressor.predict(&scaled)?;

		let bounds = self.bounds()?;
		let category = bounds.categorize(predicted)?;

		let target_date = match mode {
			PredictionMode::Auto => self
				.dataset
				.last_date()
				.and_then(|found| found.checked_add_days(Days::new(1))),
			PredictionMode::Manual { .. } => None,
		};

		log::info!(
			"Predicted {:.8} {} ({}) from {:?} in {} mode",
			predicted,
			CONCENTRATION_UNIT,
			category,
			features.values(),
			mode.kind()
		);

		Ok(ForecastReport {
			mode: mode.kind(),
			target_date,
			features,
			predicted,
			formatted: format_concentration(predicted),
			category,
			label: category.to_string(),
			indicator: category.indicator(),
			bounds,
			graph: self.prediction_graph(predicted, target_date),
		})
	}

	/// Last `preview_rows` readings plus the full series for the trend chart
	pub fn history(&self, preview_rows: usize) -> HistoryInfo {
		HistoryInfo {
			name: self.dataset.name.clone(),
			row_count: self.dataset.len(),
			dropped_row_count: self.dataset.dropped_row_indices.len(),
			lag_count: self.lag_count,
			preview: self.dataset.tail(preview_rows).to_vec(),
			graph: self
				.dataset
				.readings
				.iter()
				.map(|each| ComparisonPoint {
					x: each.date,
					y0: Some(each.concentration),
					y1: None,
				})
				.collect(),
		}
	}

	/// History with a flat forecast line across it, ending on the target day
	fn prediction_graph(
		&self,
		predicted: f64,
		target_date: Option<chrono::NaiveDate>,
	) -> Vec<ComparisonPoint> {
		self.dataset
			.readings
			.iter()
			.map(|each| ComparisonPoint {
				x: each.date,
				y0: Some(each.concentration),
				y1: Some(predicted),
			})
			.chain(target_date.map(|x| ComparisonPoint {
				x,
				y0: None,
				y1: Some(predicted),
			}))
			.collect()
	}
}

impl DefaultForecaster {
	pub fn from_artifacts(
		dataset: Dataset,
		artifacts: ModelArtifacts,
		config: &ForecastConfig,
	) -> ForecastResult<Self> {
		Self::new(dataset, artifacts.scaler, artifacts.regressor, config)
	}

	/// Load everything the config points at
	pub fn open(config: &ForecastConfig) -> ForecastResult<Self> {
		let artifacts = ModelArtifacts::load(&config.model_path, &config.scaler_path)?;
		let dataset = load_dataset(&config.data_path)?;

		Self::from_artifacts(dataset, artifacts, config)
	}
}

pub fn format_concentration(value: f64) -> String {
	format!("{:.8} {}", value, CONCENTRATION_UNIT)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::category::typedef::Category;
	use crate::typedef::Reading;
	use chrono::NaiveDate;

	/// Scaler that passes values through untouched
	struct Identity(usize);

	impl Scaler for Identity {
		fn width(&self) -> usize {
			self.0
		}

		fn transform(&self, features: &FeatureVector) -> ForecastResult<Vec<f64>> {
			Ok(features.values().to_vec())
		}
	}

	/// Predicts the newest lag value, i.e. persistence
	struct Persistence(usize);

	impl Regressor for Persistence {
		fn width(&self) -> usize {
			self.0
		}

		fn predict(&self, scaled: &[f64]) -> ForecastResult<f64> {
			scaled
				.last()
				.copied()
				.ok_or_else(|| ForecastError::model("empty input"))
		}
	}

	fn dataset(values: &[f64]) -> Dataset {
		let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
		Dataset::from_readings(
			"memory",
			values
				.iter()
				.zip(start.iter_days())
				.map(|(value, date)| Reading::new(date, *value))
				.collect(),
		)
	}

	fn forecaster(values: &[f64], policy: CategoryPolicy) -> Forecaster<Identity, Persistence> {
		let config = ForecastConfig {
			category_policy: policy,
			..Default::default()
		};
		Forecaster::new(dataset(values), Identity(3), Persistence(3), &config).unwrap()
	}

	#[test]
	fn test_auto_mode_uses_latest_readings() {
		let session = forecaster(&[1e-5, 2e-5, 3e-5, 4e-5, 5e-5], CategoryPolicy::Fixed);
		let report = session.predict(&PredictionMode::Auto).unwrap();

		assert_eq!(report.features.values(), &[3e-5, 4e-5, 5e-5]);
		assert_eq!(report.predicted, 5e-5);
		assert_eq!(report.category, Category::Unhealthy);
		assert_eq!(report.label, "Unhealthy");
		assert_eq!(report.indicator, "red");
		assert_eq!(report.target_date, NaiveDate::from_ymd_opt(2024, 5, 6));
		assert_eq!(report.formatted, "0.00005000 mol/m²");
	}

	#[test]
	fn test_manual_mode_goes_through_same_contract() {
		let session = forecaster(&[1e-5, 2e-5, 3e-5, 4e-5, 5e-5], CategoryPolicy::Quantile);
		let mode = PredictionMode::Manual {
			values: vec!["0".into(), "0".into(), "3e-5".into()],
		};

		let report = session.predict(&mode).unwrap();

		assert_eq!(report.mode, ModeKind::Manual);
		assert_eq!(report.target_date, None);
		assert_eq!(report.category, Category::Good);
		assert_eq!(
			report.bounds,
			CategoryBounds::Quantile(crate::category::typedef::QuantileBounds {
				median: 3e-5,
				upper_quartile: 4e-5,
			})
		);
	}

	#[test]
	fn test_manual_mode_rejects_bad_values() {
		let session = forecaster(&[1e-5, 2e-5, 3e-5], CategoryPolicy::Quantile);
		let mode = PredictionMode::Manual {
			values: vec!["1e-5".into(), "oops".into(), "1e-5".into()],
		};

		assert!(matches!(
			session.predict(&mode),
			Err(ForecastError::MalformedInput { .. })
		));
	}

	#[test]
	fn test_short_history_fails_auto_but_not_manual() {
		let session = forecaster(&[1e-5, 2e-5], CategoryPolicy::Quantile);

		assert!(matches!(
			session.predict(&PredictionMode::Auto),
			Err(ForecastError::InsufficientData {
				required: 3,
				available: 2
			})
		));

		let mode = PredictionMode::Manual {
			values: vec!["1e-5".into(), "1e-5".into(), "9e-5".into()],
		};
		assert_eq!(
			session.predict(&mode).unwrap().category,
			Category::Unhealthy
		);
	}

	#[test]
	fn test_width_mismatch_is_rejected() {
		let result = Forecaster::new(
			dataset(&[1.0, 2.0, 3.0]),
			Identity(2),
			Persistence(2),
			&ForecastConfig::default(),
		);

		assert!(matches!(result, Err(ForecastError::Model { .. })));
	}

	#[test]
	fn test_empty_dataset_is_rejected() {
		let result = Forecaster::new(
			dataset(&[]),
			Identity(3),
			Persistence(3),
			&ForecastConfig::default(),
		);

		assert!(matches!(result, Err(ForecastError::NoData { .. })));
	}

	#[test]
	fn test_graphs() {
		let session = forecaster(&[1.0, 2.0, 3.0, 4.0], CategoryPolicy::Quantile);

		let history = session.history(2);
		assert_eq!(history.row_count, 4);
		assert_eq!(history.preview.len(), 2);
		assert_eq!(history.preview[1].concentration, 4.0);
		assert!(history.graph.iter().all(|each| each.y1.is_none()));

		let report = session.predict(&PredictionMode::Auto).unwrap();
		assert_eq!(report.graph.len(), 5);
		assert!(report.graph.iter().all(|each| each.y1 == Some(4.0)));
		assert_eq!(report.graph.last().unwrap().y0, None);
	}

	#[test]
	fn test_repeated_predictions_agree() {
		let session = forecaster(&[1e-5, 6e-5, 2e-5, 3e-5], CategoryPolicy::Quantile);
		let first = session.predict(&PredictionMode::Auto).unwrap();
		let second = session.predict(&PredictionMode::Auto).unwrap();

		assert_eq!(first.category, second.category);
		assert_eq!(first.predicted, second.predicted);
	}
}
