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

use super::typedef::*;
use crate::error::{ForecastError, ForecastResult};
use crate::typedef::Reading;

/// Take the `lag_count` most recent concentrations of a date-sorted series
pub fn build_lag_features(series: &[Reading], lag_count: usize) -> ForecastResult<FeatureVector> {
	let values = series
		.iter()
		.map(|each| each.concentration)
		.collect::<Vec<_>>();

	lag_window(&values, lag_count)
}

pub(crate) fn lag_window(values: &[f64], lag_count: usize) -> ForecastResult<FeatureVector> {
	if lag_count == 0 {
		return Err(ForecastError::invalid_config("Lag count must be at least 1"));
	}

	if values.len() < lag_count {
		return Err(ForecastError::InsufficientData {
			required: lag_count,
			available: values.len(),
		});
	}

	let offset = values.len() - lag_count;
	Ok(FeatureVector::new(values[offset..].to_vec()))
}

/// Parse values typed by the user, oldest first
pub fn parse_manual_values<S: AsRef<str>>(
	raw_values: &[S],
	lag_count: usize,
) -> ForecastResult<FeatureVector> {
	if raw_values.len() != lag_count {
		return Err(ForecastError::malformed_input(format!(
			"Expected {} values but {} were given",
			lag_count,
			raw_values.len()
		)));
	}

	let values = raw_values
		.iter()
		.enumerate()
		.map(|(index, raw)| parse_concentration(raw.as_ref(), index))
		.collect::<ForecastResult<Vec<_>>>()?;

	lag_window(&values, lag_count)
}

fn parse_concentration(raw: &str, index: usize) -> ForecastResult<f64> {
	let trimmed = raw.trim();
	let value = trimmed.parse::<f64>().map_err(|_| {
		ForecastError::malformed_input(format!(
			"Value h{} (\"{}\") is not a number",
			index + 1,
			trimmed
		))
	})?;

	if !value.is_finite() {
		return Err(ForecastError::malformed_input(format!(
			"Value h{} must be a finite number",
			index + 1
		)));
	}

	if value < 0f64 {
		return Err(ForecastError::malformed_input(format!(
			"Value h{} cannot be negative",
			index + 1
		)));
	}

	// "-0" passes the sign check above
	Ok(value.abs())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use proptest::prelude::*;

	fn series(values: &[f64]) -> Vec<Reading> {
		let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
		values
			.iter()
			.zip(start.iter_days())
			.map(|(value, date)| Reading::new(date, *value))
			.collect()
	}

	#[test]
	fn test_last_three_most_recent_last() {
		let features = build_lag_features(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3).unwrap();

		assert_eq!(features.values(), &[3.0, 4.0, 5.0]);
		assert_eq!(features.newest(), Some(5.0));
		assert_eq!(features.column_names(), vec!["h1", "h2", "h3"]);
	}

	#[test]
	fn test_exactly_enough_readings() {
		let features = build_lag_features(&series(&[1.0, 2.0, 3.0]), 3).unwrap();
		assert_eq!(features.values(), &[1.0, 2.0, 3.0]);
	}

	#[test]
	fn test_short_series_is_rejected() {
		let err = build_lag_features(&series(&[1.0, 2.0]), 3).unwrap_err();

		match err {
			ForecastError::InsufficientData {
				required,
				available,
			} => {
				assert_eq!(required, 3);
				assert_eq!(available, 2);
			}
			other => panic!("unexpected error: {other:?}"),
		}

		assert!(build_lag_features(&[], 3).is_err());
	}

	#[test]
	fn test_zero_lag_is_a_config_error() {
		let err = build_lag_features(&series(&[1.0]), 0).unwrap_err();
		assert!(matches!(err, ForecastError::InvalidConfig { .. }));
	}

	#[test]
	fn test_manual_values_are_parsed_in_order() {
		let features = parse_manual_values(&[" 0.00002", "3e-5", "0.00004 "], 3).unwrap();
		assert_eq!(features.values(), &[2e-5, 3e-5, 4e-5]);
	}

	#[test]
	fn test_manual_negative_zero_becomes_zero() {
		let features = parse_manual_values(&["-0", "0", "-0.0"], 3).unwrap();
		assert!(features.values().iter().all(|each| each.is_sign_positive()));
	}

	#[test]
	fn test_manual_values_rejections() {
		for raw in [
			vec!["0.1", "abc", "0.2"],
			vec!["0.1", "-0.2", "0.3"],
			vec!["0.1", "NaN", "0.3"],
			vec!["0.1", "inf", "0.3"],
			vec!["0.1", "0.2"],
			vec!["0.1", "0.2", "0.3", "0.4"],
		] {
			let err = parse_manual_values(&raw, 3).unwrap_err();
			assert!(
				matches!(err, ForecastError::MalformedInput { .. }),
				"{raw:?} gave {err:?}"
			);
		}
	}

	proptest! {
		#[test]
		fn prop_window_is_the_tail(
			values in prop::collection::vec(0f64..1e-3, 0..50),
			lag_count in 1usize..8,
		) {
			match build_lag_features(&series(&values), lag_count) {
				Ok(features) => {
					prop_assert_eq!(features.len(), lag_count);
					prop_assert_eq!(features.values(), &values[values.len() - lag_count..]);
				}
				Err(ForecastError::InsufficientData { required, available }) => {
					prop_assert!(values.len() < lag_count);
					prop_assert_eq!(required, lag_count);
					prop_assert_eq!(available, values.len());
				}
				Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
			}
		}
	}
}
