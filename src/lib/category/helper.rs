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

use strum::IntoEnumIterator;

use super::typedef::*;
use crate::error::{ForecastError, ForecastResult};

/// Quantile of an ascending slice, interpolating linearly between the two
/// closest ranks. Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
	let last_index = sorted.len().checked_sub(1)?;
	let position = q.clamp(0f64, 1f64) * last_index as f64;
	let lower = position.floor() as usize;
	let upper = position.ceil() as usize;
	let fraction = position - lower as f64;

	Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

impl QuantileBounds {
	/// Median and 75th percentile of every finite value in the series
	pub fn from_values(values: &[f64]) -> ForecastResult<Self> {
		let mut sorted = values
			.iter()
			.copied()
			.filter(|each| each.is_finite())
			.collect::<Vec<_>>();
		sorted.sort_by(f64::total_cmp);

		match (quantile(&sorted, 0.5), quantile(&sorted, 0.75)) {
			(Some(median), Some(upper_quartile)) => Ok(Self {
				median,
				upper_quartile,
			}),
			_ => Err(ForecastError::InsufficientData {
				required: 1,
				available: 0,
			}),
		}
	}

	/// Ties go to the less severe side
	pub fn categorize(&self, value: f64) -> Category {
		if value <= self.median {
			Category::Good
		} else if value <= self.upper_quartile {
			Category::Moderate
		} else {
			Category::Unhealthy
		}
	}
}

impl FixedThresholds {
	/// Each bound belongs to the more severe category
	pub fn categorize(&self, value: f64) -> Category {
		if value < self.good_below {
			Category::Good
		} else if value < self.moderate_below {
			Category::Moderate
		} else if value < self.unhealthy_below {
			Category::Unhealthy
		} else {
			Category::VeryUnhealthy
		}
	}
}

impl CategoryPolicy {
	/// Categories this policy is able to produce, least severe first
	pub fn categories(&self) -> Vec<Category> {
		match self {
			CategoryPolicy::Quantile => Category::iter().take(3).collect(),
			CategoryPolicy::Fixed => Category::iter().collect(),
		}
	}

	/// Resolve the bounds for this policy. Only the quantile policy looks at `history`.
	pub fn bounds(
		&self,
		history: &[f64],
		thresholds: &FixedThresholds,
	) -> ForecastResult<CategoryBounds> {
		match self {
			CategoryPolicy::Quantile => Ok(CategoryBounds::Quantile(
				QuantileBounds::from_values(history)?,
			)),
			CategoryPolicy::Fixed => Ok(CategoryBounds::Fixed(*thresholds)),
		}
	}
}

impl CategoryBounds {
	pub fn categorize(&self, value: f64) -> ForecastResult<Category> {
		if value.is_nan() {
			return Err(ForecastError::malformed_input(
				"Cannot categorize a concentration that is not a number",
			));
		}

		Ok(match self {
			CategoryBounds::Quantile(bounds) => bounds.categorize(value),
			CategoryBounds::Fixed(thresholds) => thresholds.categorize(value),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[test]
	fn test_quantile_interpolates_like_pandas() {
		let sorted = [1f64, 2f64, 3f64, 4f64];

		assert_eq!(quantile(&sorted, 0.5), Some(2.5));
		assert_eq!(quantile(&sorted, 0.75), Some(3.25));
		assert_eq!(quantile(&sorted, 0.0), Some(1.0));
		assert_eq!(quantile(&sorted, 1.0), Some(4.0));
		assert_eq!(quantile(&[], 0.5), None);
		assert_eq!(quantile(&[7f64], 0.75), Some(7.0));
	}

	#[test]
	fn test_bounds_ignore_order_and_nan() {
		let bounds = QuantileBounds::from_values(&[5.0, f64::NAN, 1.0, 4.0, 2.0, 3.0]).unwrap();

		assert_eq!(bounds.median, 3.0);
		assert_eq!(bounds.upper_quartile, 4.0);
	}

	#[test]
	fn test_bounds_of_empty_series() {
		let err = QuantileBounds::from_values(&[]).unwrap_err();
		assert!(matches!(err, ForecastError::InsufficientData { .. }));
	}

	#[rstest]
	#[case(1.0e-5, Category::Good)]
	#[case(1.99e-5, Category::Good)]
	#[case(2.0e-5, Category::Moderate)]
	#[case(3.0e-5, Category::Moderate)]
	#[case(4.0e-5, Category::Unhealthy)]
	#[case(5.0e-5, Category::Unhealthy)]
	#[case(6.0e-5, Category::VeryUnhealthy)]
	#[case(7.0e-5, Category::VeryUnhealthy)]
	fn test_fixed_thresholds(#[case] value: f64, #[case] expected: Category) {
		assert_eq!(FixedThresholds::default().categorize(value), expected);
	}

	#[test]
	fn test_quantile_policy_boundaries() {
		let history = [1.0, 2.0, 3.0, 4.0, 5.0];
		let bounds = CategoryPolicy::Quantile
			.bounds(&history, &FixedThresholds::default())
			.unwrap();

		let (median, upper_quartile) = match bounds {
			CategoryBounds::Quantile(found) => (found.median, found.upper_quartile),
			CategoryBounds::Fixed(_) => unreachable!(),
		};
		assert_eq!(median, 3.0);
		assert_eq!(upper_quartile, 4.0);

		assert_eq!(bounds.categorize(median).unwrap(), Category::Good);
		assert_eq!(
			bounds.categorize((median + upper_quartile) / 2.0).unwrap(),
			Category::Moderate
		);
		assert_eq!(bounds.categorize(upper_quartile).unwrap(), Category::Moderate);
		assert_eq!(bounds.categorize(4.5).unwrap(), Category::Unhealthy);
		assert_eq!(bounds.categorize(1e9).unwrap(), Category::Unhealthy);
	}

	#[test]
	fn test_nan_is_rejected() {
		let bounds = CategoryBounds::Fixed(FixedThresholds::default());
		assert!(matches!(
			bounds.categorize(f64::NAN),
			Err(ForecastError::MalformedInput { .. })
		));
	}

	#[test]
	fn test_reachable_categories() {
		assert_eq!(
			CategoryPolicy::Quantile.categories(),
			vec![Category::Good, Category::Moderate, Category::Unhealthy]
		);
		assert_eq!(CategoryPolicy::Fixed.categories().len(), 4);
	}

	#[test]
	fn test_thresholds_must_ascend() {
		let thresholds = FixedThresholds {
			good_below: 4.0e-5,
			moderate_below: 2.0e-5,
			unhealthy_below: 6.0e-5,
		};
		assert!(thresholds.validate().is_err());
		assert!(FixedThresholds::default().validate().is_ok());
	}

	proptest! {
		#[test]
		fn prop_categorize_is_idempotent(
			value in 0f64..1e-4,
			history in prop::collection::vec(0f64..1e-4, 1..64),
		) {
			for policy in CategoryPolicy::iter() {
				let bounds = policy.bounds(&history, &FixedThresholds::default()).unwrap();
				let first = bounds.categorize(value).unwrap();
				let second = bounds.categorize(value).unwrap();

				prop_assert_eq!(first, second);
				prop_assert!(policy.categories().contains(&first));
			}
		}

		#[test]
		fn prop_severity_never_decreases(a in 0f64..1e-4, b in 0f64..1e-4) {
			let (low, high) = if a <= b { (a, b) } else { (b, a) };
			let thresholds = FixedThresholds::default();

			prop_assert!(thresholds.categorize(low) <= thresholds.categorize(high));
		}
	}
}
