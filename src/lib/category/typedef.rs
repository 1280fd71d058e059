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
use strum_macros::EnumIter;

use crate::error::{ForecastError, ForecastResult};

/// Air quality severity, ordered from least to most severe
#[derive(
	Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Deserialize, Serialize, Clone, Copy, Debug,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
	#[default]
	Good,
	Moderate,
	Unhealthy,
	VeryUnhealthy,
}

impl Category {
	/// Colour of the badge next to the label
	pub fn indicator(&self) -> &'static str {
		match self {
			Category::Good => "green",
			Category::Moderate => "yellow",
			Category::Unhealthy => "red",
			Category::VeryUnhealthy => "purple",
		}
	}
}

impl std::fmt::Display for Category {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Category::Good => write!(f, "Good"),
			Category::Moderate => write!(f, "Moderate"),
			Category::Unhealthy => write!(f, "Unhealthy"),
			Category::VeryUnhealthy => write!(f, "Very Unhealthy"),
		}
	}
}

#[derive(Default, PartialEq, Eq, EnumIter, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum CategoryPolicy {
	/// Bounds come from the median and upper quartile of the loaded series
	#[default]
	Quantile,
	/// Absolute WHO-style thresholds
	Fixed,
}

impl std::fmt::Display for CategoryPolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CategoryPolicy::Quantile => write!(f, "quantile"),
			CategoryPolicy::Fixed => write!(f, "fixed"),
		}
	}
}

/// Upper bounds (exclusive) of each category, in mol/m²
#[derive(PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FixedThresholds {
	pub good_below: f64,
	pub moderate_below: f64,
	pub unhealthy_below: f64,
}

impl Default for FixedThresholds {
	fn default() -> Self {
		Self {
			good_below: 2.0e-5,
			moderate_below: 4.0e-5,
			unhealthy_below: 6.0e-5,
		}
	}
}

impl FixedThresholds {
	pub fn validate(&self) -> ForecastResult<()> {
		let bounds = [self.good_below, self.moderate_below, self.unhealthy_below];
		if bounds.iter().any(|each| !each.is_finite() || *each < 0f64) {
			return Err(ForecastError::invalid_config(
				"Fixed thresholds must be finite and non-negative",
			));
		}

		if !(bounds[0] < bounds[1] && bounds[1] < bounds[2]) {
			return Err(ForecastError::invalid_config(format!(
				"Fixed thresholds must be strictly ascending, got {:?}",
				bounds
			)));
		}

		Ok(())
	}
}

/// Inclusive upper bounds of Good and Moderate, taken from the whole series
#[derive(PartialEq, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuantileBounds {
	pub median: f64,
	pub upper_quartile: f64,
}

#[derive(PartialEq, Serialize, Clone, Copy, Debug)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum CategoryBounds {
	Quantile(QuantileBounds),
	Fixed(FixedThresholds),
}
