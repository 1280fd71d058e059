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

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::typedef::{Category, CategoryBounds};
use crate::preprocess::typedef::FeatureVector;
use crate::typedef::Reading;

pub const CONCENTRATION_UNIT: &str = "mol/m²";

/// Where the lag window comes from
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PredictionMode {
	/// The most recent readings of the loaded series
	Auto,
	/// Raw values typed by the user, oldest first
	Manual { values: Vec<String> },
}

impl PredictionMode {
	pub fn kind(&self) -> ModeKind {
		match self {
			PredictionMode::Auto => ModeKind::Auto,
			PredictionMode::Manual { .. } => ModeKind::Manual,
		}
	}
}

#[derive(Default, PartialEq, Eq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
	#[default]
	Auto,
	Manual,
}

impl std::fmt::Display for ModeKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ModeKind::Auto => write!(f, "auto"),
			ModeKind::Manual => write!(f, "manual"),
		}
	}
}

/// One x position of the chart, `y0` is history and `y1` is the forecast line
#[derive(Default, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPoint {
	pub x: NaiveDate,
	pub y0: Option<f64>,
	pub y1: Option<f64>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
	pub mode: ModeKind,
	/// Day after the last reading, only known in auto mode
	pub target_date: Option<NaiveDate>,
	pub features: FeatureVector,
	pub predicted: f64,
	pub formatted: String,
	pub category: Category,
	pub label: String,
	pub indicator: &'static str,
	pub bounds: CategoryBounds,
	pub graph: Vec<ComparisonPoint>,
}

#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInfo {
	pub name: String,
	pub row_count: usize,
	pub dropped_row_count: usize,
	pub lag_count: usize,
	pub preview: Vec<Reading>,
	pub graph: Vec<ComparisonPoint>,
}
