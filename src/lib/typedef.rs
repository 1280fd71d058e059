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
use std::borrow::Cow;

#[derive(Default, Serialize, Clone, Debug)]
pub struct ErrorInfo {
	pub title: Cow<'static, str>,
	pub message: String,
}

/// One daily NO2 observation, in mol/m²
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
	pub date: NaiveDate,
	pub concentration: f64,
}

impl Reading {
	pub fn new(date: NaiveDate, concentration: f64) -> Self {
		Self {
			date,
			concentration,
		}
	}
}

#[cfg(feature = "gui")]
#[derive(Default)]
pub(crate) struct AppState {
	pub config: crate::config::ForecastConfig,
	pub artifacts: Option<crate::model::typedef::ModelArtifacts>,
	pub session: Option<crate::forecast::helper::DefaultForecaster>,
	pub last_report: Option<crate::forecast::typedef::ForecastReport>,
	pub page_index: u8,
}
