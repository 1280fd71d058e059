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
use serde::Serialize;

use crate::typedef::Reading;

pub const DATE_COLUMN: &str = "date";
pub const CONCENTRATION_COLUMN: &str = "NO2";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SourceKind {
	Csv,
	Spreadsheet,
}

impl SourceKind {
	pub fn from_extension(extension: &str) -> Option<Self> {
		match extension.to_lowercase().as_str() {
			"csv" => Some(SourceKind::Csv),
			"xlsx" | "xls" | "xlsb" | "ods" => Some(SourceKind::Spreadsheet),
			_ => None,
		}
	}
}

/// Cells of one source row after locating the date and NO2 columns
pub(super) struct RawRow {
	pub date: Option<NaiveDate>,
	pub concentration: Option<f64>,
}

/// Historical series loaded once per session, sorted by date
#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
	pub name: String,
	pub readings: Vec<Reading>,
	pub dropped_row_indices: Vec<u64>,
}

impl Dataset {
	pub fn from_readings(name: impl Into<String>, mut readings: Vec<Reading>) -> Self {
		readings.sort_by_key(|each| each.date);

		Self {
			name: name.into(),
			readings,
			dropped_row_indices: Vec::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.readings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.readings.is_empty()
	}

	pub fn concentrations(&self) -> Vec<f64> {
		self.readings.iter().map(|each| each.concentration).collect()
	}

	pub fn last_date(&self) -> Option<NaiveDate> {
		self.readings.last().map(|each| each.date)
	}

	/// The most recent `count` readings, oldest first
	pub fn tail(&self, count: usize) -> &[Reading] {
		let offset = self.readings.len().saturating_sub(count);
		&self.readings[offset..]
	}
}
