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

use calamine::{DataType, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use parse_datetime::parse_datetime;
use std::{collections::HashSet, path::Path};

use super::typedef::*;
use crate::error::{ForecastError, ForecastResult};
use crate::typedef::Reading;

/// Read the historical series from a CSV or spreadsheet file
pub fn load_dataset(path: &Path) -> ForecastResult<Dataset> {
	if !path.exists() {
		return Err(ForecastError::NoData {
			message: format!("\"{}\" does not exist", path.display()),
		});
	}

	let extension = path
		.extension()
		.and_then(|found| found.to_str())
		.unwrap_or_default();

	let kind = match SourceKind::from_extension(extension) {
		Some(found) => found,
		None => {
			return Err(ForecastError::UnsupportedFormat {
				extension: extension.to_string(),
			})
		}
	};

	let rows = match kind {
		SourceKind::Csv => read_csv_rows(path)?,
		SourceKind::Spreadsheet => read_spreadsheet_rows(path)?,
	};

	let name = path
		.file_name()
		.and_then(|name| Some(name.to_str()?.to_string()))
		.unwrap_or(String::from("(unknown)"));

	let dataset = assemble_dataset(name, rows)?;
	log::info!(
		"Loaded {} readings from {} ({} rows dropped)",
		dataset.len(),
		path.display(),
		dataset.dropped_row_indices.len()
	);

	Ok(dataset)
}

pub(super) fn read_csv_rows(path: &Path) -> ForecastResult<Vec<RawRow>> {
	let mut reader = csv::Reader::from_path(path).map_err(|err| ForecastError::MalformedData {
		message: err.to_string(),
	})?;

	let headers = reader
		.headers()
		.map_err(|err| ForecastError::MalformedData {
			message: err.to_string(),
		})?
		.iter()
		.map(|each| each.to_string())
		.collect::<Vec<_>>();

	if headers.iter().all(|each| each.trim().is_empty()) {
		return Err(ForecastError::NoData {
			message: format!("\"{}\" is empty", path.display()),
		});
	}

	let (date_index, concentration_index) = locate_columns(&headers)?;

	reader
		.records()
		.map(|each| {
			let row = each.map_err(|err| ForecastError::MalformedData {
				message: err.to_string(),
			})?;

			Ok(RawRow {
				date: row.get(date_index).and_then(parse_date),
				concentration: row.get(concentration_index).and_then(parse_number),
			})
		})
		.collect()
}

pub(super) fn read_spreadsheet_rows(path: &Path) -> ForecastResult<Vec<RawRow>> {
	let mut sheets = calamine::open_workbook_auto(path).map_err(|err| {
		ForecastError::MalformedData {
			message: err.to_string(),
		}
	})?;

	// Same as the CSV layout, the readings live in the first tab
	let first_tab = match sheets.sheet_names().first().cloned() {
		Some(found) => found,
		None => {
			return Err(ForecastError::NoData {
				message: format!("\"{}\" has no sheet", path.display()),
			})
		}
	};

	let sheet = sheets
		.worksheet_range(&first_tab)
		.map_err(|err| ForecastError::MalformedData {
			message: err.to_string(),
		})?;

	let headers = match sheet.headers() {
		Some(found) => found,
		None => {
			return Err(ForecastError::NoData {
				message: format!("Sheet \"{}\" is empty", first_tab),
			})
		}
	};

	let (date_index, concentration_index) = locate_columns(&headers)?;

	let rows = sheet
		.rows()
		.skip(1) // Skip header row
		.map(|each_row| RawRow {
			date: each_row.get(date_index).and_then(|cell| {
				cell.as_date()
					.or_else(|| parse_date(cell.to_string().as_str()))
			}),
			concentration: each_row.get(concentration_index).and_then(|cell| {
				cell.as_f64()
					.or_else(|| parse_number(cell.to_string().as_str()))
			}),
		})
		.collect::<Vec<_>>();

	Ok(rows)
}

/// Header lookup ignores case and surrounding whitespace
pub(super) fn locate_columns(headers: &[String]) -> ForecastResult<(usize, usize)> {
	let find = |name: &str| {
		headers
			.iter()
			.position(|each| each.trim().eq_ignore_ascii_case(name))
			.ok_or_else(|| ForecastError::MissingColumn {
				column: name.to_string(),
			})
	};

	Ok((find(DATE_COLUMN)?, find(CONCENTRATION_COLUMN)?))
}

pub(super) fn parse_date(cell: &str) -> Option<NaiveDate> {
	let trimmed = cell.trim();
	if trimmed.is_empty() {
		return None;
	}

	if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
		return Some(date);
	}

	if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
		return Some(datetime.date());
	}

	// Anything else goes through the free-form parser, keeping the day as written
	Some(parse_datetime(trimmed).ok()?.date_naive())
}

pub(super) fn parse_number(cell: &str) -> Option<f64> {
	cell.trim().parse::<f64>().ok()
}

/// Drop unusable rows, then sort what is left by date
pub(super) fn assemble_dataset(name: String, rows: Vec<RawRow>) -> ForecastResult<Dataset> {
	let source_row_count = rows.len();
	let mut dropped_row_indices = Vec::<u64>::new();

	let mut readings = rows
		.into_iter()
		.enumerate()
		.filter_map(|(row_index, each)| {
			let reading = match (each.date, each.concentration) {
				(Some(date), Some(concentration))
					if concentration.is_finite() && concentration >= 0f64 =>
				{
					Some(Reading::new(date, concentration.abs()))
				}
				_ => None,
			};

			if reading.is_none() {
				dropped_row_indices.push(row_index as u64);
			}

			reading
		})
		.collect::<Vec<_>>();

	if readings.is_empty() {
		return Err(ForecastError::NoData {
			message: if source_row_count == 0 {
				format!("\"{}\" has a header but no rows", name)
			} else {
				format!(
					"None of the {} rows in \"{}\" has a valid date and NO2 value",
					source_row_count, name
				)
			},
		});
	}

	if !dropped_row_indices.is_empty() {
		log::warn!(
			"Dropped {} of {} rows from {} because of unparseable or negative cells",
			dropped_row_indices.len(),
			source_row_count,
			name
		);
	}

	readings.sort_by_key(|each| each.date);

	let mut seen = HashSet::with_capacity(readings.len());
	let duplicate_count = readings
		.iter()
		.filter(|each| !seen.insert(each.date))
		.count();
	if duplicate_count > 0 {
		log::warn!("{} has {} duplicated dates", name, duplicate_count);
	}

	Ok(Dataset {
		name,
		readings,
		dropped_row_indices,
	})
}
