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

use std::{borrow::Cow, path::PathBuf};
use thiserror::Error;

use crate::typedef::ErrorInfo;

pub type ForecastResult<T> = Result<T, ForecastError>;

#[derive(Error, Debug)]
pub enum ForecastError {
	/// Fewer readings than the lag window needs
	#[error("Need at least {required} readings but only {available} are available")]
	InsufficientData { required: usize, available: usize },

	#[error("Column \"{column}\" does not exist in the source data")]
	MissingColumn { column: String },

	/// Manual entries or predicted values that cannot be used
	#[error("{message}")]
	MalformedInput { message: String },

	/// The source exists but holds nothing usable, or does not exist at all
	#[error("{message}")]
	NoData { message: String },

	/// The source could not be parsed as a table
	#[error("{message}")]
	MalformedData { message: String },

	#[error("Cannot parse \"{extension}\" file extension")]
	UnsupportedFormat { extension: String },

	#[error("{message}")]
	Model { message: String },

	#[error("{message}")]
	InvalidConfig { message: String },

	#[error("Cannot access \"{}\": {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl ForecastError {
	pub fn malformed_input(message: impl Into<String>) -> Self {
		ForecastError::MalformedInput {
			message: message.into(),
		}
	}

	pub fn model(message: impl Into<String>) -> Self {
		ForecastError::Model {
			message: message.into(),
		}
	}

	pub fn invalid_config(message: impl Into<String>) -> Self {
		ForecastError::InvalidConfig {
			message: message.into(),
		}
	}

	/// Short dialog title shown above the message
	pub fn title(&self) -> &'static str {
		match self {
			ForecastError::InsufficientData { .. } => "Not Enough Readings",
			ForecastError::MissingColumn { .. } => "Data is Incomplete",
			ForecastError::MalformedInput { .. } => "Invalid Input",
			ForecastError::NoData { .. } => "No Data Available",
			ForecastError::MalformedData { .. } => "Failed to Read Content",
			ForecastError::UnsupportedFormat { .. } => "File Type Unsupported",
			ForecastError::Model { .. } => "Model Unusable",
			ForecastError::InvalidConfig { .. } => "Invalid Configuration",
			ForecastError::Io { .. } => "Cannot Open File",
		}
	}
}

impl From<&ForecastError> for ErrorInfo {
	fn from(err: &ForecastError) -> Self {
		ErrorInfo {
			title: Cow::Borrowed(err.title()),
			message: err.to_string(),
		}
	}
}

impl From<ForecastError> for ErrorInfo {
	fn from(err: ForecastError) -> Self {
		ErrorInfo::from(&err)
	}
}
