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

use std::{borrow::Cow, path::PathBuf, sync::Mutex};
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::{DialogExt, FilePath};

use super::helper::load_dataset;
use crate::forecast::helper::DefaultForecaster;
use crate::forecast::typedef::HistoryInfo;
use crate::typedef::{AppState, ErrorInfo};

/// Only local files can be loaded, a picked URL is a user-facing failure
fn source_path(file_path: FilePath) -> Result<PathBuf, ErrorInfo> {
	file_path.into_path().map_err(|err| ErrorInfo {
		title: Cow::Borrowed("Cannot Parse File Path"),
		message: err.to_string(),
	})
}

#[tauri::command]
pub(crate) async fn load_data(app: AppHandle, state: State<'_, Mutex<AppState>>) -> Result<(), ()> {
	let (tx, mut rx) = tauri::async_runtime::channel::<Option<FilePath>>(1024);

	app.dialog()
		.file()
		.set_title("Choose a historical NO2 data file")
		.add_filter(
			"Supported Spreadsheet File",
			&["csv", "xlsx", "xlsb", "xls", "ods"],
		)
		.add_filter("Comma-Separated Values (CSV) File", &["csv"])
		.add_filter("Microsoft Excel File", &["xlsx"])
		.add_filter("Microsoft Excel Binary File", &["xlsb"])
		.add_filter("Legacy Microsoft Excel File", &["xls"])
		.add_filter("OpenDocument Spreadsheet (ODS) File", &["ods"])
		.pick_file(move |file_path| {
			let _ = tx.blocking_send(file_path);
		});

	let file_path = match rx.recv().await {
		Some(Some(found)) => found,
		_ => return Ok(()),
	};

	let source_path = match source_path(file_path) {
		Ok(ok) => ok,
		Err(err) => {
			crate::report_error(&app, err);
			return Err(());
		}
	};

	let dataset = match load_dataset(&source_path) {
		Ok(ok) => ok,
		Err(err) => {
			crate::report_error(&app, err.into());
			return Err(());
		}
	};

	let mut guarded_state = match state.lock() {
		Ok(ok) => ok,
		Err(err) => {
			crate::report_error(
				&app,
				ErrorInfo {
					title: Cow::Borrowed("State Inaccessible on Load Data"),
					message: err.to_string(),
				},
			);
			return Err(());
		}
	};

	let artifacts = match guarded_state.artifacts.clone() {
		Some(found) => found,
		None => {
			crate::report_error(
				&app,
				ErrorInfo {
					title: Cow::Borrowed("Model Unusable"),
					message: format!(
						"Model artifacts \"{}\" and \"{}\" could not be loaded",
						guarded_state.config.model_path.display(),
						guarded_state.config.scaler_path.display()
					),
				},
			);
			return Err(());
		}
	};

	let session = match DefaultForecaster::from_artifacts(dataset, artifacts, &guarded_state.config)
	{
		Ok(ok) => ok,
		Err(err) => {
			crate::report_error(&app, err.into());
			return Err(());
		}
	};

	guarded_state.session = Some(session);
	guarded_state.last_report = None;
	guarded_state.page_index = 1;

	if let Err(err) = app.emit(crate::event::PAGE_MOVE, guarded_state.page_index) {
		crate::report_error(
			&app,
			ErrorInfo {
				title: Cow::Borrowed("Unable to Move Page after Load Data"),
				message: err.to_string(),
			},
		);
		guarded_state.session = None;
		guarded_state.page_index = 0;
	}

	Ok(())
}

#[tauri::command]
pub(crate) fn get_data_info(app: AppHandle, state: State<'_, Mutex<AppState>>) -> HistoryInfo {
	let guarded_state = match state.lock() {
		Ok(ok) => ok,
		Err(err) => {
			crate::report_error(
				&app,
				ErrorInfo {
					title: Cow::Borrowed("State Inaccessible on Getting Data"),
					message: err.to_string(),
				},
			);
			let _ = app.emit(crate::event::PAGE_MOVE, 0);
			return Default::default();
		}
	};

	// Fallback to Data page if no series was loaded yet
	match &guarded_state.session {
		Some(session) => session.history(guarded_state.config.preview_rows),
		None => {
			let _ = app.emit(crate::event::PAGE_MOVE, 0);
			Default::default()
		}
	}
}
