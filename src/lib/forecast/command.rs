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

use std::{borrow::Cow, sync::Mutex};
use tauri::{AppHandle, Emitter, State};

use super::typedef::*;
use crate::typedef::{AppState, ErrorInfo};

#[tauri::command]
pub(crate) fn predict_next_day(
	app: AppHandle,
	state: State<'_, Mutex<AppState>>,
	mode: PredictionMode,
) -> Result<ForecastReport, ()> {
	let mut guarded_state = match state.lock() {
		Ok(ok) => ok,
		Err(err) => {
			let _ = app.emit(crate::event::CORE_PANIC, ());
			crate::report_error(
				&app,
				ErrorInfo {
					title: Cow::Borrowed("State Inaccessible before Prediction"),
					message: err.to_string(),
				},
			);
			return Err(());
		}
	};

	let session = match &guarded_state.session {
		Some(found) => found,
		None => {
			guarded_state.page_index = 0;
			let _ = app.emit(crate::event::PAGE_MOVE, guarded_state.page_index);
			return Err(());
		}
	};

	// Every request stands alone, a failed one leaves the session as it was
	match session.predict(&mode) {
		Ok(report) => {
			guarded_state.last_report = Some(report.clone());
			Ok(report)
		}
		Err(err) => {
			log::warn!("Prediction in {} mode failed: {}", mode.kind(), err);
			crate::report_error(&app, err.into());
			Err(())
		}
	}
}

#[tauri::command]
pub(crate) fn get_last_report(state: State<'_, Mutex<AppState>>) -> Option<ForecastReport> {
	state
		.lock()
		.ok()
		.and_then(|guarded_state| guarded_state.last_report.clone())
}
