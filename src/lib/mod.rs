#![recursion_limit = "256"]

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

pub mod category;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod model;
pub mod preprocess;
pub mod typedef;

pub use category::typedef::{Category, CategoryPolicy};
pub use config::ForecastConfig;
pub use error::{ForecastError, ForecastResult};
pub use forecast::helper::{DefaultForecaster, Forecaster};
pub use forecast::typedef::{ForecastReport, PredictionMode};
pub use typedef::Reading;

#[cfg(feature = "gui")]
mod event;

#[cfg(feature = "gui")]
pub use shell::run;

#[cfg(feature = "gui")]
mod shell {
	use std::{borrow::Cow, path::Path, sync::Mutex};
	use tauri::{AppHandle, Emitter, Manager, State};

	use crate::config::ForecastConfig;
	use crate::data::command::*;
	use crate::data::helper::load_dataset;
	use crate::forecast::command::*;
	use crate::forecast::helper::DefaultForecaster;
	use crate::model::typedef::ModelArtifacts;
	use crate::typedef::{AppState, ErrorInfo};

	const CONFIG_FILE: &str = "nitro.json";

	pub(crate) fn report_error(app: &AppHandle, info: ErrorInfo) {
		log::warn!("{}: {}", info.title, info.message);
		let _ = app.emit::<ErrorInfo>(crate::event::DIALOG_ERROR, info);
	}

	#[tauri::command]
	fn get_page_index(state: State<'_, Mutex<AppState>>) -> u8 {
		state
			.lock()
			.map(|guarded_state| guarded_state.page_index)
			.unwrap_or_default()
	}

	#[tauri::command]
	fn restart(app: AppHandle, state: State<'_, Mutex<AppState>>) {
		let mut guarded_state = match state.lock() {
			Ok(ok) => ok,
			Err(err) => {
				report_error(
					&app,
					ErrorInfo {
						title: Cow::Borrowed("State Inaccessible on Restart"),
						message: err.to_string(),
					},
				);
				return;
			}
		};

		// Model artifacts and config survive a restart, the series does not
		guarded_state.session = None;
		guarded_state.last_report = None;
		guarded_state.page_index = 0;
		let _ = app.emit(crate::event::PAGE_MOVE, guarded_state.page_index);
	}

	/// Config, artifacts and the default series are read once at start-up
	fn initial_state() -> AppState {
		let config = match ForecastConfig::load(Path::new(CONFIG_FILE)) {
			Ok(ok) => ok,
			Err(err) => {
				log::warn!("Ignoring {}: {:#}", CONFIG_FILE, err);
				ForecastConfig::default()
			}
		};

		let artifacts = match ModelArtifacts::load(&config.model_path, &config.scaler_path) {
			Ok(ok) => Some(ok),
			Err(err) => {
				log::warn!("Model artifacts unavailable: {}", err);
				None
			}
		};

		let session = artifacts.clone().and_then(|artifacts| {
			let dataset = load_dataset(&config.data_path)
				.map_err(|err| log::warn!("Default series unavailable: {}", err))
				.ok()?;

			DefaultForecaster::from_artifacts(dataset, artifacts, &config)
				.map_err(|err| log::warn!("Cannot start a session: {}", err))
				.ok()
		});

		let page_index = if session.is_some() { 1 } else { 0 };

		AppState {
			config,
			artifacts,
			session,
			last_report: None,
			page_index,
		}
	}

	#[cfg_attr(mobile, tauri::mobile_entry_point)]
	pub fn run() {
		env_logger::Builder::from_default_env()
			.filter_level(log::LevelFilter::Info)
			.init();

		tauri::Builder::default()
			.plugin(tauri_plugin_opener::init())
			.plugin(tauri_plugin_dialog::init())
			.invoke_handler(tauri::generate_handler![
				get_page_index,
				load_data,
				get_data_info,
				predict_next_day,
				get_last_report,
				restart
			])
			.setup(|app| {
				app.manage(Mutex::new(initial_state()));
				Ok(())
			})
			.run(tauri::generate_context!())
			.expect("error while running tauri application");
	}
}

#[cfg(feature = "gui")]
pub(crate) use shell::report_error;
