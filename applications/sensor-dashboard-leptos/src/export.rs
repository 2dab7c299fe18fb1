//! History export as a CSV download

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::DashboardError;
use crate::format::{export_number, export_timing, format_datetime};
use crate::models::HistoryEntry;

/// One exported row. Column names come from the serde renames.
#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Current (A)")]
    current: String,
    #[serde(rename = "Voltage (V)")]
    voltage: String,
    #[serde(rename = "Timing")]
    timing: String,
    #[serde(rename = "Unit Consumption (kWh)")]
    unit_consumption: String,
}

impl From<&HistoryEntry> for CsvRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            timestamp: format_datetime(&entry.timestamp),
            current: export_number(entry.current),
            voltage: export_number(entry.voltage),
            timing: export_timing(entry.timing.as_ref()),
            unit_consumption: export_number(entry.unit_consumption),
        }
    }
}

/// Render the history as CSV: a header line and one line per entry in
/// recording order.
pub fn history_to_csv(history: &[HistoryEntry]) -> Result<String, DashboardError> {
    if history.is_empty() {
        return Err(DashboardError::NothingToExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for entry in history {
        writer.serialize(CsvRow::from(entry))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DashboardError::Csv(e.to_string()))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("esp32_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Hand the CSV to the browser as a file download
#[cfg(target_arch = "wasm32")]
pub fn download_csv(file_name: &str, contents: &str) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8;");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.style().set_property("visibility", "hidden")?;

    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;

    Ok(())
}
