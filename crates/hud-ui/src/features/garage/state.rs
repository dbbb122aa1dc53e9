//! Garage vehicle list.

use serde::Deserialize;
use serde_json::Value;

use crate::effects::{HostRequest, UiEffect};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Vehicle {
    pub plate: String,
    pub model: String,
    #[serde(default)]
    pub stored: bool,
    #[serde(default)]
    pub fuel: f64,
    #[serde(default)]
    pub owned: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleFilter {
    #[default]
    All,
    Owned,
    Stored,
}

impl VehicleFilter {
    fn matches(self, vehicle: &Vehicle) -> bool {
        match self {
            VehicleFilter::All => true,
            VehicleFilter::Owned => vehicle.owned,
            VehicleFilter::Stored => vehicle.stored,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VehiclesReply {
    vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GarageState {
    is_open: bool,
    is_loading: bool,
    vehicles: Vec<Vehicle>,
    selected: Option<String>,
    filter: VehicleFilter,
}

impl GarageState {
    pub fn open(&mut self) -> Vec<UiEffect> {
        self.is_open = true;
        self.is_loading = true;
        vec![UiEffect::Request(HostRequest::GarageVehicles)]
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.selected = None;
        self.filter = VehicleFilter::All;
    }

    /// Replaces the list from a `garage:getVehicles` reply.
    pub fn apply_vehicles(&mut self, data: &Value) {
        self.is_loading = false;
        match VehiclesReply::deserialize(data) {
            Ok(reply) => self.vehicles = reply.vehicles,
            Err(e) => tracing::warn!(error = %e, "malformed vehicle list"),
        }
    }

    /// The vehicle request failed; the previous list stays.
    pub fn loading_failed(&mut self) {
        self.is_loading = false;
    }

    pub fn select_vehicle(&mut self, plate: impl Into<String>) {
        self.selected = Some(plate.into());
    }

    pub fn set_filter(&mut self, filter: VehicleFilter) {
        self.filter = filter;
    }

    pub fn filtered_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        let filter = self.filter;
        self.vehicles.iter().filter(move |v| filter.matches(v))
    }

    pub fn selected_vehicle_data(&self) -> Option<&Vehicle> {
        let plate = self.selected.as_deref()?;
        self.vehicles.iter().find(|v| v.plate == plate)
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn filter(&self) -> VehicleFilter {
        self.filter
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn loaded() -> GarageState {
        let mut garage = GarageState::default();
        garage.open();
        garage.apply_vehicles(&json!({"vehicles": [
            {"plate": "ABC123", "model": "Adder", "stored": true, "fuel": 85, "owned": true},
            {"plate": "XYZ789", "model": "T20", "stored": false, "fuel": 60, "owned": true},
            {"plate": "RENT01", "model": "Panto", "stored": true, "fuel": 20, "owned": false}
        ]}));
        garage
    }

    #[test]
    fn test_open_sets_loading_until_reply() {
        let mut garage = GarageState::default();
        assert_eq!(
            garage.open(),
            vec![UiEffect::Request(HostRequest::GarageVehicles)]
        );
        assert!(garage.is_loading());
        garage.loading_failed();
        assert!(!garage.is_loading());
    }

    #[test]
    fn test_filters() {
        let mut garage = loaded();
        assert_eq!(garage.filtered_vehicles().count(), 3);
        garage.set_filter(VehicleFilter::Owned);
        assert_eq!(garage.filtered_vehicles().count(), 2);
        garage.set_filter(VehicleFilter::Stored);
        let plates: Vec<_> = garage.filtered_vehicles().map(|v| v.plate.as_str()).collect();
        assert_eq!(plates, vec!["ABC123", "RENT01"]);
    }

    #[test]
    fn test_close_resets_selection_and_filter() {
        let mut garage = loaded();
        garage.select_vehicle("XYZ789");
        garage.set_filter(VehicleFilter::Owned);
        assert_eq!(garage.selected_vehicle_data().unwrap().model, "T20");

        garage.close();
        assert!(garage.selected_vehicle_data().is_none());
        assert_eq!(garage.filter(), VehicleFilter::All);
        assert_eq!(garage.vehicles().len(), 3);
    }

    #[test]
    fn test_reply_without_vehicles_clears_list() {
        let mut garage = loaded();
        garage.apply_vehicles(&json!({}));
        assert!(garage.vehicles().is_empty());
    }
}
