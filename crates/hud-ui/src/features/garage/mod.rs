//! Garage feature slice.

mod state;

pub use state::{GarageState, Vehicle, VehicleFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GarageIntent {
    SelectVehicle(String),
    SetFilter(VehicleFilter),
}

pub fn handle_intent(state: &mut GarageState, intent: GarageIntent) {
    match intent {
        GarageIntent::SelectVehicle(plate) => state.select_vehicle(plate),
        GarageIntent::SetFilter(filter) => state.set_filter(filter),
    }
}
