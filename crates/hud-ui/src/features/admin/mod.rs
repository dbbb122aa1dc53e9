//! Admin console feature slice.

mod state;

pub use state::{AdminCategory, AdminItem, AdminPlayer, AdminState, AdminVehicle};

use crate::effects::UiEffect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminIntent {
    SelectCategory(AdminCategory),
    SelectPlayer(u64),
}

pub fn handle_intent(state: &mut AdminState, intent: AdminIntent) -> Vec<UiEffect> {
    match intent {
        AdminIntent::SelectCategory(category) => state.select_category(category),
        AdminIntent::SelectPlayer(id) => {
            state.select_player(id);
            vec![]
        }
    }
}
