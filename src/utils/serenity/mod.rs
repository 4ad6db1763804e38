pub mod buttons;
pub mod component_interaction;
