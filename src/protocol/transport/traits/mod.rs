//! Collaborator traits implemented by the platform layer: the CAN controller
//! driver and the button input.
pub mod can_controller;
pub mod edge_input;
