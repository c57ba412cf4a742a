//! Request and response shapes.

pub mod verify_dto;
