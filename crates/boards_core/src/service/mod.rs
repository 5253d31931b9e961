//! Use-case services over the state repository.

pub mod board_service;
