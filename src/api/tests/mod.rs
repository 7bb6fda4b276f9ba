#[macro_use]
mod common;

mod notification;
