#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

pub mod capacity;
pub mod datatypes;
pub mod discharge;
pub mod monitor;
pub mod utils;
pub mod xerror;
