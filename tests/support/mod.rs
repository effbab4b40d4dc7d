#![allow(dead_code)]

pub mod backends;
pub mod brdgen_env;
