#![allow(dead_code)]

pub mod mock_handle;
pub mod strategies;
