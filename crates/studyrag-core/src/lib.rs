#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod citation;
pub mod config;
pub mod error;
pub mod tokenize;
pub mod traits;
pub mod types;
