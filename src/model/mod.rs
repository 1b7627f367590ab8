pub mod bundle;
pub mod config;
pub mod curves;
pub mod errors;
pub mod samples;

#[cfg(test)]
#[path = "../../tests/src_inline/model/tests.rs"]
mod tests;
