pub mod ports;
pub mod usecases;
