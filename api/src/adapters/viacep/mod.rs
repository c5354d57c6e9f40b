//! ViaCEP adapter
//!
//! Geocoding of Brazilian postal codes via viacep.com.br.

pub mod client;

pub use client::ViaCepClient;
