// src/services/mod.rs
//! Business logic: the DID service owning the registry and circuit keys.

pub mod did_service;
