//! Trakerbot - affiliate link tracking API
//!
//! CRUD over bookmakers, affiliate codes, UTM-tagged short links and linked
//! Telegram accounts, behind a bearer-authenticated HTTP API.
//!
//! # Architecture
//! - `application`: use cases; each request carries its validation rules and
//!   handler and is dispatched by the mediator
//! - `api`: controllers, envelope → HTTP translation and middleware
//! - `storage`: SeaORM persistence gateway, migrations and seed data
//! - `security`: JWT, password hashing and the current-user accessor
//! - `services`: external collaborators (photo store, email)
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: start-up wiring and execution modes
//! - `system`: logging

pub mod api;
pub mod application;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod security;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
