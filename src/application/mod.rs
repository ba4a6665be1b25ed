//! Use cases
//!
//! One request type per use case. Each carries its validation rules and its
//! handler; all of them are dispatched through [`core::Mediator`].

pub mod account;
pub mod affiliate_codes;
pub mod bookmakers;
pub mod core;
pub mod identity;
pub mod links;
pub mod telegrams;
pub mod utms;
