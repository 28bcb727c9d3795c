//! Train schedule management server.
//!
//! A CRUD web service over trains, stations and the schedule records
//! linking them, with a rendered HTML schedule view.

pub mod domain;
pub mod schedule;
pub mod store;
pub mod web;
