//! Metro line service.
//!
//! Keeps each metro line as a set of sections between stations and
//! maintains the single ordered chain of stations those sections form,
//! behind a small JSON API.

pub mod config;
pub mod domain;
pub mod repository;
pub mod service;
pub mod topology;
pub mod web;
