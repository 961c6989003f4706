//! ChatOPT - API masterplan generator
//!
//! This crate turns a business description into clarifying questions and a
//! markdown API masterplan by prompting a hosted language model.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
