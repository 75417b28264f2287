//! Trip comparison server.
//!
//! A web application that answers: "Should I drive or take public
//! transport for this trip, and what does each really cost?" The same
//! comparison is shown as a live page and as a downloadable PDF.

pub mod compare;
pub mod config;
pub mod costs;
pub mod directions;
pub mod document;
pub mod domain;
pub mod fares;
pub mod itinerary;
pub mod report;
pub mod staticmap;
pub mod web;
