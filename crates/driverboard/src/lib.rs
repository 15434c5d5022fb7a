//! `driverboard` - A board of racing drivers backed by a REST API
//!
//! This library provides the driver record types, a typed client for the
//! driver collection, pure HTML and text rendering, and the [`DriverBoard`]
//! controller that re-fetches and re-renders after every change.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod form;
pub mod logging;
pub mod view;

pub use api::{DriverApi, HttpDriverApi};
pub use board::{BoardEvent, Clock, Container, DriverBoard, EventTarget, HtmlContainer, SystemClock};
pub use config::Config;
pub use driver::{CreatedAt, Driver, DriverFields, DriverId, DriverPayload, Field, RacesWon};
pub use error::{Error, Result};
pub use form::DriverForm;
pub use logging::init_logging;
pub use view::BoardView;
