//! The library code for pre-rendering the portfolio site's static route
//! shells. The site is a single-page application, so every route is served
//! by the same production HTML file and the client-side router takes over
//! from there. Static hosting only works if each route resolves to that file,
//! which is what this crate arranges. The work breaks down into three steps:
//!
//! 1. Loading the Matasano exercise data set ([`crate::exercises`])
//! 2. Building the route tree and flattening it into a route array
//!    ([`crate::route`])
//! 3. Copying the production template to every route's location in the
//!    output directory ([`crate::materialize`])
//!
//! [`crate::build`] ties the steps together. The route tree is also what the
//! in-browser [`crate::router::Router`] resolves locations against.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod exercises;
pub mod materialize;
pub mod route;
pub mod router;
