//! Run settings for the command-line front end.
//!
//! Values come from three tiers, highest precedence first: command-line flags, an optional
//! kebab-case TOML settings file, and the built-in [`defaults::DefaultsConfig`].

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
