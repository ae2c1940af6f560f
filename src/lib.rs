/// Card rendering to descriptors, Markdown, and HTML fragments
pub mod formatter;

/// GitHub REST client for listing an account's repositories
pub mod github;

/// Catalog operations, presentation session state, and settings
pub mod services;

/// Core type definitions and domain models used throughout the library
pub mod types;
