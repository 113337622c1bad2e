// Application layer: maps CLI commands onto the admin transport.

pub mod runner;
