//! Backend bridge: the command vocabulary and the worker thread that owns the session.

pub mod commands;
pub mod runtime;
