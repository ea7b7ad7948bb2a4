//! ECS resources made available to the frame callbacks.
//!
//! Overview
//! - `dispatch` – event handler table and the context handlers run with
//! - `scenecommands` – world-level calls queued while a tick holds the scene stack
//! - `scenestack` – current tracking session plus the suspended ones
//! - `session` – registries and dispatch table owned by one scene
//! - `trackingconfig` – INI-backed tunables copied into each new session
//! - `worldtime` – frame delta and elapsed time in milliseconds
pub mod dispatch;
pub mod scenecommands;
pub mod scenestack;
pub mod session;
pub mod trackingconfig;
pub mod worldtime;
