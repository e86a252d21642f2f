//! Kriyado vendor portal client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything a vendor front end needs short of rendering: typed backend
//! clients, the Firebase identity bridge, the persisted session, the
//! onboarding gate that decides which screen a vendor may see, and one
//! headless controller per portal screen.

pub mod app;
pub mod config;
pub mod flows;
pub mod gate;
pub mod identity;
pub mod net;
pub mod state;
