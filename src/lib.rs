//! Library crate for roster.
//!
//! This crate exposes the building blocks of member lists:
//! - Profile and membership records (`profile`)
//! - Role / alphabetical sectioning (`sections`)
//! - The list view model: selection, row state, events (`list`)
//! - Skin-tone emoji resolution (`emoji`) and double-tap suppression (`tap`)
//! - Profile search (`search`) and profile sources (`sys`)
//! - Settings (`config`), error types (`error`)
//! - The terminal browser state and rendering (`app`, `ui`)
//!
//! It is used by the `roster` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod config;
pub mod emoji;
pub mod error;
pub mod list;
pub mod profile;
pub mod search;
pub mod sections;
pub mod sys;
pub mod tap;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use error::{DynError, Result, SectionError};
pub use profile::{ChannelMember, MemberProfile, UserProfile};
pub use sections::{RoleLabels, Section, section_profiles};
