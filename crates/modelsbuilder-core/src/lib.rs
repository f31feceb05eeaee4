//! Models Builder Core Types and Definitions
//!
//! This crate provides the foundational types shared by the models builder
//! crates. It includes:
//!
//! - **Identifiers**: String-interned namespace and symbol names ([`identifier::Id`])
//! - **Model**: Content types and their properties ([`model`] module)
//! - **CLR types**: References to the value types of properties ([`clr_type`] module)
//! - **Catalog**: Caller-supplied knowledge of which types exist where ([`catalog`] module)

pub mod catalog;
pub mod clr_type;
pub mod identifier;
pub mod model;
