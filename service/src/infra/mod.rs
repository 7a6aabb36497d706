//! Infrastructure layer.
//!
//! Every collaborator the client depends on (identity provider, document
//! database, local key-value store) is consumed as a [`Handler`] of the
//! operations it supports, so the core never names a vendor SDK.
//!
//! [`Handler`]: common::Handler

pub mod documents;
pub mod identity;
pub mod local_store;

pub use self::{
    documents::Documents, identity::Identity, local_store::LocalStore,
};
