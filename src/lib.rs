//! Registry of model providers and the credential forms they declare.
//!
//! Each provider is described by data alone ([`registry::ProviderDescriptor`]);
//! [`form::FormEngine`] validates and submits any of them through a
//! [`store::CredentialSink`].

pub mod command;
pub mod config;
pub mod error;
pub mod form;
pub mod locale;
pub mod registry;
pub mod store;
pub mod view;
