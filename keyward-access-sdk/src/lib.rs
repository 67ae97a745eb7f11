//! Client SDK for the Keyward privileged-access platform.
//!
//! Two registries make up the public surface: [`SecretsClient`] manages
//! strong-account secrets, [`TargetSetsClient`] manages the host patterns a
//! secret may provision onto. Both are thin consistency layers over the
//! REST API: they validate before writing, normalize response shapes, and
//! evaluate filters client-side because the list endpoints have none.
//!
//! Construction is explicit: build a [`RestTransport`] once and hand it to
//! each client.

pub mod requests;
pub mod secrets;
pub mod target_sets;
pub mod transport;
pub mod wire;

pub use keyward_access_spec as spec;

pub use requests::{
    AddSecretRequest, AddTargetSetRequest, ChangeSecretRequest, ListTargetSetsOptions,
    TargetSetMapping, UpdateTargetSetRequest,
};
pub use secrets::SecretsClient;
pub use target_sets::TargetSetsClient;
pub use transport::{CredentialSource, DynTransport, Reply, RestTransport, Transport};

pub use keyward_access_spec::{
    BulkItemOutcome, BulkOutcome, Error, Result, Secret, SecretKind, SecretsFilter, SecretsStats,
    TargetSet, TargetSetBatch, TargetSetKind, TargetSetsFilter, TargetSetsPage, TargetSetsStats,
};
