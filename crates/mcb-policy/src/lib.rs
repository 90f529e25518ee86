//! Call-time policy artifacts for the Modular Call Bridge.
//!
//! A call cannot be serviced without its policy descriptor: the artifact
//! that says which names may cross the serialization boundary. In a
//! modular host the artifact may live inside a module, behind a
//! privileged resource-resolution service, or in the container's static
//! resources — so location is an ordered chain of fallback strategies:
//!
//! ```text
//! PolicyResolver::open(path)
//!   1. module-resource     (designated home module's open_resource)
//!   2. resolver-service    (privileged session → resolve → release)
//!   3. container-default   (host static resources)
//! ```
//!
//! Any strategy failure — including I/O — means "this strategy yielded
//! nothing" and the next strategy is consulted. Only once a stream is in
//! hand do failures become hard: a malformed or unreadable artifact
//! produces [`PolicyError`] and no descriptor.
//!
//! # Soft vs hard errors
//!
//! | Failure | Kind | Effect |
//! |---------|------|--------|
//! | unresolvable entry name | soft | logged per entry, descriptor still returned |
//! | malformed line | hard | no descriptor, configuration problem |
//! | read failure mid-stream | hard | no descriptor, configuration problem |
//! | no strategy yields a stream | absent | `Ok(None)`, caller must refuse the call |

mod chain;
mod descriptor;
mod error;

pub use chain::{policy_path, PolicyResolver, ResolverSession, SessionFactory, StaticResources, POLICY_EXTENSION};
pub use descriptor::{parse_policy, PolicyDescriptor, PolicyEntry, UnresolvedEntry};
pub use error::PolicyError;
