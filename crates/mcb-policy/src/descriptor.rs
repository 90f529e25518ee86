//! Policy descriptor parsing.
//!
//! Artifact format, one entry per line:
//!
//! ```text
//! # comment
//! api.Report, true, true
//! api.ReportRow, true, false
//! ```
//!
//! Fields: qualified name, serializable flag, instantiable flag. Blank
//! lines and `#` comments are ignored. Entries whose names cannot be
//! resolved through the active loader are dropped as soft errors; any
//! syntax problem is a hard error and no descriptor is produced.

use crate::error::PolicyError;
use mcb_module::ModuleLoader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::warn;

/// One resolvable policy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyEntry {
    /// Qualified name the entry governs.
    pub name: String,
    /// Whether instances of this name may cross the wire.
    pub serializable: bool,
    /// Whether the receiving side may instantiate this name.
    pub instantiable: bool,
}

/// An entry that was syntactically valid but referenced a name no module
/// loader could resolve. Soft: logged, dropped from the descriptor,
/// never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedEntry {
    /// The unresolvable qualified name.
    pub name: String,
    /// 1-based line number in the artifact.
    pub line: usize,
}

/// A parsed policy artifact.
///
/// Either fully valid or absent: hard errors during parsing mean no
/// descriptor at all. Soft errors ride along for diagnostics.
#[derive(Debug, Default, Serialize)]
pub struct PolicyDescriptor {
    entries: HashMap<String, PolicyEntry>,
    soft_errors: Vec<UnresolvedEntry>,
}

impl PolicyDescriptor {
    /// Returns the entry for `name`, if the artifact listed it and the
    /// name was resolvable.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&PolicyEntry> {
        self.entries.get(name)
    }

    /// `true` if `name` has a resolvable entry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of resolvable entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no entry survived parsing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that referenced unresolvable names.
    #[must_use]
    pub fn soft_errors(&self) -> &[UnresolvedEntry] {
        &self.soft_errors
    }
}

/// Parses a policy artifact, validating each entry name against `loader`.
///
/// - Read failure → [`PolicyError::Io`] (hard).
/// - Bad line syntax → [`PolicyError::Malformed`] (hard).
/// - Unresolvable entry name → soft error, logged individually, parsing
///   continues and the descriptor is returned with the resolvable
///   entries intact.
pub fn parse_policy(
    mut stream: Box<dyn Read + Send>,
    loader: &dyn ModuleLoader,
    origin: &str,
) -> Result<PolicyDescriptor, PolicyError> {
    let mut text = String::new();
    stream
        .read_to_string(&mut text)
        .map_err(|source| PolicyError::Io {
            origin: origin.to_string(),
            source,
        })?;

    let mut descriptor = PolicyDescriptor::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(PolicyError::Malformed {
                origin: origin.to_string(),
                line,
                reason: format!("expected 3 fields, found {}", fields.len()),
            });
        }

        let name = fields[0];
        if name.is_empty() {
            return Err(PolicyError::Malformed {
                origin: origin.to_string(),
                line,
                reason: "empty entry name".to_string(),
            });
        }

        let serializable = parse_flag(fields[1], origin, line)?;
        let instantiable = parse_flag(fields[2], origin, line)?;

        if loader.resolve(name).is_none() {
            // Soft: the module exporting this name may be missing from the
            // host, or not activated yet. The rest of the policy stands.
            warn!(
                %origin,
                line,
                %name,
                "policy entry references a name no module loader resolves"
            );
            descriptor.soft_errors.push(UnresolvedEntry {
                name: name.to_string(),
                line,
            });
            continue;
        }

        descriptor.entries.insert(
            name.to_string(),
            PolicyEntry {
                name: name.to_string(),
                serializable,
                instantiable,
            },
        );
    }

    Ok(descriptor)
}

fn parse_flag(field: &str, origin: &str, line: usize) -> Result<bool, PolicyError> {
    match field {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(PolicyError::Malformed {
            origin: origin.to_string(),
            line,
            reason: format!("expected 'true' or 'false', found '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_module::testing::MapLoader;
    use mcb_types::ModuleId;
    use std::io::Cursor;

    fn stream(text: &str) -> Box<dyn Read + Send> {
        Box::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn loader(codes: &[&str]) -> MapLoader {
        let mut l = MapLoader::new(ModuleId::host("m"));
        for c in codes {
            l = l.with_code(*c);
        }
        l
    }

    #[test]
    fn parses_resolvable_entries() {
        let text = "# policy\napi.Report, true, true\n\napi.Row, true, false\n";
        let loader = loader(&["api.Report", "api.Row"]);
        let d = parse_policy(stream(text), &loader, "t.policy").unwrap();

        assert_eq!(d.len(), 2);
        assert!(d.soft_errors().is_empty());
        assert!(d.entry("api.Report").unwrap().instantiable);
        assert!(!d.entry("api.Row").unwrap().instantiable);
    }

    #[test]
    fn unresolvable_entries_are_soft() {
        // 3 resolvable, 2 not: descriptor survives with exactly the 3,
        // and exactly 2 soft errors are carried.
        let text = "api.A, true, true\n\
                    gone.B, true, true\n\
                    api.C, true, false\n\
                    gone.D, false, false\n\
                    api.E, true, true\n";
        let loader = loader(&["api.A", "api.C", "api.E"]);
        let d = parse_policy(stream(text), &loader, "t.policy").unwrap();

        assert_eq!(d.len(), 3);
        assert_eq!(d.soft_errors().len(), 2);
        assert!(d.contains("api.A") && d.contains("api.C") && d.contains("api.E"));
        assert!(!d.contains("gone.B") && !d.contains("gone.D"));
        assert_eq!(d.soft_errors()[0].name, "gone.B");
        assert_eq!(d.soft_errors()[0].line, 2);
        assert_eq!(d.soft_errors()[1].name, "gone.D");
    }

    #[test]
    fn wrong_field_count_is_hard() {
        let err = parse_policy(stream("api.A, true\n"), &loader(&["api.A"]), "t.policy")
            .unwrap_err();
        assert!(matches!(err, PolicyError::Malformed { line: 1, .. }));
    }

    #[test]
    fn bad_flag_is_hard() {
        let err = parse_policy(
            stream("api.A, true, yes\n"),
            &loader(&["api.A"]),
            "t.policy",
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::Malformed { .. }));
    }

    #[test]
    fn empty_name_is_hard() {
        let err =
            parse_policy(stream(", true, true\n"), &loader(&[]), "t.policy").unwrap_err();
        assert!(matches!(err, PolicyError::Malformed { .. }));
    }

    #[test]
    fn read_failure_is_hard() {
        struct FailingRead;
        impl Read for FailingRead {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("stream torn down"))
            }
        }

        let err = parse_policy(Box::new(FailingRead), &loader(&[]), "t.policy").unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }));
    }
}
