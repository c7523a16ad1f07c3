//! Build providers from their declarations

use std::path::Path;
use std::sync::Arc;

use driftenv_core::{Declarations, Error, Provider, ProviderDeclaration, Resolver, Result};

use crate::file::{FILE_KIND, FileProvider};
use crate::memory::{MEMORY_KIND, MemoryProvider};

/// Construct the provider a declaration describes
///
/// - `file`: option `path`, relative to `base_dir` unless absolute
/// - `memory`: every option is seeded as a scalar `path: value`
pub fn build_provider(
    name: &str,
    decl: &ProviderDeclaration,
    base_dir: &Path,
) -> Result<Arc<dyn Provider>> {
    match decl.kind.as_str() {
        FILE_KIND => {
            let file = decl.options.get("path").ok_or_else(|| Error::InvalidKeyPath {
                message: format!("provider '{}' of kind file needs a 'path' option", name),
            })?;
            let provider = FileProvider::new(name, base_dir.join(file))?;
            Ok(Arc::new(provider))
        }
        MEMORY_KIND => {
            let provider = decl
                .options
                .iter()
                .fold(MemoryProvider::new(name), |p, (path, value)| {
                    p.with_value(path.as_str(), value.as_str())
                });
            Ok(Arc::new(provider))
        }
        other => Err(Error::UnsupportedProviderKind {
            name: name.to_string(),
            kind: other.to_string(),
        }),
    }
}

/// A resolver with one provider per declared name
pub fn resolver_for(decls: &Declarations, base_dir: &Path) -> Result<Resolver> {
    let mut resolver = Resolver::new();
    for (name, decl) in &decls.providers {
        resolver.register(name.as_str(), build_provider(name, decl, base_dir)?);
    }
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_is_rejected() {
        let decl = ProviderDeclaration {
            kind: "hashicorp_vault".into(),
            ..Default::default()
        };
        let err = build_provider("v", &decl, Path::new(".")).err().expect("expected an error");
        assert!(matches!(err, Error::UnsupportedProviderKind { ref kind, .. } if kind == "hashicorp_vault"));
    }

    #[test]
    fn test_file_kind_needs_path() {
        let decl = ProviderDeclaration {
            kind: "file".into(),
            ..Default::default()
        };
        assert!(build_provider("f", &decl, Path::new(".")).is_err());
    }

    #[test]
    fn test_builds_named_providers() {
        let decls = Declarations::parse_yaml(
            "providers:\n  a:\n    kind: memory\n  b:\n    kind: file\n    options:\n      path: s.yaml\n",
        )
        .unwrap();
        let resolver = resolver_for(&decls, Path::new("/tmp")).unwrap();
        assert_eq!(resolver.provider("a").unwrap().kind(), "memory");
        assert_eq!(resolver.provider("b").unwrap().name(), "b");
    }
}
