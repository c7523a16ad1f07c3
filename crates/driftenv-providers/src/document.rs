//! Shared secret document model
//!
//! Both bundled providers store a flat map of paths to nodes. A node is
//! either a scalar value or a table of fields. Mapping lookups expand a
//! table, or collect the scalar children directly under `path/`.

use std::collections::BTreeMap;

use driftenv_core::{EnvEntry, Error, KeyPath, Provider, Result};
use serde::{Deserialize, Serialize};

use crate::decrypt::Decryptor;

/// Value stored at one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecretNode {
    Value(String),
    Fields(BTreeMap<String, String>),
}

/// Path -> node
pub type Document = BTreeMap<String, SecretNode>;

fn absent<T>(provider: &str, kp: &KeyPath, missing: T) -> Result<T> {
    if kp.optional {
        tracing::debug!(provider, path = %kp.path, "optional value absent");
        Ok(missing)
    } else {
        Err(Error::resolution(provider, &kp.path, "not found"))
    }
}

fn plaintext(
    provider: &str,
    kp: &KeyPath,
    raw: &str,
    decryptor: Option<&dyn Decryptor>,
) -> Result<String> {
    if !kp.decrypt {
        return Ok(raw.to_string());
    }
    match decryptor {
        Some(d) => d
            .decrypt(raw)
            .map_err(|e| Error::resolution(provider, &kp.path, format!("decryption failed: {}", e))),
        None => Err(Error::resolution(
            provider,
            &kp.path,
            "decryption requested but no decryptor is configured",
        )),
    }
}

/// Resolve one scalar for `kp`
pub fn get_entry<P: Provider + ?Sized>(
    provider: &P,
    doc: &Document,
    kp: &KeyPath,
    decryptor: Option<&dyn Decryptor>,
) -> Result<Option<EnvEntry>> {
    let name = provider.name();
    if kp.env.is_empty() {
        return Err(Error::InvalidKeyPath {
            message: format!("scalar lookup of '{}' needs an env name", kp.path),
        });
    }

    let raw = match doc.get(&kp.path) {
        None => return absent(name, kp, None),
        Some(SecretNode::Value(v)) if kp.field.is_empty() => v,
        Some(SecretNode::Value(_)) => {
            return Err(Error::resolution(
                name,
                &kp.path,
                format!("field '{}' requested but path holds a scalar", kp.field),
            ));
        }
        Some(SecretNode::Fields(fields)) => match fields.get(kp.effective_field()) {
            Some(v) => v,
            None => return absent(name, kp, None),
        },
    };

    let value = plaintext(name, kp, raw, decryptor)?;
    Ok(Some(kp.found(provider, &kp.env, value, &kp.path)))
}

/// Expand `kp` into one entry per field or child path
pub fn get_mapping_entries<P: Provider + ?Sized>(
    provider: &P,
    doc: &Document,
    kp: &KeyPath,
    decryptor: Option<&dyn Decryptor>,
) -> Result<Vec<EnvEntry>> {
    let name = provider.name();

    let pairs: Vec<(String, &str, &str)> = match doc.get(&kp.path) {
        Some(SecretNode::Fields(fields)) => fields
            .iter()
            .map(|(k, v)| (format!("{}/{}", kp.path, k), k.as_str(), v.as_str()))
            .collect(),
        Some(SecretNode::Value(_)) => {
            return Err(Error::resolution(
                name,
                &kp.path,
                "expected a mapping but path holds a scalar",
            ));
        }
        None => children(doc, &kp.path),
    };

    if pairs.is_empty() {
        return absent(name, kp, Vec::new());
    }

    pairs
        .into_iter()
        .map(|(sub_path, native, raw)| {
            let value = plaintext(name, kp, raw, decryptor)?;
            Ok(kp.found(provider, kp.remapped_key(native), value, sub_path))
        })
        .collect()
}

/// Scalar nodes directly under `path/`
fn children<'a>(doc: &'a Document, path: &str) -> Vec<(String, &'a str, &'a str)> {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    doc.range(prefix.clone()..)
        .take_while(|(k, _)| k.starts_with(&prefix))
        .filter_map(|(k, node)| {
            let rest = &k[prefix.len()..];
            match node {
                SecretNode::Value(v) if !rest.is_empty() && !rest.contains('/') => {
                    Some((k.clone(), rest, v.as_str()))
                }
                _ => None,
            }
        })
        .collect()
}

/// Store `value` at `kp`'s location
pub fn put_value(provider: &str, doc: &mut Document, kp: &KeyPath, value: &str) -> Result<()> {
    kp.validate()?;
    if kp.decrypt {
        return Err(Error::write(
            provider,
            &kp.path,
            "writing encrypted values is not supported",
        ));
    }

    match doc.get_mut(&kp.path) {
        None if kp.field.is_empty() => {
            doc.insert(kp.path.clone(), SecretNode::Value(value.to_string()));
        }
        None => {
            let fields = BTreeMap::from([(kp.field.clone(), value.to_string())]);
            doc.insert(kp.path.clone(), SecretNode::Fields(fields));
        }
        Some(SecretNode::Value(existing)) if kp.field.is_empty() => {
            *existing = value.to_string();
        }
        Some(SecretNode::Value(_)) => {
            return Err(Error::write(
                provider,
                &kp.path,
                format!("cannot set field '{}': path holds a scalar", kp.field),
            ));
        }
        Some(SecretNode::Fields(fields)) => {
            let field = kp.effective_field();
            if field.is_empty() {
                return Err(Error::write(
                    provider,
                    &kp.path,
                    "path holds fields; a field or env name is required",
                ));
            }
            fields.insert(field.to_string(), value.to_string());
        }
    }
    Ok(())
}
