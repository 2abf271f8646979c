//! Name resolution and semantic checks over container scopes.
//!
//! Names are unique only within their immediate container. Dotted paths
//! (`outer.inner.x`) are resolved one segment at a time, each segment
//! matching a direct member by exact, case-sensitive name.
use std::collections::HashSet;

use log::trace;

use super::{VarKind, Variable, array::ArrayData};
use crate::error::{DapError, Result};

/// Resolves `path` against the members of `container`.
pub fn lookup<'a>(container: &'a Variable, path: &str) -> Result<&'a Variable> {
    let (head, rest) = split(path);
    let children = container
        .children()
        .ok_or_else(|| DapError::NotAContainer {
            name: container.name().to_string(),
        })?;
    let child = children
        .iter()
        .find(|c| c.name() == head)
        .ok_or_else(|| DapError::NotFound {
            name: head.to_string(),
            container: container.name().to_string(),
        })?;

    match rest {
        None => Ok(child),
        Some(rest) if child.is_container() => lookup(child, rest),
        Some(_) => Err(DapError::NotAContainer {
            name: head.to_string(),
        }),
    }
}

pub fn lookup_mut<'a>(container: &'a mut Variable, path: &str) -> Result<&'a mut Variable> {
    let (head, rest) = split(path);
    let container_name = container.name().to_string();
    let children = container
        .children_mut()
        .ok_or_else(|| DapError::NotAContainer {
            name: container_name.clone(),
        })?;
    let child = children
        .iter_mut()
        .find(|c| c.name() == head)
        .ok_or_else(|| DapError::NotFound {
            name: head.to_string(),
            container: container_name,
        })?;

    match rest {
        None => Ok(child),
        Some(rest) if child.is_container() => lookup_mut(child, rest),
        Some(_) => Err(DapError::NotAContainer {
            name: head.to_string(),
        }),
    }
}

fn split(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Fails with `DuplicateName` if two direct members of `container` share a
/// name. With `deep`, nested containers are checked too, including the
/// template of an array of containers.
pub fn validate_unique(container: &Variable, deep: bool) -> Result<()> {
    if let Some(children) = container.children() {
        let mut seen = HashSet::with_capacity(children.len());
        for child in children {
            if !seen.insert(child.name()) {
                return Err(DapError::DuplicateName {
                    name: child.name().to_string(),
                    container: container.name().to_string(),
                    type_name: container.type_name().to_string(),
                });
            }
        }
    }

    if deep {
        for nested in nested_scopes(container) {
            validate_unique(nested, true)?;
        }
    }
    Ok(())
}

/// Uniqueness plus the grid shape rules. With `all`, every nested scope is
/// checked as well.
pub fn check_semantics(var: &Variable, all: bool) -> Result<()> {
    trace!("checking semantics of {} '{}'", var.type_name(), var.name());
    validate_unique(var, false)?;
    if let VarKind::Grid(_) = var.kind() {
        check_grid(var)?;
    }

    if all {
        for nested in nested_scopes(var) {
            check_semantics(nested, true)?;
        }
    }
    Ok(())
}

fn nested_scopes(var: &Variable) -> Vec<&Variable> {
    match var.kind() {
        VarKind::Array(array) => match array.data() {
            ArrayData::Containers { template, .. } => vec![template.as_ref()],
            ArrayData::Primitive(_) => Vec::new(),
        },
        _ => var
            .children()
            .map(|c| c.iter().filter(|v| v.is_container() || v.as_array().is_some()).collect())
            .unwrap_or_default(),
    }
}

fn check_grid(var: &Variable) -> Result<()> {
    let Some(grid) = var.as_grid() else {
        return Ok(());
    };
    let shape_error = |reason: String| DapError::InvalidShape {
        variable: var.name().to_string(),
        reason,
    };

    let Some(data) = grid.array().as_array() else {
        return Err(shape_error("grid data is not an Array".into()));
    };
    if grid.maps().len() > data.dimensions().len() {
        return Err(shape_error(format!(
            "{} maps for {} dimensions",
            grid.maps().len(),
            data.dimensions().len()
        )));
    }

    for (i, (map, dim)) in grid.maps().iter().zip(data.dimensions()).enumerate() {
        let Some(map_array) = map.as_array() else {
            return Err(shape_error(format!("map '{}' is not an Array", map.name())));
        };
        if map_array.dimensions().len() != 1 {
            return Err(shape_error(format!(
                "map '{}' must have exactly one dimension",
                map.name()
            )));
        }
        if map_array.len() != dim.size {
            return Err(shape_error(format!(
                "map '{}' has {} values but dimension {i} has size {}",
                map.name(),
                map_array.len(),
                dim.size
            )));
        }
    }
    Ok(())
}

impl Variable {
    /// See [`lookup`].
    pub fn lookup(&self, path: &str) -> Result<&Variable> {
        lookup(self, path)
    }

    pub fn lookup_mut(&mut self, path: &str) -> Result<&mut Variable> {
        lookup_mut(self, path)
    }

    pub fn validate_unique(&self, deep: bool) -> Result<()> {
        validate_unique(self, deep)
    }

    pub fn check_semantics(&self, all: bool) -> Result<()> {
        check_semantics(self, all)
    }
}
