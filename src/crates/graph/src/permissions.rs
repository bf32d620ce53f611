//! Permission name classification and `requiredResourceAccess` merging.
//!
//! Pure functions; the client fetches the catalog and current declarations,
//! calls [`merge_permissions`], then writes the result back.

use crate::models::{
    PermissionCatalog, PermissionGrantReport, PermissionKind, RequiredResourceAccess,
    ResolvedPermission, ResourceAccess,
};

/// Decide whether a permission name is an application role or a delegated
/// scope.
///
/// Dotted names ending in `.All` are application roles, other dotted names
/// (`User.Read`) are delegated scopes. Names without a dot default to
/// application roles.
pub fn classify_permission(name: &str) -> PermissionKind {
    match name.rsplit_once('.') {
        Some((_, "All")) | None => PermissionKind::Role,
        Some(_) => PermissionKind::Scope,
    }
}

/// Merge `requested` permission names into `declared` for `resource_app_id`.
///
/// Names are resolved against `catalog` using [`classify_permission`].
/// Unknown names are reported as skipped, names already declared are left
/// alone, and every other entry in `declared` is preserved untouched. A
/// resource entry is only created when at least one permission is added.
pub fn merge_permissions(
    declared: &mut Vec<RequiredResourceAccess>,
    resource_app_id: &str,
    catalog: &PermissionCatalog,
    requested: &[String],
) -> PermissionGrantReport {
    let mut report = PermissionGrantReport::default();

    let position = declared
        .iter()
        .position(|entry| entry.resource_app_id == resource_app_id);
    let mut entry = match position {
        Some(index) => declared.remove(index),
        None => RequiredResourceAccess::new(resource_app_id),
    };

    for name in requested {
        let kind = classify_permission(name);
        let Some(id) = catalog.find(name, kind) else {
            report.skipped.push(name.clone());
            continue;
        };

        if entry.contains(id) {
            report.already_present.push(name.clone());
            continue;
        }

        entry.resource_access.push(ResourceAccess {
            id: id.to_string(),
            kind,
        });
        report.added.push(ResolvedPermission {
            name: name.clone(),
            id: id.to_string(),
            kind,
        });
    }

    if position.is_some() || !entry.resource_access.is_empty() {
        let index = position.unwrap_or(declared.len());
        declared.insert(index, entry);
    }

    report
}
