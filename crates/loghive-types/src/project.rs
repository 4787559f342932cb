use sha2::{Digest, Sha256};

/// Namespace prefix hashed with the path so project ids cannot collide with
/// other sha256 uses of the same string.
const PROJECT_NAMESPACE: &str = "loghive-project";

/// Normalize a project path for identity purposes: lowercase, forward
/// slashes, no trailing separator. Deliberately a pure string transform --
/// pushed sessions reference paths that do not exist on this machine, so
/// filesystem canonicalization is not an option.
pub fn normalize_project_path(path: &str) -> String {
    let mut normalized = path.trim().replace('\\', "/").to_lowercase();
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Stable project identifier for a filesystem path. Two raw paths that
/// normalize identically resolve to the same project across imports and
/// operating systems.
pub fn project_id_from_path(path: &str) -> String {
    let normalized = normalize_project_path(path);
    let mut hasher = Sha256::new();
    hasher.update(PROJECT_NAMESPACE.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Display name: the last path component, or the whole path when it has none.
pub fn project_name_from_path(path: &str) -> String {
    let normalized = normalize_project_path(path);
    let trimmed = path.trim().trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casing_and_trailing_separator_are_identity_neutral() {
        assert_eq!(
            project_id_from_path("/Home/User/Proj/"),
            project_id_from_path("/home/user/proj")
        );
    }

    #[test]
    fn windows_separators_unify() {
        assert_eq!(
            project_id_from_path(r"C:\Work\Proj"),
            project_id_from_path("c:/work/proj")
        );
    }

    #[test]
    fn distinct_paths_get_distinct_ids() {
        assert_ne!(
            project_id_from_path("/home/user/proj-a"),
            project_id_from_path("/home/user/proj-b")
        );
    }

    #[test]
    fn id_is_hex_sha256() {
        let id = project_id_from_path("/tmp/x");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn name_is_last_component_preserving_case() {
        assert_eq!(project_name_from_path("/home/user/MyProj/"), "MyProj");
        assert_eq!(project_name_from_path(r"C:\Work\Thing"), "Thing");
        assert_eq!(project_name_from_path("/"), "/");
    }
}
