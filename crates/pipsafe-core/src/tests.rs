use std::path::Path;

use super::*;

fn sanitize(raw: &str) -> String {
    PackageKey::sanitize(raw, Path::new("/home/dev/projects/mytool"))
        .as_str()
        .to_string()
}

#[test]
fn plain_name_is_kept() {
    assert_eq!(sanitize("lastversion"), "lastversion");
}

#[test]
fn version_pin_is_dropped() {
    assert_eq!(sanitize("lastversion==1.2.4"), "lastversion");
    assert_eq!(sanitize("black==24.1.0==extra"), "black");
}

#[test]
fn https_vcs_reference_keeps_vcs_marker_and_has_no_separators() {
    let key = sanitize("git+https://github.com/dvershinin/lastversion.git");
    assert_eq!(key, "git+github.com_dvershinin_lastversion.git");
    assert!(!key.contains('/'));
    assert!(!key.contains("://"));
}

#[test]
fn other_scheme_markers_are_stripped() {
    assert_eq!(
        sanitize("git+ssh://git@example.test/org/tool"),
        "git+git@example.test_org_tool"
    );
    assert_eq!(sanitize("git+file:///srv/repos/tool"), "git+_srv_repos_tool");
    assert_eq!(sanitize("http://example.test/tool"), "example.test_tool");
}

#[test]
fn vcs_reference_with_pin_is_truncated_after_separator_replacement() {
    assert_eq!(
        sanitize("git+https://example.test/org/tool==1.0"),
        "git+example.test_org_tool"
    );
}

#[test]
fn current_dir_reference_uses_working_directory_name() {
    assert_eq!(sanitize("."), "mytool");
    let key = PackageReference::new(".").key_in(Path::new("/srv/checkouts/other"));
    assert_eq!(key.as_str(), "other");
}

#[test]
fn current_dir_reference_at_filesystem_root_is_not_addressable() {
    let key = PackageKey::sanitize(".", Path::new("/"));
    assert_eq!(key.as_str(), "");
    assert!(!key.is_addressable());
}

#[test]
fn degenerate_keys_are_reported() {
    assert!(!PackageKey::sanitize("", Path::new("/tmp")).is_addressable());
    assert!(!PackageKey::sanitize("..", Path::new("/tmp")).is_addressable());
    assert!(!PackageKey::sanitize("==1.0", Path::new("/tmp")).is_addressable());
    assert!(PackageKey::sanitize("httpie", Path::new("/tmp")).is_addressable());
}

#[test]
fn reference_classification() {
    assert!(PackageReference::new("git+https://example.test/org/tool").is_vcs());
    assert!(!PackageReference::new("https://example.test/tool.tar.gz").is_vcs());
    assert!(PackageReference::new(".").is_current_dir());
    assert!(!PackageReference::new("./tool").is_current_dir());
    assert_eq!(PackageReference::from("black").to_string(), "black");
}

#[test]
fn scope_from_flag() {
    assert_eq!(Scope::from_system_flag(true), Scope::System);
    assert_eq!(Scope::from_system_flag(false), Scope::User);
    assert!(Scope::System.is_system());
    assert_eq!(Scope::User.install_for(), "for current user");
    assert_eq!(Scope::System.install_for(), "system-wide");
}
