use super::*;
use std::collections::HashMap;
use std::path::Path;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn test_no_home_means_no_dirs() {
    let var = lookup(&[]);
    assert_eq!(platform_dir(DirKind::Data, &var), None);
    assert_eq!(platform_dir(DirKind::Cache, &var), None);
    assert_eq!(log_dir_with(&var), None);
}

#[cfg(target_os = "linux")]
#[test]
fn test_linux_prefers_xdg_dirs() {
    let var = lookup(&[
        ("HOME", "/home/u"),
        ("XDG_DATA_HOME", "/xdg/data"),
        ("XDG_CACHE_HOME", "/xdg/cache"),
    ]);
    assert_eq!(
        log_dir_with(&var).as_deref(),
        Some(Path::new("/xdg/data/zbook/logs"))
    );
    assert_eq!(
        platform_dir(DirKind::Cache, &var).as_deref(),
        Some(Path::new("/xdg/cache"))
    );
}

#[cfg(target_os = "linux")]
#[test]
fn test_linux_falls_back_to_home() {
    let var = lookup(&[("HOME", "/home/u")]);
    assert_eq!(
        log_dir_with(&var).as_deref(),
        Some(Path::new("/home/u/.local/share/zbook/logs"))
    );
    assert_eq!(
        platform_dir(DirKind::Cache, &var).as_deref(),
        Some(Path::new("/home/u/.cache"))
    );
}

#[cfg(target_os = "macos")]
#[test]
fn test_macos_library_dirs() {
    let var = lookup(&[("HOME", "/Users/u")]);
    assert_eq!(
        log_dir_with(&var).as_deref(),
        Some(Path::new("/Users/u/Library/Application Support/zbook/logs"))
    );
    assert_eq!(
        platform_dir(DirKind::Cache, &var).as_deref(),
        Some(Path::new("/Users/u/Library/Caches"))
    );
}
