use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// One generated module per source file.
/// 每個來源檔案對應的產生模組資訊。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledExport {
    /// Identifier bound to the escaped contents.
    pub export_name: String,
    /// Path below the source root, forward slashes.
    pub relative_path: String,
    /// Specifier used by the aggregate module's import.
    pub import_path: String,
    /// Where the module is written.
    #[serde(skip)]
    pub module_path: PathBuf,
}

/// Derives a PascalCase identifier from a relative path.
/// 由相對路徑推導 PascalCase 識別名稱。
///
/// Every run of non-alphanumeric ASCII characters splits a token, each token
/// gets an upper-case first letter, and the tokens are concatenated, so
/// `components/tweet-composer.jsx` becomes `ComponentsTweetComposerJsx`.
/// The mapping is lossy; callers must check for collisions.
pub fn export_name(relative_path: &str) -> String {
    let mut name = String::with_capacity(relative_path.len());
    for token in relative_path
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    match name.chars().next() {
        None => "File".to_string(),
        Some(first) if first.is_ascii_digit() => format!("File{name}"),
        Some(_) => name,
    }
}

/// Target module path for a source file: same layout, `.ts` appended to the
/// full file name so `app.jsx` and `app.css` stay distinct.
pub fn module_path(output_root: &Path, relative_path: &str) -> PathBuf {
    let mut target = output_root.to_path_buf();
    for segment in relative_path.split('/') {
        target.push(segment);
    }
    let mut file_name = target.file_name().unwrap_or_default().to_os_string();
    file_name.push(".ts");
    target.set_file_name(file_name);
    target
}

/// Import specifier for `target`, relative to the directory `from_dir`.
/// 計算由 `from_dir` 指向 `target` 的匯入路徑。
pub fn import_specifier(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component<'_>> = normal_components(from_dir);
    let to: Vec<Component<'_>> = normal_components(target);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(left, right)| left == right)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

fn normal_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_capitalises_each_token() {
        assert_eq!(export_name("app.jsx"), "AppJsx");
        assert_eq!(
            export_name("components/tweet-composer.jsx"),
            "ComponentsTweetComposerJsx"
        );
        assert_eq!(
            export_name("components/notification-control/notification-list.jsx"),
            "ComponentsNotificationControlNotificationListJsx"
        );
    }

    #[test]
    fn export_name_keeps_inner_case() {
        assert_eq!(export_name("pages/homePage.jsx"), "PagesHomePageJsx");
    }

    #[test]
    fn export_name_is_a_valid_identifier_start() {
        assert_eq!(export_name("404.html"), "File404Html");
        assert_eq!(export_name("..."), "File");
    }

    #[test]
    fn similar_paths_can_collide() {
        assert_eq!(export_name("a_b/x.txt"), export_name("a.b/x.txt"));
        assert_ne!(export_name("a/x.txt"), export_name("a.b/x.txt"));
    }

    #[test]
    fn module_path_appends_ts_suffix() {
        let root = Path::new("src/templates/app-files");
        assert_eq!(
            module_path(root, "components/tweet.jsx"),
            PathBuf::from("src/templates/app-files/components/tweet.jsx.ts")
        );
        assert_ne!(module_path(root, "src/app.jsx"), module_path(root, "src/app.css"));
        assert_eq!(
            module_path(root, "Makefile"),
            PathBuf::from("src/templates/app-files/Makefile.ts")
        );
    }

    #[test]
    fn import_specifier_is_relative_and_slashed() {
        let from = Path::new("src/templates");
        assert_eq!(
            import_specifier(from, Path::new("src/templates/app-files/app.jsx.ts")),
            "./app-files/app.jsx.ts"
        );
        assert_eq!(
            import_specifier(Path::new("out/agg"), Path::new("out/modules/a.ts")),
            "../modules/a.ts"
        );
    }
}
