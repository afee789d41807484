use crate::error::ScopeError;
use crate::resolver::ProjectDescriptor;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde_json::Value;
use tracing::{debug, warn};

/// Read one tsconfig-style file (JSON with comments and trailing commas).
///
/// `include`/`exclude` may each be a string or an array; non-string entries are dropped.
/// `extends` is not followed.
pub fn load_project_descriptor(path: &Utf8Path) -> Result<ProjectDescriptor, ScopeError> {
    let contents = fs::read_to_string(path).map_err(|e| ScopeError::DescriptorIo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let value: Value = if contents.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        json5::from_str(&contents).map_err(|e| ScopeError::DescriptorParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    if !value.is_object() {
        return Err(ScopeError::DescriptorParse {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        });
    }

    let base_dir = path
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_default();

    Ok(ProjectDescriptor {
        base_dir,
        include: string_list(value.get("include")),
        exclude: string_list(value.get("exclude")),
    })
}

/// Load every readable descriptor; unreadable or malformed files are skipped.
pub fn load_project_descriptors(paths: &[Utf8PathBuf]) -> Vec<ProjectDescriptor> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            debug!(path = %path, "project descriptor missing; skipped");
            continue;
        }
        match load_project_descriptor(path) {
            Ok(descriptor) => out.push(descriptor),
            Err(e) => warn!(path = %path, "skipping project descriptor: {e}"),
        }
    }
    out
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8")
    }

    #[test]
    fn reads_include_and_exclude_with_comments() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        let path = root.join("tsconfig.json");
        std::fs::write(
            &path,
            r#"{
  // compiler options omitted
  "include": ["./src/**/*", "tests/**/*",],
  "exclude": "dist",
}"#,
        )
        .expect("write tsconfig");

        let descriptor = load_project_descriptor(&path).expect("load");
        assert_eq!(descriptor.base_dir, root);
        assert_eq!(descriptor.include, vec!["./src/**/*", "tests/**/*"]);
        assert_eq!(descriptor.exclude, vec!["dist"]);
    }

    #[test]
    fn non_string_entries_are_dropped() {
        let temp = TempDir::new().expect("temp dir");
        let path = utf8_root(&temp).join("tsconfig.json");
        std::fs::write(&path, r#"{ "include": ["src", 3, null], "exclude": 7 }"#)
            .expect("write tsconfig");

        let descriptor = load_project_descriptor(&path).expect("load");
        assert_eq!(descriptor.include, vec!["src"]);
        assert!(descriptor.exclude.is_empty());
    }

    #[test]
    fn empty_file_is_an_empty_descriptor() {
        let temp = TempDir::new().expect("temp dir");
        let path = utf8_root(&temp).join("tsconfig.json");
        std::fs::write(&path, "  \n").expect("write tsconfig");

        let descriptor = load_project_descriptor(&path).expect("load");
        assert!(descriptor.include.is_empty());
        assert!(descriptor.exclude.is_empty());
    }

    #[test]
    fn malformed_and_non_object_files_error() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        let broken = root.join("broken.json");
        std::fs::write(&broken, "{ include: [").expect("write");
        assert!(matches!(
            load_project_descriptor(&broken),
            Err(ScopeError::DescriptorParse { .. })
        ));

        let array = root.join("array.json");
        std::fs::write(&array, "[1, 2]").expect("write");
        let err = load_project_descriptor(&array).expect_err("array is not a descriptor");
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn load_many_skips_missing_and_broken() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        std::fs::write(root.join("good.json"), r#"{ "include": ["src"] }"#).expect("write");
        std::fs::write(root.join("bad.json"), "{").expect("write");

        let descriptors = load_project_descriptors(&[
            root.join("bad.json"),
            root.join("missing.json"),
            root.join("good.json"),
        ]);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].include, vec!["src"]);
    }
}
