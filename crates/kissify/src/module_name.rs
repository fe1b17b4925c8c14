//! Module name resolution
//!
//! The transform only consumes an optional name. Where it comes from is the
//! host's business, expressed through [`ModuleNameResolver`].

use std::path::{Component, Path, PathBuf};

use log::warn;

/// What the host knows about the module being transformed
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleSource<'a> {
    /// Source file, when the module was read from disk
    pub path: Option<&'a Path>,
}

impl<'a> ModuleSource<'a> {
    pub fn from_path(path: &'a Path) -> Self {
        Self { path: Some(path) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Supplies the name argument of the registration call
pub trait ModuleNameResolver {
    /// `None` registers an anonymous module
    fn module_name(&self, module: &ModuleSource<'_>) -> Option<String>;
}

impl<F> ModuleNameResolver for F
where
    F: Fn(&ModuleSource<'_>) -> Option<String>,
{
    fn module_name(&self, module: &ModuleSource<'_>) -> Option<String> {
        self(module)
    }
}

/// Every module is anonymous
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModuleName;

impl ModuleNameResolver for NoModuleName {
    fn module_name(&self, _module: &ModuleSource<'_>) -> Option<String> {
        None
    }
}

/// Every module gets the same name
#[derive(Debug, Clone)]
pub struct FixedModuleName(pub String);

impl ModuleNameResolver for FixedModuleName {
    fn module_name(&self, _module: &ModuleSource<'_>) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Names derived from the file path, like Babel's `moduleIds`
///
/// `src/widgets/menu.js` under source root `src` with module root `app`
/// becomes `app/widgets/menu`.
#[derive(Debug, Clone)]
pub struct RelativePathModuleName {
    pub source_root: PathBuf,
    pub module_root: Option<String>,
}

impl RelativePathModuleName {
    pub fn new(source_root: impl Into<PathBuf>, module_root: Option<String>) -> Self {
        Self {
            source_root: source_root.into(),
            module_root,
        }
    }
}

impl ModuleNameResolver for RelativePathModuleName {
    fn module_name(&self, module: &ModuleSource<'_>) -> Option<String> {
        let path = normalize(module.path?);
        let source_root = normalize(&self.source_root);
        let Ok(relative) = path.strip_prefix(&source_root) else {
            warn!(
                "{} is outside {}, registering anonymously",
                path.display(),
                self.source_root.display()
            );
            return None;
        };

        let mut segments: Vec<String> = relative
            .with_extension("")
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            return None;
        }
        if let Some(root) = self
            .module_root
            .as_deref()
            .map(|root| root.trim_end_matches('/'))
            .filter(|root| !root.is_empty())
        {
            segments.insert(0, root.to_owned());
        }
        Some(segments.join("/"))
    }
}

/// Drop `.` components and fold `..` into the preceding directory
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_name() {
        let resolver = RelativePathModuleName::new("src", None);
        let path = Path::new("src/widgets/menu.js");
        assert_eq!(
            resolver.module_name(&ModuleSource::from_path(path)).as_deref(),
            Some("widgets/menu")
        );
    }

    #[test]
    fn test_module_root_prefix() {
        let resolver = RelativePathModuleName::new("src", Some("app/".to_owned()));
        let path = Path::new("src/menu.js");
        assert_eq!(
            resolver.module_name(&ModuleSource::from_path(path)).as_deref(),
            Some("app/menu")
        );
    }

    #[test]
    fn test_outside_root_is_anonymous() {
        let resolver = RelativePathModuleName::new("src", Some("app".to_owned()));
        let path = Path::new("lib/menu.js");
        assert_eq!(resolver.module_name(&ModuleSource::from_path(path)), None);
        assert_eq!(resolver.module_name(&ModuleSource::anonymous()), None);
    }

    #[test]
    fn test_parent_components_are_folded() {
        let resolver = RelativePathModuleName::new("/project/./src", None);

        let inside = Path::new("/project/lib/../src/widgets/menu.js");
        assert_eq!(
            resolver.module_name(&ModuleSource::from_path(inside)).as_deref(),
            Some("widgets/menu")
        );

        let escaping = Path::new("/project/src/../lib/menu.js");
        assert_eq!(resolver.module_name(&ModuleSource::from_path(escaping)), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_stock_and_function_resolvers() {
        let source = ModuleSource::anonymous();
        assert_eq!(NoModuleName.module_name(&source), None);
        assert_eq!(
            FixedModuleName("mod/a".to_owned()).module_name(&source),
            Some("mod/a".to_owned())
        );
        fn from_fn(_: &ModuleSource<'_>) -> Option<String> {
            Some("from-fn".to_owned())
        }
        assert_eq!(from_fn.module_name(&source).as_deref(), Some("from-fn"));
    }
}
