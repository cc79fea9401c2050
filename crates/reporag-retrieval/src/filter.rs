use reporag_core::config::DEFAULT_EXTENSIONS;
use reporag_core::types::FileDescriptor;

/// Case-sensitive suffix allow-list on resource names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter { extensions: Vec<String> }

impl Default for ExtensionFilter {
    fn default() -> Self { Self::new(DEFAULT_EXTENSIONS) }
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> {
        Self { extensions: extensions.into_iter().map(Into::into).collect() }
    }

    pub fn extensions(&self) -> &[String] { &self.extensions }

    pub fn allows(&self, name: &str) -> bool { self.extensions.iter().any(|ext| name.ends_with(ext.as_str())) }

    pub fn apply(&self, files: Vec<FileDescriptor>) -> Vec<FileDescriptor> {
        files.into_iter().filter(|f| self.allows(&f.name)).collect()
    }
}
