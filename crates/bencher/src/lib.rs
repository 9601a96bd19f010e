#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, file: TestFile) -> Self {
        Self { name, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }
}

/// A header block fixture, one `Name: value` line per header.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    content: &'static str,
}

impl TestFile {
    pub const fn new(content: &'static str) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    /// The raw `(name, value)` pairs of the fixture, in file order. Lines
    /// without a colon are skipped.
    pub fn header_pairs(&self) -> Vec<(&'static str, &'static str)> {
        self.content.lines().filter_map(|line| line.split_once(':')).collect()
    }
}
