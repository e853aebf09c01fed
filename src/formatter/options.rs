//! Formatting options

/// Build constraint written at the top of generated files
pub const GO19_BUILD_TAG: [&str; 2] = ["//go:build go1.9", "// +build go1.9"];

/// Options controlling the header of generated Go files
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Write the go1.9 build constraint (type aliases need Go 1.9)
    pub build_tag: bool,
    /// License text, one comment line per text line
    pub license_header: Option<String>,
    /// Generator named in the banner comment
    pub generator: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            build_tag: true,
            license_header: None,
            generator: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl FormatOptions {
    pub fn with_build_tag(mut self, build_tag: bool) -> Self {
        self.build_tag = build_tag;
        self
    }

    pub fn with_license_header(mut self, header: impl Into<String>) -> Self {
        self.license_header = Some(header.into());
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// License text as `//` comment lines
    pub fn license_lines(&self) -> Vec<String> {
        let Some(header) = &self.license_header else {
            return Vec::new();
        };
        header
            .trim_end()
            .lines()
            .map(|line| {
                let line = line.trim_end();
                if line.starts_with("//") {
                    line.to_string()
                } else if line.is_empty() {
                    "//".to_string()
                } else {
                    format!("// {}", line)
                }
            })
            .collect()
    }
}
