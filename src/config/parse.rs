//! Configuration file parsing and discovery

use crate::config::project::Config;
use crate::config::value::Value;
use crate::error::{ConfigError, ConfigResult, DecodeError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file names to search for, in order of preference
pub const CONFIG_FILE_NAMES: &[&str] = &["pyproject.toml", "tasks.yml", "tasks.yaml"];

/// Source format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `pyproject.toml`, with everything under `[tool.project-tasks]`
    Toml,
    /// A YAML document with `tasks`, `variables` and `interpreter` at top level
    Yaml,
}

impl Format {
    /// Guess the format from a file extension; anything but YAML is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Format::Yaml,
            _ => Format::Toml,
        }
    }
}

/// The project-tasks section of a configuration document
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct Section<V> {
    /// Raw task definitions
    #[serde(default)]
    pub tasks: IndexMap<String, V>,

    /// Raw variable definitions
    #[serde(default)]
    pub variables: IndexMap<String, V>,

    /// Command prefix used to run steps (e.g., ["bash", "-c"])
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,
}

impl<V> Default for Section<V> {
    fn default() -> Self {
        Section {
            tasks: IndexMap::new(),
            variables: IndexMap::new(),
            interpreter: None,
        }
    }
}

impl<V: Into<Value>> Section<V> {
    /// Convert raw format-specific values into [`Value`]s
    pub fn into_values(self) -> Section<Value> {
        Section {
            tasks: convert(self.tasks),
            variables: convert(self.variables),
            interpreter: self.interpreter,
        }
    }
}

fn convert<V: Into<Value>>(map: IndexMap<String, V>) -> IndexMap<String, Value> {
    map.into_iter().map(|(key, value)| (key, value.into())).collect()
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: Tool,
}

#[derive(Debug, Default, Deserialize)]
struct Tool {
    #[serde(rename = "project-tasks", default)]
    project_tasks: Section<toml::Value>,
}

/// Find the configuration file starting from the current directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let current_dir = env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("failed to get current directory: {}", e))
    })?;
    find_config_file_from(current_dir)
}

/// Find the configuration file by searching `start_dir` and its parents
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(CONFIG_FILE_NAMES.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> ConfigResult<Config> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&contents, Format::from_path(path), Some(path))
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> ConfigResult<(Config, PathBuf)> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Parse configuration from a string
///
/// `path` is only used to locate decoding errors.
pub fn parse_config(content: &str, format: Format, path: Option<&Path>) -> ConfigResult<Config> {
    let section = decode(content, format, path)?;
    Config::from_section(section)
}

/// Decode the project-tasks section of a document
pub fn decode(content: &str, format: Format, path: Option<&Path>) -> ConfigResult<Section<Value>> {
    match format {
        Format::Toml => decode_toml(content, path),
        Format::Yaml => decode_yaml(content, path),
    }
}

fn decode_toml(content: &str, path: Option<&Path>) -> ConfigResult<Section<Value>> {
    let document: PyProject = toml::from_str(content).map_err(|e| {
        let (line, column) = match e.span() {
            Some(span) => line_column(content, span.start),
            None => end_of(content),
        };
        decode_error(path, line, column, e.message())
    })?;

    Ok(document.tool.project_tasks.into_values())
}

fn decode_yaml(content: &str, path: Option<&Path>) -> ConfigResult<Section<Value>> {
    let to_decode_error = |e: serde_yaml::Error| {
        let (line, column) = match e.location() {
            Some(location) => (location.line(), location.column()),
            None => end_of(content),
        };
        let message = e.to_string();
        let reason = message.split(" at line ").next().unwrap_or_default();
        decode_error(path, line, column, reason)
    };

    let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(to_decode_error)?;
    if document.is_null() {
        return Ok(Section::default());
    }

    let section = Section::<serde_yaml::Value>::deserialize(document).map_err(to_decode_error)?;
    Ok(section.into_values())
}

fn decode_error(path: Option<&Path>, line: usize, column: usize, message: &str) -> ConfigError {
    ConfigError::Decode(DecodeError {
        file: path.map(Path::to_path_buf),
        line,
        column,
        reason: lowercase_first(&single_line(message)),
    })
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

/// Position just past the last character, used when the decoder gives none
fn end_of(content: &str) -> (usize, usize) {
    let lines: Vec<&str> = content.lines().collect();
    match lines.last() {
        Some(last) => (lines.len(), last.chars().count() + 1),
        None => (0, 0),
    }
}

/// Decoder messages may span several lines; errors are reported on one
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(": ")
}

fn lowercase_first(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml_section() {
        let toml = r#"
[tool.project-tasks.tasks]
test = "cargo test"

[tool.project-tasks.variables]
foo = "bar"
"#;
        let config = parse_config(toml, Format::Toml, None).unwrap();
        assert!(config.contains_task("test"));
        assert!(config.variables().contains_key("foo"));
    }

    #[test]
    fn test_missing_section_is_empty_config() {
        let config = parse_config("[project]\nname = \"demo\"\n", Format::Toml, None).unwrap();
        assert_eq!(config.task_names().count(), 0);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
interpreter: [bash, -c]
tasks:
  hello: echo hello
variables:
  name: world
"#;
        let config = parse_config(yaml, Format::Yaml, None).unwrap();
        assert!(config.contains_task("hello"));
        assert_eq!(
            config.interpreter(),
            Some(&["bash".to_string(), "-c".to_string()][..])
        );
    }

    #[test]
    fn test_empty_yaml_document() {
        let config = parse_config("# nothing yet\n", Format::Yaml, None).unwrap();
        assert_eq!(config.task_names().count(), 0);
    }

    #[test]
    fn test_toml_decode_error_location() {
        let content = "[tool.project-tasks.tasks]\ntest = \n";
        let err = parse_config(content, Format::Toml, Some(Path::new("pyproject.toml"))).unwrap_err();
        let ConfigError::Decode(decode) = err else {
            panic!("expected a decode error, got {:?}", err);
        };
        assert_eq!(decode.line, 2);
        assert_eq!(decode.file, Some(PathBuf::from("pyproject.toml")));
        assert!(decode.to_string().starts_with("pyproject.toml:2:"));
    }

    #[test]
    fn test_decode_error_without_file_is_reason_only() {
        let err = parse_config("[invalid", Format::Toml, None).unwrap_err();
        let ConfigError::Decode(decode) = err else {
            panic!("expected a decode error, got {:?}", err);
        };
        assert_eq!(decode.to_string(), decode.reason);
        assert!(decode.reason.chars().next().map_or(false, |c| !c.is_uppercase()));
    }

    #[test]
    fn test_yaml_decode_error_location() {
        let content = "tasks:\n  a: [unclosed\n";
        let err = parse_config(content, Format::Yaml, Some(Path::new("tasks.yml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Decode(_)));
        assert!(err.to_string().starts_with("tasks.yml:"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("tasks.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("tasks.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("pyproject.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Toml);
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("abc\ndef", 5), (2, 2));
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(end_of("abc\nde"), (2, 3));
        assert_eq!(end_of(""), (0, 0));
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pyproject.toml");
        fs::write(&config_path, "[tool.project-tasks.tasks]\ntest = \"true\"\n").unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("tasks.yml");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&config_path, "tasks:\n  test: \"true\"\n").unwrap();

        let found = find_config_file_from(sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("pyproject.toml");
        let result = parse_config_file(&missing);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_parse_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pyproject.toml");
        fs::write(&config_path, "[tool.project-tasks.tasks]\nhello = \"echo hello\"\n").unwrap();

        let config = parse_config_file(&config_path).unwrap();
        assert!(config.contains_task("hello"));
    }
}
