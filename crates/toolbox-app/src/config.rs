use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use toolbox_core::{MemberRole, TaskStatus};

const CONFIG_DIR: &str = ".toolbox";
const CONFIG_FILE: &str = "config.toml";

const CONFIG_HEADER: &str = "\
# Toolbox configuration
#
# [board]   kanban columns in display order and the status given to new tasks
# [export]  meeting minutes (notulensi) export settings
# [profile] the person operating the toolbox; falls back to TOOLBOX_USER_NAME / USER
";

/// Top-level project configuration loaded from `.toolbox/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Kanban columns and the default task status.
    #[serde(default)]
    pub board: BoardConfig,
    /// Minutes export settings.
    #[serde(default)]
    pub export: ExportConfig,
    /// Operating user; the environment is consulted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileConfig>,
}

impl ProjectConfig {
    /// Path of the configuration file for `workdir`.
    #[must_use]
    pub fn config_path(workdir: impl AsRef<Path>) -> PathBuf {
        workdir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from a working directory. A missing file yields the defaults.
    ///
    /// Relative export directories are resolved against `workdir`.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let workdir = workdir.as_ref();
        let config_path = Self::config_path(workdir);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        if let Some(dir) = config.export.output_dir.as_mut()
            && dir.is_relative()
        {
            *dir = workdir.join(&*dir);
        }
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns an error describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        self.board.ensure_unique_columns()?;
        self.board.ensure_valid_default()?;
        self.export.ensure_valid_opener()
    }

    /// Render the configuration as TOML with an explanatory header.
    ///
    /// # Errors
    /// Returns an error when serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        let body = toml::to_string_pretty(self).context("failed to serialize configuration")?;
        Ok(format!("{CONFIG_HEADER}\n{body}"))
    }
}

/// Kanban board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    columns: Vec<BoardColumnConfig>,
    default_status: TaskStatus,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: TaskStatus::ALL.into_iter().map(BoardColumnConfig::new).collect(),
            default_status: TaskStatus::Pending,
        }
    }
}

impl BoardConfig {
    /// Construct a board from explicit columns.
    #[must_use]
    pub const fn from_columns(columns: Vec<BoardColumnConfig>, default_status: TaskStatus) -> Self {
        Self {
            columns,
            default_status,
        }
    }

    /// Columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumnConfig] {
        &self.columns
    }

    /// Status assigned to new tasks.
    #[must_use]
    pub const fn default_status(&self) -> TaskStatus {
        self.default_status
    }

    /// Column label for `status`, falling back to the built-in label.
    #[must_use]
    pub fn label_for(&self, status: TaskStatus) -> &str {
        self.columns
            .iter()
            .find(|column| column.status == status)
            .map_or_else(|| status.label(), BoardColumnConfig::label)
    }

    fn ensure_unique_columns(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.status) {
                bail!("duplicate board column detected: {}", column.status);
            }
        }
        Ok(())
    }

    fn ensure_valid_default(&self) -> Result<()> {
        if !self.columns.is_empty() && !self.columns.iter().any(|column| column.status == self.default_status) {
            bail!(
                "default status '{}' has no column on the board",
                self.default_status
            );
        }
        Ok(())
    }
}

/// One kanban column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumnConfig {
    status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl BoardColumnConfig {
    /// Column showing `status` with its built-in label.
    #[must_use]
    pub const fn new(status: TaskStatus) -> Self {
        Self { status, label: None }
    }

    /// Column with a custom heading.
    #[must_use]
    pub fn labelled(status: TaskStatus, label: impl Into<String>) -> Self {
        Self {
            status,
            label: Some(label.into()),
        }
    }

    /// Status collected in this column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Heading, using the built-in label when none is configured.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.status.label())
    }
}

/// Minutes export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Organisation name printed in the document header.
    pub organization: String,
    /// Trigger the print dialog as soon as the document loads.
    pub auto_print: bool,
    /// Command used to open exported documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_command: Option<String>,
    /// Directory receiving exported files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            organization: "Toolbox".into(),
            auto_print: true,
            open_command: None,
            output_dir: None,
        }
    }
}

impl ExportConfig {
    fn ensure_valid_opener(&self) -> Result<()> {
        if self
            .open_command
            .as_deref()
            .is_some_and(|command| command.trim().is_empty())
        {
            bail!("export open_command must not be empty");
        }
        Ok(())
    }
}

/// Profile of the operating user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Display name, also the default meeting organizer.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Department, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Directory role; member when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) -> Result<()> {
        let cfg_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(file, "{contents}")?;
        Ok(())
    }

    #[test]
    fn missing_config_returns_builtin_board() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.board.columns().len(), 4);
        assert_eq!(cfg.board.default_status(), TaskStatus::Pending);
        assert_eq!(cfg.export.organization, "Toolbox");
        assert!(cfg.export.auto_print);
        assert!(cfg.profile.is_none());
        Ok(())
    }

    #[test]
    fn load_config_with_columns_and_profile() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[board]\ncolumns = [\n  { status = \"todo\", label = \"Antrian\" },\n  { status = \"completed\" }\n]\n\n[export]\norganization = \"Koperasi Maju\"\nauto_print = false\noutput_dir = \"exports\"\n\n[profile]\nname = \"Budi Santoso\"\nemail = \"budi@example.invalid\"\nrole = \"coordinator\"",
        )?;

        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.board.columns().len(), 2);
        assert_eq!(cfg.board.label_for(TaskStatus::Pending), "Antrian");
        assert_eq!(cfg.board.label_for(TaskStatus::Completed), "Selesai");
        assert_eq!(cfg.board.label_for(TaskStatus::Overdue), "Terlambat");
        assert_eq!(cfg.export.organization, "Koperasi Maju");
        assert!(!cfg.export.auto_print);
        assert_eq!(cfg.export.output_dir, Some(dir.path().join("exports")));
        let profile = cfg.profile.unwrap_or_else(|| panic!("profile should be loaded"));
        assert_eq!(profile.name, "Budi Santoso");
        assert_eq!(profile.role, Some(MemberRole::Coordinator));
        Ok(())
    }

    #[test]
    fn duplicate_columns_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[board]\ncolumns = [\n  { status = \"pending\" },\n  { status = \"todo\" }\n]",
        )?;

        let Err(err) = ProjectConfig::from_workdir(dir.path()) else {
            panic!("duplicate board column should error");
        };
        assert!(format!("{err:#}").contains("duplicate board column"));
        Ok(())
    }

    #[test]
    fn default_status_must_have_a_column() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[board]\ncolumns = [{ status = \"completed\" }]\ndefault_status = \"in_progress\"",
        )?;

        let Err(err) = ProjectConfig::from_workdir(dir.path()) else {
            panic!("default status outside the board should error");
        };
        assert!(format!("{err:#}").contains("default status 'in_progress'"));
        Ok(())
    }

    #[test]
    fn empty_open_command_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[export]\nopen_command = \"  \"")?;

        let Err(err) = ProjectConfig::from_workdir(dir.path()) else {
            panic!("blank opener should error");
        };
        assert!(format!("{err:#}").contains("open_command must not be empty"));
        Ok(())
    }

    #[test]
    fn unknown_status_token_fails_to_parse() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[board]\ndefault_status = \"blocked\"")?;
        let Err(err) = ProjectConfig::from_workdir(dir.path()) else {
            panic!("unknown status should error");
        };
        assert!(format!("{err:#}").contains("failed to parse"));
        Ok(())
    }

    #[test]
    fn rendered_defaults_load_back() -> Result<()> {
        let dir = tempdir()?;
        let rendered = ProjectConfig::default().to_toml_string()?;
        assert!(rendered.starts_with("# Toolbox configuration"));
        write_config(dir.path(), &rendered)?;

        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.board, BoardConfig::default());
        assert_eq!(cfg.export, ExportConfig::default());
        Ok(())
    }
}
