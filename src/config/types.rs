//! Configuration data types for dockhand.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

/// Default address the HTTP surface binds to.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Default workspace root for cloned repositories.
const DEFAULT_WORKSPACE_ROOT: &str = "/work";

/// Default version-control client program.
const DEFAULT_FETCH_PROGRAM: &str = "git";

/// Default image build program.
const DEFAULT_BUILD_PROGRAM: &str = "docker";

/// Workspace configuration for cloned source trees.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Root directory for cloned repositories.
    pub root: Utf8PathBuf,

    /// Keep a request's directory when its fetch or build fails.
    ///
    /// The default keeps it: a failed build's context is forensic evidence.
    /// Hosts worried about disk growth under repeated failing requests can
    /// opt into removal.
    pub retain_on_failure: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from(DEFAULT_WORKSPACE_ROOT),
            retain_on_failure: true,
        }
    }
}

/// Repository fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Version-control client program used to clone.
    pub program: String,

    /// Optional limit in seconds on how long a clone may run.
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            program: String::from(DEFAULT_FETCH_PROGRAM),
            timeout_secs: None,
        }
    }
}

/// Image build configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build program invoked against the fetched context.
    pub program: String,

    /// Optional limit in seconds on how long a build may run.
    pub timeout_secs: Option<u64>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: String::from(DEFAULT_BUILD_PROGRAM),
            timeout_secs: None,
        }
    }
}

/// Registry credential configuration for push and pull operations.
///
/// There is no login endpoint; credentials configured here are attached to
/// each push/pull call individually.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry server address.
    pub address: Option<String>,

    /// Registry account username.
    pub username: Option<String>,

    /// Registry account password or token.
    pub password: Option<String>,
}

impl RegistryConfig {
    /// Returns whether credentials are configured for registry operations.
    ///
    /// A username is the minimum; address and password are optional
    /// refinements (some registries accept token-only authentication).
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.username.as_deref().is_some_and(|value| !value.is_empty())
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment
/// variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `DOCKHAND_CONFIG_PATH` environment variable
/// 2. `.dockhand.toml` in the current working directory
/// 3. `.dockhand.toml` in the home directory
/// 4. `~/.config/dockhand/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "DOCKHAND",
    post_merge_hook,
    discovery(
        app_name = "dockhand",
        env_var = "DOCKHAND_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".dockhand.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Address and port the HTTP surface binds to.
    pub listen_addr: Option<String>,

    /// The container engine socket path or URL.
    pub engine_socket: Option<String>,

    /// Workspace configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub workspace: WorkspaceConfig,

    /// Repository fetch configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub fetch: FetchConfig,

    /// Image build configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub build: BuildConfig,

    /// Registry credential configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub registry: RegistryConfig,
}

impl AppConfig {
    /// The address to bind, falling back to the default when unset or empty.
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        self.listen_addr
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_LISTEN_ADDR)
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Empty program names would otherwise surface as a confusing spawn
        // failure at request time; normalise them back to the defaults.
        if self.fetch.program.trim().is_empty() {
            self.fetch.program = String::from(DEFAULT_FETCH_PROGRAM);
        }
        if self.build.program.trim().is_empty() {
            self.build.program = String::from(DEFAULT_BUILD_PROGRAM);
        }
        Ok(())
    }
}
