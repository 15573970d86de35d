//! Run options, per-network configuration, and validation.
//!
//! [`RunOptions`] mirrors the command surface (`--trace [FILE]`,
//! `--graph [FILE]`, `--outdir DIR`). It is resolved against a network
//! name into a [`NetworkConfig`], which the network validates against its
//! [`Mode`] before any wiring happens.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foreign::Mode;

// ── OutputToggle ───────────────────────────────────────────────────

/// Whether an output file is produced, and where.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputToggle {
    /// No output.
    #[default]
    Disabled,
    /// Output to the default file name for the network.
    Default,
    /// Output to an explicit path.
    Path(PathBuf),
}

impl OutputToggle {
    /// Whether output is requested at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Resolve to a concrete path, joining relative paths onto `dir`.
    fn resolve(&self, dir: Option<&Path>, default_name: impl FnOnce() -> String) -> Option<PathBuf> {
        let file = match self {
            Self::Disabled => return None,
            Self::Default => PathBuf::from(default_name()),
            Self::Path(p) => p.clone(),
        };
        Some(match dir {
            Some(dir) => dir.join(file),
            None => file,
        })
    }
}

// ── RunOptions ─────────────────────────────────────────────────────

/// Output options for a simulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Trace file output.
    pub trace: OutputToggle,
    /// Topology graph output.
    pub graph: OutputToggle,
    /// Directory that relative output paths are placed in.
    pub output_dir: Option<PathBuf>,
}

impl RunOptions {
    /// Resolve these options for the network called `network`.
    ///
    /// Default file names are `trace-<network>.csv` and
    /// `graph-<network>.dot`.
    pub fn network_config(&self, network: &str) -> NetworkConfig {
        let dir = self.output_dir.as_deref();
        NetworkConfig {
            tracing: self.trace.is_enabled(),
            trace_path: self
                .trace
                .resolve(dir, || NetworkConfig::default_trace_name(network)),
            graph_path: self
                .graph
                .resolve(dir, || NetworkConfig::default_graph_name(network)),
        }
    }
}

// ── NetworkConfig ──────────────────────────────────────────────────

/// Resolved configuration of one network.
///
/// `tracing` without a `trace_path` keeps the trace in memory only
/// (see [`Network::trace`](crate::Network::trace)).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Record a trace sample for every local channel on every tick.
    pub tracing: bool,
    /// Where the trace is written at the end of each `advance`.
    pub trace_path: Option<PathBuf>,
    /// Where the topology graph is written after wiring.
    pub graph_path: Option<PathBuf>,
}

impl NetworkConfig {
    /// In-memory tracing, no files.
    pub fn traced() -> Self {
        Self {
            tracing: true,
            ..Self::default()
        }
    }

    /// Default trace file name for `network`.
    pub fn default_trace_name(network: &str) -> String {
        format!("trace-{network}.csv")
    }

    /// Default graph file name for `network`.
    pub fn default_graph_name(network: &str) -> String {
        format!("graph-{network}.dot")
    }

    /// Check this configuration against the network it is applied to.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyName`] for an empty network name (it prefixes
    /// every trace column), [`ConfigError::TracingInForeignMode`] when
    /// tracing is requested for a foreign-driven network, whose traces
    /// belong to the foreign engine.
    pub fn validate(&self, network: &str, mode: &Mode) -> Result<(), ConfigError> {
        if network.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.tracing && mode.is_foreign() {
            return Err(ConfigError::TracingInForeignMode {
                network: network.to_string(),
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`NetworkConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The network name is empty.
    #[error("network name must not be empty")]
    EmptyName,
    /// Tracing was requested for a foreign-driven network.
    #[error("network '{network}': tracing is handled by the foreign engine")]
    TracingInForeignMode {
        /// The network being configured.
        network: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foreign::ForeignEngine;
    use indexmap::IndexMap;
    use sme_bus::ForeignChannel;
    use sme_core::ForeignError;

    struct Inert;

    impl ForeignEngine for Inert {
        fn bus(
            &mut self,
            name: &str,
        ) -> Result<IndexMap<String, Box<dyn ForeignChannel>>, ForeignError> {
            Err(ForeignError::new(format!("no bus {name}")))
        }
        fn propagate(&mut self) -> Result<(), ForeignError> {
            Ok(())
        }
        fn tick(&mut self) -> Result<(), ForeignError> {
            Ok(())
        }
        fn finalize(&mut self) -> Result<(), ForeignError> {
            Ok(())
        }
    }

    #[test]
    fn disabled_outputs_resolve_to_nothing() {
        let cfg = RunOptions::default().network_config("top");
        assert_eq!(cfg, NetworkConfig::default());
    }

    #[test]
    fn default_names_derive_from_network() {
        let opts = RunOptions {
            trace: OutputToggle::Default,
            graph: OutputToggle::Default,
            output_dir: None,
        };
        let cfg = opts.network_config("top");
        assert!(cfg.tracing);
        assert_eq!(cfg.trace_path, Some(PathBuf::from("trace-top.csv")));
        assert_eq!(cfg.graph_path, Some(PathBuf::from("graph-top.dot")));
    }

    #[test]
    fn output_dir_prefixes_relative_paths() {
        let opts = RunOptions {
            trace: OutputToggle::Path("t.csv".into()),
            graph: OutputToggle::Default,
            output_dir: Some("out".into()),
        };
        let cfg = opts.network_config("n");
        assert_eq!(cfg.trace_path, Some(Path::new("out").join("t.csv")));
        assert_eq!(cfg.graph_path, Some(Path::new("out").join("graph-n.dot")));
    }

    #[test]
    fn graph_alone_does_not_enable_tracing() {
        let opts = RunOptions {
            graph: OutputToggle::Default,
            ..RunOptions::default()
        };
        assert!(!opts.network_config("n").tracing);
    }

    #[test]
    fn validate_rejects_empty_name() {
        assert_eq!(
            NetworkConfig::default().validate("", &Mode::Local),
            Err(ConfigError::EmptyName)
        );
    }

    #[test]
    fn validate_rejects_tracing_in_foreign_mode() {
        let mode = Mode::ForeignDriven(Box::new(Inert));
        assert!(NetworkConfig::default().validate("n", &mode).is_ok());
        assert_eq!(
            NetworkConfig::traced().validate("n", &mode),
            Err(ConfigError::TracingInForeignMode {
                network: "n".into()
            })
        );
    }
}
