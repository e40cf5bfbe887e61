//! Detection evidence — an immutable snapshot of the environment.
//!
//! Everything the rule ladder looks at is captured here once, up front.
//! The ladder itself never reads the process environment, which keeps it
//! pure: the same snapshot always produces the same verdict, and tests
//! build snapshots directly instead of mutating global state.

use sense_console::backend::Console;
use sense_console::state::OsVersion;

/// The evidence a detection run works from.
///
/// Captured from the real environment with [`DetectionSignals::from_env`]
/// or assembled field by field with the builder methods. Immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetectionSignals {
    term: Option<String>,
    colorterm: Option<String>,
    extended_hint: bool,
    wrapper_active: bool,
    ssh_session: bool,
    os_version: Option<OsVersion>,
}

impl DetectionSignals {
    /// An empty snapshot: no evidence of anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the conventional environment variables plus the console
    /// host version.
    ///
    /// Empty variable values count as unset, matching how shells treat
    /// them. The wrapper flag cannot be discovered from the environment;
    /// hosts that install an output-conversion wrapper set it with
    /// [`DetectionSignals::with_wrapper_active`].
    #[must_use]
    pub fn from_env(console: &dyn Console) -> Self {
        Self::from_parts(
            env_nonempty("TERM"),
            env_nonempty("COLORTERM"),
            env_nonempty("ANSICON").is_some(),
            env_nonempty("SSH_CLIENT").is_some(),
            console.os_version(),
        )
    }

    fn from_parts(
        term: Option<String>,
        colorterm: Option<String>,
        extended_hint: bool,
        ssh_session: bool,
        os_version: Option<OsVersion>,
    ) -> Self {
        Self {
            term,
            colorterm,
            extended_hint,
            wrapper_active: false,
            ssh_session,
            os_version,
        }
    }

    /// Sets the terminal type name (the `TERM` convention).
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Sets the truecolor announcement (the `COLORTERM` convention).
    #[must_use]
    pub fn with_colorterm(mut self, colorterm: impl Into<String>) -> Self {
        self.colorterm = Some(colorterm.into());
        self
    }

    /// Marks a legacy 256-color helper as present.
    #[must_use]
    pub const fn with_extended_hint(mut self, present: bool) -> Self {
        self.extended_hint = present;
        self
    }

    /// Marks an output-conversion wrapper as active on this process.
    #[must_use]
    pub const fn with_wrapper_active(mut self, active: bool) -> Self {
        self.wrapper_active = active;
        self
    }

    /// Marks this process as running inside a remote shell session.
    #[must_use]
    pub const fn with_ssh_session(mut self, remote: bool) -> Self {
        self.ssh_session = remote;
        self
    }

    /// Sets the console host version.
    #[must_use]
    pub const fn with_os_version(mut self, version: OsVersion) -> Self {
        self.os_version = Some(version);
        self
    }

    /// Sets a console host version with the given build number.
    #[must_use]
    pub const fn with_build(self, build: u32) -> Self {
        self.with_os_version(OsVersion::new(10, 0, build))
    }

    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    #[must_use]
    pub fn colorterm(&self) -> Option<&str> {
        self.colorterm.as_deref()
    }

    #[must_use]
    pub const fn extended_hint(&self) -> bool {
        self.extended_hint
    }

    #[must_use]
    pub const fn wrapper_active(&self) -> bool {
        self.wrapper_active
    }

    #[must_use]
    pub const fn ssh_session(&self) -> bool {
        self.ssh_session
    }

    #[must_use]
    pub const fn os_version(&self) -> Option<OsVersion> {
        self.os_version
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    nonempty(std::env::var(name).ok())
}

/// Empty values behave like unset variables throughout detection.
fn nonempty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_evidence() {
        let signals = DetectionSignals::new();
        assert_eq!(signals.term(), None);
        assert_eq!(signals.colorterm(), None);
        assert!(!signals.extended_hint());
        assert!(!signals.wrapper_active());
        assert!(!signals.ssh_session());
        assert!(signals.os_version().is_none());
    }

    #[test]
    fn builders_set_each_field() {
        let signals = DetectionSignals::new()
            .with_term("xterm-256color")
            .with_colorterm("truecolor")
            .with_extended_hint(true)
            .with_wrapper_active(true)
            .with_ssh_session(true)
            .with_build(19041);

        assert_eq!(signals.term(), Some("xterm-256color"));
        assert_eq!(signals.colorterm(), Some("truecolor"));
        assert!(signals.extended_hint());
        assert!(signals.wrapper_active());
        assert!(signals.ssh_session());
        assert_eq!(signals.os_version().map(|v| v.build), Some(19041));
    }

    #[test]
    fn empty_variable_values_count_as_unset() {
        assert_eq!(nonempty(Some(String::new())), None);
        assert_eq!(nonempty(Some("xterm".to_owned())), Some("xterm".to_owned()));
        assert_eq!(nonempty(None), None);
    }

    #[test]
    fn builders_override_a_captured_snapshot() {
        let console = sense_console::script::ScriptedConsole::new();
        let signals = DetectionSignals::from_env(&console)
            .with_wrapper_active(true)
            .with_term("vt100");

        assert!(signals.wrapper_active());
        assert_eq!(signals.term(), Some("vt100"));
        // The scripted console reports no host version, whatever the
        // surrounding environment says.
        assert!(signals.os_version().is_none());
    }

    #[test]
    fn wrapper_flag_is_never_sourced_from_parts() {
        let signals = DetectionSignals::from_parts(
            Some("xterm".to_owned()),
            None,
            true,
            true,
            Some(OsVersion::new(10, 0, 19041)),
        );
        assert!(!signals.wrapper_active());
        assert!(signals.extended_hint());
        assert!(signals.ssh_session());
    }
}
